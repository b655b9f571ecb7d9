/*
    fluxrip

    Copyright 2026 the fluxrip contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! The `bitstream` module defines [`BitWriter`], the append-only bit builder
//! that format encoders write records into. Multiple records accumulate into
//! one track buffer; the cursor is simply the current length.

use bit_vec::BitVec;

/// An append-only builder over a growable bit sequence.
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bits: BitVec,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter::default()
    }

    pub fn with_capacity(bit_ct: usize) -> Self {
        BitWriter {
            bits: BitVec::with_capacity(bit_ct),
        }
    }

    /// Current cursor position (number of bits written).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append a single bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the low `ct` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u32, ct: u8) {
        debug_assert!(ct <= 32);
        for i in (0..ct).rev() {
            self.bits.push((value >> i) & 1 != 0);
        }
    }

    /// Append a full byte, most significant bit first.
    pub fn push_byte(&mut self, byte: u8) {
        self.push_bits(byte as u32, 8);
    }

    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    pub fn into_bits(self) -> BitVec {
        self.bits
    }
}

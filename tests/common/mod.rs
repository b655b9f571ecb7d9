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
#![allow(dead_code)]

use bit_vec::BitVec;
use fluxrip::{BitWriter, Fluxmap, NS_PER_TICK};
use rand::Rng;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Synthesize a noiseless flux capture from an encoded bitstream: each
/// one-bit becomes a pulse, each zero-bit stretches the preceding interval
/// by one cell. Trailing zeros produce no pulse and are dropped.
pub fn fluxmap_from_bits(bits: &BitVec, cell_ns: f64) -> Fluxmap {
    let mut intervals = Vec::new();
    let mut cells = 0u32;
    for bit in bits.iter() {
        cells += 1;
        if bit {
            intervals.push((cells as f64 * cell_ns / NS_PER_TICK).round() as u32);
            cells = 0;
        }
    }
    Fluxmap::from_pulse_ticks(&intervals)
}

/// As [`fluxmap_from_bits`], with uniform timing jitter of up to
/// `jitter_ns` applied to each interval independently.
pub fn fluxmap_from_bits_jittered(bits: &BitVec, cell_ns: f64, jitter_ns: f64, rng: &mut impl Rng) -> Fluxmap {
    let mut intervals = Vec::new();
    let mut cells = 0u32;
    for bit in bits.iter() {
        cells += 1;
        if bit {
            let interval_ns = cells as f64 * cell_ns + rng.gen_range(-jitter_ns..jitter_ns);
            intervals.push((interval_ns / NS_PER_TICK).round() as u32);
            cells = 0;
        }
    }
    Fluxmap::from_pulse_ticks(&intervals)
}

/// Append a stretch of gap filler between records. Ends on a one-bit so any
/// preceding zero run is closed by a pulse.
pub fn pad(w: &mut BitWriter) {
    w.push_bits(0x5555, 16);
}

pub fn flip_bit(bits: &mut BitVec, idx: usize) {
    let bit = bits[idx];
    bits.set(idx, !bit);
}

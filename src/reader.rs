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

//! The `reader` module defines the [`FluxmapReader`], a cursor over a
//! [`Fluxmap`] that performs self-clocking bit recovery.
//!
//! Bit recovery classifies each inter-pulse interval against a nominal bit
//! cell period by nearest-multiple rounding: an interval of k cells yields
//! the bits `0^(k-1) 1`, with the pulse occupying the final cell. Intervals
//! whose deviation from the nearest multiple exceeds the tolerance band are
//! not errors; the bits they yield are merely flagged unsynchronized so the
//! sync search can discard its window and resume scanning.

use crate::fluxmap::{ticks_to_ns, FluxEventFlags, Fluxmap, NS_PER_TICK};
use bit_vec::BitVec;

/// Per-format clock recovery parameters. The exact tolerance band for the
/// 1x/2x/3x interval classification varies by format and should be tuned
/// against real captures.
#[derive(Copy, Clone, Debug)]
pub struct ClockProfile {
    /// Nominal bit cell period in nanoseconds.
    pub cell_ns: f64,
    /// Maximum deviation from the nearest cell multiple before an interval
    /// is treated as desynchronized.
    pub tolerance_ns: f64,
    /// Longest legal interval, in cells. Longer intervals occur in gaps and
    /// damaged regions and always desynchronize the bitstream.
    pub max_cells: u32,
}

/// One recovered bit. `synced` is false for bits recovered from an interval
/// outside the tolerance band; such bits carry no usable data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawBit {
    pub bit: bool,
    pub synced: bool,
}

/// A mutable cursor over a [`Fluxmap`]. One reader is created per decode
/// pass and discarded afterwards; the fluxmap itself is never mutated.
pub struct FluxmapReader<'a> {
    fluxmap: &'a Fluxmap,
    pos: usize,
    ticks_elapsed: u64,
    pending_zero_bits: u32,
    pending_one: bool,
    interval_synced: bool,
}

impl<'a> FluxmapReader<'a> {
    pub fn new(fluxmap: &'a Fluxmap) -> Self {
        FluxmapReader {
            fluxmap,
            pos: 0,
            ticks_elapsed: 0,
            pending_zero_bits: 0,
            pending_one: false,
            interval_synced: true,
        }
    }

    /// True once all events have been consumed.
    pub fn eof(&self) -> bool {
        self.pos >= self.fluxmap.event_ct()
    }

    /// Current elapsed time since the start of the track, in nanoseconds.
    pub fn tell_ns(&self) -> f64 {
        ticks_to_ns(self.ticks_elapsed)
    }

    /// Unconditionally consume the next event, returning its flags and
    /// duration, or `None` at end of track.
    pub fn next_event(&mut self) -> Option<(FluxEventFlags, u32)> {
        let event = self.fluxmap.events().get(self.pos)?;
        self.pos += 1;
        self.ticks_elapsed += event.ticks as u64;
        Some((event.flags, event.ticks))
    }

    /// Advance past events lacking any flag in `mask`, returning the total
    /// ticks consumed up to and including the matching event, or `None` if
    /// the end of the track was reached first.
    pub fn find_event(&mut self, mask: FluxEventFlags) -> Option<u32> {
        let mut consumed: u32 = 0;
        loop {
            let (flags, ticks) = self.next_event()?;
            consumed = consumed.saturating_add(ticks);
            if flags.intersects(mask) {
                return Some(consumed);
            }
        }
    }

    /// Recover the next bit from the pulse stream, or `None` at end of
    /// track. See the module docs for the recovery rule.
    pub fn read_bit(&mut self, clock: &ClockProfile) -> Option<RawBit> {
        loop {
            if self.pending_zero_bits > 0 {
                self.pending_zero_bits -= 1;
                return Some(RawBit {
                    bit: false,
                    synced: self.interval_synced,
                });
            }
            if self.pending_one {
                self.pending_one = false;
                // The pulse itself is always a real event; only the gap
                // leading up to it was unclassifiable.
                return Some(RawBit { bit: true, synced: true });
            }

            let ticks = self.find_event(FluxEventFlags::PULSE)?;
            let interval_ns = ticks as f64 * NS_PER_TICK;
            let nearest = (interval_ns / clock.cell_ns).round().max(1.0);
            let deviation = (interval_ns - nearest * clock.cell_ns).abs();

            let synced = nearest as u32 <= clock.max_cells && deviation <= clock.tolerance_ns;
            if !synced {
                log::trace!(
                    "FluxmapReader::read_bit(): desynchronized interval of {:.0}ns ({:.2} cells) at {:.0}ns",
                    interval_ns,
                    interval_ns / clock.cell_ns,
                    self.tell_ns()
                );
            }

            let cells = (nearest as u32).clamp(1, clock.max_cells);
            self.interval_synced = synced;
            self.pending_zero_bits = cells - 1;
            self.pending_one = true;
        }
    }

    /// Blindly consume a fixed span of `ct` recovered bits, as used for
    /// record bodies after a sync match. Returns `None` only if the track
    /// ends before the span is complete; desynchronized intervals are
    /// clamped to the nearest legal cell count and the resulting corruption
    /// is left to the record checksum to flag.
    pub fn read_raw_bits(&mut self, ct: usize, clock: &ClockProfile) -> Option<BitVec> {
        let mut bits = BitVec::with_capacity(ct);
        for _ in 0..ct {
            bits.push(self.read_bit(clock)?.bit);
        }
        Some(bits)
    }
}

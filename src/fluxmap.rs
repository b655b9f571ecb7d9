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

//! The `fluxmap` module defines the [`Fluxmap`], an immutable sequence of
//! timed flux events captured from one physical revolution of a track.
//!
//! A `Fluxmap` is produced by a capture transport or image loader and is
//! never mutated afterwards; any number of readers (decode passes,
//! visualization) may hold shared references to it concurrently.

use bitflags::bitflags;

/// Frequency of the capture clock, in Hz. Event durations are expressed in
/// ticks of this clock.
pub const TICK_FREQUENCY: f64 = 40_000_000.0;

/// Duration of one capture clock tick in nanoseconds.
pub const NS_PER_TICK: f64 = 1_000_000_000.0 / TICK_FREQUENCY;

bitflags! {
    /// Flags describing a single flux event.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct FluxEventFlags: u8 {
        /// Start-of-revolution marker from the index sensor.
        const INDEX = 0b0000_0001;
        /// A magnetic flux reversal.
        const PULSE = 0b0000_0010;
    }
}

/// A single timed event in a [`Fluxmap`]. `ticks` is the interval since the
/// previous event, in ticks of the capture clock.
#[derive(Copy, Clone, Debug)]
pub struct FluxEvent {
    pub flags: FluxEventFlags,
    pub ticks: u32,
}

/// An immutable, ordered sequence of timed flux events representing one
/// physical track revolution (or a captured span thereof).
#[derive(Clone, Debug, Default)]
pub struct Fluxmap {
    events: Vec<FluxEvent>,
    duration_ticks: u64,
}

impl Fluxmap {
    /// Create a new `Fluxmap` from a list of flux events.
    pub fn from_events(events: Vec<FluxEvent>) -> Self {
        let duration_ticks = events.iter().map(|e| e.ticks as u64).sum();
        log::trace!(
            "Fluxmap::from_events(): {} events spanning {} ticks",
            events.len(),
            duration_ticks
        );
        Fluxmap { events, duration_ticks }
    }

    /// Create a new `Fluxmap` from a list of inter-pulse intervals in capture
    /// clock ticks. An index marker is placed at the start of the revolution.
    pub fn from_pulse_ticks(intervals: &[u32]) -> Self {
        let mut events = Vec::with_capacity(intervals.len() + 1);
        events.push(FluxEvent {
            flags: FluxEventFlags::INDEX,
            ticks: 0,
        });
        for &ticks in intervals {
            events.push(FluxEvent {
                flags: FluxEventFlags::PULSE,
                ticks,
            });
        }
        Fluxmap::from_events(events)
    }

    /// Return the events of this revolution.
    pub fn events(&self) -> &[FluxEvent] {
        &self.events
    }

    /// Return the number of events in this revolution.
    pub fn event_ct(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the total duration of the capture in capture clock ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.duration_ticks
    }

    /// Return the total duration of the capture in nanoseconds.
    pub fn duration_ns(&self) -> f64 {
        ticks_to_ns(self.duration_ticks)
    }
}

/// Convert a tick count to nanoseconds using the capture clock period.
#[inline]
pub fn ticks_to_ns(ticks: u64) -> f64 {
    ticks as f64 * NS_PER_TICK
}

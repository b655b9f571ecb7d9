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

//! The `sector` module defines the decoded logical units produced by a track
//! decode: [`Sector`] and the per-track [`DecodedTrack`] result buffer.
//!
//! Sectors that failed their checksum are still produced, flagged invalid,
//! so downstream tooling can report them or reconcile across redundant
//! reads of the same track. Consumers must tolerate invalid sectors rather
//! than treat their presence as fatal.

use crate::chs::DiskCh;
use std::fmt::Display;

/// The logical sector address extracted from a sector header record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectorId {
    pub track:  u8,
    pub sector: u8,
}

impl SectorId {
    pub fn new(track: u8, sector: u8) -> Self {
        SectorId { track, sector }
    }
}

impl Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[T: {} S: {}]", self.track, self.sector)
    }
}

/// A decoded logical sector. Never mutated after creation; owned by the
/// caller that requested decoding.
///
/// The four timing marks locate the sector's header and data records within
/// the revolution, in nanoseconds from track start. They are retained for
/// diagnostics and visualization, not used by decoding logic.
#[derive(Clone, Debug)]
pub struct Sector {
    /// Physical address of the track this sector was decoded from.
    pub ch: DiskCh,
    /// Logical address from the sector header record.
    pub id: SectorId,
    /// Payload bytes. Present even when `valid` is false, so partial and
    /// corrupt sectors remain recoverable.
    pub payload: Vec<u8>,
    /// True if the trailing checksum matched the recomputed value.
    pub valid: bool,
    pub header_start_ns: f64,
    pub header_end_ns: f64,
    pub data_start_ns: f64,
    pub data_end_ns: f64,
}

/// The result buffer of one track decode pass.
#[derive(Clone, Debug)]
pub struct DecodedTrack {
    /// Physical address of the decoded track.
    pub ch: DiskCh,
    /// Total duration of the source capture in nanoseconds.
    pub duration_ns: f64,
    sectors: Vec<Sector>,
}

impl DecodedTrack {
    pub(crate) fn new(ch: DiskCh, duration_ns: f64, sectors: Vec<Sector>) -> Self {
        DecodedTrack {
            ch,
            duration_ns,
            sectors,
        }
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn into_sectors(self) -> Vec<Sector> {
        self.sectors
    }

    pub fn sector_ct(&self) -> usize {
        self.sectors.len()
    }

    /// Number of sectors whose checksum verified.
    pub fn valid_ct(&self) -> usize {
        self.sectors.iter().filter(|s| s.valid).count()
    }

    /// Return the logical sector IDs found in this track.
    pub fn sector_ids(&self) -> Vec<SectorId> {
        self.sectors.iter().map(|s| s.id).collect()
    }
}

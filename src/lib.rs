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

//! fluxrip recovers logical disk sectors from raw magnetic-flux timing
//! captures of floppy media, and synthesizes flux-level bit patterns for
//! writing sectors back.
//!
//! The pipeline is: raw capture → [`Fluxmap`] → [`FluxmapReader`] (clock
//! recovery) → [`TrackDecoder`] (sync search + field extraction) →
//! [`Sector`] records. Writing runs in reverse: sector data → format
//! encoder → bit sequence, ready for flux-pulse synthesis by a capture
//! transport outside this crate.
//!
//! Disk formats are registered as [`DiskFormat`] variants implementing the
//! [`FormatSchema`] capability trait; the generic sync-search loop is
//! parameterized over each format's codewords and record sizes, not
//! hard-coded to any of them.

pub mod bitstream;
mod chs;
pub mod decoder;
pub mod disk;
pub mod fluxmap;
pub mod format;
pub mod reader;
pub mod sector;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluxError {
    #[error("End of track was reached while decoding a record")]
    EndOfTrack,
    #[error("The decoder is not positioned on a record of the requested type")]
    WrongState,
    #[error("A data record was requested with no preceding sector header")]
    MissingHeader,
    #[error("Invalid parameters were specified to a library function")]
    ParameterError,
}

pub use crate::{
    bitstream::BitWriter,
    chs::DiskCh,
    decoder::{DataRecord, RecordType, SyncPattern, TrackDecoder},
    disk::decode_disk,
    fluxmap::{FluxEvent, FluxEventFlags, Fluxmap, NS_PER_TICK},
    format::{DiskFormat, FormatSchema},
    reader::{ClockProfile, FluxmapReader, RawBit},
    sector::{DecodedTrack, Sector, SectorId},
};

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

//! The `format` module defines the [`DiskFormat`] registry and the
//! [`FormatSchema`] capability trait binding the generic decoder to one
//! disk format's sync codewords, record sizes, bit-encoding rule and
//! checksum algorithm.
//!
//! A format declares these as static configuration; the generic sync-search
//! loop in [`crate::decoder`] takes them as data, not code. A schema
//! implementation contains no state.

pub mod brother;
mod dispatch;

use crate::{
    bitstream::BitWriter,
    decoder::{DataRecord, SyncPattern},
    reader::{ClockProfile, FluxmapReader},
    sector::SectorId,
    FluxError,
};
use std::fmt::{self, Display, Formatter};
use strum::IntoEnumIterator;

/// A disk format with a registered decoder/encoder pair, selected at
/// disk-identification time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
pub enum DiskFormat {
    /// Brother word-processor 3.5" format (one of them, at least).
    Brother,
}

impl DiskFormat {
    /// Short registry name of the format.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Look up a format by registry name, case-insensitively.
    pub fn from_name(name: &str) -> Option<DiskFormat> {
        DiskFormat::iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Return all registered formats.
    pub fn supported_formats() -> Vec<DiskFormat> {
        DiskFormat::iter().collect()
    }
}

impl Display for DiskFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DiskFormat::Brother => write!(f, "Brother word processor"),
        }
    }
}

/// The capability interface each concrete disk format implements.
///
/// Record decode operations are handed the reader positioned immediately
/// after their sync codeword and must consume exactly their record's
/// encoded span. Encode operations append the sync codeword plus the
/// encoded fields to the caller's bit builder.
pub trait FormatSchema {
    /// Clock recovery parameters for this format.
    fn clock(&self) -> ClockProfile;

    /// The sync codewords this format registers, one per record type.
    fn sync_patterns(&self) -> &'static [SyncPattern];

    /// Decode the address fields of a sector header record. `Ok(None)`
    /// indicates the fields failed demodulation; `FluxError::EndOfTrack`
    /// that the track ended mid-record.
    fn decode_sector_record(
        &self,
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<Option<SectorId>, FluxError>;

    /// Decode a data record's payload and verify its trailing checksum. A
    /// mismatch yields `valid == false` with the payload intact.
    fn decode_data_record(
        &self,
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<DataRecord, FluxError>;

    /// Append an encoded sector header record for the given address.
    fn encode_sector_header(&self, bits: &mut BitWriter, id: SectorId);

    /// Append an encoded data record carrying `payload` and a freshly
    /// computed checksum. Fails with `FluxError::ParameterError` if the
    /// payload is not the format's fixed record size.
    fn encode_sector_data(&self, bits: &mut BitWriter, payload: &[u8]) -> Result<(), FluxError>;
}

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
use crate::{
    bitstream::BitWriter,
    decoder::{DataRecord, SyncPattern},
    format::{brother::BrotherSchema, DiskFormat, FormatSchema},
    reader::{ClockProfile, FluxmapReader},
    sector::SectorId,
    FluxError,
};

impl FormatSchema for DiskFormat {
    fn clock(&self) -> ClockProfile {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::clock(),
        }
    }

    fn sync_patterns(&self) -> &'static [SyncPattern] {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::sync_patterns(),
        }
    }

    fn decode_sector_record(
        &self,
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<Option<SectorId>, FluxError> {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::decode_sector_record(reader, clock),
        }
    }

    fn decode_data_record(
        &self,
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<DataRecord, FluxError> {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::decode_data_record(reader, clock),
        }
    }

    fn encode_sector_header(&self, bits: &mut BitWriter, id: SectorId) {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::encode_sector_header(bits, id),
        }
    }

    fn encode_sector_data(&self, bits: &mut BitWriter, payload: &[u8]) -> Result<(), FluxError> {
        #[allow(clippy::match_single_binding)]
        match self {
            DiskFormat::Brother => BrotherSchema::encode_sector_data(bits, payload),
        }
    }
}

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

//! The Brother word-processor disk format (or at least, one of them).
//!
//! Records are delimited by two 32-bit sync codewords whose long runs of
//! one-bits cannot occur in GCR-encoded data. Record bodies use a 5-to-8
//! group-coded recording scheme: every 5 data bits are carried by one 8-bit
//! codeword chosen so that pulses never fall more than three bit cells
//! apart, keeping the stream self-clocking. A data record carries a
//! 256-byte payload and a trailing 24-bit CRC.

use crate::{
    bitstream::BitWriter,
    decoder::{DataRecord, RecordType, SyncPattern},
    reader::{ClockProfile, FluxmapReader},
    sector::SectorId,
    FluxError,
};
use bit_vec::BitVec;

pub const BROTHER_SECTOR_RECORD: u32 = 0xFFFF_FD57;
pub const BROTHER_DATA_RECORD: u32 = 0xFFFF_FDDB;
pub const BROTHER_DATA_RECORD_PAYLOAD: usize = 256;
pub const BROTHER_DATA_RECORD_CHECKSUM: usize = 3;

/// Number of GCR codewords carrying a data record's payload + checksum:
/// 259 bytes = 2072 bits, packed into ceil(2072 / 5) five-bit groups.
pub const BROTHER_DATA_RECORD_ENCODED_SIZE: usize = 415;

/// Number of GCR codewords in a sector header body (track, sector).
pub const BROTHER_HEADER_ENCODED_SIZE: usize = 4;

/// Nominal bit cell period. Brother media is written at roughly 260kbps.
pub const BROTHER_CELL_NS: f64 = 3833.0;

static SYNC_PATTERNS: [SyncPattern; 2] = [
    SyncPattern {
        word: BROTHER_SECTOR_RECORD,
        len: 32,
        record: RecordType::SectorHeader,
    },
    SyncPattern {
        word: BROTHER_DATA_RECORD,
        len: 32,
        record: RecordType::Data,
    },
];

/// The 5-to-8 GCR codebook. Every codeword leads with a one-bit, contains
/// no run of more than two zeros and, in any concatenation, no run of more
/// than three ones — which is what makes the sync codewords' longer one
/// runs unencodable as data.
#[rustfmt::skip]
const GCR_ENCODE: [u8; 32] = [
    0x92, 0x94, 0x95, 0x96, 0x99, 0x9A, 0x9C, 0x9D,
    0xA4, 0xA5, 0xA6, 0xA9, 0xAA, 0xAC, 0xAD, 0xAE,
    0xB2, 0xB4, 0xB5, 0xB6, 0xB9, 0xBA, 0xC9, 0xCA,
    0xCC, 0xCD, 0xCE, 0xD2, 0xD4, 0xD5, 0xD6, 0xD9,
];

const GCR_DECODE: [i8; 256] = build_gcr_decode();

const fn build_gcr_decode() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < GCR_ENCODE.len() {
        table[GCR_ENCODE[i] as usize] = i as i8;
        i += 1;
    }
    table
}

/// Compute the 24-bit record checksum (CRC-24, poly 0x864CFB, init
/// 0xB704CE, MSB first).
pub fn brother_checksum(data: &[u8]) -> u32 {
    const POLY: u32 = 0x86_4CFB;
    const INIT: u32 = 0xB7_04CE;

    let mut crc = INIT;
    for &byte in data {
        crc ^= (byte as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x100_0000 != 0 {
                crc ^= POLY;
            }
        }
    }
    crc & 0xFF_FFFF
}

#[inline]
fn gcr_decode(codeword: u8) -> Option<u8> {
    match GCR_DECODE[codeword as usize] {
        -1 => None,
        group => Some(group as u8),
    }
}

/// Collect 8 bits starting at `offset` into a byte, MSB first.
fn take_byte(bits: &BitVec, offset: usize) -> u8 {
    let mut byte = 0u8;
    for i in 0..8 {
        byte = (byte << 1) | bits[offset + i] as u8;
    }
    byte
}

/// Append a data byte as two GCR codewords (top five bits, then the low
/// three left-aligned in the second group).
fn gcr_encode_byte(bits: &mut BitWriter, byte: u8) {
    bits.push_byte(GCR_ENCODE[(byte >> 3) as usize]);
    bits.push_byte(GCR_ENCODE[((byte & 0x07) << 2) as usize]);
}

fn gcr_decode_byte(bits: &BitVec, offset: usize) -> Option<u8> {
    let hi = gcr_decode(take_byte(bits, offset))?;
    let lo = gcr_decode(take_byte(bits, offset + 8))?;
    Some((hi << 3) | (lo >> 2))
}

/// The Brother format schema. Stateless; dispatched to via
/// [`crate::format::DiskFormat`].
pub struct BrotherSchema;

impl BrotherSchema {
    pub fn clock() -> ClockProfile {
        ClockProfile {
            cell_ns: BROTHER_CELL_NS,
            tolerance_ns: BROTHER_CELL_NS * 0.25,
            max_cells: 3,
        }
    }

    pub fn sync_patterns() -> &'static [SyncPattern] {
        &SYNC_PATTERNS
    }

    /// Decode the track/sector address fields following a header sync.
    pub fn decode_sector_record(
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<Option<SectorId>, FluxError> {
        let bits = reader
            .read_raw_bits(BROTHER_HEADER_ENCODED_SIZE * 8, clock)
            .ok_or(FluxError::EndOfTrack)?;

        let (Some(track), Some(sector)) = (gcr_decode_byte(&bits, 0), gcr_decode_byte(&bits, 16)) else {
            log::trace!("BrotherSchema::decode_sector_record(): invalid GCR codeword in header");
            return Ok(None);
        };

        Ok(Some(SectorId::new(track, sector)))
    }

    /// Decode a data record's payload and verify the trailing checksum.
    pub fn decode_data_record(
        reader: &mut FluxmapReader,
        clock: &ClockProfile,
    ) -> Result<DataRecord, FluxError> {
        let bits = reader
            .read_raw_bits(BROTHER_DATA_RECORD_ENCODED_SIZE * 8, clock)
            .ok_or(FluxError::EndOfTrack)?;

        let record_len = BROTHER_DATA_RECORD_PAYLOAD + BROTHER_DATA_RECORD_CHECKSUM;
        let mut record = Vec::with_capacity(record_len);
        let mut demod_ok = true;

        // Unpack each codeword into five data bits; the final three bits of
        // the last group are padding.
        let mut fifo: u32 = 0;
        let mut fifo_len: u32 = 0;
        for codeword in 0..BROTHER_DATA_RECORD_ENCODED_SIZE {
            let group = match gcr_decode(take_byte(&bits, codeword * 8)) {
                Some(group) => group,
                None => {
                    demod_ok = false;
                    0
                }
            };
            fifo = (fifo << 5) | group as u32;
            fifo_len += 5;
            if fifo_len >= 8 && record.len() < record_len {
                fifo_len -= 8;
                record.push((fifo >> fifo_len) as u8);
            }
        }
        debug_assert_eq!(record.len(), record_len);

        let payload = record[..BROTHER_DATA_RECORD_PAYLOAD].to_vec();
        let stored = record[BROTHER_DATA_RECORD_PAYLOAD..]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);
        let computed = brother_checksum(&payload);

        if !demod_ok {
            log::trace!("BrotherSchema::decode_data_record(): invalid GCR codeword in record body");
        }

        Ok(DataRecord {
            payload,
            valid: demod_ok && stored == computed,
        })
    }

    /// Append a sector header record: sync plus GCR-expanded track and
    /// sector bytes.
    pub fn encode_sector_header(bits: &mut BitWriter, id: SectorId) {
        bits.push_bits(BROTHER_SECTOR_RECORD, 32);
        gcr_encode_byte(bits, id.track);
        gcr_encode_byte(bits, id.sector);
    }

    /// Append a data record: sync, then payload + CRC packed into exactly
    /// [`BROTHER_DATA_RECORD_ENCODED_SIZE`] GCR codewords, so the emitted
    /// span always equals the decoder's expected span.
    pub fn encode_sector_data(bits: &mut BitWriter, payload: &[u8]) -> Result<(), FluxError> {
        if payload.len() != BROTHER_DATA_RECORD_PAYLOAD {
            log::error!(
                "BrotherSchema::encode_sector_data(): payload must be {} bytes, got {}",
                BROTHER_DATA_RECORD_PAYLOAD,
                payload.len()
            );
            return Err(FluxError::ParameterError);
        }

        bits.push_bits(BROTHER_DATA_RECORD, 32);
        let body_start = bits.len();

        let checksum = brother_checksum(payload);
        let mut record = Vec::with_capacity(BROTHER_DATA_RECORD_PAYLOAD + BROTHER_DATA_RECORD_CHECKSUM);
        record.extend_from_slice(payload);
        record.push((checksum >> 16) as u8);
        record.push((checksum >> 8) as u8);
        record.push(checksum as u8);

        let mut fifo: u32 = 0;
        let mut fifo_len: u32 = 0;
        for &byte in &record {
            fifo = (fifo << 8) | byte as u32;
            fifo_len += 8;
            while fifo_len >= 5 {
                fifo_len -= 5;
                bits.push_byte(GCR_ENCODE[((fifo >> fifo_len) & 0x1F) as usize]);
            }
        }
        if fifo_len > 0 {
            // Left-align the remaining bits into a final padded group.
            bits.push_byte(GCR_ENCODE[((fifo << (5 - fifo_len)) & 0x1F) as usize]);
        }

        debug_assert_eq!(bits.len() - body_start, BROTHER_DATA_RECORD_ENCODED_SIZE * 8);
        Ok(())
    }
}

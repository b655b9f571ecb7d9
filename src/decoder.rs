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

//! The `decoder` module implements the format-agnostic record decoder: a
//! state machine that consumes a [`FluxmapReader`] and emits typed records
//! by locating format-specific synchronization codewords.
//!
//! Sync search is a bit-window correlation: as bits are recovered one at a
//! time, the last N bits are compared against each codeword the format
//! registered. Codewords use reserved, clock-rule-violating bit patterns
//! that legal data can never produce, so a match identifies a record
//! boundary rather than a statistical coincidence.

use crate::{
    chs::DiskCh,
    fluxmap::Fluxmap,
    format::{DiskFormat, FormatSchema},
    reader::{ClockProfile, FluxmapReader},
    sector::{DecodedTrack, Sector, SectorId},
    FluxError,
};

/// The kind of record located by [`TrackDecoder::advance_to_next_record`],
/// telling the caller what to decode next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordType {
    /// End-of-track sentinel; no further records exist.
    End,
    /// A sector header record.
    SectorHeader,
    /// A sector data record.
    Data,
}

/// A registered sync codeword: a fixed-width bit pattern marking the start
/// of a record of the given type.
#[derive(Copy, Clone, Debug)]
pub struct SyncPattern {
    pub word:   u32,
    pub len:    u8,
    pub record: RecordType,
}

impl SyncPattern {
    #[inline]
    fn mask(&self) -> u32 {
        if self.len >= 32 {
            u32::MAX
        }
        else {
            (1u32 << self.len) - 1
        }
    }

    #[inline]
    fn matches(&self, window: u32, window_len: u32) -> bool {
        window_len >= self.len as u32 && (window & self.mask()) == (self.word & self.mask())
    }
}

/// A demodulated data record body, produced by a format schema and consumed
/// by [`TrackDecoder::decode_data_record`].
#[derive(Clone, Debug)]
pub struct DataRecord {
    pub payload: Vec<u8>,
    pub valid:   bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DecodeState {
    Searching,
    HeaderFound,
    DataFound,
    End,
}

/// A decoded sector header held until its data record arrives.
#[derive(Copy, Clone, Debug)]
struct PendingHeader {
    id: SectorId,
    header_start_ns: f64,
    header_end_ns: f64,
}

/// The generic decoder state machine for one track revolution. Created at
/// the start of a track's decode pass and discarded after; holds no
/// resources beyond its reader over the shared, immutable fluxmap.
pub struct TrackDecoder<'a> {
    format: DiskFormat,
    clock: ClockProfile,
    ch: DiskCh,
    reader: FluxmapReader<'a>,
    duration_ns: f64,
    state: DecodeState,
    pending: Option<PendingHeader>,
    record_start_ns: f64,
}

impl<'a> TrackDecoder<'a> {
    pub fn new(format: DiskFormat, ch: DiskCh, fluxmap: &'a Fluxmap) -> Self {
        TrackDecoder {
            format,
            clock: format.clock(),
            ch,
            reader: FluxmapReader::new(fluxmap),
            duration_ns: fluxmap.duration_ns(),
            state: DecodeState::Searching,
            pending: None,
            record_start_ns: 0.0,
        }
    }

    /// True once the underlying reader has consumed all flux events.
    pub fn eof(&self) -> bool {
        self.reader.eof()
    }

    /// Scan the bitstream for the next occurrence of a registered sync
    /// codeword, returning the type of record it announces, or
    /// [`RecordType::End`] when the track is exhausted.
    ///
    /// Desynchronized bits reset the correlation window; a persistent loss
    /// of sync therefore surfaces only as an eventual `End`, never as an
    /// error.
    pub fn advance_to_next_record(&mut self) -> RecordType {
        let patterns = self.format.sync_patterns();
        let mut window: u32 = 0;
        let mut window_len: u32 = 0;

        loop {
            let Some(raw) = self.reader.read_bit(&self.clock) else {
                self.state = DecodeState::End;
                return RecordType::End;
            };

            if !raw.synced {
                window = 0;
                window_len = 0;
                continue;
            }

            window = (window << 1) | raw.bit as u32;
            window_len = (window_len + 1).min(32);

            if let Some(pattern) = patterns.iter().find(|p| p.matches(window, window_len)) {
                self.record_start_ns = self.reader.tell_ns();
                self.state = match pattern.record {
                    RecordType::SectorHeader => DecodeState::HeaderFound,
                    RecordType::Data => DecodeState::DataFound,
                    RecordType::End => DecodeState::End,
                };
                log::trace!(
                    "TrackDecoder::advance_to_next_record(): {:?} sync {:08X} at {:.0}ns",
                    pattern.record,
                    pattern.word,
                    self.record_start_ns
                );
                return pattern.record;
            }
        }
    }

    /// Decode the sector header record whose sync codeword was just
    /// matched, retaining its address and timing marks for the data record
    /// that should follow.
    ///
    /// Returns `Ok(None)` if the header fields failed demodulation (the
    /// header is dropped and scanning should continue). Calling this
    /// without a preceding header sync match is a contract violation and
    /// returns [`FluxError::WrongState`].
    pub fn decode_sector_record(&mut self) -> Result<Option<SectorId>, FluxError> {
        if self.state != DecodeState::HeaderFound {
            return Err(FluxError::WrongState);
        }

        let header_start_ns = self.record_start_ns;
        let id = match self.format.decode_sector_record(&mut self.reader, &self.clock) {
            Ok(id) => id,
            Err(FluxError::EndOfTrack) => {
                self.state = DecodeState::End;
                return Err(FluxError::EndOfTrack);
            }
            Err(e) => return Err(e),
        };
        let header_end_ns = self.reader.tell_ns();
        self.state = DecodeState::Searching;

        match id {
            Some(id) => {
                log::trace!("TrackDecoder::decode_sector_record(): header {} at {:.0}ns", id, header_start_ns);
                self.pending = Some(PendingHeader {
                    id,
                    header_start_ns,
                    header_end_ns,
                });
                Ok(Some(id))
            }
            None => {
                log::debug!(
                    "TrackDecoder::decode_sector_record(): undecodable header at {:.0}ns, dropping",
                    header_start_ns
                );
                Ok(None)
            }
        }
    }

    /// Decode the data record whose sync codeword was just matched, pairing
    /// it with the most recently decoded sector header to produce a
    /// [`Sector`].
    ///
    /// A checksum mismatch still yields the sector, flagged invalid. Only
    /// structural exhaustion (the track ending mid-record) fails, with
    /// [`FluxError::EndOfTrack`]; callers treat that as "no further
    /// record". Calling this without a matched data sync is a contract
    /// violation ([`FluxError::WrongState`]), as is calling it when no
    /// header preceded the data record ([`FluxError::MissingHeader`]).
    pub fn decode_data_record(&mut self) -> Result<Sector, FluxError> {
        if self.state != DecodeState::DataFound {
            return Err(FluxError::WrongState);
        }
        if self.pending.is_none() {
            return Err(FluxError::MissingHeader);
        }

        let data_start_ns = self.record_start_ns;
        let record = match self.format.decode_data_record(&mut self.reader, &self.clock) {
            Ok(record) => record,
            Err(FluxError::EndOfTrack) => {
                self.state = DecodeState::End;
                return Err(FluxError::EndOfTrack);
            }
            Err(e) => return Err(e),
        };
        let data_end_ns = self.reader.tell_ns();
        self.state = DecodeState::Searching;

        // Checked above.
        let header = self.pending.take().ok_or(FluxError::MissingHeader)?;

        if !record.valid {
            log::debug!(
                "TrackDecoder::decode_data_record(): checksum mismatch for {} at {:.0}ns",
                header.id,
                data_start_ns
            );
        }

        Ok(Sector {
            ch: self.ch,
            id: header.id,
            payload: record.payload,
            valid: record.valid,
            header_start_ns: header.header_start_ns,
            header_end_ns: header.header_end_ns,
            data_start_ns,
            data_end_ns,
        })
    }

    /// Drive the state machine to end of track, pairing headers with data
    /// records and collecting every sector found, valid or not. Orphan data
    /// records (no preceding header) are skipped.
    pub fn decode_track(mut self) -> DecodedTrack {
        let mut sectors = Vec::new();

        loop {
            match self.advance_to_next_record() {
                RecordType::End => break,
                RecordType::SectorHeader => match self.decode_sector_record() {
                    Ok(_) => {}
                    Err(FluxError::EndOfTrack) => break,
                    Err(e) => {
                        log::error!("TrackDecoder::decode_track(): header decode failed: {}", e);
                        break;
                    }
                },
                RecordType::Data => {
                    if self.pending.is_none() {
                        log::debug!(
                            "TrackDecoder::decode_track(): orphan data record at {:.0}ns, skipping",
                            self.record_start_ns
                        );
                        continue;
                    }
                    match self.decode_data_record() {
                        Ok(sector) => sectors.push(sector),
                        Err(FluxError::EndOfTrack) => break,
                        Err(e) => {
                            log::error!("TrackDecoder::decode_track(): data decode failed: {}", e);
                            break;
                        }
                    }
                }
            }
        }

        log::debug!(
            "TrackDecoder::decode_track(): {} decoded {} sectors ({} valid)",
            self.ch,
            sectors.len(),
            sectors.iter().filter(|s| s.valid).count()
        );

        DecodedTrack::new(self.ch, self.duration_ns, sectors)
    }
}

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
mod common;

use common::*;
use fluxrip::{
    decode_disk,
    format::brother::{BROTHER_CELL_NS, BROTHER_DATA_RECORD_ENCODED_SIZE, BROTHER_DATA_RECORD_PAYLOAD},
    BitWriter,
    DiskCh,
    DiskFormat,
    FluxError,
    Fluxmap,
    FormatSchema,
    RecordType,
    SectorId,
    TrackDecoder,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const FORMAT: DiskFormat = DiskFormat::Brother;

fn motif_payload() -> Vec<u8> {
    hex::decode("c0ffee00").unwrap().repeat(64)
}

/// Encode a full track: gap filler, then header + data record per sector.
fn build_track(sectors: &[(SectorId, Vec<u8>)]) -> BitWriter {
    let mut w = BitWriter::new();
    pad(&mut w);
    for (id, payload) in sectors {
        FORMAT.encode_sector_header(&mut w, *id);
        pad(&mut w);
        FORMAT.encode_sector_data(&mut w, payload).unwrap();
        pad(&mut w);
    }
    w
}

#[test]
fn round_trip_single_sector() {
    init();

    let payload = motif_payload();
    let w = build_track(&[(SectorId::new(2, 5), payload.clone())]);
    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);

    let ch = DiskCh::new(2, 0);
    let track = TrackDecoder::new(FORMAT, ch, &fluxmap).decode_track();

    assert_eq!(track.sector_ct(), 1);
    assert_eq!(track.valid_ct(), 1);
    let sector = &track.sectors()[0];
    assert_eq!(sector.ch, ch);
    assert_eq!(sector.id, SectorId::new(2, 5));
    assert!(sector.valid);
    assert_eq!(sector.payload, payload);
}

#[test]
fn round_trip_many_sectors_with_random_payloads() {
    init();

    let mut rng = StdRng::seed_from_u64(0x0dd5);
    let sectors: Vec<(SectorId, Vec<u8>)> = (0..12)
        .map(|s| {
            let payload: Vec<u8> = (0..BROTHER_DATA_RECORD_PAYLOAD).map(|_| rng.gen()).collect();
            (SectorId::new(7, s), payload)
        })
        .collect();

    let w = build_track(&sectors);
    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
    let track = TrackDecoder::new(FORMAT, DiskCh::new(7, 0), &fluxmap).decode_track();

    assert_eq!(track.sector_ct(), 12);
    assert_eq!(track.valid_ct(), 12);
    for (sector, (id, payload)) in track.sectors().iter().zip(&sectors) {
        assert_eq!(sector.id, *id);
        assert_eq!(&sector.payload, payload);
    }
}

#[test]
fn all_zero_and_all_ones_payloads_round_trip() {
    init();

    for fill in [0x00u8, 0xFF] {
        let payload = vec![fill; BROTHER_DATA_RECORD_PAYLOAD];
        let w = build_track(&[(SectorId::new(0, 0), payload.clone())]);
        let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
        let track = TrackDecoder::new(FORMAT, DiskCh::new(0, 0), &fluxmap).decode_track();
        assert_eq!(track.valid_ct(), 1);
        assert_eq!(track.sectors()[0].payload, payload);
    }
}

#[test]
fn checksum_corruption_flags_sector_invalid_but_keeps_payload() {
    init();

    let payload = motif_payload();
    let mut w = BitWriter::new();
    pad(&mut w);
    FORMAT.encode_sector_header(&mut w, SectorId::new(1, 3));
    pad(&mut w);
    let data_start = w.len();
    FORMAT.encode_sector_data(&mut w, &payload).unwrap();
    pad(&mut w);

    // Corrupt a bit inside the trailing checksum codewords; the payload
    // codewords before it are untouched.
    let mut bits = w.into_bits();
    flip_bit(&mut bits, data_start + 32 + 412 * 8 + 3);

    let fluxmap = fluxmap_from_bits(&bits, BROTHER_CELL_NS);
    let track = TrackDecoder::new(FORMAT, DiskCh::new(1, 0), &fluxmap).decode_track();

    assert_eq!(track.sector_ct(), 1);
    assert_eq!(track.valid_ct(), 0);
    let sector = &track.sectors()[0];
    assert!(!sector.valid);
    assert_eq!(sector.payload, payload);
}

#[test]
fn resynchronizes_after_a_corrupt_sync_codeword() {
    init();

    let payload_a = vec![0x11u8; BROTHER_DATA_RECORD_PAYLOAD];
    let payload_b = vec![0x22u8; BROTHER_DATA_RECORD_PAYLOAD];

    let mut w = BitWriter::new();
    pad(&mut w);
    FORMAT.encode_sector_header(&mut w, SectorId::new(4, 0));
    pad(&mut w);
    let data_a_sync = w.len();
    FORMAT.encode_sector_data(&mut w, &payload_a).unwrap();
    pad(&mut w);
    FORMAT.encode_sector_header(&mut w, SectorId::new(4, 1));
    pad(&mut w);
    FORMAT.encode_sector_data(&mut w, &payload_b).unwrap();
    pad(&mut w);

    // Break the first data record's sync; its body is never entered and
    // scanning carries on to the second sector.
    let mut bits = w.into_bits();
    flip_bit(&mut bits, data_a_sync + 5);

    let fluxmap = fluxmap_from_bits(&bits, BROTHER_CELL_NS);
    let track = TrackDecoder::new(FORMAT, DiskCh::new(4, 0), &fluxmap).decode_track();

    assert_eq!(track.sector_ids(), vec![SectorId::new(4, 1)]);
    assert_eq!(track.valid_ct(), 1);
    assert_eq!(track.sectors()[0].payload, payload_b);
}

#[test]
fn undecodable_header_is_dropped() {
    init();

    let mut w = BitWriter::new();
    pad(&mut w);
    let header_sync = w.len();
    FORMAT.encode_sector_header(&mut w, SectorId::new(3, 2));
    pad(&mut w);
    FORMAT
        .encode_sector_data(&mut w, &vec![0x5Au8; BROTHER_DATA_RECORD_PAYLOAD])
        .unwrap();
    pad(&mut w);

    // Clearing the leading bit of the first address codeword makes it an
    // illegal group code; the header fails demodulation and its data
    // record is then an orphan.
    let mut bits = w.into_bits();
    flip_bit(&mut bits, header_sync + 32);

    let fluxmap = fluxmap_from_bits(&bits, BROTHER_CELL_NS);
    let track = TrackDecoder::new(FORMAT, DiskCh::new(3, 0), &fluxmap).decode_track();

    assert_eq!(track.sector_ct(), 0);
}

#[test]
fn orphan_data_record_is_skipped() {
    init();

    let mut w = BitWriter::new();
    pad(&mut w);
    FORMAT
        .encode_sector_data(&mut w, &vec![0x33u8; BROTHER_DATA_RECORD_PAYLOAD])
        .unwrap();
    pad(&mut w);
    FORMAT.encode_sector_header(&mut w, SectorId::new(6, 9));
    pad(&mut w);
    let payload = motif_payload();
    FORMAT.encode_sector_data(&mut w, &payload).unwrap();
    pad(&mut w);

    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
    let track = TrackDecoder::new(FORMAT, DiskCh::new(6, 0), &fluxmap).decode_track();

    assert_eq!(track.sector_ids(), vec![SectorId::new(6, 9)]);
    assert_eq!(track.sectors()[0].payload, payload);
}

#[test]
fn truncated_data_record_ends_the_track() {
    init();

    let mut full = BitWriter::new();
    FORMAT
        .encode_sector_data(&mut full, &vec![0u8; BROTHER_DATA_RECORD_PAYLOAD])
        .unwrap();

    let mut w = BitWriter::new();
    pad(&mut w);
    FORMAT.encode_sector_header(&mut w, SectorId::new(8, 1));
    pad(&mut w);
    // Only the sync and a fragment of the record body survive.
    for i in 0..200 {
        w.push(full.bits()[i]);
    }

    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
    let mut decoder = TrackDecoder::new(FORMAT, DiskCh::new(8, 0), &fluxmap);

    assert_eq!(decoder.advance_to_next_record(), RecordType::SectorHeader);
    assert_eq!(decoder.decode_sector_record().unwrap(), Some(SectorId::new(8, 1)));
    assert_eq!(decoder.advance_to_next_record(), RecordType::Data);
    assert!(matches!(decoder.decode_data_record(), Err(FluxError::EndOfTrack)));
    assert_eq!(decoder.advance_to_next_record(), RecordType::End);
    assert!(decoder.eof());
}

#[test]
fn empty_capture_yields_end_immediately() {
    init();

    let fluxmap = Fluxmap::from_events(Vec::new());
    let mut decoder = TrackDecoder::new(FORMAT, DiskCh::new(0, 0), &fluxmap);
    assert!(decoder.eof());
    assert_eq!(decoder.advance_to_next_record(), RecordType::End);

    let track = TrackDecoder::new(FORMAT, DiskCh::new(0, 0), &fluxmap).decode_track();
    assert_eq!(track.sector_ct(), 0);
}

#[test]
fn record_decode_requires_a_matched_sync() {
    init();

    let w = build_track(&[(SectorId::new(0, 1), vec![0u8; BROTHER_DATA_RECORD_PAYLOAD])]);
    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);

    let mut decoder = TrackDecoder::new(FORMAT, DiskCh::new(0, 0), &fluxmap);
    assert!(matches!(decoder.decode_sector_record(), Err(FluxError::WrongState)));
    assert!(matches!(decoder.decode_data_record(), Err(FluxError::WrongState)));
}

#[test]
fn data_record_without_header_is_a_missing_header_error() {
    init();

    let mut w = BitWriter::new();
    pad(&mut w);
    FORMAT
        .encode_sector_data(&mut w, &vec![0u8; BROTHER_DATA_RECORD_PAYLOAD])
        .unwrap();
    pad(&mut w);

    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
    let mut decoder = TrackDecoder::new(FORMAT, DiskCh::new(0, 0), &fluxmap);
    assert_eq!(decoder.advance_to_next_record(), RecordType::Data);
    assert!(matches!(decoder.decode_data_record(), Err(FluxError::MissingHeader)));
}

#[test]
fn timing_marks_are_ordered_within_the_capture() {
    init();

    let w = build_track(&[(SectorId::new(5, 5), motif_payload())]);
    let fluxmap = fluxmap_from_bits(w.bits(), BROTHER_CELL_NS);
    let duration_ns = fluxmap.duration_ns();

    let track = TrackDecoder::new(FORMAT, DiskCh::new(5, 0), &fluxmap).decode_track();
    assert_eq!(track.duration_ns, duration_ns);

    let s = &track.sectors()[0];
    assert!(s.header_start_ns > 0.0);
    assert!(s.header_start_ns < s.header_end_ns);
    assert!(s.header_end_ns < s.data_start_ns);
    assert!(s.data_start_ns < s.data_end_ns);
    assert!(s.data_end_ns <= duration_ns);

    // The data record spans its fixed encoded size.
    let body_ns = s.data_end_ns - s.data_start_ns;
    let expect_ns = (BROTHER_DATA_RECORD_ENCODED_SIZE * 8) as f64 * BROTHER_CELL_NS;
    assert!((body_ns - expect_ns).abs() < expect_ns * 0.01);
}

#[test]
fn jittered_capture_still_decodes() {
    init();

    let mut rng = StdRng::seed_from_u64(0xF1);
    let payload = motif_payload();
    let w = build_track(&[(SectorId::new(9, 2), payload.clone())]);
    let fluxmap = fluxmap_from_bits_jittered(w.bits(), BROTHER_CELL_NS, 600.0, &mut rng);

    let track = TrackDecoder::new(FORMAT, DiskCh::new(9, 0), &fluxmap).decode_track();
    assert_eq!(track.valid_ct(), 1);
    assert_eq!(track.sectors()[0].payload, payload);
}

#[test]
fn decode_disk_preserves_track_order() {
    init();

    let mut rng = StdRng::seed_from_u64(0xD15C);
    let tracks: Vec<(DiskCh, Fluxmap)> = (0..4u16)
        .map(|c| {
            let sectors: Vec<(SectorId, Vec<u8>)> = (0..2)
                .map(|s| {
                    let payload: Vec<u8> = (0..BROTHER_DATA_RECORD_PAYLOAD).map(|_| rng.gen()).collect();
                    (SectorId::new(c as u8, s), payload)
                })
                .collect();
            let w = build_track(&sectors);
            (DiskCh::new(c, 0), fluxmap_from_bits(w.bits(), BROTHER_CELL_NS))
        })
        .collect();

    let decoded = decode_disk(FORMAT, &tracks);

    assert_eq!(decoded.len(), 4);
    for (i, track) in decoded.iter().enumerate() {
        assert_eq!(track.ch, DiskCh::new(i as u16, 0));
        assert_eq!(track.sector_ct(), 2);
        assert_eq!(track.valid_ct(), 2);
        for (s, sector) in track.sectors().iter().enumerate() {
            assert_eq!(sector.id, SectorId::new(i as u8, s as u8));
            assert_eq!(sector.ch, track.ch);
        }
    }
}

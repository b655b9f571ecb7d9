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

//! The `disk` module decodes a set of track captures in parallel.
//!
//! Track decodes are fully independent: each worker reads its own immutable
//! [`Fluxmap`] and fills a private result buffer, so the whole pass needs no
//! locks and no shared mutable state. Results are merged back in input
//! order by the coordinating thread.

use crate::{chs::DiskCh, decoder::TrackDecoder, fluxmap::Fluxmap, format::DiskFormat, sector::DecodedTrack};
use std::thread;

/// Decode every track capture of a disk, one scoped worker thread per
/// track. The returned tracks are in the same order as the input slice.
pub fn decode_disk(format: DiskFormat, tracks: &[(DiskCh, Fluxmap)]) -> Vec<DecodedTrack> {
    log::debug!("decode_disk(): decoding {} tracks as {}", tracks.len(), format);

    thread::scope(|s| {
        let handles: Vec<_> = tracks
            .iter()
            .map(|(ch, fluxmap)| s.spawn(move || TrackDecoder::new(format, *ch, fluxmap).decode_track()))
            .collect();

        // A worker only panics on an internal bug; propagate it.
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

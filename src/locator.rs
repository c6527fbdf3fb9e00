use crate::error::{Error, Result};
use crate::marker::{Marker, MarkerType};
use crate::options::ScanStrategy;
use log::{debug, trace};

const LANE_COUNT: usize = 64;

/// Offsets of the markers that frame a JFIF stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Located {
    pub soi: usize,
    pub app0: usize,
}

/// Returns the offset of the first `0xFF <marker>` pair in `buffer`.
///
/// This is a plain byte scan. It cannot tell a real marker from the same two
/// bytes inside entropy-coded data, see [`ScanStrategy::SegmentWalk`].
pub fn find_marker(buffer: &[u8], marker: Marker) -> Option<usize> {
    let [high, low] = marker.to_bytes();

    if buffer.len() < Marker::SIZE {
        return None;
    }

    // the last byte can only ever be a low byte
    let last = buffer.len() - 1;
    let mut cursor = 0;

    while cursor < last {
        let end = (cursor + LANE_COUNT).min(last);
        let chunk = &buffer[cursor..end];

        if !chunk.contains(&high) {
            cursor = end;
            continue;
        }

        let hit = chunk
            .iter()
            .enumerate()
            .position(|(idx, &b)| b == high && buffer[cursor + idx + 1] == low);

        if let Some(idx) = hit {
            return Some(cursor + idx);
        }

        cursor = end;
    }

    None
}

/// Locates SOI and APP0, enforcing that APP0 does not precede SOI.
pub fn locate(buffer: &[u8], strategy: ScanStrategy) -> Result<Located> {
    let soi = find_marker(buffer, Marker::SOI).ok_or(Error::MissingSoi)?;

    let located = match strategy {
        ScanStrategy::ByteScan => {
            let app0 = find_marker(buffer, Marker::APP0).ok_or(Error::MissingApp0)?;
            if soi > app0 {
                return Err(Error::InvalidOrdering { soi, app0 });
            }

            Located { soi, app0 }
        }
        ScanStrategy::SegmentWalk => match walk_to_app0(buffer, soi + Marker::SIZE) {
            Some(app0) => Located { soi, app0 },
            None => {
                return match find_marker(&buffer[..soi], Marker::APP0) {
                    Some(app0) => Err(Error::InvalidOrdering { soi, app0 }),
                    None => Err(Error::MissingApp0),
                };
            }
        },
    };

    debug!(
        "located SOI at {} and APP0 at {} ({:?})",
        located.soi, located.app0, strategy
    );

    Ok(located)
}

/*
Walks marker segments starting at `cursor`, which must sit on a marker boundary:

    [FF xx][len][.... len - 2 ....][FF yy][len][....]
     | <- a marker is only read here

Fill bytes (FF FF) are skipped, standalone markers advance by the marker size.
The walk gives up at SOS or EOI, since entropy-coded data follows, and at any
byte that is not the start of a marker.
 */
fn walk_to_app0(buffer: &[u8], mut cursor: usize) -> Option<usize> {
    while cursor + 1 < buffer.len() {
        if buffer[cursor] != Marker::GLOBAL as u8 {
            trace!("segment walk hit non-marker byte at {}", cursor);
            return None;
        }

        let code = buffer[cursor + 1];

        if code == Marker::GLOBAL as u8 {
            cursor += 1;
            continue;
        }

        if code == Marker::APP0 as u8 {
            return Some(cursor);
        }

        if code == Marker::SOS as u8 || code == Marker::EOI as u8 || code == Marker::STUFF as u8 {
            trace!("segment walk stopped at 0xFF{:02X} ({})", code, cursor);
            return None;
        }

        match Marker::kind_of(code) {
            MarkerType::StandAlone => cursor += Marker::SIZE,
            MarkerType::Segment => {
                let length_offset = cursor + Marker::SIZE;
                let length = buffer.get(length_offset..length_offset + Marker::LENGTH_SIZE)?;
                let length = u16::from_be_bytes([length[0], length[1]]) as usize;

                cursor = length_offset + length.max(Marker::LENGTH_SIZE);
            }
        }
    }

    None
}

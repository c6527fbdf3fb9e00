use crate::error::{Error, Result};
use crate::interchange::RawSegment;
use crate::locator::{find_marker, locate};
use crate::marker::Marker;
use crate::options::ScanStrategy;
use log::debug;

/// A JPEG stream split around its APP0 segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub segment: RawSegment,
    /// The stream from SOI onward, without the segment.
    pub body: Vec<u8>,
}

/*
[junk][SOI][ .. ][APP0][length][payload][ .. rest .. ]
      | soi      | app0                 | app0 + segment length

segment = [APP0][length][payload]
body    = [SOI][ .. ][ .. rest .. ]
 */
pub fn extract(stream: &[u8], strategy: ScanStrategy) -> Result<Extracted> {
    let located = locate(stream, strategy)?;
    let segment = RawSegment::at(stream, located.app0)?;
    let segment_end = located.app0 + segment.len();

    let mut body = Vec::with_capacity(stream.len() - located.soi - segment.len());
    body.extend_from_slice(&stream[located.soi..located.app0]);
    body.extend_from_slice(&stream[segment_end..]);

    debug!(
        "extracted {} byte APP0 segment, {} byte body",
        segment.len(),
        body.len()
    );

    Ok(Extracted { segment, body })
}

/// Inserts `segment` immediately after the first SOI marker in `body`.
///
/// `body` is not checked for an existing APP0 segment.
pub fn merge(segment: &RawSegment, body: &[u8]) -> Result<Vec<u8>> {
    let soi = find_marker(body, Marker::SOI).ok_or(Error::MissingSoi)?;
    let split = soi + Marker::SIZE;

    let mut merged = Vec::with_capacity(body.len() + segment.len());
    merged.extend_from_slice(&body[..split]);
    merged.extend_from_slice(segment.as_bytes());
    merged.extend_from_slice(&body[split..]);

    debug!("inserted {} byte APP0 segment at {}", segment.len(), split);

    Ok(merged)
}

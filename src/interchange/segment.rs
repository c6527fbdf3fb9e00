use crate::error::{Error, Result};
use crate::interchange::jfif::JfifHeader;
use crate::locator::{find_marker, locate};
use crate::marker::Marker;
use crate::options::ScanStrategy;
use log::trace;

/// The literal bytes of an APP0 marker segment:
///
/// ```text
/// [FF E0][length: u16 BE][payload .... length - 2 ....]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    bytes: Vec<u8>,
}

impl RawSegment {
    /// Finds the first APP0 marker in `buffer` and slices out its segment.
    ///
    /// `buffer` may be a standalone segment file or a whole JPEG stream.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let offset = find_marker(buffer, Marker::APP0).ok_or(Error::MissingApp0)?;
        Self::at(buffer, offset)
    }

    /// Like [`RawSegment::parse`], but a buffer holding a JPEG stream is searched
    /// from its SOI with `strategy`. A buffer that opens with APP0 is a standalone
    /// segment and is sliced as is.
    pub fn find(buffer: &[u8], strategy: ScanStrategy) -> Result<Self> {
        let standalone = buffer.starts_with(&Marker::APP0.to_bytes());
        if standalone || find_marker(buffer, Marker::SOI).is_none() {
            return Self::parse(buffer);
        }

        let located = locate(buffer, strategy)?;
        Self::at(buffer, located.app0)
    }

    /// Slices the segment whose marker starts at `offset`.
    pub(crate) fn at(buffer: &[u8], offset: usize) -> Result<Self> {
        let length_offset = offset + Marker::SIZE;
        let available = buffer.len().saturating_sub(length_offset);

        let declared = match buffer.get(length_offset..length_offset + Marker::LENGTH_SIZE) {
            Some(length) => u16::from_be_bytes([length[0], length[1]]) as usize,
            None => {
                return Err(Error::TruncatedLength {
                    offset,
                    declared: Marker::LENGTH_SIZE,
                    available,
                })
            }
        };

        // the length counts its own two bytes, but not the marker
        if declared < Marker::LENGTH_SIZE || declared > available {
            return Err(Error::TruncatedLength {
                offset,
                declared,
                available,
            });
        }

        trace!("APP0 segment at {} spans {} bytes", offset, Marker::SIZE + declared);

        Ok(RawSegment {
            bytes: buffer[offset..length_offset + declared].to_vec(),
        })
    }

    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes[..Marker::SIZE], Marker::APP0.to_bytes());
        RawSegment { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn declared_length(&self) -> u16 {
        u16::from_be_bytes([self.bytes[Marker::SIZE], self.bytes[Marker::SIZE + 1]])
    }

    /// Everything after the length field, starting at the identifier.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[Marker::SIZE + Marker::LENGTH_SIZE..]
    }

    pub fn header(&self) -> Result<JfifHeader> {
        JfifHeader::decode(self.payload())
    }
}

impl AsRef<[u8]> for RawSegment {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn parse_standalone_segment() -> Result<()> {
        let bytes = [
            0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x02, 0x00, 0x00, 0x48,
            0x00, 0x48, 0x00, 0x00,
        ];

        let segment = RawSegment::parse(&bytes)?;
        assert_eq!(segment.as_bytes(), &bytes);
        assert_eq!(segment.declared_length(), 16);
        assert_eq!(segment.payload().len(), 14);
        assert_eq!(segment.header()?.x_density, 72);

        Ok(())
    }

    #[test]
    fn parse_drops_trailing_bytes() -> Result<()> {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0xAA, 0xBB, 0xFF, 0xD9];

        let segment = RawSegment::parse(&bytes)?;
        assert_eq!(segment.as_bytes(), &[0xFF, 0xE0, 0x00, 0x04, 0xAA, 0xBB]);

        Ok(())
    }

    #[test]
    fn truncated_lengths() {
        assert!(matches!(
            RawSegment::parse(&[0xFF, 0xE0, 0x00]),
            Err(Error::TruncatedLength {
                offset: 0,
                declared: 2,
                available: 1
            })
        ));
        assert!(matches!(
            RawSegment::parse(&[0xFF, 0xE0, 0x00, 0x10, b'J']),
            Err(Error::TruncatedLength {
                offset: 0,
                declared: 16,
                available: 3
            })
        ));
        assert!(matches!(
            RawSegment::parse(&[0xFF, 0xE0, 0x00, 0x01]),
            Err(Error::TruncatedLength { declared: 1, .. })
        ));
    }

    #[test]
    fn find_standalone_segment_with_soi_bytes() -> Result<()> {
        // x_density is 0xFFD8
        let bytes = [
            0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x02, 0x01, 0xFF, 0xD8,
            0x00, 0x48, 0x00, 0x00,
        ];

        for strategy in [ScanStrategy::ByteScan, ScanStrategy::SegmentWalk] {
            let segment = RawSegment::find(&bytes, strategy)?;
            assert_eq!(segment.as_bytes(), &bytes);
            assert_eq!(segment.header()?.x_density, 0xFFD8);
        }

        Ok(())
    }

    #[test]
    fn find_uses_scan_strategy() -> Result<()> {
        let mut stream = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xFE, 0x00, 0x06, 0xFF, 0xE0, 0x00, 0x02, // COM holding APP0 bytes
        ];
        stream.extend_from_slice(&[
            0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x02, 0x00, 0x00, 0x48,
            0x00, 0x48, 0x00, 0x00,
        ]);
        stream.extend_from_slice(&[0xFF, 0xD9]);

        let scanned = RawSegment::find(&stream, ScanStrategy::ByteScan)?;
        assert_eq!(scanned.as_bytes(), &[0xFF, 0xE0, 0x00, 0x02]);
        assert!(matches!(
            scanned.header(),
            Err(Error::TruncatedSegment { len: 0, .. })
        ));

        let walked = RawSegment::find(&stream, ScanStrategy::SegmentWalk)?;
        assert_eq!(walked.as_bytes(), &stream[10..28]);
        assert_eq!(walked.header()?.y_density, 72);

        Ok(())
    }

    #[test]
    fn find_checks_ordering_in_streams() {
        let stream = [0xFF, 0xD9, 0xFF, 0xE0, 0x00, 0x02, 0xFF, 0xD8];
        assert!(matches!(
            RawSegment::find(&stream, ScanStrategy::ByteScan),
            Err(Error::InvalidOrdering { soi: 6, app0: 2 })
        ));
    }

    #[test]
    fn missing_app0() {
        assert!(matches!(
            RawSegment::parse(&[0xFF, 0xD8, 0xFF, 0xD9]),
            Err(Error::MissingApp0)
        ));
    }
}

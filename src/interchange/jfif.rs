use crate::error::{Error, Result};
use crate::interchange::segment::RawSegment;
use crate::marker::Marker;
use log::debug;

/// Null-terminated identifier opening every JFIF APP0 payload.
pub const IDENTIFIER: &[u8; 5] = b"JFIF\0";

/// Identifier plus every field through `x_thumbnail`.
const MIN_PAYLOAD: usize = IDENTIFIER.len() + 8;

/// Length field written by [`JfifHeader::encode`]: itself, the identifier and nine field bytes.
const ENCODED_LENGTH: u16 = (Marker::LENGTH_SIZE + IDENTIFIER.len() + 9) as u16;

/// The fixed fields of a JFIF APP0 segment. Thumbnail pixels are not carried.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct JfifHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub density_units: u8,
    pub x_density: u16,
    pub y_density: u16,
    pub x_thumbnail: u8,
    pub y_thumbnail: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DensityUnits {
    /// Densities only give the pixel aspect ratio
    NoUnits,
    PixelsPerInch,
    PixelsPerCentimeter,
    Unknown(u8),
}

impl DensityUnits {
    pub fn from(b: u8) -> Self {
        match b {
            0 => DensityUnits::NoUnits,
            1 => DensityUnits::PixelsPerInch,
            2 => DensityUnits::PixelsPerCentimeter,
            _ => DensityUnits::Unknown(b),
        }
    }
}

impl JfifHeader {
    /*
    The payload starts right after the length field:

    [J F I F 00][major][minor][units][x density: 2][y density: 2][x thumb][y thumb][thumbnail ....]
                                                                           | <- optional from here
     */
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if !payload.starts_with(IDENTIFIER) {
            return Err(match IDENTIFIER.starts_with(payload) {
                true => Error::TruncatedSegment {
                    len: payload.len(),
                    required: MIN_PAYLOAD,
                },
                false => Error::InvalidSignature,
            });
        }

        if payload.len() < MIN_PAYLOAD {
            return Err(Error::TruncatedSegment {
                len: payload.len(),
                required: MIN_PAYLOAD,
            });
        }

        let fields = &payload[IDENTIFIER.len()..];
        if fields.len() > 9 {
            debug!("ignoring {} bytes of thumbnail data", fields.len() - 9);
        }

        Ok(JfifHeader {
            version_major: fields[0],
            version_minor: fields[1],
            density_units: fields[2],
            x_density: u16::from_be_bytes([fields[3], fields[4]]),
            y_density: u16::from_be_bytes([fields[5], fields[6]]),
            x_thumbnail: fields[7],
            y_thumbnail: fields.get(8).copied().unwrap_or(0),
        })
    }

    /// Always emits the 18-byte header-only segment.
    pub fn encode(&self) -> RawSegment {
        let mut bytes = Vec::with_capacity(Marker::SIZE + ENCODED_LENGTH as usize);

        bytes.extend_from_slice(&Marker::APP0.to_bytes());
        bytes.extend_from_slice(&ENCODED_LENGTH.to_be_bytes());
        bytes.extend_from_slice(IDENTIFIER);
        bytes.extend_from_slice(&[self.version_major, self.version_minor, self.density_units]);
        bytes.extend_from_slice(&self.x_density.to_be_bytes());
        bytes.extend_from_slice(&self.y_density.to_be_bytes());
        bytes.extend_from_slice(&[self.x_thumbnail, self.y_thumbnail]);

        RawSegment::from_encoded(bytes)
    }

    pub fn units(&self) -> DensityUnits {
        DensityUnits::from(self.density_units)
    }
}

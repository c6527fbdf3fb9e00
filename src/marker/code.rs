use crate::marker::{Marker, MarkerType};

impl Marker {
    pub(crate) const SIZE: usize = 2;

    /// Bytes of the length field that follows a segment marker.
    pub(crate) const LENGTH_SIZE: usize = 2;

    pub fn to_bytes(&self) -> [u8; 2] {
        [Marker::GLOBAL as u8, *self as u8]
    }

    /// Some markers stand alone, that is, which is not the start of a marker segment.
    pub(crate) fn kind_of(low_byte: u8) -> MarkerType {
        let restart = (Marker::RST0 as u8)..=(Marker::RST7 as u8);

        match low_byte {
            b if b == Marker::TEM as u8 || b == Marker::SOI as u8 || b == Marker::EOI as u8 => {
                MarkerType::StandAlone
            }
            b if restart.contains(&b) => MarkerType::StandAlone,
            _ => MarkerType::Segment,
        }
    }
}

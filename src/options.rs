/// How out-of-range record values are narrowed to their field width.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Overflow {
    /// Keep the low-order bytes, e.g. `x_density = 65608` becomes `72`.
    #[default]
    Truncate,
    /// Reject the value with [`crate::Error::FieldOutOfRange`].
    Strict,
}

/// How the locator finds the APP0 marker.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ScanStrategy {
    /// First `FF E0` pair anywhere in the buffer.
    #[default]
    ByteScan,
    /// Walk marker segments from SOI, only reading markers at segment boundaries.
    SegmentWalk,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct Options {
    pub overflow: Overflow,
    pub scan: ScanStrategy,
}

impl Overflow {
    pub(crate) fn narrow_u8(&self, field: &'static str, value: u64) -> crate::Result<u8> {
        match self {
            Overflow::Truncate => Ok(value as u8),
            Overflow::Strict => u8::try_from(value).map_err(|_| crate::Error::FieldOutOfRange {
                field,
                value,
                width: 1,
            }),
        }
    }

    pub(crate) fn narrow_u16(&self, field: &'static str, value: u64) -> crate::Result<u16> {
        match self {
            Overflow::Truncate => Ok(value as u16),
            Overflow::Strict => u16::try_from(value).map_err(|_| crate::Error::FieldOutOfRange {
                field,
                value,
                width: 2,
            }),
        }
    }
}

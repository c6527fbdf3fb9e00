mod code;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MarkerType {
    Segment,
    StandAlone,
}

/// The low byte of the two-byte markers this crate needs to recognise.
///
/// Every marker is `0xFF` followed by its low byte.
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Hash, Eq)]
pub enum Marker {
    GLOBAL = 0xFF,
    STUFF = 0x00,

    /// For temporary private use in arithmetic coding
    TEM = 0x01,

    /// Restart with modulo 8 count "M"
    /// Restart Marker 0, the first of RST0..=RST7
    RST0 = 0xD0,
    /// Restart Marker 7
    RST7 = 0xD7,

    /// Start of image
    SOI = 0xD8,

    /// End of image
    EOI = 0xD9,

    /// Start of scan
    SOS = 0xDA,

    /// Application 0, carries the JFIF header
    APP0 = 0xE0,
}

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating, decoding or splicing a JFIF segment.
///
/// None of these are recoverable; callers are expected to abort the whole
/// operation without writing output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("SOI marker (0xFFD8) not found")]
    MissingSoi,

    #[error("APP0 marker (0xFFE0) not found")]
    MissingApp0,

    #[error("SOI marker at offset {soi} occurs after APP0 marker at offset {app0}")]
    InvalidOrdering { soi: usize, app0: usize },

    /// The length field is cut off, smaller than itself, or runs past the buffer.
    #[error("APP0 segment at offset {offset} has length {declared}, but {available} bytes follow the marker")]
    TruncatedLength {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("invalid JFIF identifier, expected \"JFIF\\0\"")]
    InvalidSignature,

    #[error("JFIF segment payload is {len} bytes, at least {required} are required")]
    TruncatedSegment { len: usize, required: usize },

    #[error("field {field} value {value} does not fit in {width} byte(s)")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        width: usize,
    },

    #[error("malformed JFIF record: {0}")]
    MalformedRecord(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_are_not_repeated() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "photo.jpg is gone"));
        assert_eq!(err.to_string(), "photo.jpg is gone");
        assert!(err.source().is_none());

        let chain = format!("{:#}", anyhow::Error::new(err).context("failed to write photo.jpg"));
        assert_eq!(chain, "failed to write photo.jpg: photo.jpg is gone");
    }
}

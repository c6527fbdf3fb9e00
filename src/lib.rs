//! Locates, decodes, re-encodes and splices the JFIF (APP0) segment of a JPEG stream.
//!
//! Every operation works on in-memory byte buffers; reading and writing files
//! is left to the caller, with helpers in [`io`].

/// Splits a JPEG stream around its APP0 segment and puts it back together.
pub mod assembler;
pub mod error;
pub mod interchange;
pub mod io;
pub mod locator;
pub mod marker;
pub mod options;

pub use assembler::{extract, merge, Extracted};
pub use error::{Error, Result};
pub use interchange::{from_xml, to_xml, DensityUnits, JfifHeader, RawSegment};
pub use locator::{find_marker, locate, Located};
pub use marker::Marker;
pub use options::{Options, Overflow, ScanStrategy};

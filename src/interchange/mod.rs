//! The JFIF APP0 segment: raw bytes, decoded header, and its XML record.

pub mod jfif;
pub mod record;
pub mod segment;

pub use jfif::{DensityUnits, JfifHeader, IDENTIFIER};
pub use record::{from_xml, to_xml};
pub use segment::RawSegment;

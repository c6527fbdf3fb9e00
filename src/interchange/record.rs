use crate::error::{Error, Result};
use crate::interchange::jfif::JfifHeader;
use crate::options::Overflow;
use quick_xml::events::Event;
use quick_xml::se::Serializer;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

const ROOT: &str = "jfif";
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/*
<jfif>
  <version_major>1</version_major>
  <version_minor>2</version_minor>
  <density_units>0</density_units>
  <x_density>72</x_density>
  <y_density>72</y_density>
  <x_thumbnail>0</x_thumbnail>
  <y_thumbnail>0</y_thumbnail>
</jfif>

Values are read wider than their fields so overflow can be handled by policy.
 */
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename = "jfif")]
struct JfifRecord {
    version_major: u64,
    version_minor: u64,
    density_units: u64,
    x_density: u64,
    y_density: u64,
    x_thumbnail: u64,
    y_thumbnail: u64,
}

impl From<&JfifHeader> for JfifRecord {
    fn from(header: &JfifHeader) -> Self {
        JfifRecord {
            version_major: header.version_major as u64,
            version_minor: header.version_minor as u64,
            density_units: header.density_units as u64,
            x_density: header.x_density as u64,
            y_density: header.y_density as u64,
            x_thumbnail: header.x_thumbnail as u64,
            y_thumbnail: header.y_thumbnail as u64,
        }
    }
}

impl JfifRecord {
    fn narrow(&self, overflow: Overflow) -> Result<JfifHeader> {
        Ok(JfifHeader {
            version_major: overflow.narrow_u8("version_major", self.version_major)?,
            version_minor: overflow.narrow_u8("version_minor", self.version_minor)?,
            density_units: overflow.narrow_u8("density_units", self.density_units)?,
            x_density: overflow.narrow_u16("x_density", self.x_density)?,
            y_density: overflow.narrow_u16("y_density", self.y_density)?,
            x_thumbnail: overflow.narrow_u8("x_thumbnail", self.x_thumbnail)?,
            y_thumbnail: overflow.narrow_u8("y_thumbnail", self.y_thumbnail)?,
        })
    }
}

/// Renders `header` as an indented `<jfif>` document with an XML declaration.
pub fn to_xml(header: &JfifHeader) -> Result<String> {
    let record = JfifRecord::from(header);
    let mut xml = String::from(XML_DECLARATION);

    let mut serializer = Serializer::with_root(&mut xml, Some(ROOT))
        .map_err(|e| Error::MalformedRecord(e.to_string()))?;
    serializer.indent(' ', 2);

    record
        .serialize(serializer)
        .map_err(|e| Error::MalformedRecord(e.to_string()))?;

    xml.push('\n');
    Ok(xml)
}

/// Reads a `<jfif>` document; any other root element is rejected.
pub fn from_xml(xml: &str, overflow: Overflow) -> Result<JfifHeader> {
    let root = root_name(xml)?;
    if root != ROOT {
        return Err(Error::MalformedRecord(format!(
            "expected root element <{}>, found <{}>",
            ROOT, root
        )));
    }

    let record: JfifRecord =
        quick_xml::de::from_str(xml).map_err(|e| Error::MalformedRecord(e.to_string()))?;

    record.narrow(overflow)
}

fn root_name(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(Error::MalformedRecord("document has no root element".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(Error::MalformedRecord(e.to_string())),
        }
    }
}

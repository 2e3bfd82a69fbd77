//! ZIP package access for PPTX files.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use slidegen_core::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Location of the package content-type map.
pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Largest buffer reserved up front for a ZIP entry; declared sizes are
/// not trusted beyond this.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Initial buffer size for an entry that declares `declared` bytes.
fn preallocation(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}

/// All parts of an OPC package, in archive order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read every file of a ZIP archive into memory.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::MalformedTemplate(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::MalformedTemplate(format!("Failed to read ZIP entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let mut data = Vec::with_capacity(preallocation(file.size()));
            file.read_to_end(&mut data).map_err(|e| {
                Error::MalformedTemplate(format!("Failed to read '{}': {}", file.name(), e))
            })?;
            parts.push((file.name().to_string(), data));
        }

        Ok(Self { parts })
    }

    pub(crate) fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Read a part as UTF-8 XML.
    pub(crate) fn read_xml(&self, name: &str) -> Result<String> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::MalformedTemplate(format!("File not found in archive '{}'", name)))?;
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::MalformedTemplate(format!("'{}' is not UTF-8: {}", name, e)))
    }

    /// Insert a part or replace its content.
    pub(crate) fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub(crate) fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Write the package out as a ZIP archive.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Serialization(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Serialization(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Add `Override` entries to a content-type map.
pub(crate) fn add_content_type_overrides(xml: &str, overrides: &[(String, &str)]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::End(e)) if e.name().as_ref() == b"Types" => {
                for (part_name, content_type) in overrides {
                    let part_name = format!("/{}", part_name);
                    let mut entry = BytesStart::new("Override");
                    entry.push_attribute(("PartName", part_name.as_str()));
                    entry.push_attribute(("ContentType", *content_type));
                    write(&mut writer, Event::Empty(entry))?;
                }
                write(&mut writer, Event::End(BytesEnd::new("Types")))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => write(&mut writer, event)?,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing content types: {}",
                    e
                )))
            }
        }
    }

    Ok(writer.into_inner())
}

/// Write one event, mapping XML errors to serialization errors.
pub(crate) fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialization(format!("XML write error: {}", e)))
}

//! OPC relationship parts.

use crate::package::write;
use crate::xml::attr_value;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use slidegen_core::{Error, Result};

pub(crate) const RELS_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

/// One `Relationship` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub(crate) fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        }
    }
}

/// Parse a `.rels` part.
pub(crate) fn parse_rels(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship::new(String::new(), "", String::new());

                for attr in e.attributes().flatten() {
                    let value = attr_value(&attr);
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value == "External",
                        _ => {}
                    }
                }

                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Render relationships as a `.rels` part.
pub(crate) fn render_rels(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", RELS_NAMESPACE));
    write(&mut writer, Event::Start(root))?;

    for rel in rels {
        let mut entry = BytesStart::new("Relationship");
        entry.push_attribute(("Id", rel.id.as_str()));
        entry.push_attribute(("Type", rel.rel_type.as_str()));
        entry.push_attribute(("Target", rel.target.as_str()));
        if rel.external {
            entry.push_attribute(("TargetMode", "External"));
        }
        write(&mut writer, Event::Empty(entry))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("Relationships")))?;
    Ok(writer.into_inner())
}

/// Path of the relationship part belonging to `part`.
///
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub(crate) fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declares it.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Relative target from one part to another.
pub(crate) fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}

/// First `rIdN` not used by any relationship.
pub(crate) fn next_rel_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|r| r.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

//! The presentation part: slide master and slide lists.

use crate::package::write;
use crate::xml::{get_attr, local_name};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use slidegen_core::{Error, Result};

/// Smallest slide id PowerPoint accepts.
const MIN_SLIDE_ID: u32 = 256;

/// Children of `p:presentation` that come after `p:sldIdLst`.
const AFTER_SLIDE_LIST: &[&[u8]] = &[
    b"sldSz",
    b"notesSz",
    b"smartTags",
    b"embeddedFontLst",
    b"custShowLst",
    b"photoAlbum",
    b"custDataLst",
    b"kinsoku",
    b"defaultTextStyle",
    b"modifyVerifier",
    b"extLst",
];

/// A `p:sldId` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SlideRef {
    pub id: u32,
    pub rel_id: String,
}

/// What the compiler needs from `ppt/presentation.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PresentationInfo {
    /// Relationship ids of the slide masters, in order.
    pub master_rel_ids: Vec<String>,

    /// Slides in deck order.
    pub slides: Vec<SlideRef>,
}

impl PresentationInfo {
    /// The next unused slide id.
    pub(crate) fn next_slide_id(&self) -> u32 {
        self.slides
            .iter()
            .map(|s| s.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID)
    }
}

/// Parse the slide master and slide lists of the presentation part.
pub(crate) fn parse_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut info = PresentationInfo::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldMasterId" => {
                        if let Some(rel_id) = get_attr(e, b"r:id") {
                            info.master_rel_ids.push(rel_id);
                        }
                    }
                    b"sldId" => {
                        let id = get_attr(e, b"id").and_then(|v| v.parse().ok());
                        let rel_id = get_attr(e, b"r:id");
                        match (id, rel_id) {
                            (Some(id), Some(rel_id)) => info.slides.push(SlideRef { id, rel_id }),
                            _ => {
                                return Err(Error::MalformedTemplate(
                                    "slide entry without id".to_string(),
                                ))
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Namespace prefix of an element name, including the colon.
fn prefix_of(name: &[u8]) -> String {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => String::from_utf8_lossy(&name[..=pos]).to_string(),
        None => String::new(),
    }
}

fn write_slide_list(writer: &mut Writer<Vec<u8>>, prefix: &str, slides: &[SlideRef]) -> Result<()> {
    if slides.is_empty() {
        return Ok(());
    }

    let list = format!("{}sldIdLst", prefix);
    write(writer, Event::Start(BytesStart::new(list.as_str())))?;
    for slide in slides {
        let id = slide.id.to_string();
        let mut entry = BytesStart::new(format!("{}sldId", prefix));
        entry.push_attribute(("id", id.as_str()));
        entry.push_attribute(("r:id", slide.rel_id.as_str()));
        write(writer, Event::Empty(entry))?;
    }
    write(writer, Event::End(BytesEnd::new(list.as_str())))
}

/// Replace the slide list of the presentation part.
///
/// Everything else in the part is copied through untouched. An empty list
/// removes the element.
pub(crate) fn rewrite_slide_list(xml: &str, slides: &[SlideRef]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    let mut prefix = String::new();
    let mut depth = 0usize;
    let mut skipping = false;
    let mut written = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::MalformedTemplate(format!("Error parsing presentation: {}", e))
        })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let local = local_name(e.name().as_ref()).to_vec();
                if depth == 1 {
                    prefix = prefix_of(e.name().as_ref());
                }
                if skipping {
                    continue;
                }
                if depth == 2 && local == b"sldIdLst" {
                    write_slide_list(&mut writer, &prefix, slides)?;
                    written = true;
                    skipping = true;
                    continue;
                }
                if depth == 2 && !written && AFTER_SLIDE_LIST.contains(&local.as_slice()) {
                    write_slide_list(&mut writer, &prefix, slides)?;
                    written = true;
                }
                write(&mut writer, Event::Start(e))?;
            }
            Event::Empty(e) => {
                let local = local_name(e.name().as_ref()).to_vec();
                if skipping {
                    continue;
                }
                if depth == 1 && local == b"sldIdLst" {
                    write_slide_list(&mut writer, &prefix, slides)?;
                    written = true;
                    continue;
                }
                if depth == 1 && !written && AFTER_SLIDE_LIST.contains(&local.as_slice()) {
                    write_slide_list(&mut writer, &prefix, slides)?;
                    written = true;
                }
                write(&mut writer, Event::Empty(e))?;
            }
            Event::End(e) => {
                let level = depth;
                depth = depth.saturating_sub(1);
                if skipping {
                    if level == 2 && local_name(e.name().as_ref()) == b"sldIdLst" {
                        skipping = false;
                    }
                    continue;
                }
                if level == 1 && !written {
                    write_slide_list(&mut writer, &prefix, slides)?;
                    written = true;
                }
                write(&mut writer, Event::End(e))?;
            }
            Event::Eof => break,
            other => {
                if !skipping {
                    write(&mut writer, other)?;
                }
            }
        }
    }

    Ok(writer.into_inner())
}

//! Slide layout parsing.

use crate::xml::{attr_value, get_attr, local_name};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidegen_core::{Error, Extent, Layout, Placeholder, PlaceholderRole, Result};

/// Placeholder types that are not copied onto new slides.
const NON_CLONEABLE_TYPES: &[&str] = &["dt", "ftr", "sldNum"];

/// Raw `p:ph` attributes of a layout placeholder, kept for writing slides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlaceholderXml {
    /// The `type` attribute, when present.
    pub ph_type: Option<String>,

    /// All attributes except `hasCustomPrompt`, in document order.
    pub attrs: Vec<(String, String)>,
}

impl PlaceholderXml {
    /// Whether new slides inherit this placeholder.
    pub(crate) fn is_cloneable(&self) -> bool {
        !matches!(self.ph_type.as_deref(), Some(t) if NON_CLONEABLE_TYPES.contains(&t))
    }
}

/// A layout together with the XML details needed to instantiate it.
#[derive(Debug, Clone)]
pub(crate) struct ParsedLayout {
    pub layout: Layout,
    pub placeholders: Vec<PlaceholderXml>,
}

/// Map a `p:ph@type` value to a placeholder role.
pub(crate) fn placeholder_role(ph_type: Option<&str>) -> PlaceholderRole {
    match ph_type {
        Some("title") | Some("ctrTitle") => PlaceholderRole::Title,
        Some("body") => PlaceholderRole::Body,
        None | Some("obj") => PlaceholderRole::Object,
        Some(_) => PlaceholderRole::Other,
    }
}

/// Master placeholder type a layout placeholder takes its size from when
/// it declares none. Untyped placeholders are `obj`.
fn base_placeholder_type(ph_type: Option<&str>) -> Option<&'static str> {
    match ph_type.unwrap_or("obj") {
        "title" | "ctrTitle" => Some("title"),
        "body" | "obj" | "subTitle" | "chart" | "dgm" | "media" | "pic" | "tbl" => Some("body"),
        "dt" => Some("dt"),
        "ftr" => Some("ftr"),
        "sldNum" => Some("sldNum"),
        _ => None,
    }
}

/// Fill in the extent of layout placeholders that have no `a:xfrm` of their
/// own from the matching placeholder on the slide master.
pub(crate) fn inherit_master_extents(layout: &mut ParsedLayout, master: &ParsedLayout) {
    let shapes = layout.layout.placeholders.iter_mut().zip(&layout.placeholders);
    for (placeholder, ph) in shapes {
        if placeholder.extent.is_some() {
            continue;
        }
        let Some(base) = base_placeholder_type(ph.ph_type.as_deref()) else {
            continue;
        };
        placeholder.extent = master
            .layout
            .placeholders
            .iter()
            .zip(&master.placeholders)
            .find(|(_, m)| m.ph_type.as_deref().unwrap_or("obj") == base)
            .and_then(|(shape, _)| shape.extent);
    }
}

/// Shape being read.
#[derive(Debug, Default)]
struct ShapeState {
    name: String,
    ph: Option<PlaceholderXml>,
    extent: Option<Extent>,
    has_text_frame: bool,
}

impl ShapeState {
    fn into_placeholder(self) -> Option<(Placeholder, PlaceholderXml)> {
        let ph = self.ph?;
        let idx = ph
            .attrs
            .iter()
            .find(|(k, _)| k == "idx")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        let placeholder = Placeholder {
            name: self.name,
            role: placeholder_role(ph.ph_type.as_deref()),
            idx,
            extent: self.extent,
            has_text_frame: self.has_text_frame,
        };
        Some((placeholder, ph))
    }

    fn on_element(&mut self, e: &BytesStart<'_>, in_xfrm: bool) {
        match local_name(e.name().as_ref()) {
            b"cNvPr" if self.name.is_empty() => {
                self.name = get_attr(e, b"name").unwrap_or_default();
            }
            b"ph" => {
                let mut ph = PlaceholderXml::default();
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr_value(&attr);
                    if key == "type" {
                        ph.ph_type = Some(value.clone());
                    }
                    if key != "hasCustomPrompt" {
                        ph.attrs.push((key, value));
                    }
                }
                self.ph = Some(ph);
            }
            b"ext" if in_xfrm => {
                let cx = get_attr(e, b"cx").and_then(|v| v.parse().ok());
                let cy = get_attr(e, b"cy").and_then(|v| v.parse().ok());
                if let (Some(cx), Some(cy)) = (cx, cy) {
                    self.extent = Some(Extent::new(cx, cy));
                }
            }
            _ => {}
        }
    }
}

/// Parse a slide layout part into its name and placeholders.
///
/// Slide masters share the `p:cSld` structure and parse the same way.
pub(crate) fn parse_layout(xml: &str) -> Result<ParsedLayout> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut layout = Layout::new("");
    let mut placeholders = Vec::new();
    let mut shape: Option<ShapeState> = None;
    let mut in_xfrm = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"cSld" => {
                    layout.name = get_attr(e, b"name").unwrap_or_default();
                }
                b"sp" => {
                    shape = Some(ShapeState {
                        has_text_frame: true,
                        ..Default::default()
                    });
                }
                b"pic" | b"graphicFrame" => {
                    shape = Some(ShapeState::default());
                }
                b"xfrm" => in_xfrm = true,
                _ => {
                    if let Some(ref mut state) = shape {
                        state.on_element(e, in_xfrm);
                    }
                }
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"cSld" {
                    layout.name = get_attr(e, b"name").unwrap_or_default();
                } else if let Some(ref mut state) = shape {
                    state.on_element(e, in_xfrm);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" | b"graphicFrame" => {
                    if let Some((placeholder, ph)) = shape.take().and_then(ShapeState::into_placeholder) {
                        layout.placeholders.push(placeholder);
                        placeholders.push(ph);
                    }
                }
                b"xfrm" => in_xfrm = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing slide layout: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ParsedLayout {
        layout,
        placeholders,
    })
}

/// Relationship ids of the layouts listed by a slide master, in order.
pub(crate) fn master_layout_ids(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                if let Some(id) = get_attr(e, b"r:id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing slide master: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

//! Text extraction from slide parts, for outlines of compiled decks.

use crate::xml::{get_attr, local_name};
use quick_xml::events::Event;
use quick_xml::Reader;
use slidegen_core::{Error, Result};

/// Text and position of one shape.
#[derive(Debug, Default)]
struct ShapeText {
    text: String,
    x: f64,
    y: f64,
}

/// Extract the text of each shape on a slide, top-to-bottom then
/// left-to-right. Paragraphs within a shape are joined by newlines.
pub(crate) fn slide_text(xml: &str) -> Result<Vec<String>> {
    let mut shapes: Vec<ShapeText> = Vec::new();
    // Text is not trimmed: runs carry their own spacing.
    let mut reader = Reader::from_str(xml);

    let mut current: Option<ShapeText> = None;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"p" if current.is_some() => paragraphs.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => {
                    if let Some(ref mut shape) = current {
                        let coord = |key: &[u8]| get_attr(e, key).and_then(|v| v.parse::<f64>().ok());
                        shape.x = coord(b"x").unwrap_or(shape.x);
                        shape.y = coord(b"y").unwrap_or(shape.y);
                    }
                }
                b"p" if current.is_some() => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e.unescape().unwrap_or_default();
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"sp" => {
                    if let Some(mut shape) = current.take() {
                        shape.text = paragraphs.join("\n").trim().to_string();
                        if !shape.text.is_empty() {
                            shapes.push(shape);
                        }
                    }
                    paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedTemplate(format!(
                    "Error parsing slide: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    shapes.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    Ok(shapes.into_iter().map(|s| s.text).collect())
}

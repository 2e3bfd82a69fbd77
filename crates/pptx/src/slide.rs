//! Slide part rendering.

use crate::layout::PlaceholderXml;
use crate::package::write;
use crate::rels::{relative_target, render_rels, Relationship, REL_SLIDE_LAYOUT};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slidegen_core::{Paragraph, Result, Slide, SlidePlaceholder};

pub(crate) const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Language tag written on every run.
const RUN_LANG: &str = "en-US";

type XmlWriter = Writer<Vec<u8>>;

fn start(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write(writer, Event::End(BytesEnd::new(name)))
}

fn empty(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write(writer, Event::Empty(BytesStart::new(name)))
}

/// Character properties for a run or paragraph end.
fn run_properties(name: &str, size: Option<u32>, bold: bool) -> BytesStart<'_> {
    let mut props = BytesStart::new(name);
    props.push_attribute(("lang", RUN_LANG));
    if let Some(points) = size {
        let hundredths = (points * 100).to_string();
        props.push_attribute(("sz", hundredths.as_str()));
    }
    if bold {
        props.push_attribute(("b", "1"));
    }
    props.push_attribute(("dirty", "0"));
    props
}

fn write_paragraph(writer: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    start(writer, "a:p")?;

    if paragraph.level > 0 {
        let level = paragraph.level.to_string();
        let mut props = BytesStart::new("a:pPr");
        props.push_attribute(("lvl", level.as_str()));
        write(writer, Event::Empty(props))?;
    }

    for run in &paragraph.runs {
        start(writer, "a:r")?;
        write(
            writer,
            Event::Empty(run_properties("a:rPr", paragraph.font_size, run.bold)),
        )?;
        start(writer, "a:t")?;
        write(writer, Event::Text(BytesText::new(&run.text)))?;
        end(writer, "a:t")?;
        end(writer, "a:r")?;
    }

    if paragraph.font_size.is_some() {
        write(
            writer,
            Event::Empty(run_properties("a:endParaRPr", paragraph.font_size, false)),
        )?;
    }

    end(writer, "a:p")
}

fn write_placeholder(
    writer: &mut XmlWriter,
    shape_id: usize,
    placeholder: &SlidePlaceholder,
    ph: &PlaceholderXml,
) -> Result<()> {
    start(writer, "p:sp")?;

    start(writer, "p:nvSpPr")?;
    let id = shape_id.to_string();
    let mut c_nv_pr = BytesStart::new("p:cNvPr");
    c_nv_pr.push_attribute(("id", id.as_str()));
    c_nv_pr.push_attribute(("name", placeholder.shape.name.as_str()));
    write(writer, Event::Empty(c_nv_pr))?;
    start(writer, "p:cNvSpPr")?;
    let mut locks = BytesStart::new("a:spLocks");
    locks.push_attribute(("noGrp", "1"));
    write(writer, Event::Empty(locks))?;
    end(writer, "p:cNvSpPr")?;
    start(writer, "p:nvPr")?;
    let mut ph_elem = BytesStart::new("p:ph");
    for (key, value) in &ph.attrs {
        ph_elem.push_attribute((key.as_str(), value.as_str()));
    }
    write(writer, Event::Empty(ph_elem))?;
    end(writer, "p:nvPr")?;
    end(writer, "p:nvSpPr")?;

    empty(writer, "p:spPr")?;

    start(writer, "p:txBody")?;
    empty(writer, "a:bodyPr")?;
    empty(writer, "a:lstStyle")?;
    if placeholder.paragraphs.is_empty() {
        empty(writer, "a:p")?;
    }
    for paragraph in &placeholder.paragraphs {
        write_paragraph(writer, paragraph)?;
    }
    end(writer, "p:txBody")?;

    end(writer, "p:sp")
}

/// Render a slide part. `placeholders` runs parallel to the slide's
/// placeholders.
pub(crate) fn render_slide(slide: &Slide, placeholders: &[PlaceholderXml]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("p:sld");
    root.push_attribute(("xmlns:a", NS_A));
    root.push_attribute(("xmlns:r", NS_R));
    root.push_attribute(("xmlns:p", NS_P));
    write(&mut writer, Event::Start(root))?;

    start(&mut writer, "p:cSld")?;
    start(&mut writer, "p:spTree")?;

    start(&mut writer, "p:nvGrpSpPr")?;
    let mut group = BytesStart::new("p:cNvPr");
    group.push_attribute(("id", "1"));
    group.push_attribute(("name", ""));
    write(&mut writer, Event::Empty(group))?;
    empty(&mut writer, "p:cNvGrpSpPr")?;
    empty(&mut writer, "p:nvPr")?;
    end(&mut writer, "p:nvGrpSpPr")?;
    empty(&mut writer, "p:grpSpPr")?;

    for (i, (placeholder, ph)) in slide.placeholders.iter().zip(placeholders).enumerate() {
        // Shape id 1 is the group itself.
        write_placeholder(&mut writer, i + 2, placeholder, ph)?;
    }

    end(&mut writer, "p:spTree")?;
    end(&mut writer, "p:cSld")?;

    start(&mut writer, "p:clrMapOvr")?;
    empty(&mut writer, "a:masterClrMapping")?;
    end(&mut writer, "p:clrMapOvr")?;

    end(&mut writer, "p:sld")?;
    Ok(writer.into_inner())
}

/// Render the relationship part of a new slide.
pub(crate) fn render_slide_rels(slide_part: &str, layout_part: &str) -> Result<Vec<u8>> {
    render_rels(&[Relationship::new(
        "rId1",
        REL_SLIDE_LAYOUT,
        relative_target(slide_part, layout_part),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidegen_core::{Placeholder, PlaceholderRole, TextRun};

    fn ph(attrs: &[(&str, &str)]) -> PlaceholderXml {
        PlaceholderXml {
            ph_type: attrs.iter().find(|(k, _)| *k == "type").map(|(_, v)| v.to_string()),
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn test_render_slide() {
        let mut slide = Slide::with_placeholders(
            1,
            "Title and Content",
            vec![
                Placeholder::new("Title 1", PlaceholderRole::Title, 0),
                Placeholder::new("Content Placeholder 2", PlaceholderRole::Object, 1),
            ],
        );
        slide.placeholders[0].set_text("Q&A");
        slide.placeholders[1].paragraphs = vec![Paragraph {
            level: 1,
            runs: vec![TextRun::bold("Key"), TextRun::plain(": <value>")],
            font_size: Some(18),
        }];

        let xml = render_slide(&slide, &[ph(&[("type", "title")]), ph(&[("idx", "1")])]).unwrap();
        let xml = String::from_utf8(xml).unwrap();

        assert!(xml.contains(r#"<p:cNvPr id="2" name="Title 1"/>"#));
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains("<a:t>Q&amp;A</a:t>"));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains(r#"<a:pPr lvl="1"/>"#));
        assert!(xml.contains(r#"<a:rPr lang="en-US" sz="1800" b="1" dirty="0"/><a:t>Key</a:t>"#));
        assert!(xml.contains("<a:t>: &lt;value&gt;</a:t>"));
    }

    #[test]
    fn test_render_slide_rels() {
        let xml = render_slide_rels("ppt/slides/slide3.xml", "ppt/slideLayouts/slideLayout2.xml").unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains(r#"Target="../slideLayouts/slideLayout2.xml""#));
    }
}

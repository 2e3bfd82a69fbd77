//! PPTX-backed template store.

use crate::layout::{inherit_master_extents, master_layout_ids, parse_layout, PlaceholderXml};
use crate::package::{add_content_type_overrides, Package, CONTENT_TYPES_PART};
use crate::presentation::{parse_presentation, rewrite_slide_list, PresentationInfo, SlideRef};
use crate::rels::{
    next_rel_id, parse_rels, relative_target, rels_path, render_rels, resolve_target,
    Relationship, REL_OFFICE_DOCUMENT, REL_SLIDE,
};
use crate::slide::{render_slide, render_slide_rels, SLIDE_CONTENT_TYPE};
use crate::text::slide_text;
use slidegen_core::{Error, Layout, Result, Slide, Template};

/// Presentation part used when the package root has no office document
/// relationship.
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Layout part name and the placeholder XML needed to instantiate it.
#[derive(Debug, Clone)]
struct LayoutPart {
    part_name: String,
    placeholders: Vec<PlaceholderXml>,
}

/// A slide created from a layout, not yet written to the package.
#[derive(Debug, Clone)]
struct NewSlide {
    slide: Slide,
    /// Parallel to `slide.placeholders`.
    placeholders: Vec<PlaceholderXml>,
}

#[derive(Debug, Clone)]
enum DeckSlide {
    /// A slide part that came with the template.
    Existing { slide: SlideRef, part_name: String },
    Added(Box<NewSlide>),
}

/// An editable .pptx template.
///
/// Layouts are those of the first slide master, in master order. New slides
/// live in memory until [`Template::serialize`] writes a fresh package; the
/// loaded package is never modified in place.
#[derive(Debug, Clone)]
pub struct PptxTemplate {
    package: Package,
    presentation_part: String,
    presentation: PresentationInfo,
    layouts: Vec<Layout>,
    layout_parts: Vec<LayoutPart>,
    slides: Vec<DeckSlide>,
}

impl PptxTemplate {
    /// Load a template from the bytes of a .pptx file.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        let presentation_part = find_presentation_part(&package)?;
        let presentation = parse_presentation(&package.read_xml(&presentation_part)?)?;
        let pres_rels = parse_rels(&package.read_xml(&rels_path(&presentation_part))?)?;

        let master_rel_id = presentation
            .master_rel_ids
            .first()
            .ok_or_else(|| Error::MalformedTemplate("presentation has no slide master".to_string()))?;
        let master_part = relationship_target(&presentation_part, &pres_rels, master_rel_id)?;
        let master_rels = parse_rels(&package.read_xml(&rels_path(&master_part))?)?;

        let master_xml = package.read_xml(&master_part)?;
        let master = parse_layout(&master_xml)?;

        let mut layouts = Vec::new();
        let mut layout_parts = Vec::new();
        for rel_id in master_layout_ids(&master_xml)? {
            let part_name = relationship_target(&master_part, &master_rels, &rel_id)?;
            let mut parsed = parse_layout(&package.read_xml(&part_name)?)?;
            inherit_master_extents(&mut parsed, &master);
            log::debug!(
                "Layout #{} '{}' ({}): {} placeholders",
                layouts.len(),
                parsed.layout.name,
                part_name,
                parsed.layout.placeholders.len()
            );
            layouts.push(parsed.layout);
            layout_parts.push(LayoutPart {
                part_name,
                placeholders: parsed.placeholders,
            });
        }

        if layouts.is_empty() {
            return Err(Error::MalformedTemplate(
                "slide master has no layouts".to_string(),
            ));
        }

        let mut slides = Vec::with_capacity(presentation.slides.len());
        for slide in &presentation.slides {
            let part_name = relationship_target(&presentation_part, &pres_rels, &slide.rel_id)?;
            slides.push(DeckSlide::Existing {
                slide: slide.clone(),
                part_name,
            });
        }

        log::debug!(
            "Loaded template: {} layouts, {} slides",
            layouts.len(),
            slides.len()
        );

        Ok(Self {
            package,
            presentation_part,
            presentation,
            layouts,
            layout_parts,
            slides,
        })
    }

    /// Text of every slide in deck order, one string per shape.
    pub fn slide_texts(&self) -> Result<Vec<Vec<String>>> {
        self.slides
            .iter()
            .map(|slide| match slide {
                DeckSlide::Existing { part_name, .. } => slide_text(&self.package.read_xml(part_name)?),
                DeckSlide::Added(new) => Ok(new
                    .slide
                    .placeholders
                    .iter()
                    .map(|p| p.text().trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()),
            })
            .collect()
    }

    /// Next free `ppt/slides/slideN.xml` number.
    fn next_slide_number(&self) -> usize {
        self.package
            .part_names()
            .filter_map(|name| name.strip_prefix("ppt/slides/"))
            .filter(|name| !name.contains('/'))
            .filter_map(extract_slide_number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Template for PptxTemplate {
    fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide> {
        let (layout, part) = self
            .layouts
            .get(layout_index)
            .zip(self.layout_parts.get(layout_index))
            .ok_or(Error::LayoutOutOfRange {
                index: layout_index,
                count: self.layouts.len(),
            })?;

        let (shapes, placeholders): (Vec<_>, Vec<_>) = layout
            .placeholders
            .iter()
            .zip(&part.placeholders)
            .filter(|(_, ph)| ph.is_cloneable())
            .map(|(shape, ph)| (shape.clone(), ph.clone()))
            .unzip();

        let slide = Slide::with_placeholders(layout_index, &layout.name, shapes);
        self.slides
            .push(DeckSlide::Added(Box::new(NewSlide { slide, placeholders })));

        match self.slides.last_mut() {
            Some(DeckSlide::Added(new)) => Ok(&mut new.slide),
            _ => unreachable!("slide was just pushed"),
        }
    }

    fn remove_slide(&mut self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(Error::SlideOutOfRange {
                index,
                count: self.slides.len(),
            });
        }
        self.slides.remove(index);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut package = self.package.clone();
        let pres_rels_part = rels_path(&self.presentation_part);

        // Drop relationships of template slides that were removed.
        let kept: Vec<&str> = self
            .slides
            .iter()
            .filter_map(|s| match s {
                DeckSlide::Existing { slide, .. } => Some(slide.rel_id.as_str()),
                DeckSlide::Added(_) => None,
            })
            .collect();
        let mut pres_rels: Vec<Relationship> = parse_rels(&package.read_xml(&pres_rels_part)?)?
            .into_iter()
            .filter(|r| r.rel_type != REL_SLIDE || kept.contains(&r.id.as_str()))
            .collect();

        let mut next_id = self.presentation.next_slide_id();
        let mut next_number = self.next_slide_number();
        let mut slide_list = Vec::with_capacity(self.slides.len());
        let mut overrides = Vec::new();

        for deck_slide in &self.slides {
            let new = match deck_slide {
                DeckSlide::Existing { slide, .. } => {
                    slide_list.push(slide.clone());
                    continue;
                }
                DeckSlide::Added(new) => new,
            };

            let part_name = format!("ppt/slides/slide{}.xml", next_number);
            next_number += 1;

            let layout_part = &self.layout_parts[new.slide.layout_index].part_name;
            package.set_part(&part_name, render_slide(&new.slide, &new.placeholders)?);
            package.set_part(&rels_path(&part_name), render_slide_rels(&part_name, layout_part)?);

            let rel_id = next_rel_id(&pres_rels);
            pres_rels.push(Relationship::new(
                rel_id.clone(),
                REL_SLIDE,
                relative_target(&self.presentation_part, &part_name),
            ));
            slide_list.push(SlideRef { id: next_id, rel_id });
            next_id += 1;

            overrides.push((part_name, SLIDE_CONTENT_TYPE));
        }

        let presentation_xml = package.read_xml(&self.presentation_part)?;
        package.set_part(
            &self.presentation_part,
            rewrite_slide_list(&presentation_xml, &slide_list)?,
        );
        package.set_part(&pres_rels_part, render_rels(&pres_rels)?);

        let content_types = package.read_xml(CONTENT_TYPES_PART)?;
        package.set_part(
            CONTENT_TYPES_PART,
            add_content_type_overrides(&content_types, &overrides)?,
        );

        log::debug!(
            "Serialized deck with {} slides ({} new parts)",
            slide_list.len(),
            overrides.len()
        );

        package.to_bytes()
    }
}

/// Resolve the part a relationship id points to.
fn relationship_target(source: &str, rels: &[Relationship], rel_id: &str) -> Result<String> {
    rels.iter()
        .find(|r| r.id == rel_id)
        .map(|r| resolve_target(source, &r.target))
        .ok_or_else(|| {
            Error::MalformedTemplate(format!("'{}' has no relationship '{}'", source, rel_id))
        })
}

/// Locate the main presentation part through the package relationships.
fn find_presentation_part(package: &Package) -> Result<String> {
    let Some(root_rels) = package.part("_rels/.rels") else {
        return Ok(DEFAULT_PRESENTATION_PART.to_string());
    };
    let root_rels = String::from_utf8_lossy(root_rels);

    Ok(parse_rels(&root_rels)?
        .into_iter()
        .find(|r| r.rel_type == REL_OFFICE_DOCUMENT)
        .map(|r| resolve_target("", &r.target))
        .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string()))
}

/// Extract a slide number from a string like "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    // Remove common extensions first
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    // Try to find digits at the end
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

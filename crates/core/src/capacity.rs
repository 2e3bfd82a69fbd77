//! Capacity estimation from placeholder geometry.
//!
//! Capacities feed the generation prompt: the title capacity bounds the
//! number of words in a slide title, the body capacity bounds the number of
//! bullets on a content slide.

use crate::types::{Extent, Layout, LayoutConstraint, PlaceholderRole};
use serde::Serialize;

/// Capacity used when a shape declares no geometry.
const DEFAULT_CAPACITY: u32 = 10;

/// Hard cap on title capacity, in words.
const MAX_TITLE_WORDS: u32 = 8;

/// Upper area bounds (square inches, exclusive) and the capacity below them.
const AREA_STEPS: &[(f64, u32)] = &[(5.0, 3), (10.0, 5), (20.0, 8), (30.0, 12)];

/// Capacity for anything at or above the last step.
const MAX_CAPACITY: u32 = 15;

/// Estimate how much content fits into a shape of the given extent.
///
/// Monotonic step function of area; returns 10 when the extent is unknown.
pub fn estimate_capacity(extent: Option<Extent>) -> u32 {
    let Some(extent) = extent else {
        return DEFAULT_CAPACITY;
    };

    let area = extent.area_sq_inches();
    AREA_STEPS
        .iter()
        .find(|(bound, _)| area < *bound)
        .map(|(_, capacity)| *capacity)
        .unwrap_or(MAX_CAPACITY)
}

/// Constraint records keyed by layout name, in first-seen order.
///
/// Layout names may repeat within a template; a later layout replaces the
/// record of an earlier one with the same name but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutConstraints {
    entries: Vec<(String, LayoutConstraint)>,
}

impl LayoutConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for a layout name.
    pub fn insert(&mut self, name: impl Into<String>, constraint: LayoutConstraint) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = constraint,
            None => self.entries.push((name, constraint)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LayoutConstraint> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayoutConstraint)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive the constraint record for one layout.
pub fn layout_constraint(layout: &Layout) -> LayoutConstraint {
    let mut constraint = LayoutConstraint::default();

    for shape in &layout.placeholders {
        match shape.role {
            PlaceholderRole::Title => {
                constraint.title_capacity = MAX_TITLE_WORDS.min(estimate_capacity(shape.extent));
            }
            PlaceholderRole::Body => {
                constraint.body_capacity = estimate_capacity(shape.extent);
                constraint.has_body = true;
            }
            PlaceholderRole::Object if shape.idx != 0 => {
                constraint.body_capacity = constraint
                    .body_capacity
                    .max(estimate_capacity(shape.extent));
                constraint.has_body = true;
            }
            _ => {}
        }
    }

    constraint
}

/// Build constraint records for every layout in the template.
pub fn build_constraints(layouts: &[Layout]) -> LayoutConstraints {
    let mut constraints = LayoutConstraints::new();
    for layout in layouts {
        let constraint = layout_constraint(layout);
        log::debug!(
            "Layout '{}': title {} words, body {} bullets, has body: {}",
            layout.name,
            constraint.title_capacity,
            constraint.body_capacity,
            constraint.has_body
        );
        constraints.insert(layout.name.clone(), constraint);
    }
    constraints
}

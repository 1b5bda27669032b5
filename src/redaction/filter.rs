// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Filters: pattern-based and entity-based detectors of sensitive values

use once_cell::sync::Lazy;
use regex::Regex;

use super::entity::Entity;
use super::error::{MalformedLabel, RedactionError, Result};

static LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(?:_[A-Za-z]+)*$").expect("label regex is valid"));

/// Check that a label can be used as a token prefix
///
/// Labels are runs of ASCII letters joined by single underscores, so the
/// trailing `_<index>` of a token can always be split off again.
pub fn validate_label(label: &str) -> std::result::Result<(), MalformedLabel> {
    if label.trim().is_empty() {
        return Err(MalformedLabel::Blank);
    }
    if !LABEL_REGEX.is_match(label) {
        return Err(MalformedLabel::InvalidCharacters(label.to_string()));
    }
    Ok(())
}

/// Detector matching one or more regular expressions
#[derive(Debug, Clone)]
pub struct PatternFilter {
    label: String,
    patterns: Vec<Regex>,
}

impl PatternFilter {
    pub fn new(label: impl Into<String>, pattern: Regex) -> Self {
        Self::with_patterns(label, vec![pattern])
    }

    pub fn with_patterns(label: impl Into<String>, patterns: Vec<Regex>) -> Self {
        Self {
            label: label.into(),
            patterns,
        }
    }

    /// Compile pattern strings into a filter
    pub fn compile<S: AsRef<str>>(label: impl Into<String>, patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| RedactionError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_patterns(label, patterns))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// All matches in declaration order of the patterns, each pattern's
    /// matches left to right. Duplicates are kept; empty matches are not.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .filter(|mat| !mat.is_empty())
            .map(|mat| mat.as_str().to_string())
            .collect()
    }
}

/// Detector selecting NER entities by tag and confidence
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFilter {
    label: String,
    tag: String,
    min_confidence: Option<f32>,
}

impl EntityFilter {
    pub fn new(label: impl Into<String>, tag: impl AsRef<str>) -> Self {
        Self {
            label: label.into(),
            tag: tag.as_ref().to_uppercase(),
            min_confidence: None,
        }
    }

    /// Use a fixed threshold instead of the configured default
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn min_confidence(&self) -> Option<f32> {
        self.min_confidence
    }

    /// Text of every entity with this filter's tag scoring at least the
    /// threshold, in entity order
    pub fn extract(&self, entities: &[Entity], default_min_confidence: f32) -> Vec<String> {
        let threshold = self.min_confidence.unwrap_or(default_min_confidence);

        entities
            .iter()
            .filter(|entity| entity.tag == self.tag && entity.confidence >= threshold)
            .map(|entity| entity.text.clone())
            .collect()
    }
}

/// A configured detector
#[derive(Debug, Clone)]
pub enum Filter {
    Pattern(PatternFilter),
    Entity(EntityFilter),
}

impl Filter {
    pub fn label(&self) -> &str {
        match self {
            Filter::Pattern(filter) => filter.label(),
            Filter::Entity(filter) => filter.label(),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Filter::Entity(_))
    }

    /// Name of the filter variant, as accepted in settings
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Pattern(_) => "regex",
            Filter::Entity(_) => "ner",
        }
    }
}

impl From<PatternFilter> for Filter {
    fn from(filter: PatternFilter) -> Self {
        Filter::Pattern(filter)
    }
}

impl From<EntityFilter> for Filter {
    fn from(filter: EntityFilter) -> Self {
        Filter::Entity(filter)
    }
}

// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Single-document redaction: run filters, build the mapping, substitute tokens

use once_cell::unsync::OnceCell;
use serde::Serialize;

use super::batch::{self, BatchResult};
use super::category::CategoryView;
use super::config::{FilterOverrides, RedactionConfig};
use super::entity::{Entity, EntityModel};
use super::error::Result;
use super::filter::{validate_label, Filter};
use super::mapping::{Mapping, MappingBuilder};
use super::restore::{self, RestoreResult};

/// Outcome of a detection-only pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub mapping: Mapping,
    #[serde(skip)]
    labels: Vec<String>,
}

impl ScanResult {
    pub fn sensitive(&self) -> bool {
        self.mapping.sensitive()
    }

    pub fn safe(&self) -> bool {
        self.mapping.safe()
    }

    pub fn categories(&self) -> CategoryView<'_> {
        CategoryView::new(&self.mapping, &self.labels)
    }
}

/// Outcome of redacting one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult {
    /// Original text
    pub input: String,

    /// Copy of `input` with every mapped value replaced by its placeholder
    pub output: String,

    pub mapping: Mapping,

    #[serde(skip)]
    labels: Vec<String>,
}

impl FilterResult {
    pub fn sensitive(&self) -> bool {
        self.mapping.sensitive()
    }

    pub fn safe(&self) -> bool {
        self.mapping.safe()
    }

    pub fn categories(&self) -> CategoryView<'_> {
        CategoryView::new(&self.mapping, &self.labels)
    }

    /// Labels of the filters that produced this result
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Redacts text according to a [`RedactionConfig`]
///
/// Every call builds its own mapping; nothing is carried between calls.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    config: RedactionConfig,
}

impl Redactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Detect sensitive values without changing the text
    pub fn scan(
        &self,
        input: &str,
        overrides: &FilterOverrides,
        custom_filters: &[Filter],
    ) -> Result<ScanResult> {
        let session = Session::new(&self.config, input, overrides, custom_filters)?;
        let labels = session.labels();
        let mapping = session.build_mapping()?;

        tracing::debug!(entries = mapping.len(), "scan complete");

        Ok(ScanResult { mapping, labels })
    }

    /// Detect sensitive values and replace them with placeholders
    pub fn filter(
        &self,
        input: &str,
        overrides: &FilterOverrides,
        custom_filters: &[Filter],
    ) -> Result<FilterResult> {
        let session = Session::new(&self.config, input, overrides, custom_filters)?;
        let labels = session.labels();
        let mapping = session.build_mapping()?;

        let output = if mapping.is_empty() {
            input.to_string()
        } else {
            mapping.substitute(input)
        };

        tracing::debug!(entries = mapping.len(), "filter complete");

        Ok(FilterResult {
            input: input.to_string(),
            output,
            mapping,
            labels,
        })
    }

    /// Redact each message, then relabel so equal values share one token
    /// across the whole batch
    pub fn filter_all<S: AsRef<str>>(
        &self,
        messages: &[S],
        overrides: &FilterOverrides,
        custom_filters: &[Filter],
    ) -> Result<BatchResult> {
        let results = messages
            .iter()
            .map(|message| self.filter(message.as_ref(), overrides, custom_filters))
            .collect::<Result<Vec<_>>>()?;

        Ok(batch::reconcile(results))
    }

    /// Replace placeholders in `text` with the values in `mapping`
    pub fn restore(&self, text: &str, mapping: &Mapping) -> RestoreResult {
        restore::restore(text, mapping)
    }
}

/// Filters and lazily detected entities for one document
struct Session<'a> {
    input: &'a str,
    filters: Vec<&'a Filter>,
    model: &'a dyn EntityModel,
    min_confidence_score: f32,
    entities: OnceCell<Vec<Entity>>,
}

impl<'a> Session<'a> {
    fn new(
        config: &'a RedactionConfig,
        input: &'a str,
        overrides: &'a FilterOverrides,
        custom_filters: &'a [Filter],
    ) -> Result<Self> {
        let filters = config.effective_filters(overrides, custom_filters)?;

        Ok(Self {
            input,
            filters,
            model: config.model.as_ref(),
            min_confidence_score: config.min_confidence_score,
            entities: OnceCell::new(),
        })
    }

    fn labels(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.label().to_string()).collect()
    }

    /// Entities are requested from the model on first use only
    fn entities(&self) -> Result<&[Entity]> {
        let entities = self
            .entities
            .get_or_try_init(|| self.model.detect_entities(self.input))?;
        Ok(entities.as_slice())
    }

    /// Apply every filter in order; labels are checked as each filter runs,
    /// so a malformed label fails the call before any substitution
    fn build_mapping(&self) -> Result<Mapping> {
        let mut builder = MappingBuilder::new();

        for filter in &self.filters {
            validate_label(filter.label())?;

            let values = match filter {
                Filter::Pattern(pattern) => pattern.extract(self.input),
                Filter::Entity(entity) => {
                    entity.extract(self.entities()?, self.min_confidence_score)
                }
            };

            let added = builder.assign(filter.label(), values);
            tracing::trace!(label = filter.label(), added, "filter applied");
        }

        Ok(builder.build())
    }
}

// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Batch redaction with labels kept consistent across messages

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::category::CategoryView;
use super::mapping::{label_type, Mapping, MappingBuilder};
use super::session::FilterResult;

static PLACEHOLDER_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("placeholder span regex is valid"));

/// One message of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub input: String,
    pub output: String,

    /// Entries of the batch mapping whose placeholders appear in `output`
    pub mapping: Mapping,

    #[serde(skip)]
    labels: Vec<String>,
}

impl BatchItem {
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

/// Outcome of redacting a batch of messages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    /// Batch-wide mapping, keys in first-discovery order
    pub mapping: Mapping,

    /// One item per message, in input order
    pub items: Vec<BatchItem>,

    #[serde(skip)]
    labels: Vec<String>,
}

impl BatchResult {
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

/// Registry giving every distinct value one token for the whole batch
///
/// Results must be added in message order; numbering depends on it.
#[derive(Debug, Default)]
pub struct GlobalMapping {
    tokens: IndexMap<String, String>,
    builder: MappingBuilder,
}

impl GlobalMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the values of one message's mapping not seen before
    pub fn add(&mut self, mapping: &Mapping) {
        for (local_token, value) in mapping.iter() {
            if self.tokens.contains_key(value) {
                continue;
            }
            let token = self.builder.push(label_type(local_token), value);
            self.tokens.insert(value.to_string(), token);
        }
    }

    /// Token assigned to `value`, if any
    pub fn token_for(&self, value: &str) -> Option<&str> {
        self.tokens.get(value).map(String::as_str)
    }

    /// Token -> value view of the registry
    pub fn build(self) -> Mapping {
        self.builder.build()
    }
}

/// Tokens of every `[...]` span in `text`
pub fn placeholder_tokens(text: &str) -> IndexSet<&str> {
    PLACEHOLDER_SPAN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|token| token.as_str())
        .collect()
}

/// Relabel independently redacted messages against one batch mapping
///
/// Each message's output is recomputed from its original input using the
/// whole batch mapping, so a value found in any message is redacted in all
/// of them.
pub fn reconcile(results: Vec<FilterResult>) -> BatchResult {
    let mut registry = GlobalMapping::new();
    for result in &results {
        registry.add(&result.mapping);
    }
    let mapping = registry.build();

    let mut labels: Vec<String> = Vec::new();
    for result in &results {
        for label in result.labels() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }

    let items: Vec<BatchItem> = results
        .into_iter()
        .map(|result| {
            let output = mapping.substitute(&result.input);
            let present = placeholder_tokens(&output);
            let item_mapping = mapping.select(|token| present.contains(token));

            BatchItem {
                input: result.input,
                output,
                mapping: item_mapping,
                labels: labels.clone(),
            }
        })
        .collect();

    tracing::debug!(
        messages = items.len(),
        entries = mapping.len(),
        "batch reconciled"
    );

    BatchResult {
        mapping,
        items,
        labels,
    }
}

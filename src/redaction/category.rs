// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Read-only grouping of a mapping by label type

use super::config::{FilterSlot, RedactionConfig};
use super::mapping::{label_type, Mapping};

/// Label types present in `mapping`, followed by any `known_labels` not
/// already seen (so categories with no matches are still listed)
///
/// Comparison is case-insensitive; the first spelling seen is kept.
pub fn types<S: AsRef<str>>(mapping: &Mapping, known_labels: &[S]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();

    let observed = mapping.tokens().map(label_type);
    let known = known_labels.iter().map(|label| label.as_ref());

    for label in observed.chain(known) {
        if !types.iter().any(|t| t.eq_ignore_ascii_case(label)) {
            types.push(label.to_string());
        }
    }

    types
}

/// Values whose token has label type `type_` (case-insensitive), in mapping order
pub fn values_for<'m>(mapping: &'m Mapping, type_: &str) -> Vec<&'m str> {
    mapping
        .iter()
        .filter(|(token, _)| label_type(token).eq_ignore_ascii_case(type_))
        .map(|(_, value)| value)
        .collect()
}

/// Entries whose token has label type `type_`
pub fn sub_mapping_for(mapping: &Mapping, type_: &str) -> Mapping {
    mapping.select(|token| label_type(token).eq_ignore_ascii_case(type_))
}

/// Whether any value has label type `type_`
pub fn any_for(mapping: &Mapping, type_: &str) -> bool {
    mapping
        .tokens()
        .any(|token| label_type(token).eq_ignore_ascii_case(type_))
}

/// Category queries over one mapping
#[derive(Debug, Clone, Copy)]
pub struct CategoryView<'a> {
    mapping: &'a Mapping,
    known_labels: &'a [String],
}

impl<'a> CategoryView<'a> {
    pub fn new(mapping: &'a Mapping, known_labels: &'a [String]) -> Self {
        Self {
            mapping,
            known_labels,
        }
    }

    pub fn types(&self) -> Vec<String> {
        types(self.mapping, self.known_labels)
    }

    pub fn values_for(&self, type_: &str) -> Vec<&'a str> {
        values_for(self.mapping, type_)
    }

    pub fn sub_mapping_for(&self, type_: &str) -> Mapping {
        sub_mapping_for(self.mapping, type_)
    }

    pub fn any_for(&self, type_: &str) -> bool {
        any_for(self.mapping, type_)
    }

    /// Values found by the filter `config` assigns to `slot`
    ///
    /// Resolves through the configured label, so a slot whose filter was
    /// relabelled is still found. A disabled slot falls back to its
    /// default label.
    pub fn values_for_slot(&self, config: &RedactionConfig, slot: FilterSlot) -> Vec<&'a str> {
        let label = config.slot_label(slot).unwrap_or(slot.default_label());
        self.values_for(label)
    }
}

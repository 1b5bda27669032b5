// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for the redaction engine

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::entity::{EntityModel, NullModel};
use super::error::{RedactionError, Result};
use super::filter::{EntityFilter, Filter, PatternFilter};
use super::patterns;

/// Built-in filter slots, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSlot {
    CreditCard,
    Email,
    PhoneNumber,
    Ssn,
    People,
    Location,
}

impl FilterSlot {
    pub const ALL: [FilterSlot; 6] = [
        FilterSlot::CreditCard,
        FilterSlot::Email,
        FilterSlot::PhoneNumber,
        FilterSlot::Ssn,
        FilterSlot::People,
        FilterSlot::Location,
    ];

    /// Override key for this slot
    pub fn key(&self) -> &'static str {
        match self {
            FilterSlot::CreditCard => "credit_card_filter",
            FilterSlot::Email => "email_filter",
            FilterSlot::PhoneNumber => "phone_number_filter",
            FilterSlot::Ssn => "ssn_filter",
            FilterSlot::People => "people_filter",
            FilterSlot::Location => "location_filter",
        }
    }

    /// Slot name without the `_filter` suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterSlot::CreditCard => "credit_card",
            FilterSlot::Email => "email",
            FilterSlot::PhoneNumber => "phone_number",
            FilterSlot::Ssn => "ssn",
            FilterSlot::People => "people",
            FilterSlot::Location => "location",
        }
    }

    /// Label the built-in filter for this slot uses
    pub fn default_label(&self) -> &'static str {
        match self {
            FilterSlot::CreditCard => patterns::CREDIT_CARD_LABEL,
            FilterSlot::Email => patterns::EMAIL_LABEL,
            FilterSlot::PhoneNumber => patterns::PHONE_NUMBER_LABEL,
            FilterSlot::Ssn => patterns::SSN_LABEL,
            FilterSlot::People => patterns::PERSON_LABEL,
            FilterSlot::Location => patterns::LOCATION_LABEL,
        }
    }

    /// Built-in filter for this slot
    pub fn default_filter(&self) -> Filter {
        match self {
            FilterSlot::CreditCard => patterns::credit_card_filter(),
            FilterSlot::Email => patterns::email_filter(),
            FilterSlot::PhoneNumber => patterns::phone_number_filter(),
            FilterSlot::Ssn => patterns::ssn_filter(),
            FilterSlot::People => patterns::people_filter(),
            FilterSlot::Location => patterns::location_filter(),
        }
    }

    fn expected_keys() -> String {
        FilterSlot::ALL
            .iter()
            .map(FilterSlot::key)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterSlot {
    type Err = RedactionError;

    fn from_str(key: &str) -> Result<Self> {
        FilterSlot::ALL
            .into_iter()
            .find(|slot| slot.key() == key || slot.as_str() == key)
            .ok_or_else(|| RedactionError::InvalidFilterKey {
                key: key.to_string(),
                expected: FilterSlot::expected_keys(),
            })
    }
}

/// Per-call replacements for built-in filters
///
/// `Some(filter)` replaces the slot's filter, `None` disables the slot.
/// Keys are checked against [`FilterSlot`] before any text is processed.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    entries: IndexMap<String, Option<Filter>>,
}

impl FilterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, filter: impl Into<Filter>) -> Self {
        self.entries.insert(key.into(), Some(filter.into()));
        self
    }

    pub fn disable(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, filter: Option<Filter>) {
        self.entries.insert(key.into(), filter);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve keys to slots, failing on the first unrecognized key
    pub fn resolve(&self) -> Result<Vec<(FilterSlot, Option<&Filter>)>> {
        self.entries
            .iter()
            .map(|(key, filter)| Ok((key.parse::<FilterSlot>()?, filter.as_ref())))
            .collect()
    }
}

/// Redaction configuration
///
/// Passed explicitly to every redactor; the engine only reads it.
#[derive(Clone)]
pub struct RedactionConfig {
    pub credit_card_filter: Option<Filter>,
    pub email_filter: Option<Filter>,
    pub phone_number_filter: Option<Filter>,
    pub ssn_filter: Option<Filter>,
    pub people_filter: Option<Filter>,
    pub location_filter: Option<Filter>,

    /// Applied after the built-in slots, in order
    pub custom_filters: Vec<Filter>,

    /// Threshold for entity filters that do not set their own
    pub min_confidence_score: f32,

    /// NER model shared by every document redacted with this config
    pub model: Arc<dyn EntityModel>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            credit_card_filter: Some(patterns::credit_card_filter()),
            email_filter: Some(patterns::email_filter()),
            phone_number_filter: Some(patterns::phone_number_filter()),
            ssn_filter: Some(patterns::ssn_filter()),
            people_filter: Some(patterns::people_filter()),
            location_filter: Some(patterns::location_filter()),
            custom_filters: Vec::new(),
            min_confidence_score: patterns::MIN_CONFIDENCE_SCORE,
            model: Arc::new(NullModel),
        }
    }
}

impl fmt::Debug for RedactionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactionConfig")
            .field("credit_card_filter", &self.credit_card_filter)
            .field("email_filter", &self.email_filter)
            .field("phone_number_filter", &self.phone_number_filter)
            .field("ssn_filter", &self.ssn_filter)
            .field("people_filter", &self.people_filter)
            .field("location_filter", &self.location_filter)
            .field("custom_filters", &self.custom_filters)
            .field("min_confidence_score", &self.min_confidence_score)
            .finish_non_exhaustive()
    }
}

impl RedactionConfig {
    pub fn with_model(mut self, model: impl EntityModel + 'static) -> Self {
        self.model = Arc::new(model);
        self
    }

    pub fn with_shared_model(mut self, model: Arc<dyn EntityModel>) -> Self {
        self.model = model;
        self
    }

    pub fn slot(&self, slot: FilterSlot) -> Option<&Filter> {
        self.slot_ref(slot).as_ref()
    }

    pub fn set_slot(&mut self, slot: FilterSlot, filter: Option<Filter>) {
        *self.slot_mut(slot) = filter;
    }

    fn slot_ref(&self, slot: FilterSlot) -> &Option<Filter> {
        match slot {
            FilterSlot::CreditCard => &self.credit_card_filter,
            FilterSlot::Email => &self.email_filter,
            FilterSlot::PhoneNumber => &self.phone_number_filter,
            FilterSlot::Ssn => &self.ssn_filter,
            FilterSlot::People => &self.people_filter,
            FilterSlot::Location => &self.location_filter,
        }
    }

    fn slot_mut(&mut self, slot: FilterSlot) -> &mut Option<Filter> {
        match slot {
            FilterSlot::CreditCard => &mut self.credit_card_filter,
            FilterSlot::Email => &mut self.email_filter,
            FilterSlot::PhoneNumber => &mut self.phone_number_filter,
            FilterSlot::Ssn => &mut self.ssn_filter,
            FilterSlot::People => &mut self.people_filter,
            FilterSlot::Location => &mut self.location_filter,
        }
    }

    /// Filters to apply for one call: built-in slots with `overrides`
    /// applied (disabled slots dropped), then the configured custom filters,
    /// then `custom_filters`.
    pub fn effective_filters<'a>(
        &'a self,
        overrides: &'a FilterOverrides,
        custom_filters: &'a [Filter],
    ) -> Result<Vec<&'a Filter>> {
        let mut slots: Vec<(FilterSlot, Option<&Filter>)> = FilterSlot::ALL
            .into_iter()
            .map(|slot| (slot, self.slot(slot)))
            .collect();

        for (slot, filter) in overrides.resolve()? {
            if let Some(entry) = slots.iter_mut().find(|(s, _)| *s == slot) {
                entry.1 = filter;
            }
        }

        Ok(slots
            .into_iter()
            .filter_map(|(_, filter)| filter)
            .chain(self.custom_filters.iter())
            .chain(custom_filters.iter())
            .collect())
    }

    /// Label of the filter currently configured for `slot`, if enabled
    pub fn slot_label(&self, slot: FilterSlot) -> Option<&str> {
        self.slot(slot).map(Filter::label)
    }

    /// Build a config from deserialized settings
    pub fn from_settings(settings: RedactionSettings) -> Result<Self> {
        let mut config = Self::default();

        if let Some(score) = settings.min_confidence_score {
            if !(0.0..=1.0).contains(&score) {
                tracing::warn!(score, "min_confidence_score outside 0.0..=1.0");
            }
            config.min_confidence_score = score;
        }

        for (key, spec) in settings.filters {
            let slot: FilterSlot = key.parse()?;
            let filter = spec.map(Filter::try_from).transpose()?;
            config.set_slot(slot, filter);
        }

        config.custom_filters = settings
            .custom_filters
            .into_iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(config)
    }

    /// Build a config from a JSON settings document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: RedactionSettings = serde_json::from_str(json)?;
        Self::from_settings(settings)
    }
}

/// Serializable description of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// `regex` or `ner`
    pub kind: String,
    pub label: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub min_confidence_score: Option<f32>,
}

impl TryFrom<FilterSpec> for Filter {
    type Error = RedactionError;

    fn try_from(spec: FilterSpec) -> Result<Self> {
        match spec.kind.as_str() {
            "regex" | "pattern" => {
                if spec.patterns.is_empty() {
                    return Err(RedactionError::InvalidConfig(format!(
                        "regex filter '{}' has no patterns",
                        spec.label
                    )));
                }
                Ok(PatternFilter::compile(spec.label, &spec.patterns)?.into())
            }
            "ner" | "entity" => {
                let tag = spec.tag.ok_or_else(|| {
                    RedactionError::InvalidConfig(format!("ner filter '{}' has no tag", spec.label))
                })?;
                let filter = EntityFilter::new(spec.label, tag);
                Ok(match spec.min_confidence_score {
                    Some(score) => filter.with_min_confidence(score),
                    None => filter,
                }
                .into())
            }
            other => Err(RedactionError::UnsupportedFilter(other.to_string())),
        }
    }
}

/// Settings document
///
/// ```json
/// {
///     "min_confidence_score": 0.6,
///     "filters": {"email_filter": null},
///     "custom_filters": [
///         {"kind": "regex", "label": "IP_ADDRESS", "patterns": ["\\b\\d{1,3}(?:\\.\\d{1,3}){3}\\b"]}
///     ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionSettings {
    #[serde(default)]
    pub min_confidence_score: Option<f32>,

    /// Slot key to replacement filter; `null` disables the slot
    #[serde(default)]
    pub filters: IndexMap<String, Option<FilterSpec>>,

    #[serde(default)]
    pub custom_filters: Vec<FilterSpec>,
}

// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Token -> value mapping and sequential label assignment

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label type of a token: the token without its trailing `_<digits>`
///
/// Tokens with no numeric suffix are returned unchanged.
pub fn label_type(token: &str) -> &str {
    match token.rsplit_once('_') {
        Some((label, index))
            if !label.is_empty()
                && !index.is_empty()
                && index.bytes().all(|b| b.is_ascii_digit()) =>
        {
            label
        }
        _ => token,
    }
}

/// Placeholder text for a token, as embedded in redacted output
pub fn placeholder(token: &str) -> String {
    format!("[{token}]")
}

/// Ordered association of tokens to the sensitive values they replace
///
/// Iteration follows insertion order, and two mappings are equal only when
/// they hold the same entries in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: IndexMap<String, String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any sensitive value was found
    pub fn sensitive(&self) -> bool {
        !self.is_empty()
    }

    /// Whether no sensitive value was found
    pub fn safe(&self) -> bool {
        self.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Entries whose token satisfies `keep`, in mapping order
    pub fn select(&self, mut keep: impl FnMut(&str) -> bool) -> Mapping {
        self.iter()
            .filter(|(token, _)| keep(*token))
            .map(|(token, value)| (token.to_string(), value.to_string()))
            .collect()
    }

    /// Replace every occurrence of each value with its placeholder,
    /// entries applied in mapping order
    ///
    /// Earlier entries are replaced first, so a value that is a substring of
    /// a later value can consume part of it.
    pub fn substitute(&self, text: &str) -> String {
        let mut output = text.to_string();
        for (token, value) in self.iter() {
            if value.is_empty() {
                continue;
            }
            if output.contains(value) {
                output = output.replace(value, &placeholder(token));
            }
        }
        output
    }

    pub(crate) fn insert(&mut self, token: String, value: String) {
        self.entries.insert(token, value);
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.entries
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Mapping {}

impl FromIterator<(String, String)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(token, value)| (token.to_string(), value.to_string()))
            .collect()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Mapping {
    fn from(entries: [(&str, &str); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Assigns sequential tokens to filter matches while building a [`Mapping`]
///
/// Index counters are kept per label for the lifetime of the builder, so
/// every label numbers its tokens from 1 upward.
#[derive(Debug, Default)]
pub struct MappingBuilder {
    mapping: Mapping,
    counters: HashMap<String, usize>,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused token for `label`
    pub fn next_token(&mut self, label: &str) -> String {
        let counter = self.counters.entry(label.to_string()).or_insert(0);
        *counter += 1;
        format!("{label}_{counter}")
    }

    /// Add one filter's matches: duplicates collapse to the first token
    /// assigned to that value by this call
    pub fn assign<I, S>(&mut self, label: &str, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: IndexSet<String> = values.into_iter().map(Into::into).collect();
        let count = unique.len();

        for value in unique {
            let token = self.next_token(label);
            self.mapping.insert(token, value);
        }

        count
    }

    /// Register a single value under the next token for `label`
    pub fn push(&mut self, label: &str, value: impl Into<String>) -> String {
        let token = self.next_token(label);
        self.mapping.insert(token.clone(), value.into());
        token
    }

    pub fn build(self) -> Mapping {
        self.mapping
    }
}

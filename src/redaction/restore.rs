// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Restoration of placeholders in text returned by an external service

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::mapping::{placeholder, Mapping};

// Any index width is reported, so [EMAIL_10] is flagged like [EMAIL_1]
static UNRESTORED_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\w*_\d+\]").expect("placeholder regex is valid"));

/// Outcome of restoring placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreResult {
    /// Text with mapped placeholders replaced by their values
    pub output: String,

    /// Placeholders that were replaced, each listed once, in mapping order
    pub restored: Vec<String>,

    /// Placeholder-shaped spans left in `output`, in text order
    pub unrestored: Vec<String>,
}

impl RestoreResult {
    /// Whether every placeholder in the text was resolved
    pub fn complete(&self) -> bool {
        self.unrestored.is_empty()
    }
}

/// Replace each `[TOKEN]` in `text` with its value from `mapping`
///
/// Matching is exact and case-sensitive: `[person_1]` is not restored by a
/// `PERSON_1` entry and is reported as unrestored instead.
pub fn restore(text: &str, mapping: &Mapping) -> RestoreResult {
    let mut output = text.to_string();
    let mut restored = Vec::new();

    for (token, value) in mapping.iter() {
        let placeholder = placeholder(token);
        if output.contains(&placeholder) {
            output = output.replace(&placeholder, value);
            restored.push(placeholder);
        }
    }

    let unrestored: Vec<String> = UNRESTORED_PLACEHOLDER
        .find_iter(&output)
        .map(|mat| mat.as_str().to_string())
        .collect();

    tracing::debug!(
        restored = restored.len(),
        unrestored = unrestored.len(),
        "restore complete"
    );

    RestoreResult {
        output,
        restored,
        unrestored,
    }
}

// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Named-entity types and the model seam used by entity filters

use serde::{Deserialize, Serialize};

use super::error::Result;

/// A named entity reported by an NER model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Text span as it appears in the document
    pub text: String,

    /// Entity tag, uppercase (e.g. `PERSON`, `LOCATION`)
    pub tag: String,

    /// Model confidence (0.0 to 1.0)
    pub confidence: f32,
}

impl Entity {
    pub fn new(text: impl Into<String>, tag: impl AsRef<str>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            tag: tag.as_ref().to_uppercase(),
            confidence,
        }
    }
}

/// Source of named entities for a document
///
/// A single handle is shared by every document in a batch and may be called
/// from several threads at once, so implementations must be reentrant and
/// must not rely on mutation between calls.
///
/// A failed detection is an error, never an empty list: returning no
/// entities would let names and places through unredacted.
pub trait EntityModel: Send + Sync {
    /// Detect entities in `text`, in document order
    fn detect_entities(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Model used when no NER model is configured
///
/// Entity filters backed by it never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullModel;

impl EntityModel for NullModel {
    fn detect_entities(&self, _text: &str) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }
}

impl<F> EntityModel for F
where
    F: Fn(&str) -> Vec<Entity> + Send + Sync,
{
    fn detect_entities(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(self(text))
    }
}

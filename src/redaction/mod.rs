// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Redaction & restoration engine
//
// Sensitive values are swapped for numbered placeholders such as [EMAIL_1]
// before text leaves the process, and swapped back in the response:
// - Pattern and NER filters feed one ordered token -> value mapping
// - Batches share one mapping so equal values get equal tokens
// - Restoration reports which placeholders it could and could not resolve

pub mod batch;
pub mod category;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod mapping;
pub mod patterns;
pub mod restore;
pub mod session;

pub use batch::{BatchItem, BatchResult, GlobalMapping};
pub use category::CategoryView;
pub use config::{FilterOverrides, FilterSlot, FilterSpec, RedactionConfig, RedactionSettings};
pub use entity::{Entity, EntityModel, NullModel};
pub use error::{MalformedLabel, RedactionError, Result};
pub use filter::{EntityFilter, Filter, PatternFilter};
pub use mapping::{Mapping, MappingBuilder};
pub use restore::{restore, RestoreResult};
pub use session::{FilterResult, Redactor, ScanResult};

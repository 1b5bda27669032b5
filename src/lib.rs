// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Reversible PII redaction for text sent to external services
// Optional PyO3 bindings behind the `python` feature

//! Redact emails, card numbers, SSNs, phone numbers, names, locations and
//! custom categories from text, then restore them in a response.
//!
//! ```
//! use pii_redaction::{restore, FilterOverrides, Redactor};
//!
//! let redactor = Redactor::default();
//! let result = redactor
//!     .filter("Email me at user@example.com", &FilterOverrides::new(), &[])
//!     .unwrap();
//! assert_eq!(result.output, "Email me at [EMAIL_1]");
//!
//! let reply = "Sure, I'll write to [EMAIL_1].";
//! let restored = restore(reply, &result.mapping);
//! assert_eq!(restored.output, "Sure, I'll write to user@example.com.");
//! ```

pub mod redaction;

#[cfg(feature = "python")]
pub mod python;

pub use redaction::*;

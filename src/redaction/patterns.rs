// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Built-in patterns and labels for the default filters

use once_cell::sync::Lazy;
use regex::Regex;

use super::filter::{EntityFilter, Filter, PatternFilter};

pub const CREDIT_CARD_LABEL: &str = "CREDIT_CARD";
pub const EMAIL_LABEL: &str = "EMAIL";
pub const PHONE_NUMBER_LABEL: &str = "PHONE_NUMBER";
pub const SSN_LABEL: &str = "SSN";
pub const PERSON_LABEL: &str = "PERSON";
pub const LOCATION_LABEL: &str = "LOCATION";

pub const PERSON_TAG: &str = "PERSON";
pub const LOCATION_TAG: &str = "LOCATION";

/// Default minimum confidence for entity filters
pub const MIN_CONFIDENCE_SCORE: f32 = 0.5;

// 16 digits, or four groups of four separated by space, plus or dash
pub const CREDIT_CARD_PATTERN: &str = r"\b[3456]\d{15}\b|\b[3456]\d{3}(?:[\s+-]\d{4}){3}\b";

pub const EMAIL_PATTERN: &str = concat!(
    r"[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@",
    r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
    r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*",
);

// Optional country code; a parenthesised area code is taken whole
pub const PHONE_PATTERN: &str =
    r"(?:\+\d{1,2}\s)?(?:\(\d{3}\)|\b\d{3})[\s+.-]?\d{3}[\s+.-]?\d{4}\b";

pub const SSN_PATTERN: &str = r"\b\d{3}[\s+-]\d{2}[\s+-]\d{4}\b";

pub static CREDIT_CARD_REGEX: Lazy<Regex> = Lazy::new(|| compile_builtin(CREDIT_CARD_PATTERN));
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| compile_builtin(EMAIL_PATTERN));
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| compile_builtin(PHONE_PATTERN));
pub static SSN_REGEX: Lazy<Regex> = Lazy::new(|| compile_builtin(SSN_PATTERN));

fn compile_builtin(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern '{pattern}' is invalid: {e}"))
}

pub fn credit_card_filter() -> Filter {
    PatternFilter::new(CREDIT_CARD_LABEL, CREDIT_CARD_REGEX.clone()).into()
}

pub fn email_filter() -> Filter {
    PatternFilter::new(EMAIL_LABEL, EMAIL_REGEX.clone()).into()
}

pub fn phone_number_filter() -> Filter {
    PatternFilter::new(PHONE_NUMBER_LABEL, PHONE_REGEX.clone()).into()
}

pub fn ssn_filter() -> Filter {
    PatternFilter::new(SSN_LABEL, SSN_REGEX.clone()).into()
}

pub fn people_filter() -> Filter {
    EntityFilter::new(PERSON_LABEL, PERSON_TAG).into()
}

pub fn location_filter() -> Filter {
    EntityFilter::new(LOCATION_LABEL, LOCATION_TAG).into()
}

//! Compiled regex patterns used by the recognizer and the detectors.
//!
//! All patterns are compiled once at startup using `LazyLock` and are shared
//! read-only by every detector thread.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Semantic Value Shapes
// =============================================================================

/// Currency symbol or ISO code before the amount: `$1,299.00`, `EUR 45`, `kr 3 500`.
pub static CURRENCY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[$€£¥₹₩]|\b(?:usd|eur|gbp|nok|sek|dkk|chf|jpy|cad|aud|kr|rs)\.?)\s?[+-]?\d[\d\s.,']*",
    )
    .expect("CURRENCY_PREFIX regex")
});

/// Amount followed by a currency symbol or code: `3 500 kr`, `12,50 €`, `100,-`.
pub static CURRENCY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[+-]?\d[\d\s.,']*?\s?(?:[$€£¥₹₩]|,-|\b(?:usd|eur|gbp|nok|sek|dkk|chf|jpy|cad|aud|kr|nkr)\b)",
    )
    .expect("CURRENCY_SUFFIX regex")
});

/// ISO 8601 calendar date: `2024-03-15`.
pub static DATE_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("DATE_ISO regex")
});

/// Numeric day/month/year with `.`, `/` or `-` separators: `15.03.2024`, `3/15/24`.
pub static DATE_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})([./-])(\d{1,2})([./-])(\d{4}|\d{2})\b").expect("DATE_NUMERIC regex")
});

/// Dates with an English month name: `March 15, 2024`, `15 Mar 2024`.
pub static DATE_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}|\d{1,2}(?:st|nd|rd|th)?\.?\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?\s+\d{4})\b",
    )
    .expect("DATE_MONTH_NAME regex")
});

/// Percentage: `12%`, `-3.5 %`, `4,2%`.
pub static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?\d+(?:[.,]\d+)?\s?%").expect("PERCENTAGE regex")
});

/// Number followed by an area, length, mass or volume unit: `85 m²`, `1,200 sq ft`, `3.5 kg`.
pub static MEASUREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d[\d\s.,]*?\s?(?:m²|km²|ft²|m³|(?:sq\.?\s?(?:ft|m|mi)|sqft|sqm|kvm|m2|km|cm|mm|ha|acres?|mi|miles?|kg|lbs?|oz|ml|ft|m|g|l)\b)",
    )
    .expect("MEASUREMENT regex")
});

/// Bare numeric value, optionally signed, grouped or with a `%` suffix.
pub static NUMERIC_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?\d+[\d.,\s]*\s*%?\s*$").expect("NUMERIC_VALUE regex")
});

// =============================================================================
// Label / Value Shapes
// =============================================================================

/// `label: value` on one line. The label may not contain a colon.
pub static LABEL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+?)\s*:\s*(\S.*)$").expect("LABEL_VALUE regex")
});

/// A line that is only a label: `Bedrooms:`.
pub static LABEL_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+?)\s*:$").expect("LABEL_ONLY regex")
});

/// Text that reads like a time (`10:30`) rather than a label.
pub static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}").expect("CLOCK_TIME regex")
});

/// Fragment separators inside a text line.
pub static FRAGMENT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[|•·;]\s*").expect("FRAGMENT_SEPARATOR regex")
});

// =============================================================================
// Markup Scanning
// =============================================================================

/// Start or end tag token in raw markup.
pub static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)\b[^<>]*?(/?)>").expect("TAG_TOKEN regex")
});

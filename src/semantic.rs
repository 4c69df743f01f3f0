//! Pattern recognizer: classifies a text value into a small catalog of shapes.
//!
//! Matchers run in priority order (currency, date, percentage, measurement)
//! and the first hit wins. Text with letters falls back to `PlainText`,
//! anything else to `Unknown`. Classification never fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patterns::{
    CURRENCY_PREFIX, CURRENCY_SUFFIX, DATE_ISO, DATE_MONTH_NAME, DATE_NUMERIC, MEASUREMENT,
    NUMERIC_VALUE, PERCENTAGE,
};

/// Shape of a text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticKind {
    /// Amount with a currency symbol or code.
    Currency,
    /// Calendar date.
    Date,
    /// Number with a `%` suffix.
    Percentage,
    /// Number with a unit of area, length, mass or volume.
    Measurement,
    /// Text containing letters and none of the shapes above.
    PlainText,
    /// Empty, bare numbers, or punctuation.
    Unknown,
}

impl SemanticKind {
    /// Lowercase name, used for inferred column headers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Percentage => "percentage",
            Self::Measurement => "measurement",
            Self::PlainText => "text",
            Self::Unknown => "value",
        }
    }
}

/// Classification of one text value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticTag {
    /// The recognized shape.
    pub kind: SemanticKind,
    /// The substring that matched (the whole trimmed text for the fallbacks).
    pub matched: String,
    /// How strongly the text matched the shape, in `[0, 1]`.
    pub confidence: f64,
}

impl SemanticTag {
    fn new(kind: SemanticKind, matched: &str, confidence: f64) -> Self {
        Self {
            kind,
            matched: matched.trim().to_string(),
            confidence,
        }
    }
}

/// Classify a text value.
///
/// # Example
///
/// ```rust
/// use rs_tablescout::semantic::{classify, SemanticKind};
///
/// assert_eq!(classify("$1,299").kind, SemanticKind::Currency);
/// assert_eq!(classify("2024-03-15").kind, SemanticKind::Date);
/// assert_eq!(classify("12.5%").kind, SemanticKind::Percentage);
/// assert_eq!(classify("85 m²").kind, SemanticKind::Measurement);
/// assert_eq!(classify("Cozy flat").kind, SemanticKind::PlainText);
/// assert_eq!(classify("").kind, SemanticKind::Unknown);
/// ```
#[must_use]
pub fn classify(text: &str) -> SemanticTag {
    let text = text.trim();
    if text.is_empty() {
        return SemanticTag::new(SemanticKind::Unknown, "", 0.0);
    }

    if let Some(tag) = match_currency(text) {
        return tag;
    }
    if let Some(tag) = match_date(text) {
        return tag;
    }
    if let Some(m) = PERCENTAGE.find(text) {
        return SemanticTag::new(SemanticKind::Percentage, m.as_str(), coverage_confidence(text, m.as_str()));
    }
    if let Some(m) = MEASUREMENT.find(text) {
        return SemanticTag::new(SemanticKind::Measurement, m.as_str(), coverage_confidence(text, m.as_str()));
    }

    if text.chars().any(char::is_alphabetic) {
        SemanticTag::new(SemanticKind::PlainText, text, 0.5)
    } else {
        SemanticTag::new(SemanticKind::Unknown, text, 0.0)
    }
}

/// Whether `text` is a bare number (optionally grouped, signed or with `%`).
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    !text.trim().is_empty() && NUMERIC_VALUE.is_match(text)
}

fn match_currency(text: &str) -> Option<SemanticTag> {
    let m = CURRENCY_PREFIX
        .find(text)
        .or_else(|| CURRENCY_SUFFIX.find(text))?;
    Some(SemanticTag::new(
        SemanticKind::Currency,
        m.as_str(),
        coverage_confidence(text, m.as_str()),
    ))
}

fn match_date(text: &str) -> Option<SemanticTag> {
    if let Some(caps) = DATE_ISO.captures(text) {
        let valid = parse_ymd(&caps[1], &caps[2], &caps[3]).is_some();
        if valid {
            return Some(SemanticTag::new(SemanticKind::Date, &caps[0], 0.95));
        }
    }

    if let Some(caps) = DATE_NUMERIC.captures(text) {
        // Both separators must agree: 15.03.2024 but not 15.03/2024.
        if caps[2] == caps[4] {
            let year = expand_year(&caps[5]);
            let day_first = parse_ymd(&year, &caps[3], &caps[1]);
            let month_first = parse_ymd(&year, &caps[1], &caps[3]);
            if day_first.is_some() || month_first.is_some() {
                return Some(SemanticTag::new(SemanticKind::Date, &caps[0], 0.85));
            }
        }
    }

    DATE_MONTH_NAME
        .find(text)
        .map(|m| SemanticTag::new(SemanticKind::Date, m.as_str(), 0.9))
}

fn parse_ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
}

fn expand_year(year: &str) -> String {
    if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    }
}

/// Confidence grows with how much of the text the match covers.
fn coverage_confidence(text: &str, matched: &str) -> f64 {
    let total = text.chars().count().max(1) as f64;
    let covered = matched.trim().chars().count() as f64;
    (0.6 + 0.4 * (covered / total)).min(1.0)
}

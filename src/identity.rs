//! Identity number classification
//!
//! Recognizes 12-digit national ids and 10-character tax ids and produces a
//! canonical display form. Every input maps to exactly one category.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NATIONAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})([0-9]{4})([0-9]{4})$").expect("valid national id pattern"));
static TAX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid tax id pattern"));

/// Placeholder shown when no identity value is present
pub const UNSPECIFIED_VALUE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdCategory {
    NationalId,
    TaxId,
    Unclassified,
    Unspecified,
}

impl IdCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdCategory::NationalId => "national-id",
            IdCategory::TaxId => "tax-id",
            IdCategory::Unclassified => "unclassified",
            IdCategory::Unspecified => "unspecified",
        }
    }

    /// Label used when the classification is displayed next to the value
    pub fn label(&self) -> &'static str {
        match self {
            IdCategory::NationalId => "AADHAR_IDENTIFIED",
            IdCategory::TaxId => "PAN_CARD_VERIFIED",
            IdCategory::Unclassified => "ID_REF_UNSPECIFIED",
            IdCategory::Unspecified => "ID_UNSPECIFIED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClassification {
    pub category: IdCategory,
    pub value: String,
}

impl IdentityClassification {
    /// `LABEL: value (category)`
    pub fn to_text(&self) -> String {
        format!(
            "{}: {} ({})",
            self.category.label(),
            self.value,
            self.category.as_str()
        )
    }
}

/// Classify a raw identity string.
///
/// Whitespace is stripped and letters uppercased before matching. Values that
/// match neither pattern are returned verbatim, not normalized.
pub fn classify(raw: Option<&str>) -> IdentityClassification {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return IdentityClassification {
                category: IdCategory::Unspecified,
                value: UNSPECIFIED_VALUE.to_string(),
            }
        }
    };

    let clean: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if let Some(caps) = NATIONAL_ID.captures(&clean) {
        return IdentityClassification {
            category: IdCategory::NationalId,
            value: format!("{} {} {}", &caps[1], &caps[2], &caps[3]),
        };
    }

    if TAX_ID.is_match(&clean) {
        return IdentityClassification {
            category: IdCategory::TaxId,
            value: clean,
        };
    }

    IdentityClassification {
        category: IdCategory::Unclassified,
        value: raw.to_string(),
    }
}

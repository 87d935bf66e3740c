//! Record store
//!
//! Holds the immutable record collection loaded once at startup. A record's
//! [`RecordId`] is its position in the loaded collection.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// Position of a record in the loaded collection
pub type RecordId = usize;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read record file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse records: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Record data must be a JSON array, got {0}")]
    NotAnArray(&'static str),
}

/// A single personal record.
///
/// Field names follow the column headers of the source spreadsheet export.
/// Nulls and absent columns deserialize to `None`, empty strings stay
/// `Some("")`; numbers and booleans are kept as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Full Name", default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(rename = "Email Address", default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(rename = "Email (Personal Email)", default, deserialize_with = "lenient")]
    pub personal_email: Option<String>,
    #[serde(
        rename = "Aadhar number or PAN number (Please mention any one of them)",
        default,
        deserialize_with = "lenient"
    )]
    pub identity_number: Option<String>,
    #[serde(rename = "College Name", default, deserialize_with = "lenient")]
    pub college: Option<String>,
    #[serde(rename = "Branch/Stream", default, deserialize_with = "lenient")]
    pub branch: Option<String>,
    #[serde(rename = "SSC Percentage", default, deserialize_with = "lenient")]
    pub ssc_percentage: Option<String>,
    #[serde(rename = "SSC Passing Year", default, deserialize_with = "lenient")]
    pub ssc_year: Option<String>,
    #[serde(rename = "HSC Percentage /Diploma Percentage", default, deserialize_with = "lenient")]
    pub hsc_percentage: Option<String>,
    #[serde(rename = "HSC/Diploma Passing Year", default, deserialize_with = "lenient")]
    pub hsc_year: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "lenient")]
    pub gender: Option<String>,
    #[serde(rename = "Date of Birth", default, deserialize_with = "lenient")]
    pub date_of_birth: Option<String>,
    #[serde(rename = "Mobile Number", default, deserialize_with = "lenient")]
    pub mobile: Option<String>,
    #[serde(rename = "Full Address (Current address of Pune)", default, deserialize_with = "lenient")]
    pub address: Option<String>,
    #[serde(rename = "PIN Code (College)", default, deserialize_with = "lenient")]
    pub pin_code: Option<String>,
    #[serde(rename = "Current Educational stream", default, deserialize_with = "lenient")]
    pub current_stream: Option<String>,
    #[serde(rename = "Caste ( Open/OBC/ST/NT/SC/Any other )", default, deserialize_with = "lenient")]
    pub caste: Option<String>,
    #[serde(rename = "Father Name", default, deserialize_with = "lenient")]
    pub father_name: Option<String>,
    #[serde(rename = "Mother Name", default, deserialize_with = "lenient")]
    pub mother_name: Option<String>,
    #[serde(rename = "Father's Occupation", default, deserialize_with = "lenient")]
    pub father_occupation: Option<String>,
    #[serde(rename = "Mother's Occupation", default, deserialize_with = "lenient")]
    pub mother_occupation: Option<String>,
    #[serde(rename = "How many members are there in your family?", default, deserialize_with = "lenient")]
    pub family_members: Option<String>,
    #[serde(
        rename = "Did you go to a private school or a government school?",
        default,
        deserialize_with = "lenient"
    )]
    pub school_type: Option<String>,
    #[serde(
        rename = "If Applicable, What were the annual tution fees you paid in the school",
        default,
        deserialize_with = "lenient"
    )]
    pub school_fees: Option<String>,
    #[serde(
        rename = "Annual Family Income (as per Income certificate)",
        default,
        deserialize_with = "lenient"
    )]
    pub annual_income: Option<String>,
    #[serde(
        rename = "Income certificate or EWS certificate number (Mention the income certificate number as per the certificate)",
        default,
        deserialize_with = "lenient"
    )]
    pub income_certificate: Option<String>,
}

impl Record {
    /// Record with only a name and institution set
    pub fn named(full_name: &str, college: &str) -> Self {
        Self {
            full_name: Some(full_name.to_string()),
            college: Some(college.to_string()),
            ..Self::default()
        }
    }

    /// Full name, or an empty string when the record has none
    pub fn name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("")
    }
}

/// Accept strings, numbers, booleans and null for any record field
fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    Ok(Some(text))
}

/// Immutable, startup-loaded record collection
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    version: u64,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let kind = match &value {
            serde_json::Value::Array(_) => None,
            serde_json::Value::Object(_) => Some("object"),
            serde_json::Value::String(_) => Some("string"),
            serde_json::Value::Number(_) => Some("number"),
            serde_json::Value::Bool(_) => Some("boolean"),
            serde_json::Value::Null => Some("null"),
        };
        if let Some(kind) = kind {
            return Err(StoreError::NotAnArray(kind));
        }

        let records: Vec<Record> = serde_json::from_value(value)?;
        Ok(Self::new(records))
    }

    /// Load records from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read_to_string(path)?;
        let store = Self::from_json_str(&data)?;
        info!("Loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records paired with their ids, in store order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records.iter().enumerate()
    }

    /// Identifies this loaded collection; distinct for every store instance
    pub fn version(&self) -> u64 {
        self.version
    }
}

//! Record tool implementation
//!
//! Implements the `record(id)` tool: profile card, identity classification
//! and associates of one record

use crate::correlate::{associates, Relation};
use crate::dossier::{display_id, profile_card};
use crate::error::AppError;
use crate::identity::{classify, IdentityClassification};
use crate::store::{Record, RecordId, RecordStore};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct AssociateEntry {
    pub id: RecordId,
    pub name: String,
    pub relation: Relation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    pub id: RecordId,
    pub record: Record,
    pub identity: IdentityClassification,
    pub associates: Vec<AssociateEntry>,
    pub card: String,
}

impl ShowOutput {
    pub fn to_text(&self) -> String {
        let mut text = self.card.clone();
        text.push_str("\n\n[POTENTIAL_ASSOCIATES]");

        if self.associates.is_empty() {
            text.push_str("\nNONE");
        }
        for associate in &self.associates {
            text.push_str(&format!(
                "\n{}  REL_IDENTIFIED  {}",
                associate.name.to_uppercase(),
                display_id(associate.id)
            ));
        }

        text
    }
}

/// Fetch a record by id
pub fn lookup(store: &RecordStore, id: RecordId) -> Result<&Record, AppError> {
    store.get(id).ok_or_else(|| {
        AppError::NotFound(format!(
            "Record {} (store holds {} records)",
            id,
            store.len()
        ))
    })
}

/// Associates of a record with their names attached
pub fn associate_entries(store: &RecordStore, record: &Record, id: RecordId) -> Vec<AssociateEntry> {
    associates(store, record, id)
        .into_iter()
        .map(|associate| AssociateEntry {
            id: associate.id,
            name: store
                .get(associate.id)
                .map(|r| r.name().to_string())
                .unwrap_or_default(),
            relation: associate.relation,
        })
        .collect()
}

/// Execute record tool (shared implementation for session and CLI)
pub fn execute_show(store: &RecordStore, id: RecordId) -> Result<ShowOutput, AppError> {
    let record = lookup(store, id)?;
    let associates = associate_entries(store, record, id);
    debug!("Record {} has {} associates", id, associates.len());

    Ok(ShowOutput {
        id,
        record: record.clone(),
        identity: classify(record.identity_number.as_deref()),
        associates,
        card: profile_card(record, id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::new(vec![
            Record::named("Asha Patel", "A"),
            Record::named("Nisha Patel", "B"),
            Record::named("Rohit Shah", "A"),
        ])
    }

    #[test]
    fn test_execute_show() {
        let output = execute_show(&store(), 0).unwrap();
        let names: Vec<&str> = output.associates.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Nisha Patel", "Rohit Shah"]);
        assert_eq!(output.identity.category.as_str(), "unspecified");

        let text = output.to_text();
        assert!(text.contains("[POTENTIAL_ASSOCIATES]\nNISHA PATEL  REL_IDENTIFIED  ID_00001"));
    }

    #[test]
    fn test_no_associates_text() {
        let store = RecordStore::new(vec![Record::named("Meera Iyer", "C")]);
        let text = execute_show(&store, 0).unwrap().to_text();
        assert!(text.ends_with("[POTENTIAL_ASSOCIATES]\nNONE"));
    }

    #[test]
    fn test_unknown_id() {
        let err = execute_show(&store(), 3).unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }
}

//! Associate correlation
//!
//! Finds records related to a given one by a shared trailing name token or
//! the same institution.

use crate::store::{Record, RecordId, RecordStore};
use serde::Serialize;

/// Maximum associates returned for a record
pub const MAX_ASSOCIATES: usize = 4;

/// Why a record was judged related
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Surname,
    Institution,
    /// Both heuristics matched
    SurnameAndInstitution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Associate {
    pub id: RecordId,
    pub relation: Relation,
}

/// Trailing whitespace-delimited token of a full name
fn surname(name: &str) -> Option<&str> {
    name.split_whitespace().next_back()
}

/// Records related to `record` (whose id is `id`), in store order.
///
/// A candidate qualifies when its full name ends with the source's trailing
/// name token, or its institution equals the source's. Matching is literal
/// and case-sensitive; two absent institutions are equal, as are two empty
/// ones, but an empty institution is not equal to an absent one.
pub fn associates(store: &RecordStore, record: &Record, id: RecordId) -> Vec<Associate> {
    let surname = surname(record.name());

    store
        .iter()
        .filter(|(candidate_id, _)| *candidate_id != id)
        .filter_map(|(candidate_id, candidate)| {
            let by_surname = surname.is_some_and(|s| candidate.name().ends_with(s));
            let by_college = candidate.college == record.college;

            let relation = match (by_surname, by_college) {
                (true, true) => Relation::SurnameAndInstitution,
                (true, false) => Relation::Surname,
                (false, true) => Relation::Institution,
                (false, false) => return None,
            };

            Some(Associate {
                id: candidate_id,
                relation,
            })
        })
        .take(MAX_ASSOCIATES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: &[Associate]) -> Vec<RecordId> {
        found.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_surname_or_institution() {
        let store = RecordStore::new(vec![
            Record::named("Asha Patel", "A"),
            Record::named("Nisha Patel", "B"),
            Record::named("Rohit Shah", "A"),
            Record::named("Meera Iyer", "C"),
        ]);
        let source = store.get(0).unwrap();
        let found = associates(&store, source, 0);
        assert_eq!(
            found,
            vec![
                Associate { id: 1, relation: Relation::Surname },
                Associate { id: 2, relation: Relation::Institution },
            ]
        );
    }

    #[test]
    fn test_excludes_self_and_caps_after_filtering() {
        let mut records = vec![Record::named("Meera Iyer", "Z")];
        for i in 0..6 {
            records.push(Record::named(&format!("Person{} Patel", i), "Y"));
        }
        records.insert(2, Record::named("Asha Patel", "X"));
        let store = RecordStore::new(records);

        let found = associates(&store, store.get(2).unwrap(), 2);
        assert_eq!(ids(&found), vec![1, 3, 4, 5]);
        assert!(found.iter().all(|a| a.relation == Relation::Surname));
    }

    #[test]
    fn test_both_heuristics() {
        let store = RecordStore::new(vec![
            Record::named("Asha Patel", "A"),
            Record::named("Nisha Patel", "A"),
        ]);
        let found = associates(&store, store.get(0).unwrap(), 0);
        assert_eq!(found[0].relation, Relation::SurnameAndInstitution);
    }

    #[test]
    fn test_empty_name_uses_institution_only() {
        let store = RecordStore::new(vec![
            Record::named("", "A"),
            Record::named("Nisha Patel", "A"),
            Record::named("Rohit Shah", "B"),
        ]);
        let found = associates(&store, store.get(0).unwrap(), 0);
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_literal_suffix_match() {
        let store = RecordStore::new(vec![
            Record::named("Asha Patel", "A"),
            Record::named("Ravi KPatel", "B"),
            Record::named("Ravi patel", "C"),
        ]);
        let found = associates(&store, store.get(0).unwrap(), 0);
        // suffix, not token equality, and case-sensitive
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_missing_institutions_are_equal() {
        let store = RecordStore::new(vec![
            Record {
                full_name: Some("Asha Patel".into()),
                ..Record::default()
            },
            Record {
                full_name: Some("Rohit Shah".into()),
                ..Record::default()
            },
            Record::named("Meera Iyer", "C"),
        ]);
        let found = associates(&store, store.get(0).unwrap(), 0);
        assert_eq!(found, vec![Associate { id: 1, relation: Relation::Institution }]);
    }

    #[test]
    fn test_empty_institutions_are_equal() {
        let store = RecordStore::from_json_str(
            r#"[
                {"Full Name": "Asha Patel", "College Name": ""},
                {"Full Name": "Rohit Shah", "College Name": ""},
                {"Full Name": "Meera Iyer"},
                {"Full Name": "Kiran Rao", "College Name": "C"}
            ]"#,
        )
        .unwrap();
        let found = associates(&store, store.get(0).unwrap(), 0);
        assert_eq!(ids(&found), vec![1]);

        // absent is not the same value as empty
        let found = associates(&store, store.get(2).unwrap(), 2);
        assert!(found.is_empty());
    }
}

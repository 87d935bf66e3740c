#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::correlate::{associates, Relation, MAX_ASSOCIATES};
    use crate::dossier::{dossier_file_name, format_dossier};
    use crate::identity::{classify, IdCategory};
    use crate::recent::{RecentTargets, RECENT_CAPACITY};
    use crate::search::index::MAX_RESULTS;
    use crate::search::{MatcherKind, SearchIndex};
    use crate::session::{parse_request, Session};
    use crate::store::RecordStore;
    use crate::tools::export::execute_export;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    const PATEL_COHORT: &str = r#"[
        {"Full Name": "Asha Patel", "College Name": "A", "Aadhar number or PAN number (Please mention any one of them)": "1234 5678 9012"},
        {"Full Name": "Nisha Patel", "College Name": "B", "Annual Family Income (as per Income certificate)": 350000},
        {"Full Name": "Rohit Shah", "College Name": "A", "Aadhar number or PAN number (Please mention any one of them)": "abcde1234f"}
    ]"#;

    fn cohort() -> Arc<RecordStore> {
        Arc::new(RecordStore::from_json_str(PATEL_COHORT).expect("valid cohort"))
    }

    fn crowd() -> Arc<RecordStore> {
        let mut json = String::from("[");
        for i in 0..24 {
            if i > 0 {
                json.push(',');
            }
            json.push_str(&format!(
                r#"{{"Full Name": "Student{} Patel", "College Name": "College {}"}}"#,
                i,
                i % 3
            ));
        }
        json.push(']');
        Arc::new(RecordStore::from_json_str(&json).expect("valid crowd"))
    }

    #[test]
    fn selecting_asha_finds_surname_and_institution_associates() {
        let store = cohort();
        let asha = store.get(0).unwrap();
        let found = associates(&store, asha, 0);

        let pairs: Vec<(usize, Relation)> = found.iter().map(|a| (a.id, a.relation)).collect();
        assert_eq!(
            pairs,
            vec![(1, Relation::Surname), (2, Relation::Institution)]
        );
    }

    #[test]
    fn associates_exclude_self_and_cap_for_every_record() {
        let store = crowd();
        for (id, record) in store.iter() {
            let found = associates(&store, record, id);
            assert!(found.len() <= MAX_ASSOCIATES);
            assert!(found.iter().all(|a| a.id != id));
        }
    }

    #[test]
    fn search_contract_over_both_matchers() {
        for kind in [MatcherKind::EditDistance, MatcherKind::Nucleo] {
            let store = crowd();
            let mut index = SearchIndex::with_matcher(Arc::clone(&store), kind.build());

            assert!(index.search("p").is_empty(), "{:?}", kind);

            let results = index.search("Student7 Patel");
            assert!(
                results.iter().any(|r| r.id == 7 && r.confidence == 100),
                "{:?}: exact name must be a full-confidence hit",
                kind
            );

            let results = index.search("studnet7 patel");
            assert_eq!(
                results.first().map(|r| r.id),
                Some(7),
                "{:?}: transposed letters must still find the name",
                kind
            );

            let results = index.search("patel");
            assert!(results.len() <= MAX_RESULTS);
            assert!(results
                .windows(2)
                .all(|pair| pair[0].confidence >= pair[1].confidence));
        }
    }

    #[test]
    fn search_is_case_insensitive_and_typo_tolerant() {
        let mut index = SearchIndex::new(cohort());

        let results = index.search("ROHIT SHAH");
        assert_eq!(results.first().map(|r| r.id), Some(2));

        let results = index.search("rohti");
        assert_eq!(results.first().map(|r| r.id), Some(2));
    }

    #[test]
    fn recent_history_stays_bounded_and_unique() {
        let store = crowd();
        let mut recent = RecentTargets::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for (step, id) in [3, 5, 3, 8, 9, 10, 11, 12, 3].iter().enumerate() {
            let now = start + chrono::Duration::seconds(step as i64);
            recent.select(*id, store.get(*id).unwrap().name(), now);
            assert!(recent.len() <= RECENT_CAPACITY);
        }

        let entries = recent.entries();
        assert_eq!(entries[0].id, 3);
        assert_eq!(entries[0].selected_at, start + chrono::Duration::seconds(8));
        assert_eq!(entries.iter().filter(|e| e.id == 3).count(), 1);
    }

    #[test]
    fn identity_examples() {
        let national = classify(Some("123456789012"));
        assert_eq!(national.category, IdCategory::NationalId);
        assert_eq!(national.value, "1234 5678 9012");

        let tax = classify(Some("abcde1234f"));
        assert_eq!(tax.category, IdCategory::TaxId);
        assert_eq!(tax.value, "ABCDE1234F");

        assert_eq!(classify(Some("")).category, IdCategory::Unspecified);
        assert_eq!(classify(None).category, IdCategory::Unspecified);
    }

    #[test]
    fn export_writes_the_formatted_dossier() {
        let store = cohort();
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();

        let output = execute_export(&store, 1, dir.path(), now).unwrap();
        let record = store.get(1).unwrap();
        assert_eq!(
            output.path.file_name().and_then(|n| n.to_str()),
            Some(dossier_file_name(record, 1).as_str())
        );

        let written = std::fs::read_to_string(&output.path).unwrap();
        assert_eq!(written, format_dossier(record, 1, now));
        assert_eq!(written, format_dossier(record, 1, now));
        assert!(written.contains("IDS_000001"));
        assert!(written.contains("₹350000"));
    }

    #[tokio::test]
    async fn session_walkthrough() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            reveal_delay_ms: 10,
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut session = Session::new(cohort(), &config, None);

        let mut call = |line: &str| -> Value {
            let response = session.handle_request(parse_request(line).unwrap());
            assert!(response.error.is_none(), "{}: {:?}", line, response.error);
            response.result.unwrap()
        };

        let found = call(r#"{"id":1,"method":"search","params":{"query":"asha"}}"#);
        assert_eq!(found["hits"][0]["name"], "Asha Patel");

        call(r#"{"id":2,"method":"select","params":{"id":0}}"#);
        tokio::time::sleep(Duration::from_millis(80)).await;

        let record = call(r#"{"id":3,"method":"record"}"#);
        assert_eq!(record["identity"]["category"], "national-id");
        assert_eq!(record["associates"].as_array().unwrap().len(), 2);

        let exported = call(r#"{"id":4,"method":"export"}"#);
        assert_eq!(exported["exported"], true);
        assert!(dir.path().join("DOSSIER_Asha_Patel_0.txt").exists());
    }
}

//! Dossier formatting
//!
//! Renders a record into the fixed export document and the on-screen profile
//! card. Output depends only on the arguments, so the same record, id and
//! timestamp always produce identical text.

use crate::identity::classify;
use crate::store::{Record, RecordId};
use chrono::{DateTime, SecondsFormat, Utc};

/// Rendered in place of any missing field
pub const PLACEHOLDER: &str = "N/A";

/// Prefix for monetary amounts
pub const CURRENCY_SYMBOL: &str = "₹";

/// Field value, with empty strings treated as missing
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn field(value: &Option<String>) -> &str {
    present(value).unwrap_or(PLACEHOLDER)
}

fn with_suffix(value: &Option<String>, suffix: &str) -> String {
    match present(value) {
        Some(v) => format!("{}{}", v, suffix),
        None => PLACEHOLDER.to_string(),
    }
}

fn currency(value: &Option<String>) -> String {
    match present(value) {
        Some(v) => format!("{}{}", CURRENCY_SYMBOL, v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Reference code of a record, `IDS_` + id padded to six digits
pub fn reference_code(id: RecordId) -> String {
    format!("IDS_{:06}", id)
}

/// Short display id used in listings, `ID_` + id padded to five digits
pub fn display_id(id: RecordId) -> String {
    format!("ID_{:05}", id)
}

/// File name for an exported dossier.
///
/// Whitespace and path separators in the name become `_`, so the result is
/// always a single path component.
pub fn dossier_file_name(record: &Record, id: RecordId) -> String {
    let name: String = record
        .name()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("DOSSIER_{}_{}.txt", name, id)
}

/// Render the export dossier for a record
pub fn format_dossier(record: &Record, id: RecordId, now: DateTime<Utc>) -> String {
    let identity = classify(record.identity_number.as_deref());
    let title = present(&record.full_name)
        .map(str::to_uppercase)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    format!(
        "
[CLASSIFIED//EYES ONLY]
INTEL-CORE DOSSIER: {title}
--------------------------------------------------
SYSTEM_REF: {reference}
TIMESTAMP: {timestamp}

1. PRIMARY_IDENTITY_PROFILE
- Name: {name}
- Sex: {gender}
- DOB: {dob}
- Caste: {caste}
- ID Ref: {id_value} [{id_label}]

2. COMMUNICATION_CHANNELS
- Primary Mobile: {mobile}
- Official Email: {email}
- Personal Email: {personal_email}

3. ACADEMIC_TRACK_RECORD
- Institution: {college}
- Stream: {branch}
- Assessment History:
  - SSC: {ssc} ({ssc_year})
  - HSC: {hsc} ({hsc_year})
- Current Stream: {current_stream}

4. FAMILY_INTELLIGENCE
- Father: {father} ({father_occupation})
- Mother: {mother} ({mother_occupation})
- Households: {family_members} members
- Schooling: {school_type}

5. FINANCIAL_PROFILE
- Annual Income: {income}
- School FeesPaid: {fees}
- Cert Ref: {certificate}

6. GEOGRAPHIC_LOCATOR
- Physical Address: {address}
- Postal Code: {pin}

[END OF CLASSIFIED RECORD]
",
        reference = reference_code(id),
        timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true),
        name = field(&record.full_name),
        gender = field(&record.gender),
        dob = field(&record.date_of_birth),
        caste = field(&record.caste),
        id_value = identity.value,
        id_label = identity.category.label(),
        mobile = field(&record.mobile),
        email = field(&record.email),
        personal_email = field(&record.personal_email),
        college = field(&record.college),
        branch = field(&record.branch),
        ssc = with_suffix(&record.ssc_percentage, "%"),
        ssc_year = field(&record.ssc_year),
        hsc = with_suffix(&record.hsc_percentage, "%"),
        hsc_year = field(&record.hsc_year),
        current_stream = field(&record.current_stream),
        father = field(&record.father_name),
        father_occupation = field(&record.father_occupation),
        mother = field(&record.mother_name),
        mother_occupation = field(&record.mother_occupation),
        family_members = field(&record.family_members),
        school_type = field(&record.school_type),
        income = currency(&record.annual_income),
        fees = currency(&record.school_fees),
        certificate = field(&record.income_certificate),
        address = field(&record.address),
        pin = field(&record.pin_code),
    )
}

/// Academic score as a percentage.
///
/// Values above 1 are already percentages, values up to 1 are fractions.
/// Missing or non-numeric values count as 0.
pub fn score_percentage(value: Option<&str>) -> f64 {
    match value.and_then(|v| v.trim().parse::<f64>().ok()) {
        Some(n) if n.is_finite() && n > 1.0 => n,
        Some(n) if n.is_finite() => n * 100.0,
        _ => 0.0,
    }
}

/// Render the labelled on-screen summary of a record
pub fn profile_card(record: &Record, id: RecordId) -> String {
    let identity = classify(record.identity_number.as_deref());
    let gender = present(&record.gender)
        .map(str::to_uppercase)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let lines = [
        format!("{}  {}", field(&record.full_name), display_id(id)),
        format!("TARGET IDENTIFIED // {}", gender),
        String::new(),
        "[ACADEMIC_RECORD]".to_string(),
        format!("COLLEGE: {}", field(&record.college)),
        format!("SSC: {:.1}%", score_percentage(record.ssc_percentage.as_deref())),
        format!("HSC: {:.1}%", score_percentage(record.hsc_percentage.as_deref())),
        format!("BRANCH: {}", field(&record.branch)),
        String::new(),
        "[PRIMARY_ID]".to_string(),
        format!("OFFICIAL_EMAIL: {}", field(&record.email)),
        format!("MOBILE: {}", field(&record.mobile)),
        format!("{}: {}", identity.category.label(), identity.value),
        String::new(),
        "[FAMILY_STRUCTURE]".to_string(),
        format!(
            "FATHER: {} ({})",
            field(&record.father_name),
            field(&record.father_occupation)
        ),
        format!(
            "MOTHER: {} ({})",
            field(&record.mother_name),
            field(&record.mother_occupation)
        ),
        format!("HOUSEHOLD_COUNT: {}", field(&record.family_members)),
        String::new(),
        "[ECONOMIC_STATUS]".to_string(),
        format!("ANNUAL_INCOME: {}", currency(&record.annual_income)),
        format!("CERT_REF: {}", field(&record.income_certificate)),
        format!("TUITION_FEES: {}", currency(&record.school_fees)),
        String::new(),
        "[SOCIOLOGICAL_DATA]".to_string(),
        format!("CASTE_CATEGORY: {}", field(&record.caste)),
        format!("SCHOOL_TYPE: {}", field(&record.school_type)),
        format!("EDUCATIONAL_STREAM: {}", field(&record.current_stream)),
        String::new(),
        "[GEO_LOCATION]".to_string(),
        format!("PHYSICAL_ADDRESS: {}", field(&record.address)),
        format!("ZIP_REF: {}", present(&record.pin_code).unwrap_or("000000")),
    ];

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Record {
        Record {
            full_name: Some("Asha Patel".into()),
            gender: Some("Female".into()),
            identity_number: Some("1234 5678 9012".into()),
            college: Some("Modern College".into()),
            ssc_percentage: Some("91.2".into()),
            ssc_year: Some("2019".into()),
            annual_income: Some("250000".into()),
            ..Record::default()
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_deterministic() {
        let record = sample();
        assert_eq!(format_dossier(&record, 7, at()), format_dossier(&record, 7, at()));
    }

    #[test]
    fn test_header_fields() {
        let doc = format_dossier(&sample(), 7, at());
        assert!(doc.contains("INTEL-CORE DOSSIER: ASHA PATEL\n"));
        assert!(doc.contains("SYSTEM_REF: IDS_000007\n"));
        assert!(doc.contains("TIMESTAMP: 2024-03-05T14:30:00.000Z\n"));
        assert!(doc.starts_with("\n[CLASSIFIED//EYES ONLY]\n"));
        assert!(doc.ends_with("[END OF CLASSIFIED RECORD]\n"));
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let doc = format_dossier(&Record::default(), 0, at());
        assert!(doc.contains("INTEL-CORE DOSSIER: N/A\n"));
        assert!(doc.contains("- Father: N/A (N/A)\n"));
        assert!(doc.contains("- SSC: N/A (N/A)\n"));
        assert!(doc.contains("- Annual Income: N/A\n"));
        assert!(doc.contains("- ID Ref: N/A [ID_UNSPECIFIED]\n"));
        assert!(!doc.contains("undefined"));
    }

    #[test]
    fn test_currency_percent_and_identity() {
        let doc = format_dossier(&sample(), 7, at());
        assert!(doc.contains("- Annual Income: ₹250000\n"));
        assert!(doc.contains("- SSC: 91.2% (2019)\n"));
        assert!(doc.contains("- ID Ref: 1234 5678 9012 [AADHAR_IDENTIFIED]\n"));
    }

    #[test]
    fn test_file_name() {
        let record = Record::named("Asha  Kumari Patel", "X");
        assert_eq!(
            dossier_file_name(&record, 12),
            "DOSSIER_Asha__Kumari_Patel_12.txt"
        );
    }

    #[test]
    fn test_file_name_has_no_separators() {
        let record = Record::named("Asha Patel S/O Ramesh\\Kumar", "X");
        assert_eq!(
            dossier_file_name(&record, 4),
            "DOSSIER_Asha_Patel_S_O_Ramesh_Kumar_4.txt"
        );
    }

    #[test]
    fn test_empty_values_use_placeholder() {
        let record = Record {
            full_name: Some("Asha Patel".into()),
            college: Some(String::new()),
            annual_income: Some(String::new()),
            ssc_percentage: Some(String::new()),
            ..Record::default()
        };
        let doc = format_dossier(&record, 1, at());
        assert!(doc.contains("- Institution: N/A\n"));
        assert!(doc.contains("- Annual Income: N/A\n"));
        assert!(doc.contains("- SSC: N/A (N/A)\n"));
        assert!(profile_card(&record, 1).contains("COLLEGE: N/A"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(reference_code(42), "IDS_000042");
        assert_eq!(display_id(42), "ID_00042");
    }

    #[test]
    fn test_score_percentage() {
        assert_eq!(score_percentage(Some("85")), 85.0);
        assert_eq!(score_percentage(Some("0.85")), 85.0);
        assert_eq!(score_percentage(Some("abc")), 0.0);
        assert_eq!(score_percentage(None), 0.0);
    }

    #[test]
    fn test_profile_card() {
        let card = profile_card(&sample(), 7);
        assert!(card.starts_with("Asha Patel  ID_00007\nTARGET IDENTIFIED // FEMALE"));
        assert!(card.contains("SSC: 91.2%"));
        assert!(card.contains("HSC: 0.0%"));
        assert!(card.contains("AADHAR_IDENTIFIED: 1234 5678 9012"));
        assert!(card.contains("ZIP_REF: 000000"));
    }
}

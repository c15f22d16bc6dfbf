//! Attendance totals over a set of records.

use serde::Serialize;
use std::fmt;

use crate::models::{AttendanceRecord, ClassName};
use crate::roster::RosterStore;

/// Totals over a set of records. `grand_total` is present plus visitors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub present_total: u32,
    pub absent_total: u32,
    pub visitor_total: u32,
    pub grand_total: u32,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        *self == Summary::default()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Presentes: {}  Ausentes: {}  Visitantes: {}  Total: {}",
            self.present_total, self.absent_total, self.visitor_total, self.grand_total
        )
    }
}

/// Totals for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub class_name: ClassName,
    #[serde(flatten)]
    pub summary: Summary,
}

pub fn summarize(records: &[AttendanceRecord]) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        let visitors = u32::try_from(record.visitors().len()).unwrap_or(u32::MAX);
        summary.present_total = summary.present_total.saturating_add(record.present_count);
        summary.absent_total = summary.absent_total.saturating_add(record.absent());
        summary.visitor_total = summary.visitor_total.saturating_add(visitors);
    }
    summary.grand_total = summary.present_total.saturating_add(summary.visitor_total);
    summary
}

/// One summary per class that has students, in declaration order.
pub fn summarize_by_class(records: &[AttendanceRecord], roster: &RosterStore) -> Vec<ClassSummary> {
    roster
        .classes_with_students()
        .into_iter()
        .map(|class_name| {
            let matching: Vec<AttendanceRecord> = records
                .iter()
                .filter(|r| r.class_name == class_name.as_str())
                .cloned()
                .collect();
            ClassSummary {
                class_name,
                summary: summarize(&matching),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, NewRecord, Student};
    use crate::remote::RecordPayload;

    fn record(class: &str, present: u32, total: u32, visitors: &str) -> AttendanceRecord {
        NewRecord::new(class, "Prof", "01/02/2026")
            .with_present(present)
            .with_total(total)
            .with_visitors(visitors)
            .into_record(EntityId::Number(1))
    }

    #[test]
    fn test_empty_set_is_zero() {
        let summary = summarize(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_single_class_scenario() {
        let summary = summarize(&[record("Jovens", 1, 2, "-")]);
        assert_eq!(
            summary,
            Summary {
                present_total: 1,
                absent_total: 1,
                visitor_total: 0,
                grand_total: 1
            }
        );
    }

    #[test]
    fn test_two_sessions_with_one_visitor() {
        let summary = summarize(&[
            record("Adultos", 40, 40, "Pedro"),
            record("Adultos", 38, 40, "-"),
        ]);
        assert_eq!(
            summary,
            Summary {
                present_total: 78,
                absent_total: 2,
                visitor_total: 1,
                grand_total: 79
            }
        );
    }

    #[test]
    fn test_totals_saturate() {
        let summary = summarize(&[
            record("Adultos", 3_000_000_000, 3_000_000_000, "Pedro"),
            record("Adultos", 3_000_000_000, 4_000_000_000, "-"),
        ]);
        assert_eq!(summary.present_total, u32::MAX);
        assert_eq!(summary.absent_total, 1_000_000_000);
        assert_eq!(summary.visitor_total, 1);
        assert_eq!(summary.grand_total, u32::MAX);
    }

    #[test]
    fn test_count_and_name_presence_agree() {
        let by_count: RecordPayload = serde_json::from_str(
            r#"{"id": 1, "turmaName": "Jovens", "dataRegistro": "2026-02-01", "presentes": 2, "total": 4}"#,
        )
        .unwrap();
        let by_names: RecordPayload = serde_json::from_str(
            r#"{"id": 2, "turmaName": "Jovens", "dataRegistro": "2026-02-01", "presentes": "Ana, Bruno", "total": 4}"#,
        )
        .unwrap();

        let a = summarize(&[AttendanceRecord::from_payload(by_count).unwrap()]);
        let b = summarize(&[AttendanceRecord::from_payload(by_names).unwrap()]);
        assert_eq!(a, b);
        assert_eq!(a.absent_total, 2);
    }

    #[test]
    fn test_explicit_absent_wins() {
        let payload: RecordPayload = serde_json::from_str(
            r#"{"id": 1, "turmaName": "Jovens", "dataRegistro": "2026-02-01",
                "presentes": ["Ana"], "ausentes": ["Bruno"], "total": 5}"#,
        )
        .unwrap();
        let summary = summarize(&[AttendanceRecord::from_payload(payload).unwrap()]);
        assert_eq!(summary.absent_total, 1);
    }

    #[test]
    fn test_blank_visitors_never_count() {
        let mut blank = record("Jovens", 1, 1, "");
        blank.visitor_names = "   ".to_string();
        let summary = summarize(&[blank, record("Jovens", 1, 1, " - ")]);
        assert_eq!(summary.visitor_total, 0);
        assert_eq!(summary.grand_total, 2);
    }

    #[test]
    fn test_summarize_by_class() {
        let mut roster = RosterStore::new();
        roster.set_roster("Adultos", vec![Student::new("a1", "Ana")]);
        roster.set_roster("Jovens", vec![Student::new("j1", "Bia")]);
        roster.set_roster("Maternal", vec![]);

        let records = vec![
            record("Adultos", 40, 40, "Pedro"),
            record("Jovens", 1, 2, "-"),
            record("Adultos", 38, 40, "-"),
            record("Seniores", 9, 9, "-"),
        ];
        let summaries = summarize_by_class(&records, &roster);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].class_name, ClassName::Jovens);
        assert_eq!(summaries[0].summary.grand_total, 1);
        assert_eq!(summaries[1].class_name, ClassName::Adultos);
        assert_eq!(summaries[1].summary.present_total, 78);
    }

    #[test]
    fn test_class_without_records_has_zero_summary() {
        let mut roster = RosterStore::new();
        roster.set_roster("Juniores", vec![Student::new("x", "Rui")]);
        let summaries = summarize_by_class(&[], &roster);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].summary.is_empty());
    }
}

//! The attendance ledger: every known record, in insertion order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::collation;
use crate::date;
use crate::models::{AttendanceRecord, EntityId};

/// Selects records for listing and reports. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Session date in display form (`DD/MM/YYYY`).
    pub date: Option<String>,
    /// Exact class name.
    pub class_name: Option<String>,
    /// Accent- and case-insensitive text matched against class, teacher,
    /// display date and year.
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(display) = &self.date {
            if record.session_date != date::to_internal(display.trim()) {
                return false;
            }
        }

        if let Some(class) = &self.class_name {
            if record.class_name != class.trim() {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = collation::fold(search.trim());
            if !needle.is_empty() && !search_haystack(record).contains(&needle) {
                return false;
            }
        }

        true
    }
}

fn search_haystack(record: &AttendanceRecord) -> String {
    let year = record.session_date.get(0..4).unwrap_or("");
    collation::fold(&format!(
        "{} {} {} {}",
        record.class_name,
        record.teacher_name,
        record.display_date(),
        year
    ))
}

/// Ordered collection of attendance records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<AttendanceRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Records matching `filter`, in insertion order.
    pub fn list(&self, filter: &RecordFilter) -> Vec<AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &EntityId) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Inserts a record at the front.
    pub fn prepend(&mut self, record: AttendanceRecord) {
        self.records.insert(0, record);
    }

    /// Replaces the record with the same id. Returns false on a miss.
    pub fn replace(&mut self, record: AttendanceRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Removes every record whose id equals `id`. Returns how many went.
    pub fn remove(&mut self, id: &EntityId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        before - self.records.len()
    }

    /// Teacher of the first record of `class`, if any.
    pub fn teacher_for(&self, class: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.class_name == class)
            .map(|r| r.teacher_name.as_str())
    }
}

/// Sorts most recent first. Stable; unparseable dates go last.
pub fn sort_by_date_desc(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| {
        match (
            date::parse_internal(&a.session_date),
            date::parse_internal(&b.session_date),
        ) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

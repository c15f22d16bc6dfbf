//! Per-class student rosters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::collation;
use crate::models::{ClassName, EntityId, Student};

/// Students of every class, each roster kept in Portuguese collation order,
/// plus the remote id of each class.
///
/// Keys are class names as the remote spells them. Classes outside
/// [`ClassName::ALL`] may be stored but are never listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStore {
    #[serde(default)]
    class_ids: BTreeMap<String, EntityId>,
    #[serde(default)]
    students: BTreeMap<String, Vec<Student>>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Student names of `class` in display order. Empty for an unknown class.
    pub fn list(&self, class: &str) -> Vec<String> {
        self.students(class).iter().map(|s| s.name.clone()).collect()
    }

    pub fn students(&self, class: &str) -> &[Student] {
        self.students.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `class` has a roster entry, even an empty one.
    pub fn has_class(&self, class: &str) -> bool {
        self.students.contains_key(class)
    }

    /// Appends a student and re-sorts the roster.
    pub fn insert(&mut self, class: &str, student: Student) {
        let roster = self.students.entry(class.to_string()).or_default();
        roster.push(student);
        sort_roster(roster);
    }

    /// Renames the student with `id` and re-sorts. Returns false on a miss.
    pub fn rename(&mut self, class: &str, id: &EntityId, new_name: &str) -> bool {
        let Some(roster) = self.students.get_mut(class) else {
            return false;
        };
        let Some(student) = roster.iter_mut().find(|s| &s.id == id) else {
            return false;
        };
        student.name = new_name.to_string();
        sort_roster(roster);
        true
    }

    /// Removes the student with `id`. The remaining order is kept as is.
    pub fn remove(&mut self, class: &str, id: &EntityId) -> Option<Student> {
        let roster = self.students.get_mut(class)?;
        let index = roster.iter().position(|s| &s.id == id)?;
        Some(roster.remove(index))
    }

    pub fn student_at(&self, class: &str, index: usize) -> Option<&Student> {
        self.students(class).get(index)
    }

    pub fn position(&self, class: &str, id: &EntityId) -> Option<usize> {
        self.students(class).iter().position(|s| &s.id == id)
    }

    pub fn class_id(&self, class: &str) -> Option<&EntityId> {
        self.class_ids.get(class)
    }

    /// Class names with their remote ids, by name.
    pub fn class_ids(&self) -> impl Iterator<Item = (&str, &EntityId)> {
        self.class_ids.iter().map(|(name, id)| (name.as_str(), id))
    }

    pub fn set_class_id(&mut self, class: &str, id: EntityId) {
        self.class_ids.insert(class.to_string(), id);
    }

    /// Replaces the roster of `class`, sorting it.
    pub fn set_roster(&mut self, class: &str, mut students: Vec<Student>) {
        sort_roster(&mut students);
        self.students.insert(class.to_string(), students);
    }

    /// Permitted classes that have a roster entry, in declaration order.
    pub fn permitted_classes(&self) -> Vec<ClassName> {
        ClassName::ALL
            .into_iter()
            .filter(|c| self.has_class(c.as_str()))
            .collect()
    }

    /// Permitted classes with at least one student, in declaration order.
    pub fn classes_with_students(&self) -> Vec<ClassName> {
        ClassName::ALL
            .into_iter()
            .filter(|c| !self.students(c.as_str()).is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.class_ids.is_empty()
    }
}

fn sort_roster(roster: &mut [Student]) {
    roster.sort_by(|a, b| collation::compare(&a.name, &b.name));
}

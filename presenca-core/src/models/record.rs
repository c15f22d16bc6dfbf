use serde::{Deserialize, Serialize};
use std::fmt;

use super::class_name::ClassName;
use super::id::EntityId;
use super::presence::{normalize_visitors, visitor_names, PresenceField, NO_VISITORS};
use crate::date;
use crate::error::Error;
use crate::remote::{RecordPayload, RemoteError};

/// A stored attendance session for one class.
///
/// `session_date` is always in internal `YYYY-MM-DD` form. `total_count` is
/// the roster size when the session was recorded and is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: EntityId,
    pub class_name: String,
    pub teacher_name: String,
    pub session_date: String,
    pub present_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_names: Option<Vec<String>>,
    /// Only set when the source carried an explicit absent field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absent_count: Option<u32>,
    pub total_count: u32,
    pub visitor_names: String,
}

impl AttendanceRecord {
    /// Normalises a wire record into the canonical shape.
    ///
    /// Presence may be a count, a list of names or a comma-separated string;
    /// all three collapse to `present_count`. Display-format dates from older
    /// clients are converted to internal form.
    pub fn from_payload(payload: RecordPayload) -> Result<Self, RemoteError> {
        let id = payload.id.ok_or_else(|| {
            RemoteError::Decode(format!(
                "record for '{}' on '{}' has no id",
                payload.turma_name, payload.data_registro
            ))
        })?;

        Ok(Self {
            id,
            class_name: payload.turma_name,
            teacher_name: payload.professor_nome,
            session_date: date::to_internal(&payload.data_registro),
            present_count: payload.presentes.count(),
            present_names: payload.presentes.names(),
            absent_count: payload.ausentes.as_ref().map(PresenceField::count),
            total_count: payload.total,
            visitor_names: payload
                .visitantes
                .as_deref()
                .map(normalize_visitors)
                .unwrap_or_else(|| NO_VISITORS.to_string()),
        })
    }

    /// Builds the wire form of this record.
    pub fn to_payload(&self, class_id: Option<EntityId>) -> RecordPayload {
        RecordPayload {
            id: Some(self.id.clone()),
            turma_id: class_id,
            turma_name: self.class_name.clone(),
            professor_nome: self.teacher_name.clone(),
            data_registro: self.session_date.clone(),
            presentes: PresenceField::Count(self.present_count),
            ausentes: self.absent_count.map(PresenceField::Count),
            total: self.total_count,
            visitantes: Some(self.visitor_names.clone()),
        }
    }

    /// Session date in `DD/MM/YYYY` form.
    pub fn display_date(&self) -> String {
        date::to_display(&self.session_date)
    }

    /// Visitor names, empty when the field is blank or `"-"`.
    pub fn visitors(&self) -> Vec<String> {
        visitor_names(&self.visitor_names)
    }

    /// Absent count: the explicit value if present, else `total - present`
    /// saturating at zero.
    pub fn absent(&self) -> u32 {
        self.absent_count
            .unwrap_or_else(|| self.total_count.saturating_sub(self.present_count))
    }
}

impl fmt::Display for AttendanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.class_name, self.display_date())?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Prof. {}", self.teacher_name)?;
        writeln!(f, "Presentes: {}/{}", self.present_count, self.total_count)?;
        if let Some(names) = &self.present_names {
            if !names.is_empty() {
                writeln!(f, "  {}", names.join(", "))?;
            }
        }

        let visitors = self.visitors();
        if visitors.is_empty() {
            write!(f, "Sem visitantes")
        } else {
            write!(f, "Visitantes: {}", visitors.join(", "))
        }
    }
}

/// Attendance data entered by a user, before the remote assigns an id.
///
/// The date is in display form (`DD/MM/YYYY`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub class_name: String,
    pub teacher_name: String,
    pub session_date: String,
    pub present_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_names: Option<Vec<String>>,
    pub total_count: u32,
    pub visitor_names: String,
}

impl NewRecord {
    pub fn new(
        class_name: impl Into<String>,
        teacher_name: impl Into<String>,
        session_date: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            teacher_name: teacher_name.into(),
            session_date: session_date.into(),
            present_count: 0,
            present_names: None,
            total_count: 0,
            visitor_names: NO_VISITORS.to_string(),
        }
    }

    /// Builds a record from a roll call: the roster names that appear in
    /// `present` are counted, and the total is the roster size.
    pub fn from_roll_call(
        class_name: impl Into<String>,
        teacher_name: impl Into<String>,
        session_date: impl Into<String>,
        roster: &[String],
        present: &[String],
    ) -> Self {
        let names: Vec<String> = roster
            .iter()
            .filter(|name| present.contains(name))
            .cloned()
            .collect();

        Self::new(class_name, teacher_name, session_date)
            .with_present(names.len() as u32)
            .with_present_names(names)
            .with_total(roster.len() as u32)
    }

    pub fn with_present(mut self, count: u32) -> Self {
        self.present_count = count;
        self
    }

    pub fn with_present_names(mut self, names: Vec<String>) -> Self {
        self.present_names = Some(names);
        self
    }

    pub fn with_total(mut self, total: u32) -> Self {
        self.total_count = total;
        self
    }

    /// Sets visitors; blank input is stored as `"-"`.
    pub fn with_visitors(mut self, visitors: &str) -> Self {
        self.visitor_names = normalize_visitors(visitors);
        self
    }

    /// Checks required fields. Runs before any remote call.
    pub fn validate(&self) -> Result<(), Error> {
        if self.class_name.trim().is_empty() {
            return Err(Error::Validation("class is required".to_string()));
        }
        let class_name = self.class_name.trim();
        if !ClassName::ALL.iter().any(|c| c.as_str() == class_name) {
            return Err(Error::Validation(format!("unknown class '{}'", class_name)));
        }
        if self.teacher_name.trim().is_empty() {
            return Err(Error::Validation("teacher name is required".to_string()));
        }
        if date::parse_display(&self.session_date).is_none() {
            return Err(Error::Validation(format!(
                "invalid date '{}', expected DD/MM/YYYY",
                self.session_date
            )));
        }
        Ok(())
    }

    /// Turns this entry into a stored record under the given id.
    pub fn into_record(self, id: EntityId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            session_date: date::to_internal(&self.session_date),
            class_name: self.class_name,
            teacher_name: self.teacher_name,
            present_count: self.present_count,
            present_names: self.present_names,
            absent_count: None,
            total_count: self.total_count,
            visitor_names: normalize_visitors(&self.visitor_names),
        }
    }

    /// Builds the wire form, with the date converted to internal form.
    pub fn to_payload(&self, id: Option<EntityId>, class_id: Option<EntityId>) -> RecordPayload {
        RecordPayload {
            id,
            turma_id: class_id,
            turma_name: self.class_name.clone(),
            professor_nome: self.teacher_name.clone(),
            data_registro: date::to_internal(&self.session_date),
            presentes: PresenceField::Count(self.present_count),
            ausentes: None,
            total: self.total_count,
            visitantes: Some(normalize_visitors(&self.visitor_names)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> RecordPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_from_payload_with_count() {
        let record = AttendanceRecord::from_payload(payload(
            r#"{"id": "2", "turmaId": 2, "turmaName": "Maternal", "professorNome": "Carla Souza",
                "dataRegistro": "2026-02-01", "presentes": 3, "total": 3, "visitantes": "-"}"#,
        ))
        .unwrap();

        assert_eq!(record.id, EntityId::Number(2));
        assert_eq!(record.class_name, "Maternal");
        assert_eq!(record.session_date, "2026-02-01");
        assert_eq!(record.present_count, 3);
        assert!(record.present_names.is_none());
        assert_eq!(record.absent(), 0);
        assert!(record.visitors().is_empty());
    }

    #[test]
    fn test_from_payload_with_legacy_fields() {
        let record = AttendanceRecord::from_payload(payload(
            r#"{"id": "registro_7", "turma": "Jovens", "professor": "Marcos",
                "data": "15/10/2023", "presentes": "Ana, Bruno", "ausentes": ["Carla"],
                "total": 3}"#,
        ))
        .unwrap();

        assert_eq!(record.teacher_name, "Marcos");
        assert_eq!(record.session_date, "2023-10-15");
        assert_eq!(record.present_count, 2);
        assert_eq!(
            record.present_names,
            Some(vec!["Ana".to_string(), "Bruno".to_string()])
        );
        assert_eq!(record.absent_count, Some(1));
        assert_eq!(record.visitor_names, "-");
    }

    #[test]
    fn test_from_payload_without_id_is_decode_error() {
        let err = AttendanceRecord::from_payload(payload(
            r#"{"turmaName": "Jovens", "dataRegistro": "2026-02-01"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[test]
    fn test_absent_saturates() {
        let record = NewRecord::new("Jovens", "Marcos", "01/02/2026")
            .with_present(5)
            .with_total(3)
            .into_record(EntityId::Number(1));
        assert_eq!(record.absent(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(NewRecord::new("Jovens", "Marcos", "01/02/2026")
            .validate()
            .is_ok());
        for bad in [
            NewRecord::new("", "Marcos", "01/02/2026"),
            NewRecord::new("Seniores", "Marcos", "01/02/2026"),
            NewRecord::new("Jovens", "  ", "01/02/2026"),
            NewRecord::new("Jovens", "Marcos", "2026-02-01"),
            NewRecord::new("Jovens", "Marcos", "30/02/2026"),
        ] {
            assert!(matches!(bad.validate(), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_validate_accepts_every_listed_class() {
        for class in ClassName::ALL {
            assert!(NewRecord::new(class.as_str(), "Marcos", "01/02/2026")
                .validate()
                .is_ok());
        }
        assert!(matches!(
            NewRecord::new("Classe Antiga", "Marcos", "01/02/2026").validate(),
            Err(Error::Validation(msg)) if msg.contains("Classe Antiga")
        ));
    }

    #[test]
    fn test_into_record_converts_date() {
        let record = NewRecord::new("Adultos", "Pedro", "08/02/2026")
            .with_present(38)
            .with_total(40)
            .with_visitors("  ")
            .into_record(EntityId::Text("registro_3".into()));

        assert_eq!(record.session_date, "2026-02-08");
        assert_eq!(record.display_date(), "08/02/2026");
        assert_eq!(record.visitor_names, "-");
        assert_eq!(record.absent(), 2);
    }

    #[test]
    fn test_from_roll_call() {
        let roster: Vec<String> = ["Ana", "Bruno", "Carla"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let present = vec!["Carla".to_string(), "Ana".to_string(), "Zé".to_string()];

        let entry = NewRecord::from_roll_call("Jovens", "Marcos", "01/02/2026", &roster, &present);

        assert_eq!(entry.present_count, 2);
        assert_eq!(
            entry.present_names,
            Some(vec!["Ana".to_string(), "Carla".to_string()])
        );
        assert_eq!(entry.total_count, 3);
    }

    #[test]
    fn test_payload_json_keys() {
        let entry = NewRecord::new("Jovens", "Marcos", "01/02/2026")
            .with_present(1)
            .with_total(2);
        let value = serde_json::to_value(entry.to_payload(None, Some(EntityId::Number(6)))).unwrap();

        assert_eq!(value["dataRegistro"], "2026-02-01");
        assert_eq!(value["turmaName"], "Jovens");
        assert_eq!(value["turmaId"], 6);
        assert_eq!(value["presentes"], 1);
        assert_eq!(value["visitantes"], "-");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_display() {
        let record = NewRecord::new("Berçário", "Ana Paula", "01/02/2026")
            .with_present(1)
            .with_total(5)
            .with_visitors("Laura Mendes")
            .into_record(EntityId::Number(1));
        let text = record.to_string();

        assert!(text.starts_with("Berçário - 01/02/2026"));
        assert!(text.contains("Presentes: 1/5"));
        assert!(text.contains("Visitantes: Laura Mendes"));
    }
}

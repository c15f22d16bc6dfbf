//! Orchestration between the remote, the local caches and the snapshots.
//!
//! Every mutation goes to the remote first; the roster or ledger is touched
//! only after the remote call succeeds, so a failed call leaves local state
//! exactly as it was. Snapshots are written in the background after each
//! successful mutation or load and awaited by [`SyncGateway::dispose`].

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::ledger::{self, Ledger, RecordFilter};
use crate::models::{AttendanceRecord, ClassName, EntityId, NewRecord, Student};
use crate::remote::{LoginResponse, Remote, RemoteError, StudentPayload};
use crate::roster::RosterStore;
use crate::storage::{SnapshotKind, SnapshotStorage};
use crate::summary::{self, ClassSummary, Summary};

/// Records requested per page when loading the ledger.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A class whose roster could not be loaded during a reload.
#[derive(Debug)]
pub struct PartialLoadError {
    pub class_name: String,
    pub error: RemoteError,
}

/// Outcome of a reload.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub classes: usize,
    pub students: usize,
    pub records: usize,
    pub failures: Vec<PartialLoadError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// Background writes can finish out of order; the last generation written
// per snapshot keeps a stale write from replacing a newer file.
type WrittenGenerations = Arc<Mutex<HashMap<SnapshotKind, u64>>>;

/// Owner of the roster and ledger caches.
pub struct SyncGateway {
    remote: Arc<dyn Remote>,
    storage: Option<SnapshotStorage>,
    page_size: u32,
    roster: RosterStore,
    ledger: Ledger,
    generation: u64,
    written: WrittenGenerations,
    pending: Vec<JoinHandle<()>>,
}

impl SyncGateway {
    /// Creates a gateway with empty caches and no snapshot storage.
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self {
            remote,
            storage: None,
            page_size: DEFAULT_PAGE_SIZE,
            roster: RosterStore::new(),
            ledger: Ledger::new(),
            generation: 0,
            written: Arc::new(Mutex::new(HashMap::new())),
            pending: Vec::new(),
        }
    }

    pub fn with_storage(mut self, storage: SnapshotStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Loads both snapshots. Missing files leave the caches empty.
    pub fn init(&mut self) -> Result<(), Error> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        if let Some(records) = storage.load::<Vec<AttendanceRecord>>(SnapshotKind::Records)? {
            self.ledger = Ledger::from_records(records);
        }
        if let Some(roster) = storage.load::<RosterStore>(SnapshotKind::Rosters)? {
            self.roster = roster;
        }

        debug!(
            records = self.ledger.len(),
            classes = self.roster.permitted_classes().len(),
            "loaded snapshots"
        );
        Ok(())
    }

    /// Refreshes classes, rosters and records from the remote.
    ///
    /// Fails without touching the caches if the class list or the records
    /// cannot be fetched. A class whose roster fails to load keeps its
    /// previous roster and is reported in [`LoadReport::failures`].
    pub async fn load_all(&mut self) -> Result<LoadReport, Error> {
        let (roster, failures) = self.fetch_rosters().await?;
        let ledger = self.fetch_ledger().await?;

        self.roster = roster;
        self.ledger = ledger;
        self.persist(SnapshotKind::Rosters);
        self.persist(SnapshotKind::Records);

        let report = self.report(failures);
        info!(
            classes = report.classes,
            students = report.students,
            records = report.records,
            failures = report.failures.len(),
            "reloaded from remote"
        );
        Ok(report)
    }

    /// Refreshes only the ledger. Returns the number of records loaded.
    pub async fn reload_records(&mut self) -> Result<usize, Error> {
        self.ledger = self.fetch_ledger().await?;
        self.persist(SnapshotKind::Records);
        Ok(self.ledger.len())
    }

    /// Refreshes only the rosters and class ids.
    pub async fn reload_rosters(&mut self) -> Result<LoadReport, Error> {
        let (roster, failures) = self.fetch_rosters().await?;
        self.roster = roster;
        self.persist(SnapshotKind::Rosters);
        Ok(self.report(failures))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation("email and password are required".to_string()));
        }
        self.remote
            .login(email.trim(), password)
            .await
            .map_err(from_remote)
    }

    /// Enrols a student in `class` and returns it with its new id.
    pub async fn add_student(&mut self, class: &str, name: &str) -> Result<Student, Error> {
        let name = validate_name(name)?;
        let class_id = self.resolve_class(class)?;

        let created = self
            .remote
            .create_student(&class_id, &StudentPayload::active(name))
            .await
            .map_err(from_remote)?;

        let student = Student::new(created.id, name);
        self.roster.insert(class, student.clone());
        self.persist(SnapshotKind::Rosters);
        Ok(student)
    }

    /// Renames the student currently shown at `index`.
    pub async fn update_student(
        &mut self,
        class: &str,
        index: usize,
        new_name: &str,
    ) -> Result<Student, Error> {
        let id = self.resolve_index(class, index)?;
        self.update_student_by_id(class, &id, new_name).await
    }

    pub async fn update_student_by_id(
        &mut self,
        class: &str,
        id: &EntityId,
        new_name: &str,
    ) -> Result<Student, Error> {
        let name = validate_name(new_name)?;
        let class_id = self.resolve_class(class)?;
        if self.roster.position(class, id).is_none() {
            return Err(Error::NotFound(format!("student {} in {}", id, class)));
        }

        self.remote
            .update_student(&class_id, id, &StudentPayload::active(name))
            .await
            .map_err(from_remote)?;

        self.roster.rename(class, id, name);
        self.persist(SnapshotKind::Rosters);
        Ok(Student::new(id.clone(), name))
    }

    /// Removes the student currently shown at `index`.
    pub async fn remove_student(&mut self, class: &str, index: usize) -> Result<Student, Error> {
        let id = self.resolve_index(class, index)?;
        self.remove_student_by_id(class, &id).await
    }

    pub async fn remove_student_by_id(
        &mut self,
        class: &str,
        id: &EntityId,
    ) -> Result<Student, Error> {
        let class_id = self.resolve_class(class)?;
        if self.roster.position(class, id).is_none() {
            return Err(Error::NotFound(format!("student {} in {}", id, class)));
        }

        self.remote
            .delete_student(&class_id, id)
            .await
            .map_err(from_remote)?;

        let removed = self
            .roster
            .remove(class, id)
            .ok_or_else(|| Error::NotFound(format!("student {} in {}", id, class)))?;
        self.persist(SnapshotKind::Rosters);
        Ok(removed)
    }

    /// Validates and sends a new record, then prepends it locally.
    pub async fn create_record(&mut self, entry: NewRecord) -> Result<AttendanceRecord, Error> {
        entry.validate()?;
        let class_id = self.roster.class_id(&entry.class_name).cloned();

        let created = self
            .remote
            .create_attendance(&entry.to_payload(None, class_id))
            .await
            .map_err(from_remote)?;
        let id = created.id.ok_or_else(|| {
            Error::Transport(RemoteError::Decode(
                "created record has no id".to_string(),
            ))
        })?;

        let record = entry.into_record(id);
        self.ledger.prepend(record.clone());
        self.persist(SnapshotKind::Records);
        Ok(record)
    }

    /// Sends an edit keyed by `id`, then replaces the local copy if present.
    pub async fn update_record(
        &mut self,
        id: &EntityId,
        entry: NewRecord,
    ) -> Result<AttendanceRecord, Error> {
        entry.validate()?;
        let class_id = self.roster.class_id(&entry.class_name).cloned();

        self.remote
            .update_attendance(id, &entry.to_payload(Some(id.clone()), class_id))
            .await
            .map_err(from_remote)?;

        let record = entry.into_record(id.clone());
        if self.ledger.replace(record.clone()) {
            self.persist(SnapshotKind::Records);
        } else {
            debug!(%id, "updated record is not cached locally");
        }
        Ok(record)
    }

    /// Deletes remotely, then drops every local record with that id.
    pub async fn delete_record(&mut self, id: &EntityId) -> Result<usize, Error> {
        self.remote
            .delete_attendance(id)
            .await
            .map_err(from_remote)?;

        let removed = self.ledger.remove(id);
        self.persist(SnapshotKind::Records);
        Ok(removed)
    }

    pub fn list_roster(&self, class: &str) -> Vec<String> {
        self.roster.list(class)
    }

    pub fn students(&self, class: &str) -> &[Student] {
        self.roster.students(class)
    }

    /// Permitted classes that have a roster, in declaration order.
    pub fn classes(&self) -> Vec<ClassName> {
        self.roster.permitted_classes()
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn list_records(&self, filter: &RecordFilter) -> Vec<AttendanceRecord> {
        self.ledger.list(filter)
    }

    /// Matching records, most recent first.
    pub fn records_for_display(&self, filter: &RecordFilter) -> Vec<AttendanceRecord> {
        let mut records = self.ledger.list(filter);
        ledger::sort_by_date_desc(&mut records);
        records
    }

    pub fn record(&self, id: &EntityId) -> Option<&AttendanceRecord> {
        self.ledger.get(id)
    }

    pub fn summary(&self, filter: &RecordFilter) -> Summary {
        summary::summarize(&self.ledger.list(filter))
    }

    pub fn class_summaries(&self, filter: &RecordFilter) -> Vec<ClassSummary> {
        summary::summarize_by_class(&self.ledger.list(filter), &self.roster)
    }

    /// Teacher of the first record of `class`, if any.
    pub fn teacher_for(&self, class: &str) -> Option<&str> {
        self.ledger.teacher_for(class)
    }

    /// Waits for every pending snapshot write.
    pub async fn dispose(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "snapshot write task failed");
            }
        }
    }

    async fn fetch_rosters(&self) -> Result<(RosterStore, Vec<PartialLoadError>), Error> {
        let classes = self.remote.list_classes().await.map_err(from_remote)?;

        let mut roster = RosterStore::new();
        let mut failures = Vec::new();
        for class in classes {
            roster.set_class_id(&class.name, class.id.clone());

            match self.remote.list_students(&class.id).await {
                Ok(students) => {
                    let students = students
                        .into_iter()
                        .filter(|s| s.is_active())
                        .map(|s| Student::new(s.id, s.nome))
                        .collect();
                    roster.set_roster(&class.name, students);
                }
                Err(error) => {
                    warn!(class = %class.name, error = %error, "failed to load students");
                    if self.roster.has_class(&class.name) {
                        roster.set_roster(&class.name, self.roster.students(&class.name).to_vec());
                    }
                    failures.push(PartialLoadError {
                        class_name: class.name,
                        error,
                    });
                }
            }
        }

        Ok((roster, failures))
    }

    async fn fetch_ledger(&self) -> Result<Ledger, Error> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let result = self
                .remote
                .list_attendance(page, self.page_size)
                .await
                .map_err(from_remote)?;

            for payload in result.items {
                match AttendanceRecord::from_payload(payload) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(error = %e, "skipping malformed record"),
                }
            }

            match result.pagination {
                Some(p) if page < p.pages => page += 1,
                _ => break,
            }
        }

        Ok(Ledger::from_records(records))
    }

    fn report(&self, failures: Vec<PartialLoadError>) -> LoadReport {
        let classes = self.roster.permitted_classes();
        LoadReport {
            classes: classes.len(),
            students: classes
                .iter()
                .map(|c| self.roster.students(c.as_str()).len())
                .sum(),
            records: self.ledger.len(),
            failures,
        }
    }

    fn resolve_class(&self, class: &str) -> Result<EntityId, Error> {
        self.roster
            .class_id(class)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("class '{}'", class)))
    }

    fn resolve_index(&self, class: &str, index: usize) -> Result<EntityId, Error> {
        self.roster
            .student_at(class, index)
            .map(|s| s.id.clone())
            .ok_or_else(|| Error::NotFound(format!("no student at position {} in {}", index + 1, class)))
    }

    fn persist(&mut self, kind: SnapshotKind) {
        let Some(storage) = self.storage.clone() else {
            return;
        };
        self.pending.retain(|h| !h.is_finished());
        self.generation += 1;

        let handle = match kind {
            SnapshotKind::Records => {
                spawn_write(storage, kind, self.generation, self.written.clone(), self.ledger.clone())
            }
            SnapshotKind::Rosters => {
                spawn_write(storage, kind, self.generation, self.written.clone(), self.roster.clone())
            }
        };
        self.pending.push(handle);
    }
}

fn spawn_write<T>(
    storage: SnapshotStorage,
    kind: SnapshotKind,
    generation: u64,
    written: WrittenGenerations,
    value: T,
) -> JoinHandle<()>
where
    T: Serialize + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut written = written.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let last = written.entry(kind).or_default();
        if *last > generation {
            return;
        }
        match storage.save(kind, &value) {
            Ok(()) => *last = generation,
            Err(e) => warn!(error = %e, file = kind.filename(), "failed to write snapshot"),
        }
    })
}

fn validate_name(name: &str) -> Result<&str, Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("student name is required".to_string()));
    }
    Ok(trimmed)
}

fn from_remote(error: RemoteError) -> Error {
    match error {
        RemoteError::Unauthorized(message) => Error::Auth(message),
        other => Error::Transport(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{MockRemote, MOCK_EMAIL, MOCK_PASSWORD};
    use tempfile::TempDir;

    async fn loaded() -> (SyncGateway, Arc<MockRemote>) {
        let mock = Arc::new(MockRemote::new());
        let mut gateway = SyncGateway::new(mock.clone());
        gateway.load_all().await.unwrap();
        (gateway, mock)
    }

    #[tokio::test]
    async fn test_load_all() {
        let mock = Arc::new(MockRemote::new());
        let mut gateway = SyncGateway::new(mock);

        let report = gateway.load_all().await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.classes, 7);
        assert_eq!(report.records, 2);
        assert_eq!(gateway.classes(), ClassName::ALL.to_vec());
        assert_eq!(
            gateway.list_roster("Berçário"),
            vec!["Ana Clara", "Helena Baby", "Laura Mendes", "Lucas Baby", "Miguelzinho"]
        );
        assert_eq!(gateway.roster().class_id("Adultos"), Some(&EntityId::Number(7)));
    }

    #[tokio::test]
    async fn test_add_student_keeps_collation_order() {
        let (mut gateway, mock) = loaded().await;

        let zico = gateway.add_student("Adultos", "Zico").await.unwrap();
        gateway.add_student("Adultos", " Útil ").await.unwrap();

        let roster = gateway.list_roster("Adultos");
        assert_eq!(roster.first().map(String::as_str), Some("Aline Dias"));
        assert_eq!(&roster[roster.len() - 2..], ["Útil", "Zico"]);
        assert!(mock.student_names(EntityId::Number(7)).contains(&"Zico".to_string()));
        assert_eq!(gateway.students("Adultos").last().unwrap().id, zico.id);
    }

    #[tokio::test]
    async fn test_add_student_rejects_before_network() {
        let (mut gateway, mock) = loaded().await;
        mock.set_offline(true);

        assert!(matches!(
            gateway.add_student("Adultos", "   ").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            gateway.add_student("Seniores", "Rui").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_add_student_leaves_roster_unchanged() {
        let (mut gateway, mock) = loaded().await;
        let before = gateway.list_roster("Jovens");
        mock.set_offline(true);

        let err = gateway.add_student("Jovens", "Zico").await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(gateway.list_roster("Jovens"), before);
    }

    #[tokio::test]
    async fn test_update_student_by_position() {
        let (mut gateway, mock) = loaded().await;
        assert_eq!(gateway.list_roster("Jovens")[0], "Bianca Lima");

        gateway.update_student("Jovens", 0, "Zélia").await.unwrap();

        assert_eq!(
            gateway.list_roster("Jovens"),
            vec!["Camila Santos", "Felipe Martins", "João Pedro", "Zélia"]
        );
        assert!(mock.student_names(EntityId::Number(6)).contains(&"Zélia".to_string()));
    }

    #[tokio::test]
    async fn test_remove_student_by_position() {
        let (mut gateway, mock) = loaded().await;

        let removed = gateway.remove_student("Maternal", 1).await.unwrap();

        assert_eq!(removed.name, "Joãozinho");
        assert_eq!(gateway.list_roster("Maternal"), vec!["Davi", "Mariana"]);
        assert_eq!(mock.student_names(EntityId::Number(2)), vec!["Davi", "Mariana"]);

        assert!(matches!(
            gateway.remove_student("Maternal", 5).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_record_prepends() {
        let (mut gateway, mock) = loaded().await;
        let entry = NewRecord::new("Jovens", "Marcos", "08/02/2026")
            .with_present(1)
            .with_total(2);

        let record = gateway.create_record(entry).await.unwrap();

        assert_eq!(record.id, EntityId::Text("registro_1".into()));
        assert_eq!(record.session_date, "2026-02-08");
        assert_eq!(gateway.list_records(&RecordFilter::new())[0].id, record.id);
        assert_eq!(gateway.ledger().len(), 3);
        assert_eq!(mock.record_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_create_record_leaves_ledger_unchanged() {
        let (mut gateway, mock) = loaded().await;
        mock.set_offline(true);

        let err = gateway
            .create_record(NewRecord::new("Jovens", "Marcos", "08/02/2026"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(gateway.list_records(&RecordFilter::new()).len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_record_is_rejected_before_network() {
        let (mut gateway, mock) = loaded().await;

        let err = gateway
            .create_record(NewRecord::new("Jovens", "Marcos", "2026-02-08"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(mock.record_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_class_is_rejected_before_network() {
        let (mut gateway, mock) = loaded().await;

        let err = gateway
            .create_record(NewRecord::new("Seniores", "Marcos", "08/02/2026"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(mock.record_count(), 2);
        assert_eq!(gateway.ledger().len(), 2);
    }

    #[tokio::test]
    async fn test_update_record() {
        let (mut gateway, _mock) = loaded().await;
        let id = EntityId::Text("2".into());
        let entry = NewRecord::new("Maternal", "Carla Souza", "01/02/2026")
            .with_present(2)
            .with_total(3)
            .with_visitors("Rita");

        gateway.update_record(&id, entry).await.unwrap();

        let record = gateway.record(&id).unwrap();
        assert_eq!(record.present_count, 2);
        assert_eq!(record.visitors(), vec!["Rita"]);
        assert_eq!(gateway.ledger().len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_record_fails_remotely() {
        let (mut gateway, _mock) = loaded().await;
        let err = gateway
            .update_record(
                &EntityId::Number(404),
                NewRecord::new("Maternal", "Carla Souza", "01/02/2026"),
            )
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_delete_record_matches_numeric_id() {
        let (mut gateway, mock) = loaded().await;

        let removed = gateway.delete_record(&EntityId::Number(1)).await.unwrap();

        assert_eq!(removed, 1);
        assert!(gateway.record(&EntityId::Text("1".into())).is_none());
        assert_eq!(mock.record_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_roster_failure_keeps_previous_roster() {
        let (mut gateway, mock) = loaded().await;
        let before = gateway.list_roster("Principiantes");
        mock.fail_students_for(EntityId::Number(3));
        mock.create_student(&EntityId::Number(4), &StudentPayload::active("Zé"))
            .await
            .unwrap();

        let report = gateway.load_all().await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].class_name, "Principiantes");
        assert_eq!(gateway.list_roster("Principiantes"), before);
        assert!(gateway.list_roster("Juniores").contains(&"Zé".to_string()));
    }

    #[tokio::test]
    async fn test_partial_roster_failure_on_first_load() {
        let mock = Arc::new(MockRemote::new());
        mock.fail_students_for(EntityId::Number(3));
        let mut gateway = SyncGateway::new(mock);

        let report = gateway.load_all().await.unwrap();

        assert!(!report.is_complete());
        assert!(gateway.list_roster("Principiantes").is_empty());
        assert!(!gateway.classes().contains(&ClassName::Principiantes));
        assert_eq!(gateway.classes().len(), 6);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_caches_untouched() {
        let (mut gateway, mock) = loaded().await;
        mock.set_offline(true);

        assert!(gateway.load_all().await.unwrap_err().is_transport());
        assert_eq!(gateway.ledger().len(), 2);
        assert_eq!(gateway.classes().len(), 7);
    }

    #[tokio::test]
    async fn test_reload_records() {
        let (mut gateway, mock) = loaded().await;
        mock.delete_attendance(&EntityId::Number(2)).await.unwrap();

        assert_eq!(gateway.reload_records().await.unwrap(), 1);
        assert_eq!(gateway.classes().len(), 7);
    }

    #[tokio::test]
    async fn test_small_pages_are_all_fetched() {
        let mock = Arc::new(MockRemote::new());
        let mut gateway = SyncGateway::new(mock).with_page_size(1);

        let report = gateway.load_all().await.unwrap();

        assert_eq!(report.records, 2);
    }

    #[tokio::test]
    async fn test_snapshots_survive_dispose_and_init() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockRemote::new());
        let mut gateway =
            SyncGateway::new(mock.clone()).with_storage(SnapshotStorage::new(temp.path()));
        gateway.load_all().await.unwrap();
        gateway.add_student("Adultos", "Zico").await.unwrap();
        gateway
            .create_record(NewRecord::new("Adultos", "Pedro", "08/02/2026").with_total(5))
            .await
            .unwrap();
        gateway.dispose().await;

        mock.set_offline(true);
        let mut restored =
            SyncGateway::new(mock).with_storage(SnapshotStorage::new(temp.path()));
        restored.init().unwrap();

        assert!(restored.list_roster("Adultos").contains(&"Zico".to_string()));
        assert_eq!(restored.ledger().len(), 3);
        assert_eq!(restored.roster().class_id("Adultos"), Some(&EntityId::Number(7)));
    }

    #[tokio::test]
    async fn test_init_without_snapshots_is_empty() {
        let temp = TempDir::new().unwrap();
        let mut gateway = SyncGateway::new(Arc::new(MockRemote::new()))
            .with_storage(SnapshotStorage::new(temp.path()));

        gateway.init().unwrap();

        assert!(gateway.ledger().is_empty());
        assert!(gateway.classes().is_empty());
    }

    #[tokio::test]
    async fn test_login() {
        let gateway = SyncGateway::new(Arc::new(MockRemote::new()));

        assert!(gateway.login(MOCK_EMAIL, MOCK_PASSWORD).await.is_ok());
        assert!(matches!(
            gateway.login(MOCK_EMAIL, "errada").await,
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            gateway.login("", "x").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_summaries_by_date() {
        let (gateway, _mock) = loaded().await;
        let filter = RecordFilter::new().with_date("01/02/2026");

        let overall = gateway.summary(&filter);
        assert_eq!(overall.present_total, 4);
        assert_eq!(overall.absent_total, 4);
        assert_eq!(overall.visitor_total, 1);
        assert_eq!(overall.grand_total, 5);

        let by_class = gateway.class_summaries(&filter);
        assert_eq!(by_class.len(), 7);
        assert_eq!(by_class[0].class_name, ClassName::Bercario);
        assert_eq!(by_class[0].summary.grand_total, 2);
        assert_eq!(by_class[1].summary.absent_total, 0);
        assert!(by_class[6].summary.is_empty());
    }

    #[tokio::test]
    async fn test_records_for_display_most_recent_first() {
        let (mut gateway, _mock) = loaded().await;
        gateway
            .create_record(NewRecord::new("Jovens", "Marcos", "15/10/2023"))
            .await
            .unwrap();

        let records = gateway.records_for_display(&RecordFilter::new());

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].session_date, "2023-10-15");
        assert_eq!(gateway.teacher_for("Maternal"), Some("Carla Souza"));
    }
}

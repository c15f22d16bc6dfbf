//! In-process stand-in for the remote API.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::types::{
    LoginResponse, Page, Pagination, RecordPayload, RemoteClass, RemoteStudent, StudentPayload,
    User,
};
use super::{Remote, RemoteError};
use crate::models::{AttendanceRecord, ClassName, EntityId, PresenceField};
use crate::roster::RosterStore;

/// Email accepted by the mock login.
pub const MOCK_EMAIL: &str = "admin@ibrc.com.br";
/// Password accepted by the mock login.
pub const MOCK_PASSWORD: &str = "123456";

const SEED_STUDENTS: [&[&str]; 7] = [
    &["Ana Clara", "Helena Baby", "Laura Mendes", "Lucas Baby", "Miguelzinho"],
    &["Davi", "Joãozinho", "Mariana"],
    &["Ana Vitória", "Beatriz Santos", "Daniel Oliveira", "Enzo Gabriel"],
    &["Ana Júlia", "Fernando Souza", "Gustavo Lima", "Larissa Rocha"],
    &["Amanda Rocha", "Beatriz Fernandes", "Bruno Silva", "Carla Pereira"],
    &["Bianca Lima", "Camila Santos", "Felipe Martins", "João Pedro"],
    &["Aline Dias", "Amanda Lima", "Bruno Lima", "Camila Fernandes"],
];

struct MockState {
    classes: Vec<RemoteClass>,
    students: HashMap<EntityId, Vec<RemoteStudent>>,
    records: Vec<RecordPayload>,
    next_id: u64,
    offline: bool,
    failing_classes: HashSet<EntityId>,
}

impl MockState {
    fn seeded() -> Self {
        let mut classes = Vec::new();
        let mut students = HashMap::new();

        for (i, (class, names)) in ClassName::ALL.iter().zip(SEED_STUDENTS).enumerate() {
            let class_id = EntityId::Number(i as i64 + 1);
            let roster = names
                .iter()
                .enumerate()
                .map(|(n, nome)| RemoteStudent {
                    id: EntityId::Text(format!("aluno_{}_{}", class_id, n)),
                    nome: nome.to_string(),
                    turma_id: Some(class_id.clone()),
                    ativo: None,
                    status: Some("ativo".to_string()),
                    data_inscricao: Some("2025-01-15".to_string()),
                })
                .collect();

            students.insert(class_id.clone(), roster);
            classes.push(RemoteClass {
                id: class_id,
                name: class.as_str().to_string(),
            });
        }

        let records = vec![
            RecordPayload {
                id: Some(EntityId::Text("1".to_string())),
                turma_id: Some(EntityId::Number(1)),
                turma_name: "Berçário".to_string(),
                professor_nome: "Ana Paula".to_string(),
                data_registro: "2026-02-01".to_string(),
                presentes: PresenceField::Count(1),
                ausentes: None,
                total: 5,
                visitantes: Some("Laura Mendes".to_string()),
            },
            RecordPayload {
                id: Some(EntityId::Text("2".to_string())),
                turma_id: Some(EntityId::Number(2)),
                turma_name: "Maternal".to_string(),
                professor_nome: "Carla Souza".to_string(),
                data_registro: "2026-02-01".to_string(),
                presentes: PresenceField::Count(3),
                ausentes: None,
                total: 3,
                visitantes: Some("-".to_string()),
            },
        ];

        Self {
            classes,
            students,
            records,
            next_id: 1,
            offline: false,
            failing_classes: HashSet::new(),
        }
    }

    fn from_cache(roster: &RosterStore, records: &[AttendanceRecord]) -> Self {
        let mut classes = Vec::new();
        let mut students: HashMap<EntityId, Vec<RemoteStudent>> = HashMap::new();

        for (name, class_id) in roster.class_ids() {
            let enrolled = roster
                .students(name)
                .iter()
                .map(|s| RemoteStudent {
                    id: s.id.clone(),
                    nome: s.name.clone(),
                    turma_id: Some(class_id.clone()),
                    ativo: Some(true),
                    status: Some("ativo".to_string()),
                    data_inscricao: None,
                })
                .collect();
            students.insert(class_id.clone(), enrolled);
            classes.push(RemoteClass {
                id: class_id.clone(),
                name: name.to_string(),
            });
        }

        let records: Vec<RecordPayload> = records
            .iter()
            .map(|r| r.to_payload(roster.class_id(&r.class_name).cloned()))
            .collect();

        let highest = students
            .values()
            .flatten()
            .map(|s: &RemoteStudent| &s.id)
            .chain(records.iter().filter_map(|r| r.id.as_ref()))
            .filter_map(trailing_number)
            .max()
            .unwrap_or(0);

        Self {
            classes,
            students,
            records,
            next_id: highest + 1,
            offline: false,
            failing_classes: HashSet::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline {
            return Err(RemoteError::Connection("mock remote is offline".to_string()));
        }
        Ok(())
    }

    fn roster_mut(&mut self, class_id: &EntityId) -> Result<&mut Vec<RemoteStudent>, RemoteError> {
        self.students
            .get_mut(class_id)
            .ok_or_else(|| not_found(format!("Turma {} não encontrada", class_id)))
    }
}

/// Trailing decimal digits of an id: `registro_12` gives 12.
fn trailing_number(id: &EntityId) -> Option<u64> {
    let text = id.to_string();
    let digits: String = text
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

fn not_found(message: String) -> RemoteError {
    RemoteError::Status {
        status: 404,
        message,
    }
}

/// Deterministic, stateful mock of the remote API.
///
/// Seeded with the seven classes, their students and two attendance
/// records. Writes are visible to later reads. Ids are assigned from a
/// counter, so a fresh mock always hands out the same sequence.
pub struct MockRemote {
    state: Mutex<MockState>,
    latency: Duration,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    /// Creates a seeded mock that answers immediately.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::seeded()),
            latency: Duration::ZERO,
        }
    }

    /// Creates a mock holding the given rosters and records instead of the
    /// seed data. New ids continue after the highest numeric suffix seen.
    pub fn from_cache(roster: &RosterStore, records: &[AttendanceRecord]) -> Self {
        Self {
            state: Mutex::new(MockState::from_cache(roster, records)),
            latency: Duration::ZERO,
        }
    }

    /// Delays every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every call fail with a connection error while set.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Makes `list_students` fail for the given class.
    pub fn fail_students_for(&self, class_id: impl Into<EntityId>) {
        self.lock().failing_classes.insert(class_id.into());
    }

    /// Number of attendance records currently held.
    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    /// Student names of a class, in storage order.
    pub fn student_names(&self, class_id: impl Into<EntityId>) -> Vec<String> {
        self.lock()
            .students
            .get(&class_id.into())
            .map(|roster| roster.iter().map(|s| s.nome.clone()).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl Remote for MockRemote {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, RemoteError> {
        self.delay().await;
        self.lock().check_online()?;

        if email != MOCK_EMAIL || password != MOCK_PASSWORD {
            return Err(RemoteError::Unauthorized("Credenciais inválidas".to_string()));
        }

        Ok(LoginResponse {
            user: User {
                id: EntityId::Text("user_123".to_string()),
                name: "Admin IBRC".to_string(),
                email: MOCK_EMAIL.to_string(),
                role: Some("admin".to_string()),
                avatar: Some("https://ui-avatars.com/api/?name=Admin+IBRC".to_string()),
            },
            access_token: format!("mock_access_token_{}", Uuid::new_v4()),
            refresh_token: format!("mock_refresh_token_{}", Uuid::new_v4()),
        })
    }

    async fn list_classes(&self) -> Result<Vec<RemoteClass>, RemoteError> {
        self.delay().await;
        let state = self.lock();
        state.check_online()?;
        Ok(state.classes.clone())
    }

    async fn list_students(&self, class_id: &EntityId) -> Result<Vec<RemoteStudent>, RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        if state.failing_classes.contains(class_id) {
            return Err(RemoteError::Status {
                status: 500,
                message: format!("Falha ao carregar alunos da turma {}", class_id),
            });
        }
        Ok(state.roster_mut(class_id)?.clone())
    }

    async fn create_student(
        &self,
        class_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<RemoteStudent, RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let n = state.next_id();
        let created = RemoteStudent {
            id: EntityId::Text(format!("aluno_{}_n{}", class_id, n)),
            nome: student.nome.clone(),
            turma_id: Some(class_id.clone()),
            ativo: Some(student.ativo),
            status: Some(if student.ativo { "ativo" } else { "inativo" }.to_string()),
            data_inscricao: Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
        };
        state.roster_mut(class_id)?.push(created.clone());
        debug!(id = %created.id, class = %class_id, "mock created student");
        Ok(created)
    }

    async fn update_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<(), RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let existing = state
            .roster_mut(class_id)?
            .iter_mut()
            .find(|s| &s.id == student_id)
            .ok_or_else(|| not_found(format!("Aluno {} não encontrado", student_id)))?;
        existing.nome = student.nome.clone();
        existing.ativo = Some(student.ativo);
        Ok(())
    }

    async fn delete_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
    ) -> Result<(), RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let roster = state.roster_mut(class_id)?;
        let before = roster.len();
        roster.retain(|s| &s.id != student_id);
        if roster.len() == before {
            return Err(not_found(format!("Aluno {} não encontrado", student_id)));
        }
        Ok(())
    }

    async fn list_attendance(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<RecordPayload>, RemoteError> {
        self.delay().await;
        let state = self.lock();
        state.check_online()?;

        let limit = page_size.max(1);
        let page = page.max(1);
        let total = state.records.len() as u32;
        let items = state
            .records
            .iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            pagination: Some(Pagination {
                page,
                limit,
                total,
                pages: total.div_ceil(limit),
            }),
        })
    }

    async fn create_attendance(
        &self,
        record: &RecordPayload,
    ) -> Result<RecordPayload, RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let n = state.next_id();
        let created = RecordPayload {
            id: Some(EntityId::Text(format!("registro_{}", n))),
            ..record.clone()
        };
        state.records.insert(0, created.clone());
        Ok(created)
    }

    async fn update_attendance(
        &self,
        id: &EntityId,
        record: &RecordPayload,
    ) -> Result<(), RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let existing = state
            .records
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| not_found(format!("Registro {} não encontrado", id)))?;
        *existing = RecordPayload {
            id: Some(id.clone()),
            ..record.clone()
        };
        Ok(())
    }

    async fn delete_attendance(&self, id: &EntityId) -> Result<(), RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.check_online()?;

        let before = state.records.len();
        state.records.retain(|r| r.id.as_ref() != Some(id));
        if state.records.len() == before {
            return Err(not_found(format!("Registro {} não encontrado", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_classes_and_students() {
        let mock = MockRemote::new();

        let classes = mock.list_classes().await.unwrap();
        assert_eq!(classes.len(), 7);
        assert_eq!(classes[0].name, "Berçário");
        assert_eq!(classes[6].name, "Adultos");

        let students = mock.list_students(&EntityId::Number(2)).await.unwrap();
        let names: Vec<&str> = students.iter().map(|s| s.nome.as_str()).collect();
        assert_eq!(names, vec!["Davi", "Joãozinho", "Mariana"]);
        assert_eq!(students[0].id.to_string(), "aluno_2_0");
    }

    #[tokio::test]
    async fn test_login() {
        let mock = MockRemote::new();
        let session = mock.login(MOCK_EMAIL, MOCK_PASSWORD).await.unwrap();
        assert_eq!(session.user.name, "Admin IBRC");
        assert!(session.access_token.starts_with("mock_access_token_"));

        let err = mock.login(MOCK_EMAIL, "000000").await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_student_writes_are_visible() {
        let mock = MockRemote::new();
        let class_id = EntityId::Number(7);

        let created = mock
            .create_student(&class_id, &StudentPayload::active("Zico"))
            .await
            .unwrap();
        assert_eq!(created.id.to_string(), "aluno_7_n1");
        assert!(mock.student_names(class_id.clone()).contains(&"Zico".to_string()));

        mock.update_student(&class_id, &created.id, &StudentPayload::active("Zico Silva"))
            .await
            .unwrap();
        assert!(mock.student_names(class_id.clone()).contains(&"Zico Silva".to_string()));

        mock.delete_student(&class_id, &created.id).await.unwrap();
        assert_eq!(mock.student_names(class_id.clone()).len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let mock = MockRemote::new();
        let missing = EntityId::Text("nao_existe".into());

        assert!(mock.list_students(&EntityId::Number(99)).await.unwrap_err().is_not_found());
        assert!(mock
            .delete_student(&EntityId::Number(1), &missing)
            .await
            .unwrap_err()
            .is_not_found());
        assert!(mock.delete_attendance(&missing).await.unwrap_err().is_not_found());
        assert!(mock
            .update_attendance(&missing, &RecordPayload::default())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_attendance_pagination() {
        let mock = MockRemote::new();

        let page = mock.list_attendance(1, 1).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.unwrap().pages, 2);

        let page = mock.list_attendance(2, 1).await.unwrap();
        assert_eq!(page.items[0].turma_name, "Maternal");

        let page = mock.list_attendance(3, 1).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_attendance_create_and_delete_across_id_forms() {
        let mock = MockRemote::new();
        let created = mock
            .create_attendance(&RecordPayload {
                turma_name: "Jovens".into(),
                data_registro: "2026-02-08".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id, Some(EntityId::Text("registro_1".into())));
        assert_eq!(mock.record_count(), 3);

        mock.delete_attendance(&EntityId::Number(2)).await.unwrap();
        assert_eq!(mock.record_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockRemote::new();
        mock.fail_students_for(EntityId::Number(3));
        assert!(mock.list_students(&EntityId::Number(3)).await.is_err());
        assert!(mock.list_students(&EntityId::Number(4)).await.is_ok());

        mock.set_offline(true);
        assert!(matches!(
            mock.list_classes().await.unwrap_err(),
            RemoteError::Connection(_)
        ));
        mock.set_offline(false);
        assert!(mock.list_classes().await.is_ok());
    }

    #[tokio::test]
    async fn test_from_cache_continues_ids() {
        use crate::models::{NewRecord, Student};

        let mut roster = RosterStore::new();
        roster.set_class_id("Jovens", EntityId::Number(6));
        roster.set_roster(
            "Jovens",
            vec![Student::new(EntityId::Text("aluno_6_n4".into()), "Bia")],
        );
        let records = vec![NewRecord::new("Jovens", "Rui", "01/02/2026")
            .with_present(1)
            .with_total(1)
            .into_record(EntityId::Text("registro_9".into()))];

        let mock = MockRemote::from_cache(&roster, &records);
        assert_eq!(mock.list_classes().await.unwrap().len(), 1);
        assert_eq!(mock.student_names(EntityId::Number(6)), vec!["Bia"]);
        assert_eq!(mock.record_count(), 1);

        let created = mock
            .create_attendance(&RecordPayload::default())
            .await
            .unwrap();
        assert_eq!(created.id, Some(EntityId::Text("registro_10".into())));

        mock.delete_attendance(&EntityId::Text("registro_9".into()))
            .await
            .unwrap();
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number(&EntityId::Text("registro_12".into())), Some(12));
        assert_eq!(trailing_number(&EntityId::Number(7)), Some(7));
        assert_eq!(trailing_number(&EntityId::Text("abc".into())), None);
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let mock = MockRemote::new().with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        mock.list_classes().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}

//! Wire shapes exchanged with the remote API.

use serde::{Deserialize, Serialize};

use crate::models::{EntityId, PresenceField};

/// Standard response envelope: `{ success, data, pagination?, message? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            pagination: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteClass {
    pub id: EntityId,
    pub name: String,
}

/// A student as listed by `GET /turmas/{id}/alunos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStudent {
    pub id: EntityId,
    #[serde(alias = "name")]
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_inscricao: Option<String>,
}

impl RemoteStudent {
    /// Active unless flagged otherwise by either `ativo` or `status`.
    pub fn is_active(&self) -> bool {
        match (self.ativo, self.status.as_deref()) {
            (Some(ativo), _) => ativo,
            (None, Some(status)) => !status.eq_ignore_ascii_case("inativo"),
            (None, None) => true,
        }
    }
}

/// Body of student create/update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPayload {
    pub nome: String,
    pub ativo: bool,
}

impl StudentPayload {
    pub fn active(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            ativo: true,
        }
    }
}

/// An attendance record as it travels on the wire.
///
/// Older clients wrote `turma`, `professor` and `data`; those names are
/// still accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turma_id: Option<EntityId>,
    #[serde(alias = "turma")]
    pub turma_name: String,
    #[serde(default, alias = "professor")]
    pub professor_nome: String,
    #[serde(alias = "data")]
    pub data_registro: String,
    #[serde(default)]
    pub presentes: PresenceField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ausentes: Option<PresenceField>,
    #[serde(default)]
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitantes: Option<String>,
}

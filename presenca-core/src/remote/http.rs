//! HTTP implementation of [`Remote`] on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{
    Envelope, LoginResponse, Page, RecordPayload, RemoteClass, RemoteStudent, StudentPayload,
    User,
};
use super::{Remote, RemoteError};
use crate::auth::TokenStore;
use crate::models::EntityId;

/// Client for the attendance REST API.
///
/// Every request carries `Authorization: Bearer <access token>` from the
/// token store. A 401 triggers one refresh through `/auth/refresh` and one
/// retry; if the refresh fails the stored tokens are cleared.
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    data: Option<User>,
    access_token: String,
    refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    access_token: String,
}

impl HttpRemote {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, RemoteError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| RemoteError::Connection(format!("invalid base URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(RemoteError::Connection(format!(
                "invalid base URL '{}'",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parsed,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Connection(format!("invalid base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, RemoteError> {
        let mut request = self.client.request(method, url.clone());
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Sends a request, refreshing the access token and retrying once on 401.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, RemoteError> {
        let response = self.send_once(method.clone(), url, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path = url.path(), "access token rejected, refreshing");
        self.refresh().await?;
        self.send_once(method, url, body).await
    }

    async fn refresh(&self) -> Result<(), RemoteError> {
        let result = self.try_refresh().await;
        if let Err(e) = &result {
            debug!(error = %e, "refresh failed, clearing tokens");
            self.tokens.clear();
        }
        result
    }

    async fn try_refresh(&self) -> Result<(), RemoteError> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or_else(|| RemoteError::Unauthorized("no refresh token".to_string()))?;

        let response = self
            .client
            .post(self.url(&["auth", "refresh"])?)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Unauthorized(format!(
                "refresh rejected with status {}",
                status.as_u16()
            )));
        }

        let body: RefreshBody = response.json().await?;
        self.tokens.set_access_token(&body.access_token);
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope<T>, RemoteError> {
        let response = self.send(method, &url, body.as_ref()).await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Envelope<T>, RemoteError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, text));
        }
        if text.trim().is_empty() {
            return Ok(Envelope {
                success: true,
                data: None,
                pagination: None,
                message: None,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn status_error(status: StatusCode, text: String) -> RemoteError {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&text)
            .ok()
            .and_then(|env| env.message)
            .unwrap_or(text);

        if status == StatusCode::UNAUTHORIZED {
            RemoteError::Unauthorized(message)
        } else {
            RemoteError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }

    fn data<T>(envelope: Envelope<T>, what: &str) -> Result<T, RemoteError> {
        envelope
            .data
            .ok_or_else(|| RemoteError::Decode(format!("response has no {}", what)))
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, RemoteError> {
        let response = self
            .client
            .post(self.url(&["auth", "login"])?)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Self::status_error(status, text));
        }

        let body: LoginBody = serde_json::from_str(&text)?;
        let user = body
            .data
            .ok_or_else(|| RemoteError::Decode("login response has no user".to_string()))?;

        self.tokens.store(&body.access_token, &body.refresh_token);
        Ok(LoginResponse {
            user,
            access_token: body.access_token,
            refresh_token: body.refresh_token,
        })
    }

    async fn list_classes(&self) -> Result<Vec<RemoteClass>, RemoteError> {
        let env = self.request(Method::GET, self.url(&["turmas"])?, None).await?;
        Self::data(env, "classes")
    }

    async fn list_students(&self, class_id: &EntityId) -> Result<Vec<RemoteStudent>, RemoteError> {
        let class_id = class_id.to_string();
        let url = self.url(&["turmas", class_id.as_str(), "alunos"])?;
        let env = self.request(Method::GET, url, None).await?;
        Ok(env.data.unwrap_or_default())
    }

    async fn create_student(
        &self,
        class_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<RemoteStudent, RemoteError> {
        let class_id = class_id.to_string();
        let url = self.url(&["turmas", class_id.as_str(), "alunos"])?;
        let body = serde_json::to_value(student)?;
        let env = self.request(Method::POST, url, Some(body)).await?;
        Self::data(env, "student")
    }

    async fn update_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
        student: &StudentPayload,
    ) -> Result<(), RemoteError> {
        let (class_id, student_id) = (class_id.to_string(), student_id.to_string());
        let url = self.url(&["turmas", class_id.as_str(), "alunos", student_id.as_str()])?;
        let body = serde_json::to_value(student)?;
        self.request::<serde_json::Value>(Method::PATCH, url, Some(body))
            .await?;
        Ok(())
    }

    async fn delete_student(
        &self,
        class_id: &EntityId,
        student_id: &EntityId,
    ) -> Result<(), RemoteError> {
        let (class_id, student_id) = (class_id.to_string(), student_id.to_string());
        let url = self.url(&["turmas", class_id.as_str(), "alunos", student_id.as_str()])?;
        self.request::<serde_json::Value>(Method::DELETE, url, None)
            .await?;
        Ok(())
    }

    async fn list_attendance(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<RecordPayload>, RemoteError> {
        let mut url = self.url(&["registros"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &page_size.to_string());

        // Decoded per item; a bad item is dropped, not the whole page.
        let env: Envelope<Vec<serde_json::Value>> = self.request(Method::GET, url, None).await?;
        let items = env
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RecordPayload>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(page, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect();
        Ok(Page {
            pagination: env.pagination,
            items,
        })
    }

    async fn create_attendance(
        &self,
        record: &RecordPayload,
    ) -> Result<RecordPayload, RemoteError> {
        let body = serde_json::to_value(record)?;
        let env = self
            .request(Method::POST, self.url(&["registros"])?, Some(body))
            .await?;
        Self::data(env, "record")
    }

    async fn update_attendance(
        &self,
        id: &EntityId,
        record: &RecordPayload,
    ) -> Result<(), RemoteError> {
        let id = id.to_string();
        let url = self.url(&["registros", id.as_str()])?;
        let body = serde_json::to_value(record)?;
        self.request::<serde_json::Value>(Method::PATCH, url, Some(body))
            .await?;
        Ok(())
    }

    async fn delete_attendance(&self, id: &EntityId) -> Result<(), RemoteError> {
        let id = id.to_string();
        let url = self.url(&["registros", id.as_str()])?;
        self.request::<serde_json::Value>(Method::DELETE, url, None)
            .await?;
        Ok(())
    }
}

/// Upstream client: the single point of entry for calls to the job tracker REST backend.
///
/// Every operation is exactly one HTTP request carrying the caller's bearer token.
/// Responses are normalized here (204 and empty bodies read as empty collections,
/// error bodies are mined for a message). Nothing is cached or retried at this layer.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Interview, InterviewDraft, Job, JobDraft, Profile};
use crate::search::SearchParams;

pub mod token;

pub use token::AccessToken;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid JSON in response (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Upstream status code, when the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Authentication problems are never treated as "offline".
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::MissingToken) || matches!(self.status(), Some(401 | 403))
    }
}

/// Whether a job is being starred or un-starred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Favorite,
    Unfavorite,
}

impl FavoriteAction {
    pub fn as_path(&self) -> &'static str {
        match self {
            FavoriteAction::Favorite => "favorite",
            FavoriteAction::Unfavorite => "unfavorite",
        }
    }
}

/// Operations the upstream backend offers. Implemented over HTTP by [`ApiClient`].
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn get_profile(&self, token: &AccessToken) -> Result<Profile, ApiError>;
    async fn update_profile(&self, token: &AccessToken, profile: &Profile) -> Result<(), ApiError>;

    async fn list_jobs(&self, token: &AccessToken) -> Result<Vec<Job>, ApiError>;
    async fn create_job(&self, token: &AccessToken, job: &JobDraft) -> Result<(), ApiError>;
    async fn update_job(&self, token: &AccessToken, id: Uuid, job: &JobDraft) -> Result<(), ApiError>;
    async fn delete_job(&self, token: &AccessToken, id: Uuid) -> Result<(), ApiError>;
    async fn search_jobs(&self, token: &AccessToken, params: &SearchParams) -> Result<Vec<Job>, ApiError>;
    async fn job_status_counts(&self, token: &AccessToken) -> Result<HashMap<String, i64>, ApiError>;
    async fn favorite_jobs(&self, token: &AccessToken) -> Result<Vec<Job>, ApiError>;
    async fn set_favorite(
        &self,
        token: &AccessToken,
        id: Uuid,
        action: FavoriteAction,
    ) -> Result<(), ApiError>;

    async fn list_interviews(&self, token: &AccessToken) -> Result<Vec<Interview>, ApiError>;
    async fn create_interview(&self, token: &AccessToken, interview: &InterviewDraft) -> Result<(), ApiError>;
    async fn update_interview(
        &self,
        token: &AccessToken,
        id: Uuid,
        interview: &InterviewDraft,
    ) -> Result<(), ApiError>;
    async fn delete_interview(&self, token: &AccessToken, id: Uuid) -> Result<(), ApiError>;
    async fn search_interviews(
        &self,
        token: &AccessToken,
        params: &SearchParams,
    ) -> Result<Vec<Interview>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: &AccessToken) -> RequestBuilder {
        debug!("{} {}{}", method, self.base_url, path);
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token.as_str())
            .header("content-type", "application/json")
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
        params: Option<&SearchParams>,
    ) -> Result<Vec<T>, ApiError> {
        let mut request = self.request(Method::GET, path, token);
        if let Some(params) = params {
            request = request.query(params.pairs());
        }
        read_collection(request.send().await?).await
    }

    async fn send_write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut request = self.request(method, path, token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }
        if !text.is_empty() {
            debug!("Upstream acknowledged write with {}: {}", status, text);
        }
        Ok(())
    }
}

#[async_trait]
impl TrackerApi for ApiClient {
    async fn get_profile(&self, token: &AccessToken) -> Result<Profile, ApiError> {
        let response = self.request(Method::GET, "/profiles/current", token).send().await?;
        read_json(response).await
    }

    async fn update_profile(&self, token: &AccessToken, profile: &Profile) -> Result<(), ApiError> {
        self.send_write(Method::PUT, "/profiles/current", token, Some(profile))
            .await
    }

    async fn list_jobs(&self, token: &AccessToken) -> Result<Vec<Job>, ApiError> {
        self.fetch_collection("/jobs", token, None).await
    }

    async fn create_job(&self, token: &AccessToken, job: &JobDraft) -> Result<(), ApiError> {
        self.send_write(Method::POST, "/jobs", token, Some(job)).await
    }

    async fn update_job(&self, token: &AccessToken, id: Uuid, job: &JobDraft) -> Result<(), ApiError> {
        // Upstream rejects updates whose body id differs from the path.
        let body = WithId { id, inner: job };
        self.send_write(Method::PUT, &format!("/jobs/{id}"), token, Some(&body))
            .await
    }

    async fn delete_job(&self, token: &AccessToken, id: Uuid) -> Result<(), ApiError> {
        self.send_write::<()>(Method::DELETE, &format!("/jobs/{id}"), token, None)
            .await
    }

    async fn search_jobs(&self, token: &AccessToken, params: &SearchParams) -> Result<Vec<Job>, ApiError> {
        self.fetch_collection("/jobs/search", token, Some(params)).await
    }

    async fn job_status_counts(&self, token: &AccessToken) -> Result<HashMap<String, i64>, ApiError> {
        let response = self
            .request(Method::GET, "/jobs/status-counts", token)
            .send()
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(HashMap::new());
        }
        read_json(response).await
    }

    async fn favorite_jobs(&self, token: &AccessToken) -> Result<Vec<Job>, ApiError> {
        self.fetch_collection("/jobs/favorites", token, None).await
    }

    async fn set_favorite(
        &self,
        token: &AccessToken,
        id: Uuid,
        action: FavoriteAction,
    ) -> Result<(), ApiError> {
        let path = format!("/jobs/{id}/{}", action.as_path());
        self.send_write::<()>(Method::PUT, &path, token, None).await
    }

    async fn list_interviews(&self, token: &AccessToken) -> Result<Vec<Interview>, ApiError> {
        self.fetch_collection("/interviews", token, None).await
    }

    async fn create_interview(&self, token: &AccessToken, interview: &InterviewDraft) -> Result<(), ApiError> {
        self.send_write(Method::POST, "/interviews", token, Some(interview))
            .await
    }

    async fn update_interview(
        &self,
        token: &AccessToken,
        id: Uuid,
        interview: &InterviewDraft,
    ) -> Result<(), ApiError> {
        let body = WithId { id, inner: interview };
        self.send_write(Method::PUT, &format!("/interviews/{id}"), token, Some(&body))
            .await
    }

    async fn delete_interview(&self, token: &AccessToken, id: Uuid) -> Result<(), ApiError> {
        self.send_write::<()>(Method::DELETE, &format!("/interviews/{id}"), token, None)
            .await
    }

    async fn search_interviews(
        &self,
        token: &AccessToken,
        params: &SearchParams,
    ) -> Result<Vec<Interview>, ApiError> {
        self.fetch_collection("/interviews/search", token, Some(params))
            .await
    }
}

#[derive(Serialize)]
struct WithId<'a, T: Serialize> {
    id: Uuid,
    #[serde(flatten)]
    inner: &'a T,
}

/// Reads a collection body. 204 and empty bodies are an empty collection, not an error.
async fn read_collection<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    decode_collection(status, &body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }
    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        status: status.as_u16(),
        source,
    })
}

fn decode_collection<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Vec<T>, ApiError> {
    if !status.is_success() {
        return Err(error_from_body(status, body));
    }
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            status: status.as_u16(),
            source,
        })?;

    // One off-schema record is skipped; a list with nothing usable is a bad response.
    let total = records.len();
    let mut items = Vec::with_capacity(total);
    let mut first_error = None;
    for record in records {
        match serde_json::from_value::<T>(record) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!("Skipping malformed upstream record: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(source) if items.is_empty() => Err(ApiError::Decode {
            status: status.as_u16(),
            source,
        }),
        Some(_) => {
            warn!("Kept {} of {total} upstream records", items.len());
            Ok(items)
        }
        None => Ok(items),
    }
}

/// Builds a status error, preferring a server-supplied message over the reason phrase.
fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let body = body.trim();
    let from_json = serde_json::from_str::<ErrorBody>(body).ok().and_then(|e| {
        e.message.or(match e.error {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        })
    });

    let message = match from_json {
        Some(message) => message,
        None if !body.is_empty() && !body.starts_with('{') => body.to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

//! Fakes shared by unit tests: an in-memory `TrackerApi` and an in-process
//! HTTP upstream for exercising the real client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api_client::{AccessToken, ApiError, FavoriteAction, TrackerApi};
use crate::models::{
    Interview, InterviewDraft, InterviewFormat, InterviewRound, Job, JobDraft, JobStatus, Profile,
};
use crate::search::SearchParams;

pub fn sample_job(title: &str, status: JobStatus) -> Job {
    Job {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        min_salary: 100_000,
        max_salary: 120_000,
        salary: None,
        level: "Mid".to_string(),
        status,
        favorite: false,
        description: None,
        updated_at: Some(Utc::now()),
    }
}

pub fn sample_interview(company: &str, date: NaiveDate) -> Interview {
    Interview {
        id: Uuid::new_v4(),
        company: company.to_string(),
        format: InterviewFormat::Virtual,
        round: InterviewRound::Technical,
        date,
        time: NaiveTime::from_hms_opt(10, 0, 0),
        user_id: None,
    }
}

fn job_from_draft(id: Uuid, draft: &JobDraft) -> Job {
    Job {
        id,
        title: draft.title.clone(),
        company: draft.company.clone(),
        location: draft.location.clone(),
        min_salary: draft.min_salary,
        max_salary: draft.max_salary,
        salary: None,
        level: draft.level.clone(),
        status: draft.status,
        favorite: draft.favorite,
        description: draft.description.clone(),
        updated_at: Some(Utc::now()),
    }
}

fn interview_from_draft(id: Uuid, draft: &InterviewDraft) -> Interview {
    Interview {
        id,
        company: draft.company.clone(),
        format: draft.format,
        round: draft.round,
        date: draft.date,
        time: draft.time,
        user_id: None,
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

#[derive(Default)]
struct FakeState {
    jobs: Vec<Job>,
    interviews: Vec<Interview>,
    profile: Profile,
    offline: bool,
    reject_auth: bool,
    calls: usize,
    /// Served verbatim by the HTTP upstream's `GET /interviews` when set.
    raw_interviews: Option<String>,
}

/// In-memory upstream. Can be switched offline or to reject every token.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().jobs = jobs;
        api
    }

    pub fn offline() -> Self {
        let api = Self::default();
        api.go_offline();
        api
    }

    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    pub fn reject_auth(&self) {
        self.state.lock().unwrap().reject_auth = true;
    }

    pub fn add_interview(&self, interview: Interview) {
        self.state.lock().unwrap().interviews.push(interview);
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.lock().unwrap().jobs.clone()
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> Result<T, ApiError>) -> Result<T, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.reject_auth {
            return Err(ApiError::Status {
                status: 401,
                message: "Unauthorized".to_string(),
            });
        }
        if state.offline {
            return Err(ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        f(&mut state)
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl TrackerApi for FakeApi {
    async fn get_profile(&self, _token: &AccessToken) -> Result<Profile, ApiError> {
        self.with_state(|s| Ok(s.profile.clone()))
    }

    async fn update_profile(&self, _token: &AccessToken, profile: &Profile) -> Result<(), ApiError> {
        self.with_state(|s| {
            s.profile = profile.clone();
            Ok(())
        })
    }

    async fn list_jobs(&self, _token: &AccessToken) -> Result<Vec<Job>, ApiError> {
        self.with_state(|s| Ok(s.jobs.clone()))
    }

    async fn create_job(&self, _token: &AccessToken, job: &JobDraft) -> Result<(), ApiError> {
        self.with_state(|s| {
            s.jobs.push(job_from_draft(Uuid::new_v4(), job));
            Ok(())
        })
    }

    async fn update_job(&self, _token: &AccessToken, id: Uuid, job: &JobDraft) -> Result<(), ApiError> {
        self.with_state(|s| {
            let slot = s.jobs.iter_mut().find(|j| j.id == id).ok_or_else(|| not_found("Job"))?;
            *slot = job_from_draft(id, job);
            Ok(())
        })
    }

    async fn delete_job(&self, _token: &AccessToken, id: Uuid) -> Result<(), ApiError> {
        self.with_state(|s| {
            let before = s.jobs.len();
            s.jobs.retain(|j| j.id != id);
            if s.jobs.len() == before {
                return Err(not_found("Job"));
            }
            Ok(())
        })
    }

    async fn search_jobs(&self, _token: &AccessToken, params: &SearchParams) -> Result<Vec<Job>, ApiError> {
        self.with_state(|s| {
            Ok(s.jobs
                .iter()
                .filter(|j| contains_ci(&j.title, params.get("title")))
                .filter(|j| contains_ci(&j.level, params.get("level")))
                .filter(|j| contains_ci(&j.location, params.get("location")))
                .cloned()
                .collect())
        })
    }

    async fn job_status_counts(&self, _token: &AccessToken) -> Result<HashMap<String, i64>, ApiError> {
        self.with_state(|s| {
            let mut counts = HashMap::new();
            for job in &s.jobs {
                *counts.entry(job.status.to_string()).or_insert(0) += 1;
            }
            Ok(counts)
        })
    }

    async fn favorite_jobs(&self, _token: &AccessToken) -> Result<Vec<Job>, ApiError> {
        self.with_state(|s| Ok(s.jobs.iter().filter(|j| j.favorite).cloned().collect()))
    }

    async fn set_favorite(
        &self,
        _token: &AccessToken,
        id: Uuid,
        action: FavoriteAction,
    ) -> Result<(), ApiError> {
        self.with_state(|s| {
            let job = s.jobs.iter_mut().find(|j| j.id == id).ok_or_else(|| not_found("Job"))?;
            job.favorite = action == FavoriteAction::Favorite;
            Ok(())
        })
    }

    async fn list_interviews(&self, _token: &AccessToken) -> Result<Vec<Interview>, ApiError> {
        self.with_state(|s| Ok(s.interviews.clone()))
    }

    async fn create_interview(&self, _token: &AccessToken, interview: &InterviewDraft) -> Result<(), ApiError> {
        self.with_state(|s| {
            s.interviews.push(interview_from_draft(Uuid::new_v4(), interview));
            Ok(())
        })
    }

    async fn update_interview(
        &self,
        _token: &AccessToken,
        id: Uuid,
        interview: &InterviewDraft,
    ) -> Result<(), ApiError> {
        self.with_state(|s| {
            let slot = s
                .interviews
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| not_found("Interview"))?;
            *slot = interview_from_draft(id, interview);
            Ok(())
        })
    }

    async fn delete_interview(&self, _token: &AccessToken, id: Uuid) -> Result<(), ApiError> {
        self.with_state(|s| {
            let before = s.interviews.len();
            s.interviews.retain(|i| i.id != id);
            if s.interviews.len() == before {
                return Err(not_found("Interview"));
            }
            Ok(())
        })
    }

    async fn search_interviews(
        &self,
        _token: &AccessToken,
        params: &SearchParams,
    ) -> Result<Vec<Interview>, ApiError> {
        self.with_state(|s| {
            Ok(s.interviews
                .iter()
                .filter(|i| contains_ci(&i.company, params.get("company")))
                .cloned()
                .collect())
        })
    }
}

/// Real HTTP upstream on an ephemeral port, accepting only `Bearer test-token`.
pub struct FakeUpstream {
    pub base_url: String,
    state: Arc<Mutex<FakeState>>,
}

type Shared = Arc<Mutex<FakeState>>;

const EXPECTED_AUTH: &str = "Bearer test-token";

impl FakeUpstream {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/profiles/current", get(get_profile).put(put_profile))
            .route("/jobs", get(list_jobs).post(create_job))
            .route("/jobs/search", get(search_jobs))
            .route("/jobs/status-counts", get(status_counts))
            .route("/jobs/favorites", get(favorite_jobs))
            .route("/jobs/:id", put(update_job).delete(delete_job))
            .route("/jobs/:id/:action", put(toggle_favorite))
            .route("/interviews", get(list_interviews).post(create_interview))
            .route("/interviews/search", get(search_interviews))
            .route("/interviews/:id", put(update_interview).delete(delete_interview))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub async fn seed_job(&self, title: &str, status: JobStatus) -> Job {
        let job = sample_job(title, status);
        self.state.lock().unwrap().jobs.push(job.clone());
        job
    }

    pub async fn seed_interview(&self, company: &str, date: NaiveDate) -> Interview {
        let interview = sample_interview(company, date);
        self.state.lock().unwrap().interviews.push(interview.clone());
        interview
    }

    /// Makes `GET /interviews` return `body` as-is, whatever its shape.
    pub fn serve_raw_interviews(&self, body: &str) {
        self.state.lock().unwrap().raw_interviews = Some(body.to_string());
    }
}

/// Update body as the backend expects it: the draft plus the record id.
#[derive(Deserialize)]
struct Identified<T> {
    id: Option<Uuid>,
    #[serde(flatten)]
    draft: T,
}

fn id_mismatch() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Invalid data or ID mismatch" })),
    )
        .into_response()
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(EXPECTED_AUTH) => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" }))).into_response()),
    }
}

fn list_or_no_content<T: serde::Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(items).into_response()
    }
}

async fn get_profile(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let profile = s.lock().unwrap().profile.clone();
    Json(profile).into_response()
}

async fn put_profile(State(s): State<Shared>, headers: HeaderMap, Json(profile): Json<Profile>) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    s.lock().unwrap().profile = profile;
    "Profile updated".into_response()
}

async fn list_jobs(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    Json(s.lock().unwrap().jobs.clone()).into_response()
}

async fn create_job(State(s): State<Shared>, headers: HeaderMap, Json(draft): Json<JobDraft>) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    s.lock().unwrap().jobs.push(job_from_draft(Uuid::new_v4(), &draft));
    (StatusCode::CREATED, "Job created successfully").into_response()
}

async fn update_job(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Identified<JobDraft>>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    if body.id != Some(id) {
        return id_mismatch();
    }
    let mut state = s.lock().unwrap();
    match state.jobs.iter_mut().find(|j| j.id == id) {
        Some(slot) => {
            *slot = job_from_draft(id, &body.draft);
            "Job updated successfully".into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Job not found" }))).into_response(),
    }
}

async fn delete_job(State(s): State<Shared>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut state = s.lock().unwrap();
    let before = state.jobs.len();
    state.jobs.retain(|j| j.id != id);
    if state.jobs.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Job not found" }))).into_response();
    }
    "Job deleted successfully".into_response()
}

async fn search_jobs(
    State(s): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let jobs: Vec<Job> = s
        .lock()
        .unwrap()
        .jobs
        .iter()
        .filter(|j| contains_ci(&j.title, params.get("title").map(String::as_str)))
        .cloned()
        .collect();
    list_or_no_content(jobs)
}

async fn status_counts(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut counts: HashMap<String, i64> =
        JobStatus::ALL.iter().map(|st| (st.to_string(), 0)).collect();
    for job in &s.lock().unwrap().jobs {
        *counts.entry(job.status.to_string()).or_insert(0) += 1;
    }
    Json(counts).into_response()
}

async fn favorite_jobs(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let jobs: Vec<Job> = s.lock().unwrap().jobs.iter().filter(|j| j.favorite).cloned().collect();
    list_or_no_content(jobs)
}

async fn toggle_favorite(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path((id, action)): Path<(Uuid, String)>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let favorite = match action.as_str() {
        "favorite" => true,
        "unfavorite" => false,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let mut state = s.lock().unwrap();
    match state.jobs.iter_mut().find(|j| j.id == id) {
        Some(job) => {
            job.favorite = favorite;
            StatusCode::OK.into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Job not found" }))).into_response(),
    }
}

async fn list_interviews(State(s): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let state = s.lock().unwrap();
    match &state.raw_interviews {
        Some(raw) => ([("content-type", "application/json")], raw.clone()).into_response(),
        None => Json(state.interviews.clone()).into_response(),
    }
}

async fn update_interview(
    State(s): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Identified<InterviewDraft>>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    if body.id != Some(id) {
        return id_mismatch();
    }
    let mut state = s.lock().unwrap();
    match state.interviews.iter_mut().find(|i| i.id == id) {
        Some(slot) => {
            *slot = interview_from_draft(id, &body.draft);
            "Interview updated successfully".into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Interview not found" }))).into_response(),
    }
}

async fn delete_interview(State(s): State<Shared>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let mut state = s.lock().unwrap();
    let before = state.interviews.len();
    state.interviews.retain(|i| i.id != id);
    if state.interviews.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Interview not found" }))).into_response();
    }
    "Interview deleted successfully".into_response()
}

async fn create_interview(
    State(s): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<InterviewDraft>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    s.lock()
        .unwrap()
        .interviews
        .push(interview_from_draft(Uuid::new_v4(), &draft));
    (StatusCode::CREATED, "Interview created successfully").into_response()
}

async fn search_interviews(
    State(s): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = check_auth(&headers) {
        return r;
    }
    let interviews: Vec<Interview> = s
        .lock()
        .unwrap()
        .interviews
        .iter()
        .filter(|i| contains_ci(&i.company, params.get("company").map(String::as_str)))
        .cloned()
        .collect();
    list_or_no_content(interviews)
}

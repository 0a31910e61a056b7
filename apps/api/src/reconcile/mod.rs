//! Fallback chain shared by every resource collection:
//! live upstream read → cached snapshot → built-in example set.
//!
//! The snapshot is only ever a copy of the last successful upstream read.
//! It is overwritten on every live success and read only when the live call fails.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::api_client::{AccessToken, ApiError, TrackerApi};
use crate::models::{Interview, Job};
use crate::storage::{scoped_key, SnapshotStore};

pub mod examples;
pub mod view_state;

pub use view_state::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Fresh from upstream.
    Live,
    /// Last-known-good snapshot; upstream was unavailable.
    Cache,
    /// Built-in example data; upstream unavailable and no usable snapshot.
    Example,
}

#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub source: DataSource,
    /// User-facing explanation when the live read failed.
    pub notice: Option<String>,
}

/// A resource collection that goes through the fallback chain.
#[async_trait]
pub trait Collection: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    /// Singular noun used in user-facing messages.
    const RESOURCE: &'static str;
    /// Snapshot key, before per-caller scoping.
    const CACHE_KEY: &'static str;

    fn examples() -> Vec<Self>;

    async fn list(api: &dyn TrackerApi, token: &AccessToken) -> Result<Vec<Self>, ApiError>;
}

#[async_trait]
impl Collection for Job {
    const RESOURCE: &'static str = "job";
    const CACHE_KEY: &'static str = "jobListings";

    fn examples() -> Vec<Self> {
        examples::example_jobs()
    }

    async fn list(api: &dyn TrackerApi, token: &AccessToken) -> Result<Vec<Self>, ApiError> {
        api.list_jobs(token).await
    }
}

#[async_trait]
impl Collection for Interview {
    const RESOURCE: &'static str = "interview";
    const CACHE_KEY: &'static str = "interviewListings";

    fn examples() -> Vec<Self> {
        examples::example_interviews()
    }

    async fn list(api: &dyn TrackerApi, token: &AccessToken) -> Result<Vec<Self>, ApiError> {
        api.list_interviews(token).await
    }
}

#[derive(Clone)]
pub struct Reconciler {
    api: Arc<dyn TrackerApi>,
    store: Arc<dyn SnapshotStore>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn TrackerApi>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &dyn TrackerApi {
        self.api.as_ref()
    }

    /// Runs the fallback chain for `C`. Only authentication failures are returned as errors.
    pub async fn fetch<C: Collection>(&self, token: &AccessToken) -> Result<Fetched<C>, ApiError> {
        let key = scoped_key(C::CACHE_KEY, &token.fingerprint());

        let live_error = match C::list(self.api.as_ref(), token).await {
            Ok(items) => {
                self.save_snapshot(&key, &items).await;
                return Ok(Fetched {
                    items,
                    source: DataSource::Live,
                    notice: None,
                });
            }
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e) => e,
        };

        warn!("Upstream {} list failed, falling back: {live_error}", C::RESOURCE);
        let reason = describe_failure(C::RESOURCE, &live_error);

        if let Some(items) = self.load_snapshot::<C>(&key).await {
            return Ok(Fetched {
                items,
                source: DataSource::Cache,
                notice: Some(format!("{reason} - showing cached data")),
            });
        }

        Ok(Fetched {
            items: C::examples(),
            source: DataSource::Example,
            notice: Some(format!("{reason} - showing example data")),
        })
    }

    async fn save_snapshot<C: Collection>(&self, key: &str, items: &[C]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize {} snapshot: {e}", C::RESOURCE);
                return;
            }
        };
        match self.store.put(key, &json).await {
            Ok(()) => debug!("Saved {} {} snapshot(s) under {key}", items.len(), C::RESOURCE),
            Err(e) => warn!("Could not save {} snapshot: {e}", C::RESOURCE),
        }
    }

    /// A missing, unreadable or unparseable snapshot all read as "no cache".
    async fn load_snapshot<C: Collection>(&self, key: &str) -> Option<Vec<C>> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read {} snapshot: {e}", C::RESOURCE);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("Discarding corrupt {} snapshot: {e}", C::RESOURCE);
                if let Err(e) = self.store.remove(key).await {
                    warn!("Could not remove corrupt {} snapshot: {e}", C::RESOURCE);
                }
                None
            }
        }
    }
}

/// Short explanation of why the live read failed, suitable for showing to the user.
pub fn describe_failure(resource: &str, err: &ApiError) -> String {
    match err {
        ApiError::Decode { .. } => {
            "The server returned an invalid response. Please try again later.".to_string()
        }
        ApiError::Transport(_) => {
            format!("Could not reach the {resource} service. Please check your connection.")
        }
        _ => format!("Failed to load {resource}s from the backend service"),
    }
}

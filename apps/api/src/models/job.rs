use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Lifecycle label of a job application, in pipeline order.
///
/// This is the set the upstream backend seeds its status-count map with.
/// `Accepted` was used by older clients for the same terminal state as `Hired`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Screening,
    Interview,
    Offer,
    Rejected,
    #[serde(alias = "Accepted")]
    Hired,
}

impl JobStatus {
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Screening,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Hired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "Saved",
            JobStatus::Applied => "Applied",
            JobStatus::Screening => "Screening",
            JobStatus::Interview => "Interview",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
            JobStatus::Hired => "Hired",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    /// Case-insensitive; accepts `Accepted` as `Hired`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("accepted") {
            return Ok(JobStatus::Hired);
        }
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown job status '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub min_salary: i64,
    #[serde(default)]
    pub max_salary: i64,
    /// Preformatted salary range, e.g. `$120,000 - $150,000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default)]
    pub level: String,
    /// Older backends omit the status entirely; those jobs read as `Saved`.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Upstream status labels are not uniform across deployments. A missing, null
/// or unrecognised label becomes the default status instead of failing the record.
fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<JobStatus, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(match raw.as_deref().map(str::parse::<JobStatus>) {
        Some(Ok(status)) => status,
        Some(Err(e)) => {
            warn!("{e}, reading as {}", JobStatus::default());
            JobStatus::default()
        }
        None => JobStatus::default(),
    })
}

impl Job {
    /// Case-insensitive substring match on title, company and location.
    pub fn matches_text(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.title, &self.company, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Writable fields of a job, sent on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub min_salary: i64,
    #[serde(default)]
    pub max_salary: i64,
    #[serde(default)]
    pub level: String,
    pub status: JobStatus,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobDraft {
    /// Same acceptance rules the upstream backend applies before persisting.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("title must not be blank");
        }
        if self.level.trim().is_empty() {
            problems.push("level must not be blank");
        }
        if self.location.trim().is_empty() {
            problems.push("location must not be blank");
        }
        if self.min_salary < 0 {
            problems.push("minSalary must not be negative");
        }
        if self.max_salary < self.min_salary {
            problems.push("maxSalary must be at least minSalary");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

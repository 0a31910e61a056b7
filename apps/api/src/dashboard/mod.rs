use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Interview, Job, JobStatus};

pub mod summary;

/// Jobs and interviews each contribute at most this many feed entries.
const FEED_PER_KIND: usize = 3;
const FEED_TOTAL: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobStats {
    pub total: usize,
    /// Every canonical status is present, zero when no job has it.
    pub by_status: BTreeMap<JobStatus, usize>,
    pub favorites: usize,
}

impl JobStats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut by_status = empty_counts();
        for job in jobs {
            *by_status.entry(job.status).or_insert(0) += 1;
        }
        JobStats {
            total: jobs.len(),
            by_status,
            favorites: jobs.iter().filter(|j| j.favorite).count(),
        }
    }

    /// From the upstream pre-aggregated map. Upstream does not report favorites.
    pub fn from_status_counts(counts: &HashMap<String, i64>) -> Self {
        let mut by_status = empty_counts();
        for (label, count) in counts {
            match label.parse::<JobStatus>() {
                Ok(status) => *by_status.entry(status).or_insert(0) += (*count).max(0) as usize,
                Err(e) => warn!("Ignoring status count: {e}"),
            }
        }
        JobStats {
            total: by_status.values().sum(),
            by_status,
            favorites: 0,
        }
    }
}

fn empty_counts() -> BTreeMap<JobStatus, usize> {
    JobStatus::ALL.iter().map(|s| (*s, 0)).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub status: JobStatus,
    pub count: usize,
    pub height: f64,
}

/// Bar height per status, scaled so the tallest bar fills `container_height`.
pub fn bar_heights(by_status: &BTreeMap<JobStatus, usize>, container_height: f64) -> Vec<Bar> {
    let max_count = by_status.values().copied().max().unwrap_or(0).max(1);
    by_status
        .iter()
        .map(|(status, count)| Bar {
            status: *status,
            count: *count,
            height: *count as f64 / max_count as f64 * container_height,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct InterviewPartition {
    /// Soonest first.
    pub upcoming: Vec<Interview>,
    /// Most recent first.
    pub past: Vec<Interview>,
}

/// Upcoming means the interview date is `today` or later.
pub fn partition_interviews(interviews: &[Interview], today: NaiveDate) -> InterviewPartition {
    let (mut upcoming, mut past): (Vec<_>, Vec<_>) =
        interviews.iter().cloned().partition(|i| i.date >= today);
    upcoming.sort_by_key(|i| i.starts_at());
    past.sort_by_key(|i| Reverse(i.starts_at()));
    InterviewPartition { upcoming, past }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Job,
    Interview,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub id: Uuid,
    pub company: String,
    pub headline: String,
    pub at: Option<DateTime<Utc>>,
}

/// Most recent jobs and interviews merged into one feed, newest first.
/// Entries without a timestamp sort last.
pub fn activity_feed(jobs: &[Job], interviews: &[Interview]) -> Vec<Activity> {
    let mut recent_jobs: Vec<&Job> = jobs.iter().collect();
    recent_jobs.sort_by_key(|j| Reverse(j.updated_at));

    let mut recent_interviews: Vec<&Interview> = interviews.iter().collect();
    recent_interviews.sort_by_key(|i| Reverse(i.starts_at()));

    let mut feed: Vec<Activity> = recent_jobs
        .into_iter()
        .take(FEED_PER_KIND)
        .map(|job| Activity {
            kind: ActivityKind::Job,
            id: job.id,
            company: job.company.clone(),
            headline: format!("{} ({})", job.title, job.status),
            at: job.updated_at,
        })
        .chain(
            recent_interviews
                .into_iter()
                .take(FEED_PER_KIND)
                .map(|interview| Activity {
                    kind: ActivityKind::Interview,
                    id: interview.id,
                    company: interview.company.clone(),
                    headline: format!("{} interview", interview.round.label()),
                    at: Some(interview.starts_at().and_utc()),
                }),
        )
        .collect();

    feed.sort_by_key(|a| Reverse(a.at));
    feed.truncate(FEED_TOTAL);
    feed
}

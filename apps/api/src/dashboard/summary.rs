use chrono::NaiveDate;
use serde::Serialize;

use super::{activity_feed, bar_heights, partition_interviews, Activity, Bar, JobStats};
use crate::models::{Interview, Job};
use crate::reconcile::{DataSource, Fetched};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: JobStats,
    pub pipeline: Vec<Bar>,
    pub pending_interviews: usize,
    pub upcoming_interviews: Vec<Interview>,
    pub recent_activity: Vec<Activity>,
    pub jobs_source: DataSource,
    pub interviews_source: DataSource,
    pub notices: Vec<String>,
}

/// Derives every dashboard figure from the already reconciled collections, so the
/// numbers always agree with what the list views show.
pub fn build_summary(
    jobs: Fetched<Job>,
    interviews: Fetched<Interview>,
    today: NaiveDate,
    chart_height: f64,
) -> DashboardSummary {
    let stats = JobStats::from_jobs(&jobs.items);
    let pipeline = bar_heights(&stats.by_status, chart_height);
    let partition = partition_interviews(&interviews.items, today);
    let recent_activity = activity_feed(&jobs.items, &interviews.items);

    DashboardSummary {
        stats,
        pipeline,
        pending_interviews: partition.upcoming.len(),
        upcoming_interviews: partition.upcoming,
        recent_activity,
        jobs_source: jobs.source,
        interviews_source: interviews.source,
        notices: jobs.notice.into_iter().chain(interviews.notice).collect(),
    }
}

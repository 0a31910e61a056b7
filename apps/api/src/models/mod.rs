pub mod interview;
pub mod job;
pub mod profile;

pub use interview::{Interview, InterviewDraft, InterviewFormat, InterviewRound};
pub use job::{Job, JobDraft, JobStatus};
pub use profile::Profile;

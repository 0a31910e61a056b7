use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{Interview, InterviewFormat, InterviewRound, Job, JobStatus};

/// Shown when upstream is unreachable and no snapshot exists yet.
pub fn example_jobs() -> Vec<Job> {
    let rows = [
        (
            "Senior Frontend Developer",
            "Google",
            "Mountain View, CA",
            (120_000, 150_000),
            JobStatus::Applied,
            true,
            "We are looking for an experienced Frontend Developer to join our team...",
            (2025, 3, 12),
        ),
        (
            "Full Stack Engineer",
            "Microsoft",
            "Redmond, WA",
            (130_000, 160_000),
            JobStatus::Interview,
            false,
            "Join our team to build innovative solutions using the latest technologies...",
            (2025, 3, 11),
        ),
        (
            "React Developer",
            "Amazon",
            "Seattle, WA",
            (110_000, 140_000),
            JobStatus::Saved,
            true,
            "We are seeking a talented React Developer to help build our next-generation web applications...",
            (2025, 3, 7),
        ),
        (
            "Frontend Engineer",
            "Netflix",
            "Los Gatos, CA",
            (125_000, 155_000),
            JobStatus::Offer,
            false,
            "Join our UI engineering team to create engaging user experiences...",
            (2025, 3, 9),
        ),
        (
            "JavaScript Developer",
            "Meta",
            "Menlo Park, CA",
            (115_000, 145_000),
            JobStatus::Rejected,
            false,
            "We are looking for a JavaScript Developer to join our growing team...",
            (2025, 2, 28),
        ),
    ];

    rows.into_iter()
        .enumerate()
        .map(
            |(i, (title, company, location, (min, max), status, favorite, description, (y, m, d)))| Job {
                id: Uuid::from_u128(0x1000 + i as u128),
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
                min_salary: min,
                max_salary: max,
                salary: Some(salary_range(min, max)),
                level: "Full-time".to_string(),
                status,
                favorite,
                description: Some(description.to_string()),
                updated_at: Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).single(),
            },
        )
        .collect()
}

/// `$120,000 - $150,000`
fn salary_range(min: i64, max: i64) -> String {
    format!("{} - {}", dollars(min), dollars(max))
}

fn dollars(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

pub fn example_interviews() -> Vec<Interview> {
    let rows = [
        ("Google", InterviewFormat::Virtual, InterviewRound::Technical, (2025, 4, 2), (10, 0)),
        ("Microsoft", InterviewFormat::Phone, InterviewRound::Screening, (2025, 3, 20), (14, 30)),
        ("Netflix", InterviewFormat::InPerson, InterviewRound::Final, (2025, 3, 14), (11, 0)),
    ];

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, (company, format, round, (y, m, d), (hh, mm)))| {
            Some(Interview {
                id: Uuid::from_u128(0x2000 + i as u128),
                company: company.to_string(),
                format,
                round,
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                time: NaiveTime::from_hms_opt(hh, mm, 0),
                user_id: None,
            })
        })
        .collect()
}

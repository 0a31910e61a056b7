use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Written as kebab-case. Read case-insensitively, with spaces or underscores
/// in place of hyphens (`In Person`, `hiring manager`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum InterviewFormat {
    Virtual,
    InPerson,
    Phone,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum InterviewRound {
    Screening,
    Technical,
    Hr,
    HiringManager,
    Final,
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split(|c: char| c == ' ' || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl TryFrom<String> for InterviewFormat {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match normalize_label(&raw).as_str() {
            "virtual" => Ok(InterviewFormat::Virtual),
            "in-person" => Ok(InterviewFormat::InPerson),
            "phone" => Ok(InterviewFormat::Phone),
            _ => Err(format!("Unknown interview format '{raw}'")),
        }
    }
}

impl TryFrom<String> for InterviewRound {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match normalize_label(&raw).as_str() {
            "screening" => Ok(InterviewRound::Screening),
            "technical" => Ok(InterviewRound::Technical),
            "hr" => Ok(InterviewRound::Hr),
            "hiring-manager" => Ok(InterviewRound::HiringManager),
            "final" => Ok(InterviewRound::Final),
            _ => Err(format!("Unknown interview round '{raw}'")),
        }
    }
}

impl InterviewRound {
    pub fn label(&self) -> &'static str {
        match self {
            InterviewRound::Screening => "Screening",
            InterviewRound::Technical => "Technical",
            InterviewRound::Hr => "HR",
            InterviewRound::HiringManager => "Hiring manager",
            InterviewRound::Final => "Final",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interview {
    pub id: Uuid,
    #[serde(default)]
    pub company: String,
    pub format: InterviewFormat,
    pub round: InterviewRound,
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    pub time: Option<NaiveTime>,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Interview {
    /// Date and time of the interview; a missing time counts as midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// Writable fields of an interview, sent on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewDraft {
    pub company: String,
    pub format: InterviewFormat,
    pub round: InterviewRound,
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    pub time: Option<NaiveTime>,
}

impl InterviewDraft {
    /// Interviews can only be scheduled for today or later.
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.company.trim().is_empty() {
            return Err("company must not be blank".to_string());
        }
        if self.date < today {
            return Err("Please select a date that is today or in the future".to_string());
        }
        Ok(())
    }
}

/// `HH:MM` or `HH:MM:SS`; empty strings read as no time.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format("%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let raw = match raw.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

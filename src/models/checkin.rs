use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Result of a daily check-in. Absence of a record for a day means
/// "not yet evaluated", which is not the same thing as Lapsed — but both
/// break a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Disciplined,
    Lapsed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Disciplined => "disciplined",
            Outcome::Lapsed => "lapsed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Outcome::Disciplined => "Disciplined",
            Outcome::Lapsed => "Lapsed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disciplined" | "d" | "win" => Ok(Outcome::Disciplined),
            "lapsed" | "l" | "loss" => Ok(Outcome::Lapsed),
            _ => Err(anyhow::anyhow!("Unknown outcome: {}", s)),
        }
    }
}

/// One daily check-in for a subject. At most one per (subject, group, date);
/// a later check-in for the same date replaces the earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: Option<i64>,
    pub subject: String,
    /// Empty string = personal scope (no group).
    pub group: String,
    pub date: NaiveDate,
    pub outcome: Outcome,
    /// Informational only — never enters streak math.
    pub created_at: Option<String>,
}

impl CheckIn {
    pub fn new(subject: &str, group: &str, date: NaiveDate, outcome: Outcome) -> Self {
        Self {
            id: None,
            subject: subject.to_string(),
            group: group.to_string(),
            date,
            outcome,
            created_at: None,
        }
    }
}

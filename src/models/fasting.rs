use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastKind {
    Voluntary,
    Ramadan,
    Makeup,
}

impl FastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FastKind::Voluntary => "voluntary",
            FastKind::Ramadan => "ramadan",
            FastKind::Makeup => "makeup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FastKind::Voluntary => "Voluntary",
            FastKind::Ramadan => "Ramadan",
            FastKind::Makeup => "Make-up",
        }
    }
}

impl FromStr for FastKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voluntary" | "nafl" => Ok(FastKind::Voluntary),
            "ramadan" => Ok(FastKind::Ramadan),
            "makeup" | "qada" => Ok(FastKind::Makeup),
            _ => Err(anyhow::anyhow!("Unknown fast kind: {}", s)),
        }
    }
}

/// One fasted day. At most one row per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastDay {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub kind: FastKind,
    pub note: Option<String>,
}

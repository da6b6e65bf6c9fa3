use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Achievement tier derived from streak and success rate. Streak thresholds
/// take priority over the success-rate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Legend,
    Warrior,
    Strong,
    Consistent,
}

impl Badge {
    pub fn display_name(&self) -> &'static str {
        match self {
            Badge::Legend => "Legend",
            Badge::Warrior => "Warrior",
            Badge::Strong => "Strong",
            Badge::Consistent => "Consistent",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::Legend => "🏆",
            Badge::Warrior => "💪",
            Badge::Strong => "🔥",
            Badge::Consistent => "⭐",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.display_name())
    }
}

/// Leaderboard aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" | "today" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            _ => Err(anyhow::anyhow!("Unknown period: {}", s)),
        }
    }
}

/// Derived statistics bundle for one subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_days: u32,
    /// Rounded percentage in [0, 100].
    pub success_rate: u8,
    pub points: i64,
    pub badge: Option<Badge>,
}

/// One leaderboard row after ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub subject: String,
    pub display_name: String,
    pub rank: u32,
    pub points: i64,
    pub current_streak: u32,
    pub success_rate: u8,
    pub badge: Option<Badge>,
}

//! CRM value objects: small closed vocabularies stored on rows.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Ok(Priority::Low),
            "medium" | "media" | "média" => Ok(Priority::Medium),
            "high" | "alta" => Ok(Priority::High),
            other => Err(format!(
                "Unknown priority '{}'. Valid values: low, medium, high",
                other
            )),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Call,
    Meeting,
    Email,
    Task,
    /// Free-form logged interaction
    Note,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Call,
        ActivityType::Meeting,
        ActivityType::Email,
        ActivityType::Task,
        ActivityType::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Call => "CALL",
            ActivityType::Meeting => "MEETING",
            ActivityType::Email => "EMAIL",
            ActivityType::Task => "TASK",
            ActivityType::Note => "NOTE",
        }
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                format!(
                    "Unknown activity type '{}'. Valid values: CALL, MEETING, EMAIL, TASK, NOTE",
                    s.trim()
                )
            })
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle tag a stage can carry (terminal pipeline columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageLifecycle {
    Won,
    Lost,
}

impl StageLifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageLifecycle::Won => "won",
            StageLifecycle::Lost => "lost",
        }
    }
}

/// Derived lifecycle state of a deal
///
/// ```text
/// OPEN ──move──▶ OPEN
///   ├──────────▶ WON  (terminal)
///   └──────────▶ LOST (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Open,
    Won,
    Lost,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Open => "open",
            DealStatus::Won => "won",
            DealStatus::Lost => "lost",
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, DealStatus::Open)
    }
}

impl std::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use std::{fmt::Display, sync::Arc};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Whether a habit's goal counts repetitions or elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Count,
    Duration,
}

impl GoalType {
    /// Unit shown next to goal values in configuration listings.
    pub fn unit_label(&self) -> &'static str {
        match self {
            GoalType::Count => "times",
            GoalType::Duration => "hours",
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalType::Count => write!(f, "count"),
            GoalType::Duration => write!(f, "duration"),
        }
    }
}

/// A named recurring activity. The name doubles as the primary key and is
/// always stored trimmed and lowercase; `default_duration` holds the raw
/// input text used when a log omits the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: u32,
    pub name: Arc<str>,
    pub emoji: String,
    pub default_duration: String,
    pub daily_goal: u32,
    pub goal_type: GoalType,
    pub created_at: DateTime<Utc>,
}

/// One logged occurrence. Duration habits fill `duration` with the
/// normalized rendering of what was parsed; count habits fill `count`.
/// The unused field keeps its zero value so the document layout stays
/// stable either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u32,
    pub habit_id: u32,
    pub habit_name: Arc<str>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub count: u32,
    pub logged_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

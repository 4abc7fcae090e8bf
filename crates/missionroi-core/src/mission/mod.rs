//! Missions and the queue that prioritizes them.
//!
//! A mission moves between three states and is never deleted here.
//!
//! Valid transitions:
//! - QUEUED → ACTIVE (set_active_mission)
//! - ACTIVE → QUEUED (another mission becomes active)
//! - QUEUED/ACTIVE → PAUSED (pause_mission)
//! - PAUSED → QUEUED (resume_mission, never straight to ACTIVE)
//!
//! At most one mission is ACTIVE at a time.

mod orchestrator;
mod priority;

pub use orchestrator::{MissionOrchestrator, OrchestratorSnapshot, QueueSummary, QueueTotals};
pub use priority::{MissionPriority, Prioritization};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mission lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MissionStatus {
    /// Waiting to be picked (initial state)
    #[default]
    Queued,
    /// Currently being worked on
    Active,
    /// Deliberately set aside
    Paused,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Queued => "QUEUED",
            MissionStatus::Active => "ACTIVE",
            MissionStatus::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "queued" => Ok(MissionStatus::Queued),
            "active" => Ok(MissionStatus::Active),
            "paused" => Ok(MissionStatus::Paused),
            other => Err(format!("unknown mission status: {other}")),
        }
    }
}

/// A unit of candidate work with estimated effort and payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionEntry {
    /// Unique identifier
    pub mission_id: String,
    pub description: String,
    /// Estimated cost in minutes
    pub estimated_effort_minutes: i64,
    /// Estimated value in minutes saved or earned
    pub estimated_payoff_minutes: i64,
    pub status: MissionStatus,
    /// Why the mission was paused (only meaningful while PAUSED)
    #[serde(default)]
    pub paused_reason: Option<String>,
    /// Insertion order within the orchestrator; used as the final tie-break
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
}

impl MissionEntry {
    /// Payoff divided by effort; 0.0 when effort is not positive.
    pub fn roi_ratio(&self) -> f64 {
        if self.estimated_effort_minutes <= 0 {
            return 0.0;
        }
        self.estimated_payoff_minutes as f64 / self.estimated_effort_minutes as f64
    }

    pub fn is_active(&self) -> bool {
        self.status == MissionStatus::Active
    }
}

/// Generate a mission id for callers that do not bring their own.
pub fn new_mission_id() -> String {
    let now = Utc::now();
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("mission-{}-{}", now.timestamp(), &uuid[..8])
}

//! Persistent CLI state: the mission queue and today's budget ledger.
//!
//! Stored as JSON at `<data_dir>/state.json`.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use missionroi_core::{data_dir, Budget, MissionOrchestrator, OrchestratorSnapshot};
use serde::{Deserialize, Serialize};

type StoreResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Minutes spent on a given local date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub date: NaiveDate,
    pub used_minutes: i64,
}

impl Ledger {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            used_minutes: 0,
        }
    }

    /// Ledger for `today`; a ledger from an earlier day starts over.
    pub fn for_day(&self, today: NaiveDate) -> Ledger {
        if self.date == today {
            self.clone()
        } else {
            Ledger::fresh(today)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub missions: OrchestratorSnapshot,
    pub ledger: Ledger,
}

impl Default for State {
    fn default() -> Self {
        Self {
            missions: OrchestratorSnapshot::default(),
            ledger: Ledger::fresh(today()),
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn path() -> StoreResult<PathBuf> {
    Ok(data_dir()?.join("state.json"))
}

impl State {
    pub fn load() -> StoreResult<Self> {
        let path = path()?;
        let mut state = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<State>(&content)
                .map_err(|e| format!("corrupt state file {}: {e}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => State::default(),
            Err(e) => return Err(e.into()),
        };
        state.ledger = state.ledger.for_day(today());
        Ok(state)
    }

    pub fn save(&self) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path()?, content)?;
        tracing::debug!(missions = self.missions.missions.len(), "state saved");
        Ok(())
    }

    pub fn orchestrator(&self) -> StoreResult<MissionOrchestrator> {
        Ok(MissionOrchestrator::from_snapshot(self.missions.clone())?)
    }

    /// Today's budget against `daily_minutes`.
    pub fn budget(&self, daily_minutes: i64) -> StoreResult<Budget> {
        Ok(Budget::new(daily_minutes, self.ledger.used_minutes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_rolls_over_on_new_day() {
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let ledger = Ledger {
            date: yesterday,
            used_minutes: 300,
        };
        assert_eq!(ledger.for_day(yesterday).used_minutes, 300);
        let rolled = ledger.for_day(today);
        assert_eq!(rolled.used_minutes, 0);
        assert_eq!(rolled.date, today);
    }

    #[test]
    fn state_without_missions_parses() {
        let state: State =
            serde_json::from_str(r#"{"ledger":{"date":"2026-03-02","used_minutes":45}}"#).unwrap();
        assert!(state.missions.missions.is_empty());
        assert_eq!(state.budget(480).unwrap().remaining_minutes(), 435);
    }
}

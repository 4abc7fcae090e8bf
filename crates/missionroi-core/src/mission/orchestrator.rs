//! Mission queue with lifecycle management and prioritization.
//!
//! All state sits behind one mutex: mutations are serialized against each
//! other and against prioritization, which always sees a consistent
//! snapshot. Prioritization never mutates a mission.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::priority::{self, Prioritization};
use super::{MissionEntry, MissionStatus};
use crate::error::{CoreError, Result};

/// Counts of missions per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueSummary {
    pub active_count: usize,
    pub queued_count: usize,
    pub paused_count: usize,
}

/// Queue counts, active mission and effort totals read under one lock.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueTotals {
    pub summary: QueueSummary,
    pub active_mission_id: Option<String>,
    pub queued_effort_minutes: i64,
    pub paused_effort_minutes: i64,
}

/// Serializable copy of the orchestrator's missions, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorSnapshot {
    pub missions: Vec<MissionEntry>,
}

#[derive(Debug, Default)]
struct QueueState {
    /// Kept in insertion order
    missions: Vec<MissionEntry>,
    next_sequence: u64,
}

impl QueueState {
    fn find(&self, mission_id: &str) -> Option<usize> {
        self.missions.iter().position(|m| m.mission_id == mission_id)
    }

    fn find_or_not_found(&self, mission_id: &str) -> Result<usize> {
        self.find(mission_id)
            .ok_or_else(|| CoreError::NotFound(mission_id.to_string()))
    }
}

/// Owns the mission set. Create one per queue and pass it where needed.
#[derive(Debug, Default)]
pub struct MissionOrchestrator {
    state: Mutex<QueueState>,
}

impl MissionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an orchestrator from a snapshot.
    ///
    /// # Errors
    ///
    /// `Conflict` on duplicate ids; `InvalidInput` on non-positive estimates
    /// or more than one ACTIVE mission.
    pub fn from_snapshot(snapshot: OrchestratorSnapshot) -> Result<Self> {
        let mut missions = snapshot.missions;
        missions.sort_by_key(|m| m.sequence);

        let mut seen = HashSet::new();
        let mut active = 0;
        for m in &missions {
            validate_estimates(m.estimated_effort_minutes, m.estimated_payoff_minutes)?;
            if !seen.insert(m.mission_id.as_str()) {
                return Err(CoreError::Conflict(m.mission_id.clone()));
            }
            if m.is_active() {
                active += 1;
            }
        }
        if active > 1 {
            return Err(CoreError::invalid(
                "missions",
                format!("{active} missions are ACTIVE; at most one is allowed"),
            ));
        }

        let next_sequence = missions.last().map(|m| m.sequence + 1).unwrap_or(0);
        tracing::debug!(count = missions.len(), "mission queue restored");
        Ok(Self {
            state: Mutex::new(QueueState {
                missions,
                next_sequence,
            }),
        })
    }

    /// Copy of every mission in insertion order.
    pub fn snapshot(&self) -> OrchestratorSnapshot {
        OrchestratorSnapshot {
            missions: self.state().missions.clone(),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        // Every mutation validates before touching state, so a poisoned
        // lock still guards a consistent mission set.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a new QUEUED mission.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id or non-positive estimates, `Conflict`
    /// when the id is already tracked.
    pub fn add_mission(
        &self,
        description: impl Into<String>,
        effort_minutes: i64,
        payoff_minutes: i64,
        mission_id: impl Into<String>,
    ) -> Result<MissionEntry> {
        let mission_id = mission_id.into();
        if mission_id.trim().is_empty() {
            return Err(CoreError::invalid("mission_id", "must not be empty"));
        }
        validate_estimates(effort_minutes, payoff_minutes)?;

        let mut state = self.state();
        if state.find(&mission_id).is_some() {
            return Err(CoreError::Conflict(mission_id));
        }

        let now = Utc::now();
        let entry = MissionEntry {
            mission_id,
            description: description.into(),
            estimated_effort_minutes: effort_minutes,
            estimated_payoff_minutes: payoff_minutes,
            status: MissionStatus::Queued,
            paused_reason: None,
            sequence: state.next_sequence,
            created_at: now,
            updated_at: now,
            paused_at: None,
        };
        state.next_sequence += 1;
        state.missions.push(entry.clone());

        tracing::info!(
            mission_id = %entry.mission_id,
            effort = effort_minutes,
            payoff = payoff_minutes,
            "mission queued"
        );
        Ok(entry)
    }

    /// Pause a mission, recording why.
    ///
    /// Pausing an already paused mission only replaces the reason. Pausing
    /// the ACTIVE mission leaves the queue with no active mission.
    pub fn pause_mission(&self, mission_id: &str, reason: Option<String>) -> Result<MissionEntry> {
        let mut state = self.state();
        let idx = state.find_or_not_found(mission_id)?;
        let entry = &mut state.missions[idx];

        let now = Utc::now();
        if entry.status != MissionStatus::Paused {
            entry.paused_at = Some(now);
        }
        entry.status = MissionStatus::Paused;
        entry.paused_reason = reason;
        entry.updated_at = now;

        tracing::info!(
            mission_id,
            reason = entry.paused_reason.as_deref().unwrap_or(""),
            "mission paused"
        );
        Ok(entry.clone())
    }

    /// Return a PAUSED mission to the queue. Never activates it.
    ///
    /// QUEUED and ACTIVE missions are returned unchanged.
    pub fn resume_mission(&self, mission_id: &str) -> Result<MissionEntry> {
        let mut state = self.state();
        let idx = state.find_or_not_found(mission_id)?;
        let entry = &mut state.missions[idx];

        if entry.status == MissionStatus::Paused {
            entry.status = MissionStatus::Queued;
            entry.paused_reason = None;
            entry.paused_at = None;
            entry.updated_at = Utc::now();
            tracing::info!(mission_id, "mission resumed");
        }
        Ok(entry.clone())
    }

    /// Make `mission_id` the single ACTIVE mission.
    ///
    /// The previously active mission (if any) goes back to QUEUED in the
    /// same critical section.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids; `InvalidInput` when the target is PAUSED
    /// (resume it first).
    pub fn set_active_mission(&self, mission_id: &str) -> Result<MissionEntry> {
        let mut state = self.state();
        let idx = state.find_or_not_found(mission_id)?;
        match state.missions[idx].status {
            MissionStatus::Active => return Ok(state.missions[idx].clone()),
            MissionStatus::Paused => {
                return Err(CoreError::invalid(
                    "mission_id",
                    format!("mission '{mission_id}' is paused; resume it before activating"),
                ))
            }
            MissionStatus::Queued => {}
        }

        let now = Utc::now();
        for m in state.missions.iter_mut().filter(|m| m.is_active()) {
            m.status = MissionStatus::Queued;
            m.updated_at = now;
            tracing::info!(mission_id = %m.mission_id, "mission demoted to queue");
        }

        let entry = &mut state.missions[idx];
        entry.status = MissionStatus::Active;
        entry.updated_at = now;
        tracing::info!(mission_id, "mission activated");
        Ok(entry.clone())
    }

    pub fn get_mission(&self, mission_id: &str) -> Result<MissionEntry> {
        let state = self.state();
        let idx = state.find_or_not_found(mission_id)?;
        Ok(state.missions[idx].clone())
    }

    pub fn get_missions_by_status(&self, status: MissionStatus) -> Vec<MissionEntry> {
        self.state()
            .missions
            .iter()
            .filter(|m| m.status == status)
            .cloned()
            .collect()
    }

    pub fn get_active_mission(&self) -> Option<MissionEntry> {
        self.state().missions.iter().find(|m| m.is_active()).cloned()
    }

    /// Rank QUEUED missions that fit in `available_budget_minutes`.
    ///
    /// Pass the fatigue-adjusted capacity (see
    /// [`FatigueScore::effective_capacity_minutes`](crate::fatigue::FatigueScore::effective_capacity_minutes)).
    /// Read-only: calling it twice on an unchanged queue yields the same
    /// result.
    pub fn prioritize_missions(
        &self,
        available_budget_minutes: i64,
        max_recommendations: usize,
    ) -> Result<Prioritization> {
        if available_budget_minutes < 0 {
            return Err(CoreError::invalid(
                "available_budget_minutes",
                format!("must be >= 0, got {available_budget_minutes}"),
            ));
        }
        let state = self.state();
        let result = priority::prioritize(
            &state.missions,
            available_budget_minutes,
            max_recommendations,
        );
        tracing::debug!(
            available_budget_minutes,
            ranked = result.priorities.len(),
            over_budget = result.over_budget.len(),
            "missions prioritized"
        );
        Ok(result)
    }

    /// Paused missions whose payoff exceeds their effort.
    pub fn get_deferred_good_ideas(&self) -> Vec<MissionEntry> {
        self.state()
            .missions
            .iter()
            .filter(|m| m.status == MissionStatus::Paused && m.roi_ratio() > 1.0)
            .cloned()
            .collect()
    }

    /// Mean ROI across every tracked mission; 0.0 for an empty queue.
    pub fn get_portfolio_roi(&self) -> f64 {
        let state = self.state();
        if state.missions.is_empty() {
            return 0.0;
        }
        let total: f64 = state.missions.iter().map(MissionEntry::roi_ratio).sum();
        total / state.missions.len() as f64
    }

    pub fn get_queue_summary(&self) -> QueueSummary {
        self.queue_totals().summary
    }

    /// Consistent view of counts, the active id and effort totals.
    pub fn queue_totals(&self) -> QueueTotals {
        let state = self.state();
        let mut totals = QueueTotals::default();
        for m in &state.missions {
            match m.status {
                MissionStatus::Active => {
                    totals.summary.active_count += 1;
                    totals.active_mission_id = Some(m.mission_id.clone());
                }
                MissionStatus::Queued => {
                    totals.summary.queued_count += 1;
                    totals.queued_effort_minutes += m.estimated_effort_minutes;
                }
                MissionStatus::Paused => {
                    totals.summary.paused_count += 1;
                    totals.paused_effort_minutes += m.estimated_effort_minutes;
                }
            }
        }
        totals
    }

    /// Sum of effort estimates for missions in `status`.
    pub fn total_effort(&self, status: MissionStatus) -> i64 {
        self.state()
            .missions
            .iter()
            .filter(|m| m.status == status)
            .map(|m| m.estimated_effort_minutes)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.state().missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().missions.is_empty()
    }
}

fn validate_estimates(effort_minutes: i64, payoff_minutes: i64) -> Result<()> {
    if effort_minutes <= 0 {
        return Err(CoreError::invalid(
            "effort_minutes",
            format!("must be positive, got {effort_minutes}"),
        ));
    }
    if payoff_minutes <= 0 {
        return Err(CoreError::invalid(
            "payoff_minutes",
            format!("must be positive, got {payoff_minutes}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MissionOrchestrator {
        let orch = MissionOrchestrator::new();
        orch.add_mission("A", 30, 90, "a").unwrap();
        orch.add_mission("B", 60, 120, "b").unwrap();
        orch.add_mission("C", 90, 90, "c").unwrap();
        orch
    }

    fn statuses(orch: &MissionOrchestrator) -> Vec<(String, MissionStatus)> {
        orch.snapshot()
            .missions
            .into_iter()
            .map(|m| (m.mission_id, m.status))
            .collect()
    }

    #[test]
    fn add_starts_queued() {
        let orch = MissionOrchestrator::new();
        let entry = orch.add_mission("Write docs", 30, 60, "docs").unwrap();
        assert_eq!(entry.status, MissionStatus::Queued);
        assert_eq!(entry.sequence, 0);
        assert_eq!(orch.len(), 1);
    }

    #[test]
    fn add_rejects_invalid_estimates_without_mutating() {
        let orch = MissionOrchestrator::new();
        assert!(matches!(
            orch.add_mission("x", 0, 60, "x"),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            orch.add_mission("x", 30, -1, "x"),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            orch.add_mission("x", 30, 60, "  "),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(orch.is_empty());
    }

    #[test]
    fn duplicate_id_conflicts() {
        let orch = seeded();
        let err = orch.add_mission("again", 10, 10, "a").unwrap_err();
        assert!(matches!(err, CoreError::Conflict(id) if id == "a"));
        assert_eq!(orch.len(), 3);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let orch = seeded();
        assert!(matches!(orch.pause_mission("zz", None), Err(CoreError::NotFound(_))));
        assert!(matches!(orch.resume_mission("zz"), Err(CoreError::NotFound(_))));
        assert!(matches!(orch.set_active_mission("zz"), Err(CoreError::NotFound(_))));
        assert!(matches!(orch.get_mission("zz"), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn pause_is_idempotent_and_updates_reason() {
        let orch = seeded();
        orch.pause_mission("b", Some("blocked".into())).unwrap();
        let again = orch.pause_mission("b", Some("still blocked".into())).unwrap();
        assert_eq!(again.status, MissionStatus::Paused);
        assert_eq!(again.paused_reason.as_deref(), Some("still blocked"));
        assert_eq!(orch.len(), 3);
        assert_eq!(orch.get_missions_by_status(MissionStatus::Paused).len(), 1);
    }

    #[test]
    fn resume_returns_to_queue_without_activating() {
        let orch = seeded();
        orch.pause_mission("a", None).unwrap();
        let resumed = orch.resume_mission("a").unwrap();
        assert_eq!(resumed.status, MissionStatus::Queued);
        assert!(resumed.paused_reason.is_none());
        assert!(orch.get_active_mission().is_none());
    }

    #[test]
    fn resume_leaves_active_mission_alone() {
        let orch = seeded();
        orch.set_active_mission("a").unwrap();
        assert_eq!(orch.resume_mission("a").unwrap().status, MissionStatus::Active);
    }

    #[test]
    fn set_active_demotes_previous() {
        let orch = seeded();
        orch.set_active_mission("a").unwrap();
        orch.set_active_mission("b").unwrap();
        assert_eq!(orch.get_mission("a").unwrap().status, MissionStatus::Queued);
        assert_eq!(orch.get_active_mission().unwrap().mission_id, "b");
        assert_eq!(orch.get_queue_summary().active_count, 1);
    }

    #[test]
    fn set_active_rejects_paused_target() {
        let orch = seeded();
        orch.set_active_mission("a").unwrap();
        orch.pause_mission("b", None).unwrap();
        assert!(matches!(
            orch.set_active_mission("b"),
            Err(CoreError::InvalidInput { .. })
        ));
        assert_eq!(orch.get_active_mission().unwrap().mission_id, "a");
    }

    #[test]
    fn pausing_active_clears_active_slot() {
        let orch = seeded();
        orch.set_active_mission("c").unwrap();
        orch.pause_mission("c", Some("context switch".into())).unwrap();
        assert!(orch.get_active_mission().is_none());
    }

    #[test]
    fn prioritize_has_no_side_effects() {
        let orch = seeded();
        orch.set_active_mission("c").unwrap();
        orch.pause_mission("b", None).unwrap();
        let before = statuses(&orch);
        let first = orch.prioritize_missions(120, 3).unwrap();
        let second = orch.prioritize_missions(120, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(statuses(&orch), before);
        assert_eq!(first.mission_at_rank(1), Some("a"));
        assert_eq!(first.priorities.len(), 1);
    }

    #[test]
    fn prioritize_rejects_negative_budget() {
        let orch = seeded();
        assert!(orch.prioritize_missions(-1, 3).is_err());
    }

    #[test]
    fn deferred_good_ideas_are_paused_positive_roi() {
        let orch = seeded();
        orch.add_mission("meh", 60, 30, "meh").unwrap();
        orch.pause_mission("a", None).unwrap();
        orch.pause_mission("c", None).unwrap();
        orch.pause_mission("meh", None).unwrap();
        let ideas: Vec<String> = orch
            .get_deferred_good_ideas()
            .into_iter()
            .map(|m| m.mission_id)
            .collect();
        // c has ROI exactly 1.0, meh is below
        assert_eq!(ideas, vec!["a".to_string()]);

        orch.resume_mission("a").unwrap();
        assert!(orch.get_deferred_good_ideas().is_empty());
    }

    #[test]
    fn portfolio_roi_is_mean_over_all_statuses() {
        let orch = seeded();
        orch.pause_mission("b", None).unwrap();
        assert!((orch.get_portfolio_roi() - 2.0).abs() < 1e-12);
        assert_eq!(MissionOrchestrator::new().get_portfolio_roi(), 0.0);
    }

    #[test]
    fn summary_and_effort_totals() {
        let orch = seeded();
        orch.set_active_mission("a").unwrap();
        orch.pause_mission("c", None).unwrap();
        assert_eq!(
            orch.get_queue_summary(),
            QueueSummary {
                active_count: 1,
                queued_count: 1,
                paused_count: 1
            }
        );
        assert_eq!(orch.total_effort(MissionStatus::Queued), 60);
        assert_eq!(orch.total_effort(MissionStatus::Paused), 90);
    }

    #[test]
    fn queue_totals_match_summary_and_efforts() {
        let orch = seeded();
        orch.set_active_mission("a").unwrap();
        orch.pause_mission("c", None).unwrap();
        let totals = orch.queue_totals();
        assert_eq!(totals.summary, orch.get_queue_summary());
        assert_eq!(totals.active_mission_id.as_deref(), Some("a"));
        assert_eq!(totals.queued_effort_minutes, 60);
        assert_eq!(totals.paused_effort_minutes, 90);
    }

    #[test]
    fn queue_totals_stay_consistent_under_concurrent_mutation() {
        let orch = std::sync::Arc::new(MissionOrchestrator::new());
        for i in 0..4 {
            orch.add_mission("m", 10, 20, format!("m{i}")).unwrap();
        }

        let writer = {
            let orch = std::sync::Arc::clone(&orch);
            std::thread::spawn(move || {
                for round in 0..500 {
                    let id = format!("m{}", round % 4);
                    if round % 3 == 0 {
                        orch.pause_mission(&id, None).unwrap();
                    } else {
                        orch.resume_mission(&id).unwrap();
                        let _ = orch.set_active_mission(&id);
                    }
                }
            })
        };

        for _ in 0..500 {
            let totals = orch.queue_totals();
            let s = totals.summary;
            assert_eq!(s.active_count + s.queued_count + s.paused_count, 4);
            assert_eq!(s.active_count == 1, totals.active_mission_id.is_some());
            assert_eq!(totals.queued_effort_minutes, 10 * s.queued_count as i64);
            assert_eq!(totals.paused_effort_minutes, 10 * s.paused_count as i64);
        }
        writer.join().unwrap();
    }

    #[test]
    fn snapshot_round_trip_preserves_order_and_sequence() {
        let orch = seeded();
        orch.set_active_mission("b").unwrap();
        let json = serde_json::to_string(&orch.snapshot()).unwrap();
        let restored =
            MissionOrchestrator::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(statuses(&restored), statuses(&orch));
        let next = restored.add_mission("D", 10, 10, "d").unwrap();
        assert_eq!(next.sequence, 3);
    }

    #[test]
    fn snapshot_with_two_active_is_rejected() {
        let orch = seeded();
        let mut snapshot = orch.snapshot();
        snapshot.missions[0].status = MissionStatus::Active;
        snapshot.missions[1].status = MissionStatus::Active;
        assert!(MissionOrchestrator::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn snapshot_with_duplicate_ids_conflicts() {
        let orch = seeded();
        let mut snapshot = orch.snapshot();
        snapshot.missions[1].mission_id = "a".into();
        assert!(matches!(
            MissionOrchestrator::from_snapshot(snapshot),
            Err(CoreError::Conflict(_))
        ));
    }
}

//! Deterministic ROI ranking of queued missions.
//!
//! Ordering is total: ROI descending, then lower effort, then insertion
//! order. ROIs are compared by cross-multiplying the integer estimates so
//! equal ratios (2/3 and 4/6) tie exactly instead of by float rounding.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{MissionEntry, MissionStatus};

/// One ranked (or over-budget) candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPriority {
    pub mission_id: String,
    /// 1-based rank; 0 for missions that do not fit the budget
    pub rank: usize,
    /// ROI ratio used for ordering
    pub score: f64,
    pub reason: String,
    pub fits_budget: bool,
    pub estimated_effort_minutes: i64,
}

/// Result of a prioritization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prioritization {
    /// Affordable missions, ranked `1..=N`
    pub priorities: Vec<MissionPriority>,
    /// Queued missions whose effort exceeds the available budget
    pub over_budget: Vec<MissionPriority>,
    pub available_budget_minutes: i64,
    pub rationale: String,
}

impl Prioritization {
    /// Mission id at a 1-based rank, if any.
    pub fn mission_at_rank(&self, rank: usize) -> Option<&str> {
        self.priorities
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.mission_id.as_str())
    }

    pub fn top(&self) -> Option<&MissionPriority> {
        self.priorities.first()
    }
}

/// `(payoff, effort)` with a guard so non-positive effort reads as ROI 0.
fn roi_parts(entry: &MissionEntry) -> (i128, i128) {
    if entry.estimated_effort_minutes <= 0 {
        (0, 1)
    } else {
        (
            entry.estimated_payoff_minutes as i128,
            entry.estimated_effort_minutes as i128,
        )
    }
}

fn compare_candidates(a: &MissionEntry, b: &MissionEntry) -> Ordering {
    let (a_pay, a_eff) = roi_parts(a);
    let (b_pay, b_eff) = roi_parts(b);
    (b_pay * a_eff)
        .cmp(&(a_pay * b_eff))
        .then_with(|| a.estimated_effort_minutes.cmp(&b.estimated_effort_minutes))
        .then_with(|| a.sequence.cmp(&b.sequence))
}

fn describe(entry: &MissionEntry, fits: bool, available: i64) -> String {
    let roi = entry.roi_ratio();
    if fits {
        format!(
            "ROI {:.2} ({}m payoff for {}m effort)",
            roi, entry.estimated_payoff_minutes, entry.estimated_effort_minutes
        )
    } else {
        format!(
            "ROI {:.2} but needs {}m with only {}m available",
            roi, entry.estimated_effort_minutes, available
        )
    }
}

/// Rank the QUEUED missions in `missions`.
///
/// Non-QUEUED entries are ignored. Callers are expected to have validated
/// `available_budget_minutes >= 0`.
pub(crate) fn prioritize(
    missions: &[MissionEntry],
    available_budget_minutes: i64,
    max_recommendations: usize,
) -> Prioritization {
    let mut candidates: Vec<&MissionEntry> = missions
        .iter()
        .filter(|m| m.status == MissionStatus::Queued)
        .collect();
    candidates.sort_by(|a, b| compare_candidates(a, b));

    let (fitting, too_big): (Vec<&MissionEntry>, Vec<&MissionEntry>) = candidates
        .into_iter()
        .partition(|m| m.estimated_effort_minutes <= available_budget_minutes);

    let priorities: Vec<MissionPriority> = fitting
        .iter()
        .take(max_recommendations)
        .enumerate()
        .map(|(i, m)| MissionPriority {
            mission_id: m.mission_id.clone(),
            rank: i + 1,
            score: m.roi_ratio(),
            reason: describe(m, true, available_budget_minutes),
            fits_budget: true,
            estimated_effort_minutes: m.estimated_effort_minutes,
        })
        .collect();

    let over_budget: Vec<MissionPriority> = too_big
        .iter()
        .map(|m| MissionPriority {
            mission_id: m.mission_id.clone(),
            rank: 0,
            score: m.roi_ratio(),
            reason: describe(m, false, available_budget_minutes),
            fits_budget: false,
            estimated_effort_minutes: m.estimated_effort_minutes,
        })
        .collect();

    let rationale = build_rationale(
        &priorities,
        fitting.len(),
        &over_budget,
        available_budget_minutes,
    );

    Prioritization {
        priorities,
        over_budget,
        available_budget_minutes,
        rationale,
    }
}

fn build_rationale(
    priorities: &[MissionPriority],
    fitting: usize,
    over_budget: &[MissionPriority],
    available: i64,
) -> String {
    let mut parts = Vec::new();
    match priorities.first() {
        Some(top) => parts.push(format!(
            "Work on '{}' next: highest ROI ({:.2}) that fits in {}m.",
            top.mission_id, top.score, available
        )),
        None if fitting == 0 && over_budget.is_empty() => {
            parts.push("No queued missions to prioritize.".to_string())
        }
        None if fitting == 0 => parts.push(format!(
            "No queued mission fits in {}m of available budget.",
            available
        )),
        None => parts.push("No recommendations requested.".to_string()),
    }
    if fitting > priorities.len() {
        parts.push(format!(
            "{} more affordable mission(s) not shown.",
            fitting - priorities.len()
        ));
    }
    if !over_budget.is_empty() {
        let best = &over_budget[0];
        parts.push(format!(
            "{} good idea(s) don't fit the budget yet (best: '{}', ROI {:.2}).",
            over_budget.len(),
            best.mission_id,
            best.score
        ));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mission(id: &str, effort: i64, payoff: i64, sequence: u64) -> MissionEntry {
        let now = Utc::now();
        MissionEntry {
            mission_id: id.into(),
            description: id.into(),
            estimated_effort_minutes: effort,
            estimated_payoff_minutes: payoff,
            status: MissionStatus::Queued,
            paused_reason: None,
            sequence,
            created_at: now,
            updated_at: now,
            paused_at: None,
        }
    }

    fn ids(p: &Prioritization) -> Vec<&str> {
        p.priorities.iter().map(|m| m.mission_id.as_str()).collect()
    }

    #[test]
    fn ranks_by_roi_descending() {
        let missions = vec![
            mission("c", 90, 90, 0),
            mission("a", 30, 90, 1),
            mission("b", 60, 120, 2),
        ];
        let result = prioritize(&missions, 120, 10);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert_eq!(
            result.priorities.iter().map(|p| p.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(result.priorities[0].score, 3.0);
    }

    #[test]
    fn equal_roi_prefers_lower_effort_then_insertion() {
        let missions = vec![
            mission("big", 60, 120, 0),
            mission("small", 30, 60, 1),
            mission("small-later", 30, 60, 2),
        ];
        let result = prioritize(&missions, 480, 10);
        assert_eq!(ids(&result), vec!["small", "small-later", "big"]);
    }

    #[test]
    fn equal_ratios_tie_exactly() {
        // 2/3 and 4/6 must compare equal so effort decides.
        let missions = vec![mission("x", 6, 4, 0), mission("y", 3, 2, 1)];
        let result = prioritize(&missions, 480, 10);
        assert_eq!(ids(&result), vec!["y", "x"]);
    }

    #[test]
    fn over_budget_missions_are_reported_not_ranked() {
        let missions = vec![mission("huge", 300, 3000, 0), mission("small", 20, 30, 1)];
        let result = prioritize(&missions, 60, 10);
        assert_eq!(ids(&result), vec!["small"]);
        assert_eq!(result.over_budget.len(), 1);
        assert_eq!(result.over_budget[0].mission_id, "huge");
        assert_eq!(result.over_budget[0].rank, 0);
        assert!(!result.over_budget[0].fits_budget);
        assert!(result.rationale.contains("huge"));
    }

    #[test]
    fn nothing_fits_leaves_rank_one_empty() {
        let missions = vec![mission("huge", 300, 3000, 0)];
        let result = prioritize(&missions, 60, 3);
        assert!(result.priorities.is_empty());
        assert!(result.mission_at_rank(1).is_none());
        assert!(result.rationale.contains("No queued mission fits"));
    }

    #[test]
    fn truncates_to_max_recommendations() {
        let missions: Vec<MissionEntry> = (0..5)
            .map(|i| mission(&format!("m{i}"), 10 + i as i64, 100, i))
            .collect();
        let result = prioritize(&missions, 480, 2);
        assert_eq!(result.priorities.len(), 2);
        assert!(result.rationale.contains("3 more affordable"));
    }

    #[test]
    fn skips_non_queued() {
        let mut paused = mission("p", 10, 100, 0);
        paused.status = MissionStatus::Paused;
        let mut active = mission("act", 10, 100, 1);
        active.status = MissionStatus::Active;
        let missions = vec![paused, active, mission("q", 10, 20, 2)];
        let result = prioritize(&missions, 480, 10);
        assert_eq!(ids(&result), vec!["q"]);
        assert!(result.over_budget.is_empty());
    }

    #[test]
    fn empty_queue_rationale() {
        let result = prioritize(&[], 480, 3);
        assert_eq!(result.rationale, "No queued missions to prioritize.");
    }
}

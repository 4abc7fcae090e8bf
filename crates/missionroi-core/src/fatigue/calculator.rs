//! Budget exhaustion to fatigue tier mapping.
//!
//! Tiers use half-open bounds on `used / total`, with the top tier closed
//! at 1.0 (and anything beyond):
//!
//! ```text
//! [0.00, 0.20) FRESH      x1.00  COMPLEX
//! [0.20, 0.60) NORMAL     x0.85  MEDIUM
//! [0.60, 0.85) TIRED      x0.60  SIMPLE
//! [0.85, 1.00] EXHAUSTED  x0.30  NONE
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::budget::Budget;
use crate::error::{CoreError, Result};

/// Tier boundaries in percent of the total budget.
const NORMAL_FROM_PCT: i64 = 20;
const TIRED_FROM_PCT: i64 = 60;
const EXHAUSTED_FROM_PCT: i64 = 85;

/// Discretized capacity-degradation tier, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FatigueState {
    Fresh,
    Normal,
    Tired,
    Exhausted,
}

impl FatigueState {
    pub const ALL: [FatigueState; 4] = [
        FatigueState::Fresh,
        FatigueState::Normal,
        FatigueState::Tired,
        FatigueState::Exhausted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueState::Fresh => "FRESH",
            FatigueState::Normal => "NORMAL",
            FatigueState::Tired => "TIRED",
            FatigueState::Exhausted => "EXHAUSTED",
        }
    }

    pub fn capacity_multiplier(&self) -> f64 {
        match self {
            FatigueState::Fresh => 1.0,
            FatigueState::Normal => 0.85,
            FatigueState::Tired => 0.60,
            FatigueState::Exhausted => 0.30,
        }
    }

    /// Capacity multiplier in whole percent, for exact minute arithmetic.
    fn capacity_pct(&self) -> i64 {
        match self {
            FatigueState::Fresh => 100,
            FatigueState::Normal => 85,
            FatigueState::Tired => 60,
            FatigueState::Exhausted => 30,
        }
    }

    pub fn complexity_ceiling(&self) -> Complexity {
        match self {
            FatigueState::Fresh => Complexity::Complex,
            FatigueState::Normal => Complexity::Medium,
            FatigueState::Tired => Complexity::Simple,
            FatigueState::Exhausted => Complexity::None,
        }
    }

    fn recommendation(&self) -> &'static str {
        match self {
            FatigueState::Fresh => "Full capacity: take on the most complex, highest-ROI mission now.",
            FatigueState::Normal => "Good capacity: prefer medium-complexity missions and keep the queue moving.",
            FatigueState::Tired => "Reduced capacity: stick to simple, well-understood missions and defer risky work.",
            FatigueState::Exhausted => "Budget exhausted: stop starting new missions and capture notes for tomorrow.",
        }
    }

    fn ordinal(&self) -> usize {
        match self {
            FatigueState::Fresh => 0,
            FatigueState::Normal => 1,
            FatigueState::Tired => 2,
            FatigueState::Exhausted => 3,
        }
    }
}

impl fmt::Display for FatigueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Work complexity, ordered. `None` as a ceiling means no new work fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Complexity {
    None,
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::None => "NONE",
            Complexity::Simple => "SIMPLE",
            Complexity::Medium => "MEDIUM",
            Complexity::Complex => "COMPLEX",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Fatigue derived from a budget. Never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueScore {
    pub state: FatigueState,
    /// `used / total`, clamped to `[0, 1]`
    pub exhaustion_ratio: f64,
    pub capacity_multiplier: f64,
    pub complexity_ceiling: Complexity,
    pub recommendation: String,
}

impl FatigueScore {
    pub(crate) fn for_state(state: FatigueState, exhaustion_ratio: f64) -> Self {
        Self {
            state,
            exhaustion_ratio,
            capacity_multiplier: state.capacity_multiplier(),
            complexity_ceiling: state.complexity_ceiling(),
            recommendation: state.recommendation().to_string(),
        }
    }

    pub fn can_accept_new_mission(&self) -> bool {
        self.state != FatigueState::Exhausted
    }

    pub fn is_budget_exhausted(&self) -> bool {
        self.state == FatigueState::Exhausted
    }

    /// Whether work of the given complexity is within the current ceiling.
    pub fn can_handle(&self, complexity: Complexity) -> bool {
        complexity <= self.complexity_ceiling
    }

    /// Remaining minutes of the budget discounted by the capacity multiplier.
    ///
    /// This is the figure to hand to mission prioritization.
    pub fn effective_capacity_minutes(&self, budget: &Budget) -> i64 {
        budget.remaining_minutes().max(0) * self.state.capacity_pct() / 100
    }
}

/// Error rate and decision quality expected at a fatigue tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityImpact {
    pub error_rate: f64,
    pub decision_quality: f64,
}

const FRESH_QUALITY: QualityImpact = QualityImpact {
    error_rate: 0.02,
    decision_quality: 1.0,
};
const EXHAUSTED_QUALITY: QualityImpact = QualityImpact {
    error_rate: 0.40,
    decision_quality: 0.50,
};

/// Quality impact of a fatigue tier.
///
/// The two middle tiers sit on the straight line between the FRESH and
/// EXHAUSTED endpoints, spaced evenly by tier.
pub fn quality_impact(state: FatigueState) -> QualityImpact {
    let t = state.ordinal() as f64 / (FatigueState::ALL.len() - 1) as f64;
    QualityImpact {
        error_rate: FRESH_QUALITY.error_rate
            + (EXHAUSTED_QUALITY.error_rate - FRESH_QUALITY.error_rate) * t,
        decision_quality: FRESH_QUALITY.decision_quality
            + (EXHAUSTED_QUALITY.decision_quality - FRESH_QUALITY.decision_quality) * t,
    }
}

/// Discount an ROI by the current capacity multiplier.
pub fn adjust_roi_for_fatigue(roi: f64, score: &FatigueScore) -> f64 {
    roi * score.capacity_multiplier
}

/// Pure mapping from [`Budget`] to [`FatigueScore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FatigueCalculator;

impl FatigueCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Score a budget.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `total_minutes <= 0`; a zero-minute day
    /// is a misconfiguration, not an exhausted one.
    pub fn calculate(&self, budget: &Budget) -> Result<FatigueScore> {
        let total = budget.total_minutes();
        if total <= 0 {
            return Err(CoreError::invalid(
                "total_minutes",
                format!("must be positive, got {total}"),
            ));
        }
        let used = budget.used_minutes();

        // Integer comparison keeps the tier boundaries exact.
        let used_pct = used as i128 * 100;
        let total = total as i128;
        let state = if used_pct < total * NORMAL_FROM_PCT as i128 {
            FatigueState::Fresh
        } else if used_pct < total * TIRED_FROM_PCT as i128 {
            FatigueState::Normal
        } else if used_pct < total * EXHAUSTED_FROM_PCT as i128 {
            FatigueState::Tired
        } else {
            FatigueState::Exhausted
        };

        let ratio = (used as f64 / budget.total_minutes() as f64).clamp(0.0, 1.0);
        tracing::debug!(
            used_minutes = used,
            total_minutes = budget.total_minutes(),
            state = %state,
            "fatigue calculated"
        );
        Ok(FatigueScore::for_state(state, ratio))
    }
}

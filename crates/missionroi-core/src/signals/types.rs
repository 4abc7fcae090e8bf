//! Signal records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::fatigue::{Budget, FatigueScore, FatigueState};
use crate::mission::{MissionOrchestrator, Prioritization};
use crate::tradeoff::{CognitiveLoad, Decision, TradeoffScore, ValueType};

pub const ORCHESTRATION_SOURCE: &str = "mission_orchestrator";
pub const TRADEOFF_SOURCE: &str = "tradeoff_engine";

/// Layer of the system a signal describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLayer {
    Orchestration,
    Economic,
}

/// Stream a signal belongs to; each stream is its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    MissionPrioritization,
    EconomicTradeoff,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::MissionPrioritization => "mission_prioritization",
            SignalKind::EconomicTradeoff => "economic_tradeoff",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.jsonl", self.as_str())
    }
}

/// Any signal, tagged by `signal_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal_type", rename_all = "snake_case")]
pub enum Signal {
    MissionPrioritization(MissionPrioritizationSignal),
    EconomicTradeoff(EconomicTradeoffSignal),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::MissionPrioritization(_) => SignalKind::MissionPrioritization,
            Signal::EconomicTradeoff(_) => SignalKind::EconomicTradeoff,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Signal::MissionPrioritization(s) => s.created_at,
            Signal::EconomicTradeoff(s) => s.created_at,
        }
    }
}

/// Queue state and top picks after a prioritization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPrioritizationSignal {
    pub signal_layer: SignalLayer,
    pub signal_source: String,
    pub active_mission_id: Option<String>,
    pub queued_count: usize,
    pub paused_count: usize,
    pub budget_used_pct: i64,
    pub fatigue_state: FatigueState,
    pub top_priority_rank_1: Option<String>,
    pub top_priority_rank_2: Option<String>,
    pub top_priority_rank_3: Option<String>,
    pub total_queued_effort_minutes: i64,
    pub total_paused_effort_minutes: i64,
    pub recommendation: String,
    pub work_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MissionPrioritizationSignal {
    /// Build the signal from the queue and the pass that ranked it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive budget total or an empty `work_id`.
    pub fn from_queue(
        orchestrator: &MissionOrchestrator,
        budget: &Budget,
        fatigue: &FatigueScore,
        prioritization: &Prioritization,
        work_id: Option<String>,
    ) -> Result<Self> {
        if budget.total_minutes() <= 0 {
            return Err(CoreError::invalid(
                "total_minutes",
                "budget total must be positive",
            ));
        }
        let work_id = validate_work_id(work_id)?;

        let totals = orchestrator.queue_totals();
        let used_pct = (budget.used_minutes() as f64 * 100.0 / budget.total_minutes() as f64)
            .round() as i64;
        let rank = |r: usize| prioritization.mission_at_rank(r).map(str::to_string);

        let recommendation = if fatigue.is_budget_exhausted() {
            fatigue.recommendation.clone()
        } else {
            format!("{} {}", prioritization.rationale, fatigue.recommendation)
        };

        Ok(Self {
            signal_layer: SignalLayer::Orchestration,
            signal_source: ORCHESTRATION_SOURCE.to_string(),
            active_mission_id: totals.active_mission_id,
            queued_count: totals.summary.queued_count,
            paused_count: totals.summary.paused_count,
            budget_used_pct: used_pct,
            fatigue_state: fatigue.state,
            top_priority_rank_1: rank(1),
            top_priority_rank_2: rank(2),
            top_priority_rank_3: rank(3),
            total_queued_effort_minutes: totals.queued_effort_minutes,
            total_paused_effort_minutes: totals.paused_effort_minutes,
            recommendation,
            work_id,
            created_at: Utc::now(),
        })
    }
}

/// Decision details carried by a tradeoff signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffPayload {
    pub decision: Decision,
    pub adjusted_value: f64,
    pub roi_ratio: f64,
    pub opportunity_cost_score: f64,
    pub cognitive_load: CognitiveLoad,
    pub value_type: ValueType,
    pub rationale: String,
    pub key_factors: Vec<String>,
}

/// One tradeoff evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicTradeoffSignal {
    pub signal_layer: SignalLayer,
    pub signal_source: String,
    pub payload: TradeoffPayload,
    pub work_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EconomicTradeoffSignal {
    /// # Errors
    ///
    /// `InvalidInput` for non-finite scores, an opportunity cost outside
    /// `[0, 1]`, an empty rationale or an empty `work_id`.
    pub fn from_score(score: &TradeoffScore, work_id: Option<String>) -> Result<Self> {
        if !score.adjusted_value.is_finite() || !score.roi_ratio.is_finite() {
            return Err(CoreError::invalid("payload", "scores must be finite"));
        }
        if !(0.0..=1.0).contains(&score.opportunity_cost_score) {
            return Err(CoreError::invalid(
                "opportunity_cost_score",
                format!("must be within [0, 1], got {}", score.opportunity_cost_score),
            ));
        }
        if score.rationale.trim().is_empty() {
            return Err(CoreError::invalid("rationale", "must not be empty"));
        }
        let work_id = validate_work_id(work_id)?;

        Ok(Self {
            signal_layer: SignalLayer::Economic,
            signal_source: TRADEOFF_SOURCE.to_string(),
            payload: TradeoffPayload {
                decision: score.decision,
                adjusted_value: score.adjusted_value,
                roi_ratio: score.roi_ratio,
                opportunity_cost_score: score.opportunity_cost_score,
                cognitive_load: score.cognitive_load,
                value_type: score.value_type,
                rationale: score.rationale.clone(),
                key_factors: score.key_factors.clone(),
            },
            work_id,
            created_at: Utc::now(),
        })
    }
}

fn validate_work_id(work_id: Option<String>) -> Result<Option<String>> {
    match work_id {
        Some(id) if id.trim().is_empty() => {
            Err(CoreError::invalid("work_id", "must not be empty when set"))
        }
        other => Ok(other),
    }
}

//! Economic tradeoff evaluation for one-off opportunities.
//!
//! An opportunity (value, cost, confidence, risk) is scored into a
//! PROCEED / PAUSE / REJECT recommendation with a fatigue-adjusted value.
//! The result is advisory; nothing here retries or acts on it.

mod evaluator;

pub use evaluator::TradeoffEvaluator;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fatigue::Complexity;

/// Recommendation for an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Proceed,
    Pause,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Proceed => "PROCEED",
            Decision::Pause => "PAUSE",
            Decision::Reject => "REJECT",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Mental effort an opportunity demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CognitiveLoad {
    Low,
    Medium,
    High,
}

impl CognitiveLoad {
    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveLoad::Low => "LOW",
            CognitiveLoad::Medium => "MEDIUM",
            CognitiveLoad::High => "HIGH",
        }
    }

    /// Complexity tier this load needs from the fatigue ceiling.
    pub fn required_complexity(&self) -> Complexity {
        match self {
            CognitiveLoad::Low => Complexity::Simple,
            CognitiveLoad::Medium => Complexity::Medium,
            CognitiveLoad::High => Complexity::Complex,
        }
    }

    fn bumped(self) -> Self {
        match self {
            CognitiveLoad::Low => CognitiveLoad::Medium,
            CognitiveLoad::Medium | CognitiveLoad::High => CognitiveLoad::High,
        }
    }
}

impl fmt::Display for CognitiveLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// What kind of return an opportunity produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Revenue,
    TimeSavings,
    Learning,
    Maintenance,
    Strategic,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Revenue => "REVENUE",
            ValueType::TimeSavings => "TIME_SAVINGS",
            ValueType::Learning => "LEARNING",
            ValueType::Maintenance => "MAINTENANCE",
            ValueType::Strategic => "STRATEGIC",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A candidate opportunity. Supplied per call, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffOpportunity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Expected payoff, in minutes
    pub estimated_value: f64,
    /// Expected cost, in minutes
    pub estimated_cost: f64,
    /// Probability the value materializes, `[0, 1]`
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Chance of the effort being wasted outright, `[0, 1]`
    #[serde(default)]
    pub risk: f64,
    /// Value of the best alternative use of the same time, if known
    #[serde(default)]
    pub next_best_alternative_value: Option<f64>,
}

fn default_confidence() -> f64 {
    1.0
}

impl TradeoffOpportunity {
    pub fn new(name: impl Into<String>, estimated_value: f64, estimated_cost: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            estimated_value,
            estimated_cost,
            confidence: default_confidence(),
            risk: 0.0,
            next_best_alternative_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_risk(mut self, risk: f64) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_alternative(mut self, value: f64) -> Self {
        self.next_best_alternative_value = Some(value);
        self
    }
}

/// Outcome of evaluating one opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffScore {
    pub decision: Decision,
    pub adjusted_value: f64,
    pub roi_ratio: f64,
    /// Share of combined value foregone by not taking the alternative, `[0, 1]`
    pub opportunity_cost_score: f64,
    pub cognitive_load: CognitiveLoad,
    pub value_type: ValueType,
    /// Explanation only; never used for control flow
    pub rationale: String,
    pub key_factors: Vec<String>,
}

/// Thresholds for the tradeoff decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffConfig {
    /// Minimum fatigue-adjusted net value (minutes) to proceed
    #[serde(default = "default_min_adjusted_value")]
    pub min_adjusted_value: f64,
    /// Minimum fatigue-adjusted ROI to proceed
    #[serde(default = "default_min_roi")]
    pub min_roi: f64,
    /// Minimum confidence to proceed
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Opportunity cost above which the opportunity cannot proceed
    #[serde(default = "default_max_opportunity_cost")]
    pub max_opportunity_cost: f64,
    /// Opportunity cost at or above which the opportunity is rejected
    #[serde(default = "default_reject_opportunity_cost")]
    pub reject_opportunity_cost: f64,
}

fn default_min_adjusted_value() -> f64 {
    15.0
}
fn default_min_roi() -> f64 {
    1.2
}
fn default_min_confidence() -> f64 {
    0.5
}
fn default_max_opportunity_cost() -> f64 {
    0.5
}
fn default_reject_opportunity_cost() -> f64 {
    0.6
}

impl Default for TradeoffConfig {
    fn default() -> Self {
        Self {
            min_adjusted_value: default_min_adjusted_value(),
            min_roi: default_min_roi(),
            min_confidence: default_min_confidence(),
            max_opportunity_cost: default_max_opportunity_cost(),
            reject_opportunity_cost: default_reject_opportunity_cost(),
        }
    }
}

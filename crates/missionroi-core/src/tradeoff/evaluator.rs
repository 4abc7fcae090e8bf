//! Tradeoff evaluator.
//!
//! Scoring steps for one opportunity:
//! 1. `roi = value / cost`
//! 2. `net = value * confidence * (1 - risk) - cost`
//! 3. positive `net` is discounted by the fatigue capacity multiplier, and
//!    halved again when the cognitive load is above the complexity ceiling
//! 4. opportunity cost compares the result against the next-best
//!    alternative: `alt / (alt + adjusted)`
//! 5. REJECT when `value * (1 - risk) - cost` is not positive or the
//!    alternative dominates, PROCEED when every threshold clears, PAUSE
//!    otherwise (including value that only low confidence sinks)

use super::{
    CognitiveLoad, Decision, TradeoffConfig, TradeoffOpportunity, TradeoffScore, ValueType,
};
use crate::error::{CoreError, Result};
use crate::fatigue::{Budget, FatigueCalculator, FatigueScore, FatigueState};

/// Penalty applied when the load is above what the current fatigue allows.
const OVERLOAD_PENALTY: f64 = 0.5;

/// Cost thresholds (minutes) for cognitive load classification.
const LOW_LOAD_BELOW_MINUTES: f64 = 30.0;
const MEDIUM_LOAD_BELOW_MINUTES: f64 = 120.0;

const REVENUE_KEYWORDS: &[&str] = &[
    "revenue", "sale", "customer", "pricing", "billing", "invoice", "contract", "client",
];
const TIME_SAVINGS_KEYWORDS: &[&str] = &[
    "automat", "script", "faster", "speed", "optimi", "tooling", "cache", "pipeline",
];
const MAINTENANCE_KEYWORDS: &[&str] = &[
    "fix", "bug", "refactor", "upgrade", "cleanup", "maintenance", "debt", "patch",
];
const LEARNING_KEYWORDS: &[&str] = &[
    "learn", "research", "explore", "prototype", "spike", "study", "experiment",
];

/// Scores opportunities under a fixed fatigue context.
#[derive(Debug, Clone)]
pub struct TradeoffEvaluator {
    config: TradeoffConfig,
    fatigue: FatigueScore,
    /// Remaining budget minutes; `None` means affordability is not checked
    remaining_minutes: Option<i64>,
}

impl TradeoffEvaluator {
    /// Evaluator with no budget context: FRESH and unbounded.
    pub fn new(config: TradeoffConfig) -> Self {
        Self {
            config,
            fatigue: FatigueScore::for_state(FatigueState::Fresh, 0.0),
            remaining_minutes: None,
        }
    }

    /// Evaluator whose fatigue and affordability come from `budget`.
    pub fn for_budget(config: TradeoffConfig, budget: &Budget) -> Result<Self> {
        let fatigue = FatigueCalculator::new().calculate(budget)?;
        Ok(Self {
            config,
            fatigue,
            remaining_minutes: Some(budget.remaining_minutes()),
        })
    }

    pub fn config(&self) -> &TradeoffConfig {
        &self.config
    }

    pub fn fatigue(&self) -> &FatigueScore {
        &self.fatigue
    }

    /// Evaluate each opportunity independently.
    pub fn evaluate_multiple(
        &self,
        opportunities: &[TradeoffOpportunity],
    ) -> Result<Vec<TradeoffScore>> {
        opportunities.iter().map(|o| self.evaluate(o)).collect()
    }

    /// Score a single opportunity.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when cost is not positive, value is not finite, or
    /// confidence/risk fall outside `[0, 1]`.
    pub fn evaluate(&self, opportunity: &TradeoffOpportunity) -> Result<TradeoffScore> {
        validate(opportunity)?;

        let value = opportunity.estimated_value;
        let cost = opportunity.estimated_cost;
        let multiplier = self.fatigue.capacity_multiplier;

        let roi_ratio = value / cost;
        let adjusted_roi = roi_ratio * multiplier;
        let at_risk_net = value * (1.0 - opportunity.risk) - cost;
        let net = value * opportunity.confidence * (1.0 - opportunity.risk) - cost;

        let cognitive_load = classify_load(cost, opportunity.risk);
        let value_type = classify_value(opportunity);
        let within_ceiling = self.fatigue.can_handle(cognitive_load.required_complexity());

        let adjusted_value = if net > 0.0 {
            let discounted = net * multiplier;
            if within_ceiling {
                discounted
            } else {
                discounted * OVERLOAD_PENALTY
            }
        } else {
            net
        };

        let opportunity_cost_score = match opportunity.next_best_alternative_value {
            Some(alt) if alt > 0.0 => alt / (alt + adjusted_value.max(0.0)),
            _ => 0.0,
        };

        let affordable = self
            .remaining_minutes
            .map_or(true, |remaining| cost <= remaining as f64);

        let mut key_factors = vec![
            format!("ROI {:.2}x (fatigue-adjusted {:.2}x)", roi_ratio, adjusted_roi),
            format!(
                "confidence {:.0}%, risk {:.0}%",
                opportunity.confidence * 100.0,
                opportunity.risk * 100.0
            ),
            format!(
                "fatigue {} (capacity x{:.2})",
                self.fatigue.state, multiplier
            ),
        ];
        if !within_ceiling {
            key_factors.push(format!(
                "cognitive load {} exceeds {} ceiling",
                cognitive_load, self.fatigue.complexity_ceiling
            ));
        }
        if opportunity_cost_score > 0.0 {
            key_factors.push(format!(
                "next-best alternative claims {:.0}% of combined value",
                opportunity_cost_score * 100.0
            ));
        }
        if !affordable {
            key_factors.push(format!(
                "cost {:.0}m exceeds {}m remaining",
                cost,
                self.remaining_minutes.unwrap_or_default()
            ));
        }

        // Low confidence alone pauses; only a non-positive value before the
        // confidence discount rejects.
        let (decision, rationale) = if at_risk_net <= 0.0 {
            (
                Decision::Reject,
                format!(
                    "Reject '{}': risk-adjusted value does not cover the {:.0}m cost.",
                    opportunity.name, cost
                ),
            )
        } else if opportunity_cost_score >= self.config.reject_opportunity_cost {
            (
                Decision::Reject,
                format!(
                    "Reject '{}': the next-best alternative is worth more ({:.0}% opportunity cost).",
                    opportunity.name,
                    opportunity_cost_score * 100.0
                ),
            )
        } else {
            let blockers = self.proceed_blockers(
                adjusted_value,
                adjusted_roi,
                opportunity_cost_score,
                opportunity.confidence,
                within_ceiling,
                affordable,
            );
            if blockers.is_empty() {
                (
                    Decision::Proceed,
                    format!(
                        "Proceed with '{}': {:.1}m fatigue-adjusted value at {:.2}x ROI.",
                        opportunity.name, adjusted_value, adjusted_roi
                    ),
                )
            } else {
                (
                    Decision::Pause,
                    format!(
                        "Pause '{}': worth {:.1}m but {}.",
                        opportunity.name,
                        adjusted_value,
                        blockers.join("; ")
                    ),
                )
            }
        };

        tracing::debug!(
            name = %opportunity.name,
            decision = %decision,
            adjusted_value,
            roi_ratio,
            "opportunity evaluated"
        );

        Ok(TradeoffScore {
            decision,
            adjusted_value,
            roi_ratio,
            opportunity_cost_score,
            cognitive_load,
            value_type,
            rationale,
            key_factors,
        })
    }

    fn proceed_blockers(
        &self,
        adjusted_value: f64,
        adjusted_roi: f64,
        opportunity_cost: f64,
        confidence: f64,
        within_ceiling: bool,
        affordable: bool,
    ) -> Vec<String> {
        let cfg = &self.config;
        let mut blockers = Vec::new();
        if self.fatigue.state == FatigueState::Exhausted {
            blockers.push("the budget is exhausted".to_string());
        }
        if !affordable {
            blockers.push("it does not fit the remaining budget".to_string());
        }
        if adjusted_value <= 0.0 {
            blockers.push(format!(
                "at {:.0}% confidence the expected value does not cover the cost",
                confidence * 100.0
            ));
        } else if adjusted_value < cfg.min_adjusted_value {
            blockers.push(format!(
                "adjusted value is below {:.0}m",
                cfg.min_adjusted_value
            ));
        }
        if adjusted_roi < cfg.min_roi {
            blockers.push(format!("adjusted ROI is below {:.2}x", cfg.min_roi));
        }
        if confidence < cfg.min_confidence {
            blockers.push(format!(
                "confidence is below {:.0}%",
                cfg.min_confidence * 100.0
            ));
        }
        if opportunity_cost > cfg.max_opportunity_cost {
            blockers.push("the alternative is nearly as good".to_string());
        }
        if !within_ceiling {
            blockers.push("it is too demanding for current fatigue".to_string());
        }
        blockers
    }
}

fn validate(opportunity: &TradeoffOpportunity) -> Result<()> {
    if !(opportunity.estimated_cost > 0.0 && opportunity.estimated_cost.is_finite()) {
        return Err(CoreError::invalid(
            "estimated_cost",
            format!("must be positive, got {}", opportunity.estimated_cost),
        ));
    }
    if !opportunity.estimated_value.is_finite() {
        return Err(CoreError::invalid("estimated_value", "must be finite"));
    }
    if !(0.0..=1.0).contains(&opportunity.confidence) {
        return Err(CoreError::invalid(
            "confidence",
            format!("must be within [0, 1], got {}", opportunity.confidence),
        ));
    }
    if !(0.0..=1.0).contains(&opportunity.risk) {
        return Err(CoreError::invalid(
            "risk",
            format!("must be within [0, 1], got {}", opportunity.risk),
        ));
    }
    if let Some(alt) = opportunity.next_best_alternative_value {
        if !alt.is_finite() {
            return Err(CoreError::invalid(
                "next_best_alternative_value",
                "must be finite",
            ));
        }
    }
    Ok(())
}

fn classify_load(cost_minutes: f64, risk: f64) -> CognitiveLoad {
    let load = if cost_minutes < LOW_LOAD_BELOW_MINUTES {
        CognitiveLoad::Low
    } else if cost_minutes < MEDIUM_LOAD_BELOW_MINUTES {
        CognitiveLoad::Medium
    } else {
        CognitiveLoad::High
    };
    if risk > 0.5 {
        load.bumped()
    } else {
        load
    }
}

fn classify_value(opportunity: &TradeoffOpportunity) -> ValueType {
    let text = format!(
        "{} {}",
        opportunity.name,
        opportunity.description.as_deref().unwrap_or("")
    )
    .to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if matches(REVENUE_KEYWORDS) {
        ValueType::Revenue
    } else if matches(TIME_SAVINGS_KEYWORDS) {
        ValueType::TimeSavings
    } else if matches(MAINTENANCE_KEYWORDS) {
        ValueType::Maintenance
    } else if matches(LEARNING_KEYWORDS) {
        ValueType::Learning
    } else {
        ValueType::Strategic
    }
}

use clap::Args;
use missionroi_core::signals::SignalKind;
use missionroi_core::{Config, TradeoffEvaluator, TradeoffOpportunity, TradeoffSignalEmitter};

use super::{print_json, signal_sink, CmdResult};
use crate::store::State;

#[derive(Args)]
pub struct TradeoffArgs {
    /// Short name of the opportunity
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    /// Expected value in minutes
    #[arg(long, allow_negative_numbers = true)]
    value: f64,
    /// Expected cost in minutes
    #[arg(long)]
    cost: f64,
    /// Confidence in the estimate, 0..1
    #[arg(long, default_value_t = 1.0)]
    confidence: f64,
    /// Risk of failure, 0..1
    #[arg(long, default_value_t = 0.0)]
    risk: f64,
    /// Value of the next-best use of the same time
    #[arg(long)]
    alternative: Option<f64>,
    /// Correlation id recorded on the emitted signal
    #[arg(long)]
    work_id: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: TradeoffArgs) -> CmdResult {
    let config = Config::load()?;
    let state = State::load()?;
    let budget = state.budget(config.budget.daily_minutes)?;

    let mut opportunity = TradeoffOpportunity::new(args.name, args.value, args.cost)
        .with_confidence(args.confidence)
        .with_risk(args.risk);
    if let Some(description) = args.description {
        opportunity = opportunity.with_description(description);
    }
    if let Some(alternative) = args.alternative {
        opportunity = opportunity.with_alternative(alternative);
    }

    let evaluator = TradeoffEvaluator::for_budget(config.tradeoff.clone(), &budget)?;
    let score = evaluator.evaluate(&opportunity)?;

    let emitter = TradeoffSignalEmitter::new(signal_sink(&config, SignalKind::EconomicTradeoff)?);
    emitter.emit(&score, args.work_id);

    if args.json {
        return print_json(&score);
    }
    println!("{}", score.decision);
    println!("{}", score.rationale);
    println!(
        "value {:.1}m, ROI {:.2}x, opportunity cost {:.0}%, load {}, type {}",
        score.adjusted_value,
        score.roi_ratio,
        score.opportunity_cost_score * 100.0,
        score.cognitive_load,
        score.value_type
    );
    for factor in &score.key_factors {
        println!("  - {factor}");
    }
    Ok(())
}

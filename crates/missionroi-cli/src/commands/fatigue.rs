use clap::Args;
use missionroi_core::{quality_impact, Budget, Complexity, Config, FatigueCalculator, FatigueState};
use serde::Serialize;

use super::{print_json, CmdResult};
use crate::store::State;

#[derive(Args)]
pub struct FatigueArgs {
    /// Minutes used (defaults to today's ledger)
    #[arg(long)]
    used: Option<i64>,
    /// Budget size in minutes (defaults to budget.daily_minutes)
    #[arg(long)]
    total: Option<i64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FatigueView {
    state: FatigueState,
    exhaustion_ratio: f64,
    capacity_multiplier: f64,
    complexity_ceiling: Complexity,
    effective_capacity_minutes: i64,
    can_accept_new_mission: bool,
    error_rate: f64,
    decision_quality: f64,
    recommendation: String,
}

pub fn run(args: FatigueArgs) -> CmdResult {
    let used = match args.used {
        Some(used) => used,
        None => State::load()?.ledger.used_minutes,
    };
    let total = match args.total {
        Some(total) => total,
        None => Config::load()?.budget.daily_minutes,
    };

    let budget = Budget::new(total, used)?;
    let score = FatigueCalculator::new().calculate(&budget)?;
    let quality = quality_impact(score.state);

    let view = FatigueView {
        state: score.state,
        exhaustion_ratio: score.exhaustion_ratio,
        capacity_multiplier: score.capacity_multiplier,
        complexity_ceiling: score.complexity_ceiling,
        effective_capacity_minutes: score.effective_capacity_minutes(&budget),
        can_accept_new_mission: score.can_accept_new_mission(),
        error_rate: quality.error_rate,
        decision_quality: quality.decision_quality,
        recommendation: score.recommendation.clone(),
    };

    if args.json {
        return print_json(&view);
    }
    println!(
        "Fatigue: {} ({:.0}% of {}m used)",
        view.state,
        view.exhaustion_ratio * 100.0,
        total
    );
    println!("Capacity: x{:.2} ({}m effective)", view.capacity_multiplier, view.effective_capacity_minutes);
    println!("Complexity ceiling: {}", view.complexity_ceiling);
    println!(
        "Expected error rate {:.0}%, decision quality {:.0}%",
        view.error_rate * 100.0,
        view.decision_quality * 100.0
    );
    println!("{}", view.recommendation);
    Ok(())
}

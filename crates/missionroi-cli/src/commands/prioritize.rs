use clap::Args;
use missionroi_core::signals::SignalKind;
use missionroi_core::{Config, FatigueCalculator, OrchestrationSignalEmitter};
use serde_json::json;

use super::{print_json, signal_sink, CmdResult};
use crate::store::State;

#[derive(Args)]
pub struct PrioritizeArgs {
    /// Maximum recommendations (defaults to prioritization.max_recommendations)
    #[arg(long)]
    max: Option<usize>,
    /// Correlation id recorded on the emitted signal
    #[arg(long)]
    work_id: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PrioritizeArgs) -> CmdResult {
    let config = Config::load()?;
    let state = State::load()?;
    let orch = state.orchestrator()?;

    let budget = state.budget(config.budget.daily_minutes)?;
    let fatigue = FatigueCalculator::new().calculate(&budget)?;
    let capacity = fatigue.effective_capacity_minutes(&budget);
    let max = args
        .max
        .unwrap_or(config.prioritization.max_recommendations);

    let prioritization = orch.prioritize_missions(capacity, max)?;

    let emitter =
        OrchestrationSignalEmitter::new(signal_sink(&config, SignalKind::MissionPrioritization)?);
    emitter.emit(&orch, &budget, &fatigue, &prioritization, args.work_id);

    if args.json {
        return print_json(&json!({
            "fatigue_state": fatigue.state,
            "effective_capacity_minutes": capacity,
            "prioritization": prioritization,
        }));
    }

    println!(
        "Fatigue {} - {}m effective capacity of {}m remaining",
        fatigue.state,
        capacity,
        budget.remaining_minutes()
    );
    if let Some(active) = orch.get_active_mission() {
        println!("Active: {}", active.mission_id);
    }
    for p in &prioritization.priorities {
        println!("{:>2}. {:<28} {}", p.rank, p.mission_id, p.reason);
    }
    for p in &prioritization.over_budget {
        println!(" -  {:<28} {}", p.mission_id, p.reason);
    }
    println!("{}", prioritization.rationale);
    if !fatigue.can_accept_new_mission() {
        println!("{}", fatigue.recommendation);
    }
    Ok(())
}

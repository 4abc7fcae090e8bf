use clap::Subcommand;
use missionroi_core::mission::new_mission_id;
use missionroi_core::{MissionEntry, MissionStatus};

use super::{print_json, CmdResult};
use crate::store::State;

#[derive(Subcommand)]
pub enum MissionAction {
    /// Queue a new mission
    Add {
        /// What the mission is
        description: String,
        /// Estimated effort in minutes
        #[arg(long)]
        effort: i64,
        /// Estimated payoff in minutes
        #[arg(long)]
        payoff: i64,
        /// Mission id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pause a mission
    Pause {
        id: String,
        /// Why it is paused
        #[arg(long)]
        reason: Option<String>,
    },
    /// Return a paused mission to the queue
    Resume { id: String },
    /// Make a queued mission the active one
    Activate { id: String },
    /// Show a mission
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List missions
    List {
        /// Filter by status (QUEUED, ACTIVE, PAUSED)
        #[arg(long)]
        status: Option<MissionStatus>,
        #[arg(long)]
        json: bool,
    },
    /// Paused missions that are still worth doing
    Deferred {
        #[arg(long)]
        json: bool,
    },
    /// Mission counts per status
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Mean ROI across all missions
    Portfolio,
}

fn print_entry(entry: &MissionEntry) {
    println!(
        "{:<28} {:<7} effort={:>4}m payoff={:>4}m roi={:.2}  {}",
        entry.mission_id,
        entry.status,
        entry.estimated_effort_minutes,
        entry.estimated_payoff_minutes,
        entry.roi_ratio(),
        entry.description
    );
    if let Some(reason) = &entry.paused_reason {
        println!("{:<28} paused: {reason}", "");
    }
}

fn print_entries(entries: &[MissionEntry], json: bool) -> CmdResult {
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No missions.");
    }
    for entry in entries {
        print_entry(entry);
    }
    Ok(())
}

pub fn run(action: MissionAction) -> CmdResult {
    let mut state = State::load()?;
    let orch = state.orchestrator()?;

    let mutated = match action {
        MissionAction::Add {
            description,
            effort,
            payoff,
            id,
            json,
        } => {
            let id = id.unwrap_or_else(new_mission_id);
            let entry = orch.add_mission(description, effort, payoff, id)?;
            if json {
                print_json(&entry)?;
            } else {
                println!("Mission queued: {}", entry.mission_id);
            }
            true
        }
        MissionAction::Pause { id, reason } => {
            let entry = orch.pause_mission(&id, reason)?;
            println!("Mission paused: {}", entry.mission_id);
            true
        }
        MissionAction::Resume { id } => {
            let entry = orch.resume_mission(&id)?;
            println!("Mission {}: {}", entry.status, entry.mission_id);
            true
        }
        MissionAction::Activate { id } => {
            let entry = orch.set_active_mission(&id)?;
            println!("Mission active: {}", entry.mission_id);
            true
        }
        MissionAction::Show { id, json } => {
            let entry = orch.get_mission(&id)?;
            if json {
                print_json(&entry)?;
            } else {
                print_entry(&entry);
            }
            false
        }
        MissionAction::List { status, json } => {
            let entries = match status {
                Some(status) => orch.get_missions_by_status(status),
                None => orch.snapshot().missions,
            };
            print_entries(&entries, json)?;
            false
        }
        MissionAction::Deferred { json } => {
            print_entries(&orch.get_deferred_good_ideas(), json)?;
            false
        }
        MissionAction::Summary { json } => {
            let summary = orch.get_queue_summary();
            if json {
                print_json(&summary)?;
            } else {
                println!("Active: {}", summary.active_count);
                println!("Queued: {}", summary.queued_count);
                println!("Paused: {}", summary.paused_count);
            }
            false
        }
        MissionAction::Portfolio => {
            println!("{:.2}", orch.get_portfolio_roi());
            false
        }
    };

    if mutated {
        state.missions = orch.snapshot();
        state.save()?;
    }
    Ok(())
}

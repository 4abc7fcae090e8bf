use clap::Subcommand;
use missionroi_core::{Budget, Config};
use serde::Serialize;

use super::{print_json, CmdResult};
use crate::store::State;

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show today's budget
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Record minutes spent today
    Use {
        /// Minutes to add to today's usage
        minutes: i64,
    },
    /// Clear today's usage
    Reset,
}

#[derive(Serialize)]
struct BudgetView {
    date: String,
    total_minutes: i64,
    used_minutes: i64,
    remaining_minutes: i64,
    overspent: bool,
}

impl BudgetView {
    fn new(state: &State, budget: &Budget) -> Self {
        Self {
            date: state.ledger.date.to_string(),
            total_minutes: budget.total_minutes(),
            used_minutes: budget.used_minutes(),
            remaining_minutes: budget.remaining_minutes(),
            overspent: budget.is_overspent(),
        }
    }
}

pub fn run(action: BudgetAction) -> CmdResult {
    let config = Config::load()?;
    let mut state = State::load()?;
    let budget = state.budget(config.budget.daily_minutes)?;

    match action {
        BudgetAction::Show { json } => {
            let view = BudgetView::new(&state, &budget);
            if json {
                print_json(&view)?;
            } else {
                println!("Date:      {}", view.date);
                println!("Total:     {}m", view.total_minutes);
                println!("Used:      {}m", view.used_minutes);
                println!("Remaining: {}m", view.remaining_minutes);
                if view.overspent {
                    println!("Over budget by {}m", view.remaining_minutes.saturating_neg());
                }
            }
        }
        BudgetAction::Use { minutes } => {
            let updated = budget.with_additional_usage(minutes)?;
            state.ledger.used_minutes = updated.used_minutes();
            state.save()?;
            tracing::info!(minutes, used = updated.used_minutes(), "budget usage recorded");
            println!(
                "Used {}m of {}m ({}m remaining)",
                updated.used_minutes(),
                updated.total_minutes(),
                updated.remaining_minutes()
            );
            if updated.is_overspent() {
                println!("Over budget by {}m", updated.remaining_minutes().saturating_neg());
            }
        }
        BudgetAction::Reset => {
            state.ledger.used_minutes = 0;
            state.save()?;
            println!("budget reset for {}", state.ledger.date);
        }
    }
    Ok(())
}

//! Daily budget and fatigue model.
//!
//! A [`Budget`] records how many minutes of the day have been spent; the
//! [`FatigueCalculator`] turns it into a [`FatigueScore`] that discounts
//! queue capacity and opportunity value as the day wears on.

mod budget;
mod calculator;

pub use budget::Budget;
pub use calculator::{
    adjust_roi_for_fatigue, quality_impact, Complexity, FatigueCalculator, FatigueScore,
    FatigueState, QualityImpact,
};

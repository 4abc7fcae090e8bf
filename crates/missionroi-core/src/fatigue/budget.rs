//! Immutable minute budget for a working period.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Total vs. consumed minutes for a period (usually one day).
///
/// Budgets are values: every change produces a new `Budget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    total_minutes: i64,
    used_minutes: i64,
}

impl Budget {
    /// Create a budget.
    ///
    /// `total_minutes` is not checked here; the fatigue calculator rejects
    /// non-positive totals when it is asked to score the budget.
    pub fn new(total_minutes: i64, used_minutes: i64) -> Result<Self> {
        if used_minutes < 0 {
            return Err(CoreError::invalid(
                "used_minutes",
                format!("must be >= 0, got {used_minutes}"),
            ));
        }
        Ok(Self {
            total_minutes,
            used_minutes,
        })
    }

    /// A fresh budget with nothing spent yet.
    pub fn fresh(total_minutes: i64) -> Self {
        Self {
            total_minutes,
            used_minutes: 0,
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.total_minutes
    }

    pub fn used_minutes(&self) -> i64 {
        self.used_minutes
    }

    /// Minutes left. Negative when the period is overspent.
    pub fn remaining_minutes(&self) -> i64 {
        self.total_minutes.saturating_sub(self.used_minutes)
    }

    /// Whether more minutes have been used than the period holds.
    pub fn is_overspent(&self) -> bool {
        self.used_minutes > self.total_minutes
    }

    /// `false` when the sum would not fit in an `i64`.
    pub fn can_afford(&self, additional_minutes: i64) -> bool {
        self.used_minutes
            .checked_add(additional_minutes)
            .map_or(false, |used| used <= self.total_minutes)
    }

    /// Return a new budget with `delta` more minutes consumed.
    pub fn with_additional_usage(&self, delta: i64) -> Result<Self> {
        if delta < 0 {
            return Err(CoreError::invalid(
                "delta",
                format!("usage can only grow, got {delta}"),
            ));
        }
        let used_minutes = self.used_minutes.checked_add(delta).ok_or_else(|| {
            CoreError::invalid(
                "delta",
                format!("adding {delta} to {} overflows", self.used_minutes),
            )
        })?;
        Ok(self.with_used(used_minutes))
    }

    /// Return a new budget with usage set to `used_minutes`.
    ///
    /// Usage is monotonic within a period, so lowering it is rejected.
    pub fn update_used(&self, used_minutes: i64) -> Result<Self> {
        if used_minutes < self.used_minutes {
            return Err(CoreError::invalid(
                "used_minutes",
                format!(
                    "cannot decrease usage from {} to {used_minutes}",
                    self.used_minutes
                ),
            ));
        }
        Ok(self.with_used(used_minutes))
    }

    fn with_used(&self, used_minutes: i64) -> Self {
        let next = Self {
            total_minutes: self.total_minutes,
            used_minutes,
        };
        if next.is_overspent() && !self.is_overspent() {
            tracing::warn!(
                used_minutes,
                total_minutes = self.total_minutes,
                remaining_minutes = next.remaining_minutes(),
                "budget overspent"
            );
        }
        next
    }
}

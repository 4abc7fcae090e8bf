//! # MissionROI Core Library
//!
//! This library provides the decision logic for missionroi, a personal
//! mission-queue and economic tradeoff engine. All operations are available
//! via the standalone `missionroi` CLI binary, which is a thin layer over the
//! same core library.
//!
//! ## Architecture
//!
//! - **Fatigue**: A daily minute budget and a four-tier fatigue model that
//!   discounts capacity and value as the budget is spent
//! - **Mission**: A thread-safe queue with at most one active mission and a
//!   deterministic ROI-based prioritizer
//! - **Tradeoff**: Proceed / pause / reject decisions for new opportunities
//! - **Signals**: Append-only JSONL records of every decision
//! - **Storage**: TOML-based configuration and data directory resolution
//!
//! ## Key Components
//!
//! - [`MissionOrchestrator`]: Mission queue and state machine
//! - [`FatigueCalculator`]: Budget to fatigue tier
//! - [`TradeoffEvaluator`]: Opportunity scoring
//! - [`OrchestrationSignalEmitter`] / [`TradeoffSignalEmitter`]: Best-effort signal output
//! - [`Config`]: Application configuration management

pub mod error;
pub mod fatigue;
pub mod mission;
pub mod signals;
pub mod storage;
pub mod tradeoff;

pub use error::{ConfigError, CoreError, Result, SignalWriteError};
pub use fatigue::{
    adjust_roi_for_fatigue, quality_impact, Budget, Complexity, FatigueCalculator, FatigueScore,
    FatigueState, QualityImpact,
};
pub use mission::{
    MissionEntry, MissionOrchestrator, MissionPriority, MissionStatus, OrchestratorSnapshot,
    Prioritization, QueueSummary, QueueTotals,
};
pub use signals::{
    JsonlSignalSink, OrchestrationSignalEmitter, Signal, SignalKind, SignalSink,
    TradeoffSignalEmitter,
};
pub use storage::{data_dir, Config};
pub use tradeoff::{
    CognitiveLoad, Decision, TradeoffConfig, TradeoffEvaluator, TradeoffOpportunity,
    TradeoffScore, ValueType,
};

//! Append-only advisory signals.
//!
//! Every signal is a typed record validated when it is built, serialized as
//! one JSON object per line, one file per stream. Signals are write-once and
//! are never read back into decisions.

mod emitter;
mod sink;
mod types;

pub use emitter::{OrchestrationSignalEmitter, TradeoffSignalEmitter};
pub use sink::{
    read_signals, BackgroundSignalSink, JsonlSignalSink, MemorySignalSink, SignalSink,
};
pub use types::{
    EconomicTradeoffSignal, MissionPrioritizationSignal, Signal, SignalKind, SignalLayer,
    TradeoffPayload, ORCHESTRATION_SOURCE, TRADEOFF_SOURCE,
};

pub mod budget;
pub mod config;
pub mod fatigue;
pub mod mission;
pub mod prioritize;
pub mod tradeoff;

use std::sync::Arc;

use missionroi_core::signals::{JsonlSignalSink, MemorySignalSink, SignalKind, SignalSink};
use missionroi_core::Config;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Sink for `kind`, or a throwaway in-memory sink when signals are disabled.
pub fn signal_sink(
    config: &Config,
    kind: SignalKind,
) -> Result<Arc<dyn SignalSink>, Box<dyn std::error::Error>> {
    if !config.signals.enabled {
        return Ok(Arc::new(MemorySignalSink::new()));
    }
    Ok(Arc::new(JsonlSignalSink::for_stream(config.signals_dir()?, kind)))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Best-effort emitters.
//!
//! Emitters build a signal and hand it to a sink. Any failure (a record
//! that fails validation, a sink that cannot write) is logged and swallowed:
//! the decision that was just made stands regardless.

use std::sync::Arc;

use super::sink::SignalSink;
use super::types::{EconomicTradeoffSignal, MissionPrioritizationSignal, Signal};
use crate::fatigue::{Budget, FatigueScore};
use crate::mission::{MissionOrchestrator, Prioritization};
use crate::tradeoff::TradeoffScore;

/// Emits `mission_prioritization` signals.
#[derive(Clone)]
pub struct OrchestrationSignalEmitter {
    sink: Arc<dyn SignalSink>,
}

impl OrchestrationSignalEmitter {
    pub fn new(sink: Arc<dyn SignalSink>) -> Self {
        Self { sink }
    }

    /// Emit a signal describing `prioritization`.
    ///
    /// Returns the signal when it was written, `None` otherwise.
    pub fn emit(
        &self,
        orchestrator: &MissionOrchestrator,
        budget: &Budget,
        fatigue: &FatigueScore,
        prioritization: &Prioritization,
        work_id: Option<String>,
    ) -> Option<Signal> {
        let record = match MissionPrioritizationSignal::from_queue(
            orchestrator,
            budget,
            fatigue,
            prioritization,
            work_id,
        ) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "invalid prioritization signal not emitted");
                return None;
            }
        };
        write(self.sink.as_ref(), Signal::MissionPrioritization(record))
    }
}

/// Emits `economic_tradeoff` signals.
#[derive(Clone)]
pub struct TradeoffSignalEmitter {
    sink: Arc<dyn SignalSink>,
}

impl TradeoffSignalEmitter {
    pub fn new(sink: Arc<dyn SignalSink>) -> Self {
        Self { sink }
    }

    /// Emit a signal for one evaluated opportunity.
    pub fn emit(&self, score: &TradeoffScore, work_id: Option<String>) -> Option<Signal> {
        let record = match EconomicTradeoffSignal::from_score(score, work_id) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "invalid tradeoff signal not emitted");
                return None;
            }
        };
        write(self.sink.as_ref(), Signal::EconomicTradeoff(record))
    }
}

fn write(sink: &dyn SignalSink, signal: Signal) -> Option<Signal> {
    match sink.append(&signal) {
        Ok(()) => {
            tracing::debug!(signal_type = signal.kind().as_str(), "signal emitted");
            Some(signal)
        }
        Err(e) => {
            tracing::warn!(
                signal_type = signal.kind().as_str(),
                error = %e,
                "signal write failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalWriteError;
    use crate::fatigue::FatigueCalculator;
    use crate::signals::MemorySignalSink;
    use crate::tradeoff::{TradeoffConfig, TradeoffEvaluator, TradeoffOpportunity};

    struct FailingSink;

    impl SignalSink for FailingSink {
        fn append(&self, _signal: &Signal) -> Result<(), SignalWriteError> {
            Err(SignalWriteError::ChannelClosed)
        }
    }

    #[test]
    fn failed_write_does_not_disturb_queue() {
        let orch = MissionOrchestrator::new();
        orch.add_mission("A", 30, 90, "a").unwrap();
        orch.set_active_mission("a").unwrap();
        let budget = Budget::fresh(480);
        let fatigue = FatigueCalculator::new().calculate(&budget).unwrap();
        let p = orch.prioritize_missions(480, 3).unwrap();

        let emitter = OrchestrationSignalEmitter::new(Arc::new(FailingSink));
        assert!(emitter.emit(&orch, &budget, &fatigue, &p, None).is_none());
        assert_eq!(orch.get_active_mission().unwrap().mission_id, "a");
    }

    #[test]
    fn invalid_record_is_not_written() {
        let memory = Arc::new(MemorySignalSink::new());
        let emitter = TradeoffSignalEmitter::new(memory.clone());
        let score = TradeoffEvaluator::new(TradeoffConfig::default())
            .evaluate(&TradeoffOpportunity::new("x", 100.0, 10.0))
            .unwrap();
        assert!(emitter.emit(&score, Some(String::new())).is_none());
        assert!(memory.signals().is_empty());

        assert!(emitter.emit(&score, Some("w-9".into())).is_some());
        assert_eq!(memory.signals().len(), 1);
    }
}

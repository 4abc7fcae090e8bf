//! Integration tests for signal emission to JSONL streams.

use std::sync::Arc;

use missionroi_core::signals::{read_signals, JsonlSignalSink, SignalKind};
use missionroi_core::{
    Budget, Decision, FatigueCalculator, MissionOrchestrator, OrchestrationSignalEmitter, Signal,
    TradeoffConfig, TradeoffEvaluator, TradeoffOpportunity, TradeoffSignalEmitter,
};

#[test]
fn test_prioritization_signal_lands_in_its_stream() {
    let dir = tempfile::tempdir().unwrap();
    let sink = JsonlSignalSink::for_stream(dir.path(), SignalKind::MissionPrioritization);
    let path = sink.path().to_path_buf();
    let emitter = OrchestrationSignalEmitter::new(Arc::new(sink));

    let orch = MissionOrchestrator::new();
    orch.add_mission("Mission A", 30, 90, "a").unwrap();
    orch.add_mission("Mission B", 60, 120, "b").unwrap();
    orch.add_mission("Mission C", 90, 90, "c").unwrap();

    let budget = Budget::new(480, 0).unwrap();
    let fatigue = FatigueCalculator::new().calculate(&budget).unwrap();
    let p = orch
        .prioritize_missions(fatigue.effective_capacity_minutes(&budget), 3)
        .unwrap();

    let emitted = emitter.emit(&orch, &budget, &fatigue, &p, Some("w-42".into()));
    assert!(emitted.is_some());

    let content = std::fs::read_to_string(&path).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(line["signal_type"], "mission_prioritization");
    assert_eq!(line["fatigue_state"], "FRESH");
    assert_eq!(line["queued_count"], 3);
    assert_eq!(line["paused_count"], 0);
    assert_eq!(line["top_priority_rank_1"], "a");
    assert_eq!(line["budget_used_pct"], 0);
    assert_eq!(line["work_id"], "w-42");

    let signals = read_signals(&path).unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(Some(signals[0].clone()), emitted);
}

#[test]
fn test_tradeoff_signals_append_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let sink = JsonlSignalSink::for_stream(dir.path(), SignalKind::EconomicTradeoff);
    let path = sink.path().to_path_buf();
    let emitter = TradeoffSignalEmitter::new(Arc::new(sink));

    let evaluator =
        TradeoffEvaluator::for_budget(TradeoffConfig::default(), &Budget::new(480, 60).unwrap())
            .unwrap();
    let scores = evaluator
        .evaluate_multiple(&[
            TradeoffOpportunity::new("Automate the release pipeline", 300.0, 60.0)
                .with_confidence(0.9)
                .with_risk(0.1),
            TradeoffOpportunity::new("Rewrite the docs site", 20.0, 60.0),
        ])
        .unwrap();
    assert_eq!(scores[0].decision, Decision::Proceed);
    assert_eq!(scores[1].decision, Decision::Reject);

    for score in &scores {
        assert!(emitter.emit(score, None).is_some());
    }

    let decisions: Vec<Decision> = read_signals(&path)
        .unwrap()
        .into_iter()
        .map(|s| match s {
            Signal::EconomicTradeoff(t) => t.payload.decision,
            other => panic!("unexpected signal in tradeoff stream: {other:?}"),
        })
        .collect();
    assert_eq!(decisions, vec![Decision::Proceed, Decision::Reject]);
}

#[test]
fn test_unwritable_stream_does_not_fail_the_decision() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();
    let emitter = TradeoffSignalEmitter::new(Arc::new(JsonlSignalSink::for_stream(
        &blocker,
        SignalKind::EconomicTradeoff,
    )));

    let score = TradeoffEvaluator::new(TradeoffConfig::default())
        .evaluate(&TradeoffOpportunity::new("Close the big client contract", 600.0, 90.0))
        .unwrap();
    assert!(emitter.emit(&score, None).is_none());
    assert_eq!(score.decision, Decision::Proceed);
}

use std::error::Error;

use sitepipe::engine::PendingTriggers;
use sitepipe::pipeline::TaskKind;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn repeated_triggers_coalesce_into_one_rerun() -> TestResult {
    let mut pending = PendingTriggers::new();

    pending.record(TaskKind::Styles);
    pending.record(TaskKind::Pages);
    pending.record(TaskKind::Styles);

    let drained = pending.drain();
    assert_eq!(drained, vec![TaskKind::Styles, TaskKind::Pages]);
    assert!(pending.is_empty());

    Ok(())
}

#[test]
fn drain_on_empty_set_yields_nothing() -> TestResult {
    let mut pending = PendingTriggers::new();

    assert!(pending.is_empty());
    assert!(pending.drain().is_empty());

    Ok(())
}

//! Integration tests for the operation engine's public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use stepline::operation::{FailureHandler, Operation, OperationError, Step, StepOutcome};

fn push(label: &'static str) -> Step<()> {
    Step::new(label, move |_, options| {
        let mut trail: Vec<String> = options.get_as("trail")?.unwrap_or_default();
        trail.push(label.to_string());
        options.insert_as("trail", &trail)?;
        Ok(json!(label))
    })
}

fn trail(value: &Value) -> Vec<String> {
    serde_json::from_value(value["trail"].clone()).unwrap()
}

#[test]
fn steps_run_in_registration_order() {
    let mut op: Operation<()> = Operation::new("order");
    op.register_step(push("a"));
    op.register_steps(vec![push("b"), push("c")]);
    op.register_step(push("d"));

    let report = op.execute(&()).unwrap();

    assert_eq!(trail(&report.options.to_value()), vec!["a", "b", "c", "d"]);
    let positions: Vec<_> = report.steps.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

#[test]
fn result_is_last_step_value() {
    let mut op: Operation<u32> = Operation::new("identity");
    op.step("first", |n, _| Ok(json!(n + 1)));
    op.step("second", |n, _| Ok(json!({ "double": n * 2 })));

    assert_eq!(op.run(&21).unwrap(), json!({ "double": 42 }));
}

#[test]
fn recovered_failure_continues_without_rerunning_the_step() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut op: Operation<()> = Operation::new("recover");
    op.register_step(push("before"));
    op.step("flaky", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("boom"))
    });
    op.on_failure(|failure, _, options| {
        options.insert("recovered_from", failure.step.clone());
        Ok(json!("fallback"))
    });
    op.register_step(push("after"));

    let report = op.execute(&()).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.options.get_str("recovered_from"), Some("flaky"));
    assert_eq!(trail(&report.options.to_value()), vec!["before", "after"]);
    assert_eq!(report.result, json!("after"));
    assert_eq!(report.steps[1].outcome, StepOutcome::Recovered);
    assert_eq!(report.steps[1].error.as_deref(), Some("boom"));
    assert_eq!(report.recovered_count(), 1);
}

#[test]
fn recovering_last_step_yields_handler_value() {
    let mut op: Operation<()> = Operation::new("last");
    op.step("only", |_, _| Err(anyhow::anyhow!("nope")));
    op.on_failure(|_, _, _| Ok(json!("handled")));

    assert_eq!(op.run(&()).unwrap(), json!("handled"));
}

#[test]
fn unhandled_failure_halts_the_run() {
    let reached = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reached);

    let mut op: Operation<()> = Operation::new("halt");
    op.step("ok", |_, _| Ok(json!(1)));
    op.step("bad", |_, _| Err(anyhow::anyhow!("broken pipe")));
    op.step("never", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!(3))
    });

    let err = op.run(&()).unwrap_err();

    assert!(err.is_unhandled());
    assert_eq!(err.position(), 1);
    assert_eq!(err.step_name(), "bad");
    assert_eq!(err.cause().to_string(), "broken pipe");
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}

#[test]
fn handler_on_another_position_does_not_recover() {
    let mut op: Operation<()> = Operation::new("exact");
    op.step("guarded", |_, _| Ok(json!(0)));
    op.on_failure(|_, _, _| Ok(json!("wrong place")));
    op.step("unguarded", |_, _| Err(anyhow::anyhow!("fail")));

    let err = op.run(&()).unwrap_err();
    assert!(matches!(err, OperationError::Unhandled(ref f) if f.position == 1));
}

#[test]
fn failing_handler_reports_recovery_failure() {
    #[derive(Debug, thiserror::Error)]
    #[error("escalated: {0}")]
    struct Escalated(String);

    let mut op: Operation<()> = Operation::new("escalate");
    op.step("first", |_, _| Ok(json!(0)));
    op.step("second", |_, _| Err(anyhow::anyhow!("original")));
    op.on_failure(|failure, _, _| {
        Err(Escalated(failure.cause.to_string()).into())
    });
    op.step("third", |_, _| Ok(json!(2)));

    let err = op.run(&()).unwrap_err();

    assert!(err.is_recovery());
    assert_eq!(err.position(), 1);
    assert_eq!(err.step_name(), "second");
    let escalated = err.downcast_ref::<Escalated>().unwrap();
    assert_eq!(escalated.0, "original");
}

#[test]
fn options_are_fresh_for_every_run() {
    let mut op: Operation<()> = Operation::new("fresh");
    op.step("count", |_, options| {
        let seen = options.len();
        options.insert("touched", true);
        Ok(json!(seen))
    });

    assert_eq!(op.run(&()).unwrap(), json!(0));
    assert_eq!(op.run(&()).unwrap(), json!(0));
}

#[test]
fn concurrent_runs_do_not_share_state() {
    let mut op: Operation<usize> = Operation::new("concurrent");
    op.step("store", |n, options| {
        options.insert("n", *n);
        Ok(Value::Null)
    });
    op.step("fail_on_odd", |n, _| {
        if n % 2 == 1 {
            anyhow::bail!("odd {}", n);
        }
        Ok(Value::Null)
    });
    op.on_failure(|_, _, options| {
        options.insert("odd", true);
        Ok(Value::Null)
    });
    op.step("echo", |_, options| Ok(options.to_value()));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16usize)
            .map(|n| {
                let op = &op;
                scope.spawn(move || (n, op.run(&n).unwrap()))
            })
            .collect();
        for handle in handles {
            let (n, result) = handle.join().unwrap();
            assert_eq!(result["n"], json!(n));
            assert_eq!(result.get("odd").is_some(), n % 2 == 1);
        }
    });
}

#[test]
fn duplicate_handler_registration_last_wins() {
    let mut op: Operation<()> = Operation::new("overwrite");
    op.step("fails", |_, _| Err(anyhow::anyhow!("x")));
    op.register_failure(0, FailureHandler::new(|_, _, _| Ok(json!("first"))));
    op.register_failure(0, FailureHandler::new(|_, _, _| Ok(json!("second"))));

    assert_eq!(op.failures().len(), 1);
    assert_eq!(op.run(&()).unwrap(), json!("second"));
}

#[test]
fn empty_operation_returns_null() {
    let op: Operation<()> = Operation::new("empty");
    let report = op.execute(&()).unwrap();
    assert_eq!(report.result, Value::Null);
    assert!(report.steps.is_empty());
    assert!(report.options.is_empty());
}

#[test]
fn on_failure_before_any_step_guards_position_zero() {
    let mut op: Operation<()> = Operation::new("early");
    assert_eq!(op.on_failure(|_, _, _| Ok(json!("caught"))), 0);
    op.step("fails", |_, _| Err(anyhow::anyhow!("x")));
    assert_eq!(op.run(&()).unwrap(), json!("caught"));
}

#[test]
fn set_steps_and_set_failures_replace_configuration() {
    let mut op: Operation<()> = Operation::new("replace");
    op.step("old", |_, _| Err(anyhow::anyhow!("old")));
    op.on_failure(|_, _, _| Ok(json!("old handler")));

    op.set_steps(vec![Step::anonymous(|_, _| Err(anyhow::anyhow!("new")))]);
    op.set_failures(vec![(0, FailureHandler::new(|_, _, _| Ok(json!("new handler"))))]);

    assert_eq!(op.steps().len(), 1);
    assert_eq!(op.steps()[0].label(0), "step #0");
    assert_eq!(op.run(&()).unwrap(), json!("new handler"));
}

#[test]
fn operation_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Operation<()>>();
    assert_send_sync::<Operation<String>>();
}

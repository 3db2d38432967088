//! Concurrency tests for the execution-unit-scoped context store
//!
//! Two units inside their own scopes must never observe each other's
//! fields, regardless of relative timing; restoration must run on every
//! exit path including unwinding; a spawned unit inherits a copy and then
//! evolves independently.

use scopelog::prelude::*;
use scopelog::{adopt, contextualize, fields, snapshot};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn capture_logger() -> (BoundLogger, MemorySink) {
    let sink = MemorySink::new();
    let config = PipelineConfig {
        colors: false,
        ..PipelineConfig::default()
    };
    let pipeline = Arc::new(Pipeline::with_sink(&config, Box::new(sink.clone())));
    (BoundLogger::new(pipeline, Level::Trace), sink)
}

#[test]
fn test_threads_do_not_observe_each_others_scopes() {
    let (logger, sink) = capture_logger();

    let slow = {
        let logger = logger.clone();
        thread::spawn(move || {
            let _scope = contextualize(fields! { "name" => "a" });
            // sleep twice as long as the other unit; isolation must not
            // depend on timing
            thread::sleep(Duration::from_millis(200));
            logger.info("should contain name").unwrap();
        })
    };

    let fast = {
        let logger = logger.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            logger.info("should not contain name").unwrap();
        })
    };

    slow.join().unwrap();
    fast.join().unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);

    let with_name = lines
        .iter()
        .find(|l| l.contains("should contain name"))
        .unwrap();
    let without_name = lines
        .iter()
        .find(|l| l.contains("should not contain name"))
        .unwrap();

    assert!(with_name.contains("name=\"a\""));
    assert!(!without_name.contains("name="));
}

#[test]
fn test_overlapping_keys_stay_isolated() {
    let (logger, sink) = capture_logger();

    let handles: Vec<_> = ["red", "blue"]
        .into_iter()
        .map(|color| {
            let logger = logger.clone();
            thread::spawn(move || {
                let _scope = contextualize(fields! { "team" => color });
                thread::sleep(Duration::from_millis(50));
                logger
                    .info_with("scoring", fields! { "who" => color })
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for line in sink.lines() {
        if line.contains("who=\"red\"") {
            assert!(line.contains("team=\"red\""));
        } else {
            assert!(line.contains("team=\"blue\""));
        }
    }
}

#[test]
fn test_scope_releases_during_unwind() {
    let before = snapshot();

    let result = std::panic::catch_unwind(|| {
        let _scope = contextualize(fields! { "tx" => 99 });
        panic!("tearing down the unit");
    });

    assert!(result.is_err());
    assert_eq!(snapshot(), before, "restoration runs on the unwind path too");
}

#[test]
fn test_spawned_unit_inherits_a_copy() {
    let (logger, sink) = capture_logger();

    let _scope = contextualize(fields! { "trace_id" => "t-1" });
    let inherited = snapshot();

    let child = {
        let logger = logger.clone();
        thread::spawn(move || {
            adopt(inherited);
            logger.info("child start").unwrap();

            // diverge: the child's change must stay invisible to the parent
            let _child_scope = contextualize(fields! { "trace_id" => "t-child" });
            logger.info("child diverged").unwrap();
        })
    };
    child.join().unwrap();

    logger.info("parent after join").unwrap();

    let lines = sink.lines();
    assert!(lines[0].contains("trace_id=\"t-1\""));
    assert!(lines[1].contains("trace_id=\"t-child\""));
    assert!(lines[2].contains("trace_id=\"t-1\""));
}

#[test]
fn test_many_nested_scopes_unwind_in_order() {
    let _outer = contextualize(fields! { "depth" => 0 });
    {
        let _one = contextualize(fields! { "depth" => 1 });
        {
            let _two = contextualize(fields! { "depth" => 2 });
            assert_eq!(snapshot().get("depth"), Some(&FieldValue::Int(2)));
        }
        assert_eq!(snapshot().get("depth"), Some(&FieldValue::Int(1)));
    }
    assert_eq!(snapshot().get("depth"), Some(&FieldValue::Int(0)));
}

#[test]
fn test_concurrent_logging_is_line_atomic() {
    let (logger, sink) = capture_logger();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let logger = logger.clone();
            thread::spawn(move || {
                for j in 0..25 {
                    logger
                        .info_with("burst", fields! { "worker" => i, "seq" => j })
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 200);
    for line in &lines {
        assert!(line.contains("burst"));
        assert!(!line.contains('\n'));
    }
}

mod common;

use actionlog::{Action, Emission, Error, Middleware, Result, Store};
use common::{counter_reducer, strict_counter, Counter};
use serde_json::{json, Value};
use std::any::Any;

/// Records every hook call as a string.
#[derive(Default)]
struct Tracer {
    name: &'static str,
    calls: Vec<String>,
}

impl Middleware<Counter> for Tracer {
    fn before(&mut self, action: &Action, state: &Counter) -> Result<()> {
        self.calls
            .push(format!("{} before {} at {}", self.name, action.action_type, state.count));
        Ok(())
    }

    fn after(&mut self, emission: &Emission<'_, Counter>) -> Result<()> {
        self.calls.push(format!(
            "{} after {} at {} error={}",
            self.name,
            emission.action.action_type,
            emission.state.count,
            emission.error.cloned().unwrap_or(Value::Null)
        ));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_dispatch_runs_reducer() {
    let mut store = Store::builder(Counter::default(), counter_reducer)
        .build()
        .unwrap();
    store.dispatch(Action::new("INCREMENT")).unwrap();
    store.dispatch(Action::new("INCREMENT")).unwrap();
    let state = store.dispatch(Action::new("DECREMENT")).unwrap();
    assert_eq!(state.count, 1);
    assert_eq!(store.state().count, 1);
}

#[test]
fn test_payload_reaches_reducer() {
    let mut store = Store::builder(Counter::default(), counter_reducer)
        .build()
        .unwrap();
    store
        .dispatch(Action::new("ADD").with_payload(json!({"amount": 5})))
        .unwrap();
    assert_eq!(store.state().count, 5);
}

#[test]
fn test_build_dispatches_init_through_middleware() {
    let store = Store::builder(Counter::default(), counter_reducer)
        .middleware(Tracer {
            name: "t",
            ..Default::default()
        })
        .build()
        .unwrap();

    let tracer = store.middleware::<Tracer>().unwrap();
    assert_eq!(
        tracer.calls,
        vec![
            "t before @@actionlog/INIT at 0",
            "t after @@actionlog/INIT at 0 error=null",
        ]
    );
}

#[test]
fn test_hooks_wrap_reducer_in_registration_order() {
    let mut store = Store::builder(Counter::default(), counter_reducer)
        .middleware(Tracer {
            name: "a",
            ..Default::default()
        })
        .build()
        .unwrap();
    store.middleware_mut::<Tracer>().unwrap().calls.clear();

    store.dispatch(Action::new("INCREMENT")).unwrap();
    let tracer = store.middleware::<Tracer>().unwrap();
    assert_eq!(
        tracer.calls,
        vec!["a before INCREMENT at 0", "a after INCREMENT at 1 error=null"]
    );
}

#[test]
fn test_fallible_reducer_keeps_state_and_reports_error() {
    let mut store = Store::fallible(Counter::default(), strict_counter)
        .middleware(Tracer {
            name: "t",
            ..Default::default()
        })
        .build()
        .unwrap();

    let state = store.dispatch(Action::new("DECREMENT")).unwrap();
    assert_eq!(state.count, 0);

    let tracer = store.middleware::<Tracer>().unwrap();
    assert_eq!(
        tracer.calls.last().unwrap(),
        r#"t after DECREMENT at 0 error={"reason":"count would go negative"}"#
    );
}

#[test]
fn test_fallible_reducer_applies_ok_state() {
    let mut store = Store::fallible(Counter::default(), strict_counter)
        .build()
        .unwrap();
    store.dispatch(Action::new("INCREMENT")).unwrap();
    store.dispatch(Action::new("INCREMENT")).unwrap();
    store.dispatch(Action::new("DECREMENT")).unwrap();
    assert_eq!(store.state().count, 1);
}

#[test]
fn test_middleware_lookup_by_type() {
    let store = Store::builder(Counter::default(), counter_reducer)
        .build()
        .unwrap();
    assert!(store.middleware::<Tracer>().is_none());
}

#[test]
fn test_action_serializes_type_field() {
    let action = Action::new("INCREMENT");
    assert_eq!(serde_json::to_value(&action).unwrap(), json!({"type": "INCREMENT"}));

    let action = Action::new("ADD")
        .with_payload(json!({"amount": 2}))
        .with_meta(json!({"source": "test"}));
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({"type": "ADD", "payload": {"amount": 2}, "meta": {"source": "test"}})
    );
}

/// Fails every `before` call except for the init action.
#[derive(Default)]
struct Refuser {
    afters: usize,
}

impl Middleware<Counter> for Refuser {
    fn before(&mut self, action: &Action, _state: &Counter) -> Result<()> {
        if action.is_init() {
            return Ok(());
        }
        Err(std::io::Error::other("refused").into())
    }

    fn after(&mut self, _emission: &Emission<'_, Counter>) -> Result<()> {
        self.afters += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_failing_middleware_does_not_block_reducer() {
    let mut store = Store::builder(Counter::default(), counter_reducer)
        .middleware(Refuser::default())
        .middleware(Tracer {
            name: "t",
            ..Default::default()
        })
        .build()
        .unwrap();

    let err = store.dispatch(Action::new("INCREMENT")).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.to_string() == "refused"));
    assert_eq!(store.state().count, 1);

    assert_eq!(store.middleware::<Refuser>().unwrap().afters, 2);
    let tracer = store.middleware::<Tracer>().unwrap();
    assert_eq!(
        tracer.calls[2..],
        ["t before INCREMENT at 0", "t after INCREMENT at 1 error=null"]
    );
}

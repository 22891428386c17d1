use actionlog::{resolve, Field, Level, LevelSpec};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn action() -> Value {
    json!({"type": "INCREMENT"})
}

#[test]
fn test_constant_applies_to_every_field() {
    let spec = LevelSpec::from(Level::Warn);
    for field in Field::ALL {
        assert_eq!(resolve(&spec, &action(), &[], field), Some(Level::Warn));
    }
}

#[test]
fn test_default_is_log() {
    let spec = LevelSpec::default();
    assert_eq!(resolve(&spec, &action(), &[], Field::Action), Some(Level::Log));
}

#[test]
fn test_constant_none_skips() {
    let spec = LevelSpec::Constant(None);
    for field in Field::ALL {
        assert_eq!(resolve(&spec, &action(), &[], field), None);
    }
}

#[test]
fn test_computed_sees_formatted_action_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let spec = LevelSpec::computed(move |action| {
        seen.fetch_add(1, Ordering::SeqCst);
        (action["type"] == "INCREMENT").then_some(Level::Debug)
    });

    let state = json!({"count": 3});
    for field in Field::ALL {
        assert_eq!(resolve(&spec, &action(), &[&state], field), Some(Level::Debug));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        resolve(&spec, &json!({"type": "OTHER"}), &[], Field::Action),
        None
    );
}

#[test]
fn test_per_field_constant_and_missing() {
    let spec = LevelSpec::per_field()
        .with_field(Field::PrevState, Some(Level::Info))
        .with_field(Field::NextState, None);

    assert_eq!(resolve(&spec, &action(), &[], Field::PrevState), Some(Level::Info));
    assert_eq!(resolve(&spec, &action(), &[], Field::NextState), None);
    assert_eq!(resolve(&spec, &action(), &[], Field::Action), None);
    assert_eq!(resolve(&spec, &action(), &[], Field::Error), None);
}

#[test]
fn test_per_field_fn_receives_payload_args() {
    let spec = LevelSpec::per_field().with_field_fn(Field::Error, |args| {
        match (args[0].as_str(), args[1]["count"].as_i64()) {
            (Some("fatal"), _) => Some(Level::Error),
            (_, Some(0)) => Some(Level::Warn),
            _ => None,
        }
    });

    let zero = json!({"count": 0});
    let five = json!({"count": 5});
    assert_eq!(
        resolve(&spec, &action(), &[&json!("fatal"), &five], Field::Error),
        Some(Level::Error)
    );
    assert_eq!(
        resolve(&spec, &action(), &[&json!("minor"), &zero], Field::Error),
        Some(Level::Warn)
    );
    assert_eq!(
        resolve(&spec, &action(), &[&json!("minor"), &five], Field::Error),
        None
    );
}

#[test]
fn test_with_field_replaces_non_map_spec() {
    let spec = LevelSpec::from(Level::Info).with_field(Field::Action, Some(Level::Debug));
    assert_eq!(resolve(&spec, &action(), &[], Field::Action), Some(Level::Debug));
    assert_eq!(resolve(&spec, &action(), &[], Field::PrevState), None);
}

#[test]
fn test_level_names() {
    assert_eq!(serde_json::to_value(Level::Warn).unwrap(), json!("warn"));
    let level: Level = serde_json::from_value(json!("debug")).unwrap();
    assert_eq!(level, Level::Debug);
    assert_eq!(Level::Info.to_string(), "info");
    assert_eq!(Field::NextState.label(), "next state");
    let field: Field = serde_json::from_value(json!("prevState")).unwrap();
    assert_eq!(field, Field::PrevState);
}

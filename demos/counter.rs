//! A counter store with the logger attached.
//!
//! Pass a JSON config file as the first argument to override the defaults:
//!
//! ```text
//! $ cargo run --example counter -- logger.json
//! ```

use actionlog::{Action, Field, Level, LevelSpec, Logger, LoggerConfig, LoggerOptions, Store};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Clone, Serialize)]
struct Counter {
    count: i64,
    history: Vec<i64>,
}

fn reduce(state: &Counter, action: &Action) -> Result<Counter, Value> {
    let delta = match action.action_type.as_str() {
        "INCREMENT" => 1,
        "DECREMENT" if state.count == 0 => {
            return Err(json!({"reason": "counter is already at zero"}));
        }
        "DECREMENT" => -1,
        "ADD" => action.payload["amount"].as_i64().unwrap_or(0),
        _ => return Ok(state.clone()),
    };
    let mut next = state.clone();
    next.count += delta;
    next.history.push(next.count);
    Ok(next)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = match std::env::args().nth(1) {
        Some(path) => LoggerOptions::from(LoggerConfig::load(path)?),
        None => LoggerOptions::default()
            .with_duration(true)
            .with_level(
                LevelSpec::per_field()
                    .with_field(Field::PrevState, Some(Level::Debug))
                    .with_field(Field::Action, Some(Level::Info))
                    .with_field(Field::Error, Some(Level::Error))
                    .with_field(Field::NextState, Some(Level::Log)),
            )
            .with_collapsed_fn(|_, action| action["type"] == "ADD")
            .with_state_transformer(|mut state| {
                // Keep the history out of the console.
                if let Some(map) = state.as_object_mut() {
                    map.remove("history");
                }
                state
            }),
    };

    let mut store = Store::fallible(Counter::default(), reduce)
        .middleware(Logger::new(options))
        .build()?;

    store.dispatch(Action::new("INCREMENT"))?;
    store.dispatch(Action::new("ADD").with_payload(json!({"amount": 5})))?;
    store.dispatch(Action::new("DECREMENT"))?;
    for _ in 0..6 {
        store.dispatch(Action::new("DECREMENT"))?;
    }

    println!("final count: {}", store.state().count);
    Ok(())
}

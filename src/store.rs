use crate::action::Action;
use crate::error::{Error, Result};
use serde_json::Value;
use std::any::Any;

/// A pure function that folds an action into state.
///
/// Reducers receive owned state and return owned state. They should be pure
/// (no I/O, no side effects) and handle unknown action types with a
/// `_ => state` arm, which also covers the init action.
///
/// # Examples
///
/// ```
/// use actionlog::{Action, ReduceFn};
///
/// fn counter(state: u64, action: &Action) -> u64 {
///     match action.action_type.as_str() {
///         "INCREMENT" => state + 1,
///         _ => state,
///     }
/// }
///
/// let reducer: ReduceFn<u64> = counter;
/// ```
pub type ReduceFn<S> = fn(S, &Action) -> S;

/// A reducer that may reject an action.
///
/// On `Err` the state is left untouched and the error value is handed to
/// every middleware alongside the unchanged state.
pub type TryReduceFn<S> = fn(&S, &Action) -> std::result::Result<S, Value>;

enum Reducer<S> {
    Pure(ReduceFn<S>),
    Fallible(TryReduceFn<S>),
}

/// What the store emits once the reducer has run.
#[derive(Debug)]
pub struct Emission<'a, S> {
    /// The action that produced this state.
    pub action: &'a Action,
    /// The state after the reducer ran.
    pub state: &'a S,
    /// The value a fallible reducer rejected the action with, if any.
    pub error: Option<&'a Value>,
}

/// An observer attached to a [`Store`].
///
/// `before` sees every action together with the state the reducer is about
/// to receive; `after` sees every state the store emits. Both run
/// synchronously inside [`Store::dispatch`], in registration order.
pub trait Middleware<S>: Any {
    /// Called before the reducer runs.
    fn before(&mut self, action: &Action, state: &S) -> Result<()>;
    /// Called after the reducer has produced the new state.
    fn after(&mut self, emission: &Emission<'_, S>) -> Result<()>;
    /// Downcast to `&dyn Any` for type recovery.
    fn as_any(&self) -> &dyn Any;
    /// Downcast to `&mut dyn Any` for type recovery.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A unidirectional-data-flow state container.
///
/// `dispatch` takes `&mut self`, so an action can never be dispatched while
/// another one is still being reduced.
pub struct Store<S> {
    state: S,
    reducer: Reducer<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl<S: Default + 'static> Store<S> {
    /// Start building a store around a pure reducer.
    pub fn builder(initial: S, reducer: ReduceFn<S>) -> StoreBuilder<S> {
        StoreBuilder {
            state: initial,
            reducer: Reducer::Pure(reducer),
            middleware: Vec::new(),
        }
    }

    /// Start building a store around a fallible reducer.
    pub fn fallible(initial: S, reducer: TryReduceFn<S>) -> StoreBuilder<S> {
        StoreBuilder {
            state: initial,
            reducer: Reducer::Fallible(reducer),
            middleware: Vec::new(),
        }
    }

    /// Dispatch an action through the middleware and the reducer.
    ///
    /// Middleware only observe: the reducer and every hook run even when
    /// one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a middleware, once the state has
    /// been updated and every `after` hook has run.
    pub fn dispatch(&mut self, action: Action) -> Result<&S> {
        let mut failure = None;
        for middleware in &mut self.middleware {
            if let Err(e) = middleware.before(&action, &self.state) {
                keep_first(&mut failure, e);
            }
        }

        let error = match self.reducer {
            Reducer::Pure(reduce) => {
                let state = std::mem::take(&mut self.state);
                self.state = reduce(state, &action);
                None
            }
            Reducer::Fallible(reduce) => match reduce(&self.state, &action) {
                Ok(state) => {
                    self.state = state;
                    None
                }
                Err(error) => Some(error),
            },
        };

        let emission = Emission {
            action: &action,
            state: &self.state,
            error: error.as_ref(),
        };
        for middleware in &mut self.middleware {
            if let Err(e) = middleware.after(&emission) {
                keep_first(&mut failure, e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(&self.state),
        }
    }

    /// Return a reference to the current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Return the first registered middleware of type `M`.
    pub fn middleware<M: Middleware<S>>(&self) -> Option<&M> {
        self.middleware
            .iter()
            .find_map(|m| m.as_any().downcast_ref::<M>())
    }

    /// Return the first registered middleware of type `M`, mutably.
    pub fn middleware_mut<M: Middleware<S>>(&mut self) -> Option<&mut M> {
        self.middleware
            .iter_mut()
            .find_map(|m| m.as_any_mut().downcast_mut::<M>())
    }
}

fn keep_first(failure: &mut Option<Error>, e: Error) {
    match failure {
        Some(_) => log::warn!("actionlog: middleware failed after an earlier failure: {e}"),
        None => *failure = Some(e),
    }
}

/// Builder for [`Store`].
///
/// # Examples
///
/// ```
/// use actionlog::{Action, Store};
///
/// fn counter(state: u64, action: &Action) -> u64 {
///     if action.action_type == "INCREMENT" { state + 1 } else { state }
/// }
///
/// let mut store = Store::builder(0, counter).build().unwrap();
/// store.dispatch(Action::new("INCREMENT")).unwrap();
/// assert_eq!(*store.state(), 1);
/// ```
pub struct StoreBuilder<S> {
    state: S,
    reducer: Reducer<S>,
    middleware: Vec<Box<dyn Middleware<S>>>,
}

impl<S: Default + 'static> StoreBuilder<S> {
    /// Attach a middleware. Middleware run in the order they are attached.
    pub fn middleware(mut self, middleware: impl Middleware<S>) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Build the store and dispatch [`Action::init`] through it.
    ///
    /// # Errors
    ///
    /// Returns an error if a middleware fails while observing the init action.
    pub fn build(self) -> Result<Store<S>> {
        let mut store = Store {
            state: self.state,
            reducer: self.reducer,
            middleware: self.middleware,
        };
        store.dispatch(Action::init())?;
        Ok(store)
    }
}

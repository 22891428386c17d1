use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action type dispatched once when a [`Store`](crate::Store) is built.
///
/// The logger never prints an entry for it.
pub const INIT_ACTION: &str = "@@actionlog/INIT";

/// A dispatched action.
///
/// The logger treats actions as opaque: the `payload` field is untyped
/// ([`serde_json::Value`]) and only the `type` is ever read, to build the
/// title of a printed block. Reducers give actions meaning.
///
/// # Examples
///
/// ```
/// use actionlog::Action;
/// use serde_json::json;
///
/// let action = Action::new("todo_added").with_payload(json!({"text": "milk"}));
/// assert_eq!(action.action_type, "todo_added");
/// assert_eq!(action.payload["text"], "milk");
/// assert!(!action.is_init());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Action {
    /// The action type identifier (e.g. `"INCREMENT"`).
    ///
    /// Serialized as `"type"` in JSON.
    #[serde(rename = "type")]
    pub action_type: String,

    /// Arbitrary JSON payload. Omitted from the serialized form when null.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,

    /// Extensible metadata bag, kept apart from the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Action {
    /// Create an action with the given type and no payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        Action {
            action_type: action_type.into(),
            payload: Value::Null,
            meta: None,
        }
    }

    /// The reserved store-initialization action.
    ///
    /// ```
    /// use actionlog::{Action, INIT_ACTION};
    ///
    /// let init = Action::init();
    /// assert_eq!(init.action_type, INIT_ACTION);
    /// assert!(init.is_init());
    /// ```
    pub fn init() -> Self {
        Action::new(INIT_ACTION)
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set extensible metadata.
    ///
    /// ```
    /// use actionlog::Action;
    /// use serde_json::json;
    ///
    /// let action = Action::new("click").with_meta(json!({"source": "toolbar"}));
    /// assert!(action.meta.is_some());
    /// ```
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Returns true for the reserved store-initialization action.
    pub fn is_init(&self) -> bool {
        self.action_type == INIT_ACTION
    }
}

//! Events flowing from rendered controls back into a form.
//!
//! Each event is plain data and deserializes from JSON, so a session can be recorded one event
//! per line and replayed later:
//!
//! ```rust
//! use formstate::FormEvent;
//!
//! let event: FormEvent =
//!     serde_json::from_str(r#"{"event": "delete_item", "path": "contacts", "index": 0}"#).unwrap();
//! assert!(matches!(event, FormEvent::DeleteItem(_)));
//! ```

use serde::{Deserialize, Serialize};

use crate::form_value::FormValue;
use crate::path::Path;
use crate::schema::Schema;

/// A control reported a new value for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Location of the field.
    pub path: Path,
    /// The new value, taken as-is.
    #[serde(default)]
    pub value: FormValue,
}

impl FieldChange {
    /// Creates a field change event.
    pub fn new(path: Path, value: impl Into<FormValue>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }
}

/// A list control asked for one more item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    /// Location of the list.
    pub path: Path,
    /// Schema of a single element of the list.
    pub schema: Schema,
}

impl AddItem {
    /// Creates an add-item event.
    pub fn new(path: Path, schema: Schema) -> Self {
        Self { path, schema }
    }
}

/// A list control asked for one item to be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    /// Location of the list.
    pub path: Path,
    /// Position of the item to remove.
    pub index: usize,
}

impl DeleteItem {
    /// Creates a delete-item event.
    pub fn new(path: Path, index: usize) -> Self {
        Self { path, index }
    }
}

/// The platform's form submission event.
///
/// Submitting a form would normally navigate away; handlers call
/// [`SubmitEvent::prevent_default`] to stop that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Creates a fresh submission event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the default submission navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`SubmitEvent::prevent_default`] was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Any event a form reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// See [`FieldChange`].
    FieldChange(FieldChange),
    /// See [`AddItem`].
    AddItem(AddItem),
    /// See [`DeleteItem`].
    DeleteItem(DeleteItem),
    /// See [`SubmitEvent`].
    Submit(SubmitEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_each_event_kind() {
        let event: FormEvent = serde_json::from_value(json!({
            "event": "field_change",
            "path": "contacts[1].email",
            "value": "a@b"
        }))
        .unwrap();
        assert_eq!(
            event,
            FormEvent::FieldChange(FieldChange::new(
                "contacts.1.email".parse().unwrap(),
                "a@b"
            ))
        );

        let event: FormEvent = serde_json::from_value(json!({
            "event": "add_item",
            "path": "contacts",
            "schema": {"type": "string"}
        }))
        .unwrap();
        assert_eq!(
            event,
            FormEvent::AddItem(AddItem::new(
                "contacts".parse().unwrap(),
                Schema::new(json!({"type": "string"}))
            ))
        );

        let event: FormEvent = serde_json::from_value(json!({"event": "submit"})).unwrap();
        assert_eq!(event, FormEvent::Submit(SubmitEvent::new()));
    }

    #[test]
    fn field_change_without_value_is_undefined() {
        let event: FieldChange = serde_json::from_value(json!({"path": "age"})).unwrap();
        assert_eq!(event.value, FormValue::Undefined);
    }

    #[test]
    fn bad_path_rejected() {
        let result = serde_json::from_value::<FormEvent>(json!({
            "event": "delete_item",
            "path": "a[",
            "index": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn prevent_default_sticks() {
        let mut event = SubmitEvent::new();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}

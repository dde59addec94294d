//! # State Reducers
//!
//! Pure transitions from one [`FormState`] to the next.  None of them touch the state they are
//! given; each returns a new state that shares every subtree the transition left alone.

use serde::{Deserialize, Serialize};

use crate::defaults::derive_default_state;
use crate::errors::SchemaError;
use crate::events::{AddItem, DeleteItem, FieldChange};
use crate::form_value::FormValue;
use crate::path::{get_path, set_path};

/// A snapshot of a form's data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(rename = "formData", alias = "form_data")]
    form_data: FormValue,
}

impl FormState {
    /// Wraps form data in a state snapshot.
    pub fn new(form_data: FormValue) -> Self {
        Self { form_data }
    }

    /// The form data of this snapshot.
    pub fn form_data(&self) -> &FormValue {
        &self.form_data
    }

    /// Consumes the snapshot, returning its form data.
    pub fn into_form_data(self) -> FormValue {
        self.form_data
    }
}

/// Writes a field change into the state.  The value is not checked against any schema.
pub fn apply_field_change(state: &FormState, event: &FieldChange) -> FormState {
    FormState::new(set_path(&state.form_data, &event.path, event.value.clone()))
}

/// Appends a freshly derived element to the list at `event.path`.
///
/// A missing list is created.  Anything other than a list at that path is replaced by a list
/// holding just the new element.  Fails only if the element schema itself is malformed.
pub fn add_value_to_state(state: &FormState, event: &AddItem) -> Result<FormState, SchemaError> {
    let mut items = match get_path(&state.form_data, &event.path) {
        Some(FormValue::Array(items)) => items.to_vec(),
        _ => Vec::new(),
    };
    let item_path = event.path.clone().index(items.len());
    let item = derive_default_state(&event.schema, None).map_err(|e| e.at(&item_path))?;
    items.push(item);
    Ok(FormState::new(set_path(
        &state.form_data,
        &event.path,
        FormValue::array(items),
    )))
}

/// Removes the element at `event.index` from the list at `event.path`.
///
/// Indexes out of range, and paths that do not hold a list, leave the state as it was.
pub fn delete_index_from_state(state: &FormState, event: &DeleteItem) -> FormState {
    match get_path(&state.form_data, &event.path) {
        Some(FormValue::Array(items)) if event.index < items.len() => {
            let mut items = items.to_vec();
            items.remove(event.index);
            FormState::new(set_path(
                &state.form_data,
                &event.path,
                FormValue::array(items),
            ))
        }
        found => {
            tracing::debug!(
                path = %event.path,
                index = event.index,
                len = found.and_then(FormValue::as_array).map(Vec::len),
                "ignoring delete outside of list"
            );
            state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use crate::schema::Schema;
    use serde_json::json;

    fn state(data: serde_json::Value) -> FormState {
        FormState::new(FormValue::from(data))
    }

    fn path(text: &str) -> Path {
        text.parse().unwrap()
    }

    #[test]
    fn add_appends_derived_element() {
        let before = state(json!({"contacts": [{"email": "a"}]}));
        let schema = Schema::new(json!({
            "type": "object",
            "properties": {"email": {"type": "string", "default": "new"}}
        }));
        let after = add_value_to_state(&before, &AddItem::new(path("contacts"), schema)).unwrap();

        assert_eq!(
            after.form_data().to_json(),
            json!({"contacts": [{"email": "a"}, {"email": "new"}]})
        );
        assert_eq!(
            before.form_data().to_json(),
            json!({"contacts": [{"email": "a"}]})
        );
    }

    #[test]
    fn add_creates_missing_list() {
        let before = state(json!({}));
        let schema = Schema::new(json!({"type": "string"}));
        let after = add_value_to_state(&before, &AddItem::new(path("profile.tags"), schema)).unwrap();
        assert_eq!(after.form_data().to_json(), json!({"profile": {"tags": [""]}}));
    }

    #[test]
    fn add_replaces_non_list() {
        let before = state(json!({"tags": "oops"}));
        let schema = Schema::new(json!({"type": "boolean"}));
        let after = add_value_to_state(&before, &AddItem::new(path("tags"), schema)).unwrap();
        assert_eq!(after.form_data().to_json(), json!({"tags": [false]}));
    }

    #[test]
    fn add_reports_schema_error_at_new_item() {
        let before = state(json!({"contacts": [1, 2]}));
        let schema = Schema::new(json!({"type": "mystery"}));
        let err = add_value_to_state(&before, &AddItem::new(path("contacts"), schema)).unwrap_err();
        assert_eq!(err.path().to_string(), "contacts.2");
    }

    #[test]
    fn delete_preserves_order() {
        let before = state(json!({"list": ["a", "b", "c", "d"]}));
        let after = delete_index_from_state(&before, &DeleteItem::new(path("list"), 1));
        assert_eq!(after.form_data().to_json(), json!({"list": ["a", "c", "d"]}));
        assert_eq!(
            before.form_data().to_json(),
            json!({"list": ["a", "b", "c", "d"]})
        );
    }

    #[test]
    fn delete_out_of_range_is_noop() {
        let before = state(json!({"list": ["a"], "other": {"x": 1}}));
        let after = delete_index_from_state(&before, &DeleteItem::new(path("list"), 1));
        assert_eq!(after, before);
        assert!(after.form_data().ptr_eq(before.form_data()));
    }

    #[test]
    fn delete_on_missing_or_non_list_is_noop() {
        let before = state(json!({"name": "x"}));
        assert_eq!(
            delete_index_from_state(&before, &DeleteItem::new(path("list"), 0)),
            before
        );
        assert_eq!(
            delete_index_from_state(&before, &DeleteItem::new(path("name"), 0)),
            before
        );
    }

    #[test]
    fn delete_shares_siblings() {
        let before = state(json!({"list": [{"a": 1}, {"b": 2}], "other": {"x": 1}}));
        let after = delete_index_from_state(&before, &DeleteItem::new(path("list"), 0));
        let other = path("other");
        assert!(
            get_path(before.form_data(), &other)
                .unwrap()
                .ptr_eq(get_path(after.form_data(), &other).unwrap())
        );
        assert!(
            get_path(before.form_data(), &path("list.1"))
                .unwrap()
                .ptr_eq(get_path(after.form_data(), &path("list.0")).unwrap())
        );
    }

    #[test]
    fn state_serializes_as_form_data() {
        let snapshot = state(json!({"name": "x"}));
        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded, json!({"formData": {"name": "x"}}));
        let decoded: FormState = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, snapshot);
        let legacy: FormState =
            serde_json::from_value(json!({"form_data": {"name": "x"}})).unwrap();
        assert_eq!(legacy, snapshot);
    }

    #[test]
    fn field_change_accepts_any_type() {
        let before = state(json!({"age": 3}));
        let after = apply_field_change(&before, &FieldChange::new(path("age"), "three"));
        assert_eq!(after.form_data().to_json(), json!({"age": "three"}));
    }
}

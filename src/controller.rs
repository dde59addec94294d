//! # Form Controller
//!
//! A `FormController` owns the state of one rendered form.  It is the only place that state is
//! replaced: controls report events, the controller runs them through the reducers and keeps
//! the resulting snapshot.
//!
//! ```rust
//! use formstate::{FieldChange, FormController, FormHandler, Schema, SubmitEvent};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Recorder {
//!     missing: Vec<String>,
//!     submitted: bool,
//! }
//!
//! impl FormHandler for Recorder {
//!     fn on_error(&mut self, missing: &[String]) {
//!         self.missing = missing.to_vec();
//!     }
//!
//!     fn on_submit(&mut self, _event: &SubmitEvent) {
//!         self.submitted = true;
//!     }
//! }
//!
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {"name": {"type": "string"}}
//! }));
//! let mut form = FormController::new(schema, None, Recorder::default()).unwrap();
//!
//! let mut event = SubmitEvent::new();
//! form.on_submit(&mut event);
//! assert_eq!(form.handler().missing, vec!["name".to_string()]);
//! assert!(form.handler().submitted);
//!
//! form.on_field_change(FieldChange::new("name".parse().unwrap(), "Alice"));
//! assert_eq!(form.form_data().to_json(), json!({"name": "Alice"}));
//! ```

use crate::defaults::derive_default_state;
use crate::errors::SchemaError;
use crate::events::{AddItem, DeleteItem, FieldChange, FormEvent, SubmitEvent};
use crate::form_value::FormValue;
use crate::path::Path;
use crate::reducers::{
    FormState, add_value_to_state, apply_field_change, delete_index_from_state,
};
use crate::schema::Schema;

/// Callbacks supplied by the embedding application.
///
/// Both methods default to doing nothing.
pub trait FormHandler {
    /// Called on submission with the required fields that are missing, in schema order.  Never
    /// called with an empty list.
    fn on_error(&mut self, missing: &[String]) {
        let _ = missing;
    }

    /// Called on every submission, after [`FormHandler::on_error`].
    fn on_submit(&mut self, event: &SubmitEvent) {
        let _ = event;
    }
}

impl FormHandler for () {}

/// Owner of one form's state.
///
/// Construction mounts the form: the initial state is derived from the schema and any supplied
/// data, so a controller always holds a complete snapshot.
#[derive(Debug)]
pub struct FormController<H: FormHandler = ()> {
    schema: Schema,
    state: FormState,
    handler: H,
}

impl<H: FormHandler> FormController<H> {
    /// Mounts a form for `schema`, seeding its data from `supplied`.
    pub fn new(
        schema: Schema,
        supplied: Option<&FormValue>,
        handler: H,
    ) -> Result<Self, SchemaError> {
        let form_data = derive_default_state(&schema, supplied)?;
        tracing::debug!(form_data = ?form_data.to_json(), "form mounted");
        Ok(Self {
            schema,
            state: FormState::new(form_data),
            handler,
        })
    }

    /// The form's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The current snapshot.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The current form data.
    pub fn form_data(&self) -> &FormValue {
        self.state.form_data()
    }

    /// The application callbacks.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the application callbacks.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Unmounts the form, returning its final state and the callbacks.
    pub fn into_parts(self) -> (FormState, H) {
        (self.state, self.handler)
    }

    /// Writes a field value.  No validation happens here.
    pub fn on_field_change(&mut self, event: FieldChange) {
        tracing::trace!(path = %event.path, "field change");
        self.state = apply_field_change(&self.state, &event);
    }

    /// Appends an element to a list.
    pub fn on_add_item(&mut self, event: AddItem) -> Result<(), SchemaError> {
        tracing::trace!(path = %event.path, "add item");
        self.state = add_value_to_state(&self.state, &event)?;
        Ok(())
    }

    /// Appends an element to the list at `path`, taking the element schema from the form's own
    /// schema.  Fails with [`SchemaError::NotAList`] when the schema has no `items` for `path`.
    pub fn add_item_at(&mut self, path: Path) -> Result<(), SchemaError> {
        let Some(schema) = self.schema.at(&path).and_then(|list| list.items()) else {
            return Err(SchemaError::NotAList { path });
        };
        self.on_add_item(AddItem::new(path, schema))
    }

    /// Removes an element from a list.  Stale indexes are ignored.
    pub fn on_delete_item(&mut self, event: DeleteItem) {
        tracing::trace!(path = %event.path, index = event.index, "delete item");
        self.state = delete_index_from_state(&self.state, &event);
    }

    /// Top-level required fields whose current value is falsy, in schema order.
    ///
    /// This is deliberately the loose check: an empty string, zero, `false`, null and an absent
    /// value all count as missing.
    pub fn missing_required_fields(&self) -> Vec<String> {
        let form_data = self.form_data();
        self.schema
            .required()
            .into_iter()
            .filter(|name| !form_data.get_field(name).is_some_and(FormValue::is_truthy))
            .collect()
    }

    /// Handles a form submission.
    ///
    /// Suppresses the default navigation, reports missing required fields through
    /// [`FormHandler::on_error`] when there are any, then always calls
    /// [`FormHandler::on_submit`].
    pub fn on_submit(&mut self, event: &mut SubmitEvent) {
        event.prevent_default();
        let missing = self.missing_required_fields();
        if !missing.is_empty() {
            tracing::debug!(?missing, "required fields missing on submit");
            self.handler.on_error(&missing);
        }
        self.handler.on_submit(event);
    }

    /// Routes any event to the matching operation.
    pub fn dispatch(&mut self, event: FormEvent) -> Result<(), SchemaError> {
        match event {
            FormEvent::FieldChange(event) => self.on_field_change(event),
            FormEvent::AddItem(event) => self.on_add_item(event)?,
            FormEvent::DeleteItem(event) => self.on_delete_item(event),
            FormEvent::Submit(mut event) => self.on_submit(&mut event),
        }
        Ok(())
    }
}

//! # Formstate: Schema-Driven Form State
//!
//! Formstate keeps the state of a form that is rendered from a schema.  The schema says what
//! fields exist, what they default to and which ones are required; formstate turns that into
//! nested form data, applies the edits users make, and checks required fields on submission.
//!
//! Rendering is left to the embedding application.  Its controls only need to report changes
//! as events naming a path and a value; formstate does the rest.
//!
//! ## Core Concepts
//!
//! ### Schemas
//! A [`Schema`] is a JSON schema subset.  Every node has a `type` (`string`, `number`,
//! `boolean`, `object` or `array`), may carry a literal `default`, and object nodes list their
//! `properties` and `required` field names while array nodes describe their elements with
//! `items`.
//!
//! ### Form Data
//! Form data is a [`FormValue`] tree mirroring the schema.  Containers are reference counted,
//! so every edit produces a new tree that shares all the subtrees it left alone.
//!
//! ### Paths
//! A [`Path`] addresses one location in the form data, written as `address.street`,
//! `contacts.2.email` or `contacts[2].email`.
//!
//! ### State Transitions
//! Every change is a pure function from one [`FormState`] to the next.  The
//! [`FormController`] is the only owner of the current state and the only place it is
//! replaced.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ FormController (owns state, callbacks)  │
//! ├─────────────────────────────────────────┤
//! │ Reducers (add/delete items, edits)      │
//! ├─────────────────────────────────────────┤
//! │ Default derivation (schema → data)      │
//! ├─────────────────────────────────────────┤
//! │ Path addressing (get/set with sharing)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Mounting a Form
//!
//! ```rust
//! # use formstate::{FormController, FormValue, Schema};
//! # use serde_json::json;
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string"},
//!         "age": {"type": "number"},
//!         "address": {
//!             "type": "object",
//!             "properties": {
//!                 "street": {"type": "string"},
//!                 "city": {"type": "string", "default": "Springfield"}
//!             }
//!         }
//!     }
//! }));
//!
//! let supplied = FormValue::from(json!({"address": {"street": "Evergreen Terrace"}}));
//! let form = FormController::new(schema, Some(&supplied), ()).unwrap();
//!
//! assert_eq!(
//!     form.form_data().to_json(),
//!     json!({
//!         "name": "",
//!         "address": {"street": "Evergreen Terrace", "city": "Springfield"}
//!     })
//! );
//! ```
//!
//! ### Editing Lists
//!
//! ```rust
//! # use formstate::{AddItem, DeleteItem, FieldChange, FormController, Schema};
//! # use serde_json::json;
//! let schema = Schema::new(json!({
//!     "type": "array",
//!     "items": {"type": "object", "properties": {"x": {"type": "number"}}}
//! }));
//! let mut form = FormController::new(schema.clone(), None, ()).unwrap();
//! let items = schema.items().unwrap();
//!
//! form.on_add_item(AddItem::new("".parse().unwrap(), items.clone())).unwrap();
//! form.on_add_item(AddItem::new("".parse().unwrap(), items)).unwrap();
//! form.on_field_change(FieldChange::new("1.x".parse().unwrap(), 7));
//! form.on_delete_item(DeleteItem::new("".parse().unwrap(), 0));
//!
//! assert_eq!(form.form_data().to_json(), json!([{"x": 7}]));
//! ```

#![deny(missing_docs)]
mod config;
mod controller;
mod defaults;
mod errors;
mod events;
mod form_value;
mod path;
mod reducers;
mod schema;

/// Command-line interface utilities for program termination and output formatting.
///
/// This module provides common CLI utilities for formstate binaries, including
/// error handling, formatted output, and program termination functions.
pub mod cli_utils;

pub use config::FormConfig;
pub use controller::{FormController, FormHandler};
pub use defaults::derive_default_state;
pub use errors::{ConfigError, PathError, SchemaError};
pub use events::{AddItem, DeleteItem, FieldChange, FormEvent, SubmitEvent};
pub use form_value::{FormMap, FormValue};
pub use path::{MAX_INDEX_GAP, Path, Segment, get_path, set_path};
pub use reducers::{FormState, add_value_to_state, apply_field_change, delete_index_from_state};
pub use schema::{Schema, SchemaType};

//! # Default State Derivation
//!
//! Walks a schema and builds the initial form data for it, layering any data supplied by the
//! embedding application over the defaults the schema declares.
//!
//! ```rust
//! use formstate::{FormValue, Schema, derive_default_state};
//! use serde_json::json;
//!
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "default": "anon"},
//!         "subscribed": {"type": "boolean"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! }));
//! let supplied = FormValue::from(json!({"subscribed": true}));
//!
//! let data = derive_default_state(&schema, Some(&supplied)).unwrap();
//! assert_eq!(data.to_json(), json!({"name": "anon", "subscribed": true, "tags": []}));
//! ```

use serde_json::Value;

use crate::errors::SchemaError;
use crate::form_value::FormValue;
use crate::path::Path;
use crate::schema::{Schema, SchemaType};

/// Builds the initial form data for `schema`.
///
/// Supplied data wins over schema defaults field by field: nested objects are merged rather
/// than replaced, while supplied arrays are taken verbatim without consulting `items`.
/// Supplied values whose type does not fit the schema are ignored.  Fields the schema does not
/// declare are carried over from the supplied data untouched.
///
/// Primitive fields without a supplied value or a `default` start as the empty string, `false`
/// or `FormValue::Undefined` for strings, booleans and numbers respectively.
pub fn derive_default_state(
    schema: &Schema,
    supplied: Option<&FormValue>,
) -> Result<FormValue, SchemaError> {
    derive_at(schema, supplied, &Path::root())
}

fn derive_at(
    schema: &Schema,
    supplied: Option<&FormValue>,
    path: &Path,
) -> Result<FormValue, SchemaError> {
    let schema_type = schema.schema_type().map_err(|e| e.at(path))?;
    let supplied = supplied.filter(|value| !value.is_undefined());
    match schema_type {
        SchemaType::Object => derive_object(schema, supplied, path),
        SchemaType::Array => Ok(derive_array(schema, supplied, path)),
        primitive => Ok(derive_primitive(primitive, schema, supplied, path)),
    }
}

fn derive_object(
    schema: &Schema,
    supplied: Option<&FormValue>,
    path: &Path,
) -> Result<FormValue, SchemaError> {
    let supplied_entries = match supplied {
        Some(FormValue::Object(entries)) => Some(entries),
        Some(other) => {
            ignore_incompatible(path, SchemaType::Object, other);
            None
        }
        None => None,
    };
    let declared = schema.default_value().and_then(Value::as_object);

    let mut entries = supplied_entries
        .map(|entries| (**entries).clone())
        .unwrap_or_default();
    for (name, property) in schema.properties() {
        let fallback = declared
            .and_then(|declared| declared.get(&name))
            .map(FormValue::from);
        let child_supplied = supplied_entries
            .and_then(|entries| entries.get(&name))
            .filter(|value| !value.is_undefined());
        let child_supplied = layer(child_supplied, fallback);
        let child_path = path.clone().key(name.as_str());
        let child = derive_at(&property, child_supplied.as_ref(), &child_path)?;
        entries.insert(name, child);
    }
    Ok(FormValue::object(entries))
}

// Puts `over` on top of `under`, merging objects field by field.
fn layer(over: Option<&FormValue>, under: Option<FormValue>) -> Option<FormValue> {
    match (over, under) {
        (Some(FormValue::Object(over)), Some(FormValue::Object(under))) => {
            let mut entries = (*under).clone();
            for (name, value) in over.iter() {
                if value.is_undefined() {
                    continue;
                }
                let merged = layer(Some(value), entries.remove(name));
                if let Some(merged) = merged {
                    entries.insert(name.clone(), merged);
                }
            }
            Some(FormValue::object(entries))
        }
        (Some(over), _) => Some(over.clone()),
        (None, under) => under,
    }
}

fn derive_array(schema: &Schema, supplied: Option<&FormValue>, path: &Path) -> FormValue {
    match supplied {
        Some(items @ FormValue::Array(_)) => return items.clone(),
        Some(other) => ignore_incompatible(path, SchemaType::Array, other),
        None => {}
    }
    schema
        .default_value()
        .filter(|default| default.is_array())
        .map(FormValue::from)
        .unwrap_or_else(FormValue::empty_array)
}

fn derive_primitive(
    schema_type: SchemaType,
    schema: &Schema,
    supplied: Option<&FormValue>,
    path: &Path,
) -> FormValue {
    if let Some(value) = supplied {
        if fits(schema_type, value) {
            return value.clone();
        }
        ignore_incompatible(path, schema_type, value);
    }
    if let Some(default) = schema.default_value() {
        return FormValue::from(default);
    }
    match schema_type {
        SchemaType::String => FormValue::String(String::new()),
        SchemaType::Boolean => FormValue::Bool(false),
        _ => FormValue::Undefined,
    }
}

fn fits(schema_type: SchemaType, value: &FormValue) -> bool {
    matches!(
        (schema_type, value),
        (SchemaType::String, FormValue::String(_))
            | (SchemaType::Number, FormValue::Number(_))
            | (SchemaType::Integer, FormValue::Number(_))
            | (SchemaType::Boolean, FormValue::Bool(_))
    )
}

fn ignore_incompatible(path: &Path, expected: SchemaType, found: &FormValue) {
    tracing::debug!(
        path = %path,
        expected = %expected,
        found = found.type_name(),
        "ignoring supplied value of incompatible type"
    );
}

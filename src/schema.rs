//! # Form Schemas
//!
//! A form is described by a JSON schema subset: every node has a `type`, may carry a literal
//! `default`, and object nodes list their `properties` and `required` field names while array
//! nodes describe their element shape with `items`.
//!
//! ```rust
//! use formstate::{Schema, SchemaType};
//! use serde_json::json;
//!
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! }));
//!
//! assert_eq!(schema.schema_type().unwrap(), SchemaType::Object);
//! assert_eq!(schema.required(), vec!["name".to_string()]);
//! assert_eq!(schema.property("tags").unwrap().items().unwrap().schema_type().unwrap(), SchemaType::String);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SchemaError;
use crate::path::{Path, Segment};

pub(crate) const TYPE_KEY: &str = "type";
pub(crate) const DEFAULT_KEY: &str = "default";
pub(crate) const REQUIRED_KEY: &str = "required";
pub(crate) const PROPERTIES_KEY: &str = "properties";
pub(crate) const ITEMS_KEY: &str = "items";

pub(crate) const TYPE_STRING: &str = "string";
pub(crate) const TYPE_NUMBER: &str = "number";
pub(crate) const TYPE_INTEGER: &str = "integer";
pub(crate) const TYPE_BOOLEAN: &str = "boolean";
pub(crate) const TYPE_OBJECT: &str = "object";
pub(crate) const TYPE_ARRAY: &str = "array";

/// The kinds of field a schema node can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// Free text.
    String,
    /// Any JSON number.
    Number,
    /// A whole number.  Treated exactly like `Number` by the form.
    Integer,
    /// A checkbox-style flag.
    Boolean,
    /// A group of named fields.
    Object,
    /// A list of items sharing one element schema.
    Array,
}

impl SchemaType {
    /// The name used in the schema's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => TYPE_STRING,
            SchemaType::Number => TYPE_NUMBER,
            SchemaType::Integer => TYPE_INTEGER,
            SchemaType::Boolean => TYPE_BOOLEAN,
            SchemaType::Object => TYPE_OBJECT,
            SchemaType::Array => TYPE_ARRAY,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            TYPE_STRING => Some(SchemaType::String),
            TYPE_NUMBER => Some(SchemaType::Number),
            TYPE_INTEGER => Some(SchemaType::Integer),
            TYPE_BOOLEAN => Some(SchemaType::Boolean),
            TYPE_OBJECT => Some(SchemaType::Object),
            TYPE_ARRAY => Some(SchemaType::Array),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A schema node.
///
/// The schema is kept as the JSON it was written in; accessors interpret it lazily so that a
/// malformed node only fails when something actually needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    schema: Value,
}

impl Schema {
    /// Wraps a JSON schema value.
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    /// The underlying JSON.
    pub fn as_value(&self) -> &Value {
        &self.schema
    }

    /// Consumes the schema, returning the underlying JSON.
    pub fn into_value(self) -> Value {
        self.schema
    }

    fn as_object(&self) -> Option<&Map<String, Value>> {
        self.schema.as_object()
    }

    /// Interprets the `type` field.
    ///
    /// Errors are reported at the root path; callers walking a schema re-anchor them with the
    /// data path they were at.
    pub fn schema_type(&self) -> Result<SchemaType, SchemaError> {
        let object = self.as_object().ok_or(SchemaError::NotAnObject {
            path: Path::root(),
        })?;
        let name = object
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or(SchemaError::MissingType { path: Path::root() })?;
        SchemaType::from_name(name).ok_or_else(|| SchemaError::UnknownType {
            path: Path::root(),
            type_name: name.to_string(),
        })
    }

    /// The literal `default`, if one is declared.
    pub fn default_value(&self) -> Option<&Value> {
        self.as_object()?.get(DEFAULT_KEY)
    }

    /// Names listed under `required`, in declaration order.  Non-string entries are skipped.
    pub fn required(&self) -> Vec<String> {
        self.as_object()
            .and_then(|object| object.get(REQUIRED_KEY))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| name.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The declared properties of an object schema, in map order.
    pub fn properties(&self) -> Vec<(String, Schema)> {
        self.as_object()
            .and_then(|object| object.get(PROPERTIES_KEY))
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), Schema::new(schema.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The sub-schema of one property.
    pub fn property(&self, name: &str) -> Option<Schema> {
        self.as_object()?
            .get(PROPERTIES_KEY)?
            .as_object()?
            .get(name)
            .map(|schema| Schema::new(schema.clone()))
    }

    /// The element schema of an array schema.
    pub fn items(&self) -> Option<Schema> {
        self.as_object()?
            .get(ITEMS_KEY)
            .filter(|items| items.is_object())
            .map(|items| Schema::new(items.clone()))
    }

    /// Finds the schema describing the data at `path`.
    ///
    /// Field segments step into `properties` and index segments step into `items`.  Returns
    /// `None` when the schema does not describe that location.
    pub fn at(&self, path: &Path) -> Option<Schema> {
        let mut current = self.clone();
        for segment in path.segments() {
            current = match segment {
                Segment::Key(name) => current.property(name)?,
                Segment::Index(_) => current.items()?,
            };
        }
        Some(current)
    }
}

impl From<Value> for Schema {
    fn from(schema: Value) -> Self {
        Schema::new(schema)
    }
}

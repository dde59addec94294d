//! # Form Data Values
//!
//! `FormValue` is the nested data structure a form holds: primitives, ordered sequences and
//! key-ordered mappings.  It mirrors `serde_json::Value` with two differences:
//!
//! - **Undefined**: an absent value is representable on its own (`FormValue::Undefined`),
//!   distinct from an explicit `null`.  Number fields without a default start out undefined.
//! - **Shared containers**: arrays and objects live behind an `Arc`, so cloning a value is
//!   cheap and two versions of a form can share every subtree neither of them changed.
//!
//! ```rust
//! use formstate::FormValue;
//! use serde_json::json;
//!
//! let value = FormValue::from(json!({"name": "Alice", "tags": ["a", "b"]}));
//! let copy = value.clone();
//! assert!(value.ptr_eq(&copy));
//! assert_eq!(value.to_json(), json!({"name": "Alice", "tags": ["a", "b"]}));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Key-ordered mapping used for object values.
pub type FormMap = BTreeMap<String, FormValue>;

/// A single node of form data.
#[derive(Debug, Clone, Default)]
pub enum FormValue {
    /// No value at all.  Omitted from objects when serialized.
    #[default]
    Undefined,
    /// An explicit JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A JSON number.
    Number(Number),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Arc<Vec<FormValue>>),
    /// A key-ordered mapping of values.
    Object(Arc<FormMap>),
}

impl FormValue {
    /// Creates an empty object value.
    pub fn empty_object() -> Self {
        FormValue::Object(Arc::new(FormMap::new()))
    }

    /// Creates an empty array value.
    pub fn empty_array() -> Self {
        FormValue::Array(Arc::new(Vec::new()))
    }

    /// Builds an array value from its elements.
    pub fn array(items: Vec<FormValue>) -> Self {
        FormValue::Array(Arc::new(items))
    }

    /// Builds an object value from its entries.
    pub fn object(entries: FormMap) -> Self {
        FormValue::Object(Arc::new(entries))
    }

    /// Returns true for `FormValue::Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, FormValue::Undefined)
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&Vec<FormValue>> {
        match self {
            FormValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is an object.
    pub fn as_object(&self) -> Option<&FormMap> {
        match self {
            FormValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the string contents if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of an object value.
    pub fn get_field(&self, key: &str) -> Option<&FormValue> {
        self.as_object().and_then(|entries| entries.get(key))
    }

    /// Loose truthiness as used by the required-field check.
    ///
    /// Undefined, null, `false`, zero and the empty string are falsy.  Every container is
    /// truthy, including empty ones.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormValue::Undefined | FormValue::Null => false,
            FormValue::Bool(b) => *b,
            FormValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            FormValue::String(s) => !s.is_empty(),
            FormValue::Array(_) | FormValue::Object(_) => true,
        }
    }

    /// Reference identity for containers, value equality for everything else.
    ///
    /// Two containers are `ptr_eq` only when they are the very same allocation, which is how
    /// callers check that an unchanged subtree was shared rather than copied.
    pub fn ptr_eq(&self, other: &FormValue) -> bool {
        match (self, other) {
            (FormValue::Array(a), FormValue::Array(b)) => Arc::ptr_eq(a, b),
            (FormValue::Object(a), FormValue::Object(b)) => Arc::ptr_eq(a, b),
            (FormValue::Array(_), _) | (FormValue::Object(_), _) => false,
            (a, b) => a == b,
        }
    }

    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FormValue::Undefined => "undefined",
            FormValue::Null => "null",
            FormValue::Bool(_) => "boolean",
            FormValue::Number(_) => "number",
            FormValue::String(_) => "string",
            FormValue::Array(_) => "array",
            FormValue::Object(_) => "object",
        }
    }

    /// Converts into a `serde_json::Value`, dropping undefined object entries.
    pub fn to_json(&self) -> Value {
        match self {
            FormValue::Undefined | FormValue::Null => Value::Null,
            FormValue::Bool(b) => Value::Bool(*b),
            FormValue::Number(n) => Value::Number(n.clone()),
            FormValue::String(s) => Value::String(s.clone()),
            FormValue::Array(items) => Value::Array(items.iter().map(FormValue::to_json).collect()),
            FormValue::Object(entries) => Value::Object(
                entries
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for FormValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FormValue::Undefined, FormValue::Undefined) => true,
            (FormValue::Null, FormValue::Null) => true,
            (FormValue::Bool(a), FormValue::Bool(b)) => a == b,
            (FormValue::Number(a), FormValue::Number(b)) => a == b,
            (FormValue::String(a), FormValue::String(b)) => a == b,
            (FormValue::Array(a), FormValue::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (FormValue::Object(a), FormValue::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => FormValue::Number(n),
            Value::String(s) => FormValue::String(s),
            Value::Array(items) => {
                FormValue::array(items.into_iter().map(FormValue::from).collect())
            }
            Value::Object(entries) => FormValue::object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, FormValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for FormValue {
    fn from(value: &Value) -> Self {
        FormValue::from(value.clone())
    }
}

impl From<&FormValue> for Value {
    fn from(value: &FormValue) -> Self {
        value.to_json()
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<i32> for FormValue {
    fn from(n: i32) -> Self {
        FormValue::Number(Number::from(n))
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(Number::from(n))
    }
}

impl From<u64> for FormValue {
    fn from(n: u64) -> Self {
        FormValue::Number(Number::from(n))
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(FormValue::Null, FormValue::Number)
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormValue::Undefined | FormValue::Null => serializer.serialize_unit(),
            FormValue::Bool(b) => serializer.serialize_bool(*b),
            FormValue::Number(n) => n.serialize(serializer),
            FormValue::String(s) => serializer.serialize_str(s),
            FormValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FormValue::Object(entries) => {
                let defined = entries.iter().filter(|(_, v)| !v.is_undefined());
                let mut map = serializer.serialize_map(Some(defined.clone().count()))?;
                for (key, value) in defined {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for FormValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FormValue::from)
    }
}

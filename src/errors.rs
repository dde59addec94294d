//! Error types for formstate operations.

use crate::Path;

/// Errors raised while interpreting a schema.
///
/// A malformed schema is a programming error upstream of the form, so these propagate to the
/// caller instead of being papered over with a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The schema (or a nested sub-schema) is not a JSON object.
    #[error("Schema at '{path}' must be an object")]
    NotAnObject {
        /// Data path of the offending sub-schema.
        path: Path,
    },
    /// The schema has no `type` field, or it is not a string.
    #[error("Schema at '{path}' must have a type field")]
    MissingType {
        /// Data path of the offending sub-schema.
        path: Path,
    },
    /// The schema's `type` is not one of the supported types.
    #[error("Unknown schema type at '{path}': {type_name}")]
    UnknownType {
        /// Data path of the offending sub-schema.
        path: Path,
        /// The unrecognized type name.
        type_name: String,
    },
    /// The schema does not describe a list with an `items` schema at this data path.
    #[error("Schema does not describe a list at '{path}'")]
    NotAList {
        /// Data path that was looked up.
        path: Path,
    },
}

impl SchemaError {
    /// Returns the data path the error was raised at.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotAnObject { path } => path,
            Self::MissingType { path } => path,
            Self::UnknownType { path, .. } => path,
            Self::NotAList { path } => path,
        }
    }

    pub(crate) fn at(self, prefix: &Path) -> Self {
        match self {
            Self::NotAnObject { path } => Self::NotAnObject {
                path: prefix.join(&path),
            },
            Self::MissingType { path } => Self::MissingType {
                path: prefix.join(&path),
            },
            Self::UnknownType { path, type_name } => Self::UnknownType {
                path: prefix.join(&path),
                type_name,
            },
            Self::NotAList { path } => Self::NotAList {
                path: prefix.join(&path),
            },
        }
    }
}

/// Errors raised when parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A dot-separated segment was empty, as in `a..b` or `a.`.
    #[error("Empty segment at offset {offset} in path '{path}'")]
    EmptySegment {
        /// The path text.
        path: String,
        /// Byte offset of the empty segment.
        offset: usize,
    },
    /// A `[` was never closed.
    #[error("Unterminated bracket in path '{path}'")]
    UnterminatedBracket {
        /// The path text.
        path: String,
    },
    /// A bracket held something other than an index or a quoted key.
    #[error("Invalid bracket segment '{segment}' in path '{path}'")]
    InvalidBracket {
        /// The path text.
        path: String,
        /// The bracket contents.
        segment: String,
    },
    /// Unexpected text directly after a closing bracket.
    #[error("Unexpected character '{found}' after bracket in path '{path}'")]
    UnexpectedCharacter {
        /// The path text.
        path: String,
        /// The offending character.
        found: char,
    },
}

/// Errors raised while loading a form configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The file is not valid YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The file extension is neither JSON nor YAML.
    #[error("Unsupported config extension: {0}")]
    UnsupportedExtension(String),
    /// The configured schema could not be used to build the form.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display() {
        let error = SchemaError::MissingType {
            path: "address.street".parse().unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Schema at 'address.street' must have a type field"
        );

        let error = SchemaError::UnknownType {
            path: Path::root(),
            type_name: "date".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown schema type at '': date");

        let error = SchemaError::NotAList {
            path: "notes".parse().unwrap(),
        };
        assert_eq!(error.to_string(), "Schema does not describe a list at 'notes'");
    }

    #[test]
    fn schema_error_prefix() {
        let error = SchemaError::MissingType {
            path: "street".parse().unwrap(),
        };
        let prefix: Path = "contacts.0".parse().unwrap();
        assert_eq!(error.at(&prefix).path().to_string(), "contacts.0.street");
    }

    #[test]
    fn path_error_display() {
        let error = PathError::UnterminatedBracket {
            path: "a[1".to_string(),
        };
        assert_eq!(error.to_string(), "Unterminated bracket in path 'a[1'");
    }
}

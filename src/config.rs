//! Form configuration files.
//!
//! A form configuration bundles the schema of a form with the data it should start from.  It
//! can be written as JSON or YAML:
//!
//! ```yaml
//! schema:
//!   type: object
//!   required: [name]
//!   properties:
//!     name: {type: string}
//! form_data:
//!   name: Alice
//! ```

use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::controller::{FormController, FormHandler};
use crate::errors::ConfigError;
use crate::form_value::FormValue;
use crate::schema::Schema;

/// A schema together with the data supplied at mount time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Shape of the form.
    pub schema: Schema,
    /// Data layered over the schema defaults when the form mounts.
    #[serde(default, alias = "formData", skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormValue>,
}

impl FormConfig {
    /// Creates a configuration.
    pub fn new(schema: Schema, form_data: Option<FormValue>) -> Self {
        Self { schema, form_data }
    }

    /// Parses a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a YAML configuration.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(text)?)
    }

    /// Loads a configuration file, choosing the format from its extension.
    ///
    /// `.json` files are read as JSON; `.yaml` and `.yml` files as YAML.
    pub fn load(path: &FsPath) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = fs::read_to_string(path)?;
        match extension.as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Err(ConfigError::UnsupportedExtension(path.display().to_string())),
        }
    }

    /// Mounts a form for this configuration.
    pub fn into_controller<H: FormHandler>(
        self,
        handler: H,
    ) -> Result<FormController<H>, ConfigError> {
        let controller = FormController::new(self.schema, self.form_data.as_ref(), handler)?;
        Ok(controller)
    }
}

use std::fmt;
use std::process;
use std::str::FromStr;

/// Output format for printed form data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("unknown output format '{}': expected json or yaml", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message and usage information
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", usage);
    process::exit(1);
}

/// Renders a value in the requested format
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String, String>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to format JSON: {}", e)),
        OutputFormat::Yaml => {
            serde_yml::to_string(value).map_err(|e| format!("Failed to format YAML: {}", e))
        }
    }
}

/// Prints a value in the requested format or exits with error
pub fn print_or_exit<T>(value: &T, format: OutputFormat, context: &str)
where
    T: serde::Serialize,
{
    match render(value, format) {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => exit_with_error(&format!("{} output: {}", context, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormValue;
    use serde_json::json;

    #[test]
    fn output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "json");
    }

    #[test]
    fn render_drops_undefined_fields() {
        let mut data = FormValue::from(json!({"name": "Ann"}));
        data = crate::set_path(&data, &"age".parse().unwrap(), FormValue::Undefined);
        let text = render(&data, OutputFormat::Json).unwrap();
        assert_eq!(text, "{\n  \"name\": \"Ann\"\n}");
        let yaml = render(&data, OutputFormat::Yaml).unwrap();
        assert_eq!(yaml.trim_end(), "name: Ann");
    }
}

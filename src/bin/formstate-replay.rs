use std::fs;
use std::path::Path;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tracing_subscriber::EnvFilter;

use formstate::cli_utils::{self, OutputFormat};
use formstate::{FormConfig, FormEvent, FormHandler, SubmitEvent};

const USAGE: &str = r#"Usage: formstate-replay [options] <config.json|config.yaml> [events.jsonl]

Mounts the form described by the config file, replays one JSON event per line from the
event file, and prints the final form data.

Options:
  --output <format>    Output format for the form data: json or yaml (default: json)
  --verbose            Log every state transition to stderr

Events:
  {"event": "field_change", "path": "contacts.0.email", "value": "a@b.c"}
  {"event": "add_item", "path": "contacts", "schema": {"type": "object", "properties": {}}}
  {"event": "delete_item", "path": "contacts", "index": 0}
  {"event": "submit"}"#;

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Output format for the form data: json or yaml (default: json)")]
    output: OutputFormat,
    #[arrrg(flag, "Log every state transition to stderr")]
    verbose: bool,
}

#[derive(Default)]
struct Submissions {
    missing: Vec<Vec<String>>,
    count: usize,
}

impl FormHandler for Submissions {
    fn on_error(&mut self, missing: &[String]) {
        self.missing.push(missing.to_vec());
    }

    fn on_submit(&mut self, _event: &SubmitEvent) {
        self.count += 1;
    }
}

fn main() {
    let (options, free) = Options::from_command_line(USAGE);

    let default_filter = if options.verbose {
        "formstate=trace"
    } else {
        "formstate=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if free.is_empty() || free.len() > 2 {
        cli_utils::exit_with_usage_error("expected a config file and an optional event file", USAGE);
    }

    let config = FormConfig::load(Path::new(&free[0])).unwrap_or_else(|e| {
        cli_utils::exit_with_error(&format!("Failed to load {}: {}", free[0], e))
    });
    let mut form = config
        .into_controller(Submissions::default())
        .unwrap_or_else(|e| cli_utils::exit_with_error(&format!("Failed to mount form: {}", e)));

    if let Some(events_path) = free.get(1) {
        let content = fs::read_to_string(events_path).unwrap_or_else(|e| {
            cli_utils::exit_with_error(&format!("Failed to read {}: {}", events_path, e))
        });
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: FormEvent = serde_json::from_str(line).unwrap_or_else(|e| {
                cli_utils::exit_with_error(&format!(
                    "{}:{}: invalid event: {}",
                    events_path,
                    number + 1,
                    e
                ))
            });
            if let Err(e) = form.dispatch(event) {
                cli_utils::exit_with_error(&format!("{}:{}: {}", events_path, number + 1, e));
            }
        }
    }

    let (state, submissions) = form.into_parts();
    for missing in &submissions.missing {
        eprintln!("Missing required fields: {}", missing.join(", "));
    }
    if options.verbose {
        eprintln!("Submissions: {}", submissions.count);
    }
    cli_utils::print_or_exit(state.form_data(), options.output, "form data");
}

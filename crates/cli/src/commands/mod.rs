pub mod config;
pub mod fulfill;
pub mod matching;
pub mod validate;

use serde::Serialize;

/// Exit codes: 0 success, 2 config validation, 3 unreadable input file,
/// 4 malformed request, 5 empty catalog or unknown supplier, 6 validation
/// checks failed.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }

    pub fn report(report: &impl Serialize) -> Self {
        Self { exit_code: 0, output: serialize_payload(report) }
    }
}

pub(crate) fn load_catalog(
    command: &str,
    path: &std::path::Path,
) -> Result<sourcemate_core::Catalog, CommandResult> {
    sourcemate_core::catalog::load_json(path).map_err(|error| {
        CommandResult::failure(command, "catalog_file", error.to_string(), 3)
    })
}

pub(crate) fn match_failure(command: &str, error: sourcemate_core::MatchError) -> CommandResult {
    use sourcemate_core::MatchError::*;
    let (class, exit_code) = match &error {
        InvalidRequest(_) => ("invalid_request", 4),
        EmptyCatalog => ("empty_catalog", 5),
        UnknownSupplier(_) => ("unknown_supplier", 5),
    };
    CommandResult::failure(command, class, error.to_string(), exit_code)
}

fn serialize_payload(payload: &impl Serialize) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

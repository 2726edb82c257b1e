use std::fs;
use std::path::Path;

use serde::Serialize;
use sourcemate_core::config::EngineConfig;
use sourcemate_core::{Query, RawRequest};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct ValidationCheck {
    name: &'static str,
    status: CheckStatus,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    command: &'static str,
    status: CheckStatus,
    summary: String,
    checks: Vec<ValidationCheck>,
}

/// Checks the inputs a matching run would consume, without running one.
pub fn run(
    config: &EngineConfig,
    catalog_path: Option<&Path>,
    request_path: Option<&Path>,
) -> CommandResult {
    let mut checks = Vec::new();

    checks.push(match config.validate() {
        Ok(()) => ValidationCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            message: "configuration loaded and validated".to_owned(),
        },
        Err(error) => ValidationCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            message: error.to_string(),
        },
    });

    checks.push(match catalog_path {
        Some(path) => match sourcemate_core::catalog::load_json(path) {
            Ok(catalog) => ValidationCheck {
                name: "catalog_file",
                status: CheckStatus::Pass,
                message: format!(
                    "{} suppliers across {} categories",
                    catalog.len(),
                    catalog.categories().count()
                ),
            },
            Err(error) => ValidationCheck {
                name: "catalog_file",
                status: CheckStatus::Fail,
                message: error.to_string(),
            },
        },
        None => skipped("catalog_file"),
    });

    checks.push(match request_path {
        Some(path) => match load_and_normalize(path) {
            Ok(query) => ValidationCheck {
                name: "request_file",
                status: CheckStatus::Pass,
                message: match query {
                    Query::Product { ref items, .. } => {
                        format!("product request with {} items", items.len())
                    }
                    Query::Category { ref category, .. } => {
                        format!("category request for `{category}`")
                    }
                },
            },
            Err(message) => ValidationCheck {
                name: "request_file",
                status: CheckStatus::Fail,
                message,
            },
        },
        None => skipped("request_file"),
    });

    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let passed = checks.iter().filter(|check| check.status == CheckStatus::Pass).count();
    let report = ValidationReport {
        command: "validate",
        status: if failed { CheckStatus::Fail } else { CheckStatus::Pass },
        summary: format!("validate: {passed}/{} checks passed", checks.len()),
        checks,
    };
    let mut result = CommandResult::report(&report);
    if failed {
        result.exit_code = 6;
    }
    result
}

fn load_and_normalize(path: &Path) -> Result<Query, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read request file `{}`: {error}", path.display()))?;
    let request: RawRequest = serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse request file `{}`: {error}", path.display()))?;
    request.normalize().map_err(|error| error.to_string())
}

fn skipped(name: &'static str) -> ValidationCheck {
    ValidationCheck {
        name,
        status: CheckStatus::Skipped,
        message: "no input provided".to_owned(),
    }
}

use std::fs;
use std::path::Path;

use serde::Serialize;
use sourcemate_core::config::EngineConfig;
use sourcemate_core::{MatchEngine, MatchResult, RawRequest, SortStrategy};

use crate::commands::{load_catalog, match_failure, CommandResult};

#[derive(Debug, Serialize)]
struct MatchRow {
    supplier_id: String,
    name: String,
    platform: &'static str,
    rating: f64,
    location: String,
    adjusted_price: i64,
    adjusted_lead_time: String,
    recommended: bool,
    match_percentage: Option<u8>,
    rationale: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    command: &'static str,
    status: &'static str,
    strategy: &'static str,
    total: usize,
    recommended: Vec<String>,
    results: Vec<MatchRow>,
}

pub fn run(
    config: &EngineConfig,
    catalog_path: &Path,
    request_path: &Path,
    strategy_label: &str,
) -> CommandResult {
    let Some(strategy) = SortStrategy::parse(strategy_label) else {
        return CommandResult::failure(
            "match",
            "unknown_strategy",
            format!("unknown sort strategy `{strategy_label}`"),
            4,
        );
    };

    let catalog = match load_catalog("match", catalog_path) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };
    let request = match load_request(request_path) {
        Ok(request) => request,
        Err(result) => return result,
    };

    let engine = MatchEngine::new(catalog, config.clone());
    let results = match engine.submit(request, strategy) {
        Ok(results) => results,
        Err(error) => return match_failure("match", error),
    };

    tracing::info!(total = results.len(), strategy = strategy.label(), "matched suppliers");

    let report = MatchReport {
        command: "match",
        status: "ok",
        strategy: strategy.label(),
        total: results.len(),
        recommended: results
            .iter()
            .filter(|result| result.recommended)
            .map(|result| result.supplier.id.0.clone())
            .collect(),
        results: results.into_iter().map(row).collect(),
    };
    CommandResult::report(&report)
}

fn load_request(path: &Path) -> Result<RawRequest, CommandResult> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CommandResult::failure(
            "match",
            "request_file",
            format!("could not read request file `{}`: {error}", path.display()),
            3,
        )
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        CommandResult::failure(
            "match",
            "request_file",
            format!("could not parse request file `{}`: {error}", path.display()),
            3,
        )
    })
}

fn row(result: MatchResult) -> MatchRow {
    MatchRow {
        supplier_id: result.supplier.id.0,
        name: result.supplier.name,
        platform: result.supplier.platform.label(),
        rating: result.supplier.rating,
        location: result.supplier.location.summary,
        adjusted_price: result.adjusted_price,
        adjusted_lead_time: result.adjusted_lead_time,
        recommended: result.recommended,
        match_percentage: result.match_percentage,
        rationale: result.rationale,
    }
}

use std::fs;
use std::path::Path;

use serde::Serialize;
use sourcemate_core::config::EngineConfig;
use sourcemate_core::{
    FulfillmentSummary, MatchEngine, RawItem, RequestedItem, SupplierId,
};

use crate::commands::{load_catalog, match_failure, CommandResult};

#[derive(Debug, Serialize)]
struct FulfillReport {
    command: &'static str,
    status: &'static str,
    supplier_id: String,
    grand_total: i64,
    lines: Vec<FulfillLine>,
}

#[derive(Debug, Serialize)]
struct FulfillLine {
    requested_name: String,
    requested_quantity: u64,
    unit: String,
    matched_item: Option<String>,
    available: u64,
    status: String,
    unit_price: i64,
    satisfiable: u64,
    line_total: i64,
}

pub fn run(
    config: &EngineConfig,
    catalog_path: &Path,
    supplier_id: &str,
    items_path: &Path,
) -> CommandResult {
    let catalog = match load_catalog("fulfill", catalog_path) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };
    let requested = match load_items(items_path) {
        Ok(requested) => requested,
        Err(result) => return result,
    };

    let engine = MatchEngine::new(catalog, config.clone());
    let summary = match engine.fulfill(&SupplierId(supplier_id.to_owned()), &requested) {
        Ok(summary) => summary,
        Err(error) => return match_failure("fulfill", error),
    };

    tracing::info!(
        supplier_id,
        lines = summary.lines.len(),
        grand_total = summary.grand_total,
        "computed fulfillment quote"
    );
    CommandResult::report(&report(summary))
}

/// The items file is a JSON array of raw item rows; rows without a product
/// name are dropped and zero quantities are clamped, the same way request
/// normalization treats them.
fn load_items(path: &Path) -> Result<Vec<RequestedItem>, CommandResult> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CommandResult::failure(
            "fulfill",
            "items_file",
            format!("could not read items file `{}`: {error}", path.display()),
            3,
        )
    })?;
    let rows: Vec<RawItem> = serde_json::from_str(&raw).map_err(|error| {
        CommandResult::failure(
            "fulfill",
            "items_file",
            format!("could not parse items file `{}`: {error}", path.display()),
            3,
        )
    })?;

    let requested: Vec<RequestedItem> = rows
        .into_iter()
        .filter(|row| !row.product_name.trim().is_empty())
        .map(|row| RequestedItem {
            name: row.product_name.trim().to_owned(),
            quantity: row.quantity.max(1),
            unit: row.unit,
            target_price: row.target_price,
        })
        .collect();
    if requested.is_empty() {
        return Err(CommandResult::failure(
            "fulfill",
            "invalid_request",
            "items file contains no named items",
            4,
        ));
    }
    Ok(requested)
}

fn report(summary: FulfillmentSummary) -> FulfillReport {
    FulfillReport {
        command: "fulfill",
        status: "ok",
        supplier_id: summary.supplier_id.0,
        grand_total: summary.grand_total,
        lines: summary
            .lines
            .into_iter()
            .map(|line| FulfillLine {
                requested_name: line.requested_name,
                requested_quantity: line.requested_quantity,
                unit: line.unit,
                matched_item: line.matched_item,
                available: line.available,
                status: line.status.label().to_owned(),
                unit_price: line.unit_price,
                satisfiable: line.satisfiable,
                line_total: line.line_total,
            })
            .collect(),
    }
}

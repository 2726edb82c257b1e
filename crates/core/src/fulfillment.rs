//! Fulfillment calculator: per-item breakdown of how much of a request one
//! supplier can satisfy, and at what cost. Always produces a line for every
//! requested item; incomplete catalog data falls back to configured
//! defaults instead of dropping the line.

use crate::config::EngineConfig;
use crate::domain::matching::{FulfillmentLine, FulfillmentSummary};
use crate::domain::request::RequestedItem;
use crate::domain::supplier::{AvailabilityStatus, ItemAvailability, Supplier};

pub fn fulfill(
    supplier: &Supplier,
    requested: &[RequestedItem],
    config: &EngineConfig,
) -> FulfillmentSummary {
    let lines: Vec<FulfillmentLine> =
        requested.iter().map(|item| line_for(supplier, item, config)).collect();
    let grand_total = lines.iter().map(|line| line.line_total).sum();
    FulfillmentSummary { supplier_id: supplier.id.clone(), lines, grand_total }
}

fn line_for(supplier: &Supplier, item: &RequestedItem, config: &EngineConfig) -> FulfillmentLine {
    let matched = match_declared_item(supplier, &item.name);
    let (matched_item, available) = match matched {
        Some(declared) => (Some(declared.name.clone()), declared.available),
        None => (None, config.fulfillment.assumed_available),
    };
    let unit_price = config.unit_price_for(&item.name);
    let satisfiable = item.quantity.min(available);
    let unit = if item.unit.trim().is_empty() {
        config.fulfillment.default_unit.clone()
    } else {
        item.unit.clone()
    };
    FulfillmentLine {
        requested_name: item.name.clone(),
        requested_quantity: item.quantity,
        unit,
        matched_item,
        available,
        status: AvailabilityStatus::from_quantity(available, &config.availability),
        unit_price,
        satisfiable,
        // Quantities are user input; saturate rather than wrap on absurd ones.
        line_total: (satisfiable as i64).saturating_mul(unit_price),
    }
}

/// Case-insensitive substring match in either direction between the
/// requested name and the supplier's declared availability records.
fn match_declared_item<'a>(supplier: &'a Supplier, name: &str) -> Option<&'a ItemAvailability> {
    let requested = name.to_lowercase();
    supplier.items.iter().find(|declared| {
        let declared = declared.name.to_lowercase();
        declared.contains(&requested) || requested.contains(&declared)
    })
}

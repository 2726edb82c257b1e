use serde::{Deserialize, Serialize};

use crate::domain::supplier::{parse_lead_time, AvailabilityStatus, Supplier, SupplierId};

/// A supplier decorated with per-query adjustments and ranking metadata.
/// Derived fresh for every query; the underlying catalog record is never
/// touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub supplier: Supplier,
    /// Geo-adjusted price in minor units.
    pub adjusted_price: i64,
    /// Geo-adjusted lead-time range; equals the raw catalog string when
    /// that string could not be parsed into a range.
    pub adjusted_lead_time: String,
    pub recommended: bool,
    /// 0..=100, set only on recommended entries.
    pub match_percentage: Option<u8>,
    pub rationale: Option<String>,
}

impl MatchResult {
    /// Lower bound of the adjusted lead-time range, used as the lead-time
    /// sort key. `None` means unparsable, which sorts last.
    pub fn lead_time_lower_bound(&self) -> Option<u32> {
        parse_lead_time(&self.adjusted_lead_time).map(|(min, _)| min)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentLine {
    pub requested_name: String,
    pub requested_quantity: u64,
    pub unit: String,
    /// Name of the supplier's matched availability record, `None` when the
    /// line was produced from fallback defaults.
    pub matched_item: Option<String>,
    pub available: u64,
    pub status: AvailabilityStatus,
    /// Minor units.
    pub unit_price: i64,
    /// min(requested, available)
    pub satisfiable: u64,
    /// satisfiable x unit_price, minor units.
    pub line_total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentSummary {
    pub supplier_id: SupplierId,
    pub lines: Vec<FulfillmentLine>,
    /// Exact sum of the line totals, minor units.
    pub grand_total: i64,
}

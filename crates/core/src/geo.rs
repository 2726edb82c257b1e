//! Geo-adjustment stage. True geocoding is out of scope, so proximity is
//! a deterministic four-tier heuristic over the query's free-text location
//! and the supplier's declared location, with the multiplier/offset per
//! tier coming from configuration.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{EngineConfig, GeoTier};
use crate::domain::matching::MatchResult;
use crate::domain::supplier::{parse_lead_time, Supplier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProximityTier {
    SameCity,
    SameMetro,
    SameCountry,
    CrossBorder,
}

/// Classifies the supplier against the query location. Tiers are checked
/// strictest first; an empty location never reaches this function.
pub fn proximity(supplier: &Supplier, location: &str, config: &EngineConfig) -> ProximityTier {
    let location = location.trim().to_lowercase();
    let summary = supplier.location.summary.to_lowercase();

    let first_segment = location.split(',').next().unwrap_or_default().trim();
    if !first_segment.is_empty() && summary.contains(first_segment) {
        return ProximityTier::SameCity;
    }

    if config.geo.metro_areas.iter().any(|metro| {
        let metro = metro.to_lowercase();
        location.contains(&metro) && summary.contains(&metro)
    }) {
        return ProximityTier::SameMetro;
    }

    let query_country = config.geography.resolve(&location).country;
    let same_country = match (query_country, supplier.location.country.as_deref()) {
        (Some(query), Some(declared)) => query.eq_ignore_ascii_case(declared),
        _ => false,
    };
    if same_country {
        ProximityTier::SameCountry
    } else {
        ProximityTier::CrossBorder
    }
}

/// Produces the geo-adjusted view of one supplier for one query location.
/// Pure and idempotent: the same (supplier, location) pair always yields
/// the same result, and the source record is never modified.
pub fn adjust(supplier: &Supplier, location: &str, config: &EngineConfig) -> MatchResult {
    let tier = if location.trim().is_empty() {
        // No location signal: prices and lead times pass through unscaled.
        None
    } else {
        Some(proximity(supplier, location, config))
    };
    let GeoTier { multiplier, lead_time_offset_days } = match tier {
        None => GeoTier { multiplier: Decimal::ONE, lead_time_offset_days: 0 },
        Some(ProximityTier::SameCity) => config.geo.tiers.same_city.clone(),
        Some(ProximityTier::SameMetro) => config.geo.tiers.same_metro.clone(),
        Some(ProximityTier::SameCountry) => config.geo.tiers.same_country.clone(),
        Some(ProximityTier::CrossBorder) => config.geo.tiers.cross_border.clone(),
    };

    MatchResult {
        adjusted_price: scale_price(supplier.base_price, multiplier),
        adjusted_lead_time: shift_lead_time(&supplier.lead_time, lead_time_offset_days),
        supplier: supplier.clone(),
        recommended: false,
        match_percentage: None,
        rationale: None,
    }
}

/// round(base x multiplier), half away from zero, in minor units.
fn scale_price(base_price: i64, multiplier: Decimal) -> i64 {
    (Decimal::from(base_price) * multiplier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(base_price)
}

/// Shifts a parseable "min-max days" range by the tier offset; anything
/// unparsable passes through untouched so only the price gets adjusted.
fn shift_lead_time(raw: &str, offset_days: u32) -> String {
    match parse_lead_time(raw) {
        Some((min, max)) => format!("{}-{} days", min + offset_days, max + offset_days),
        None => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::domain::supplier::{Platform, Supplier, SupplierId, SupplierLocation};

    use super::{adjust, proximity, ProximityTier};

    fn jakarta_supplier() -> Supplier {
        Supplier {
            id: SupplierId("food-1".to_owned()),
            name: "PT Sumber Pangan".to_owned(),
            base_price: 3200,
            lead_time: "1-2 days".to_owned(),
            platform: Platform::Tokopedia,
            rating: 4.8,
            location: SupplierLocation {
                summary: "Jakarta Selatan, DKI Jakarta".to_owned(),
                address: "Jl. Sudirman Kav. 76-78".to_owned(),
                country: Some("Indonesia".to_owned()),
                province: Some("DKI Jakarta".to_owned()),
                city: Some("Jakarta Selatan".to_owned()),
                district: None,
            },
            distance_km: Some(15.0),
            specialties: vec!["Food Products".to_owned()],
            items: Vec::new(),
            description: None,
            profile: Default::default(),
        }
    }

    #[test]
    fn same_city_keeps_price_and_lead_time() {
        let config = EngineConfig::default();
        let result = adjust(&jakarta_supplier(), "Jakarta Selatan, DKI Jakarta", &config);
        assert_eq!(result.adjusted_price, 3200);
        assert_eq!(result.adjusted_lead_time, "1-2 days");
    }

    #[test]
    fn shared_metro_applies_mild_markup() {
        let config = EngineConfig::default();
        let supplier = jakarta_supplier();
        // Different city token, same metro keyword on both sides.
        let tier = proximity(&supplier, "Jakarta Pusat, DKI Jakarta", &config);
        assert_eq!(tier, ProximityTier::SameMetro);
        let result = adjust(&supplier, "Jakarta Pusat, DKI Jakarta", &config);
        assert_eq!(result.adjusted_price, 3520); // 3200 x 1.1
        assert_eq!(result.adjusted_lead_time, "2-3 days");
    }

    #[test]
    fn same_country_applies_domestic_markup() {
        let config = EngineConfig::default();
        let result = adjust(&jakarta_supplier(), "Surabaya, East Java", &config);
        assert_eq!(result.adjusted_price, 4160); // 3200 x 1.3
        assert_eq!(result.adjusted_lead_time, "3-4 days");
    }

    #[test]
    fn cross_border_applies_full_markup_and_offset() {
        let config = EngineConfig::default();
        let result = adjust(&jakarta_supplier(), "Orchard, Singapore", &config);
        assert_eq!(result.adjusted_price, 5760); // 3200 x 1.8
        assert_eq!(result.adjusted_lead_time, "6-7 days");
    }

    #[test]
    fn empty_location_passes_through_unadjusted() {
        let config = EngineConfig::default();
        let result = adjust(&jakarta_supplier(), "  ", &config);
        assert_eq!(result.adjusted_price, 3200);
        assert_eq!(result.adjusted_lead_time, "1-2 days");
    }

    #[test]
    fn unparsable_lead_time_passes_through_while_price_adjusts() {
        let config = EngineConfig::default();
        let mut supplier = jakarta_supplier();
        supplier.lead_time = "ships weekly".to_owned();
        let result = adjust(&supplier, "Orchard, Singapore", &config);
        assert_eq!(result.adjusted_price, 5760);
        assert_eq!(result.adjusted_lead_time, "ships weekly");
    }

    #[test]
    fn adjustment_is_idempotent_for_the_same_inputs() {
        let config = EngineConfig::default();
        let supplier = jakarta_supplier();
        let first = adjust(&supplier, "Surabaya, East Java", &config);
        let second = adjust(&supplier, "Surabaya, East Java", &config);
        assert_eq!(first, second);
    }

    #[test]
    fn source_record_is_never_mutated() {
        let config = EngineConfig::default();
        let supplier = jakarta_supplier();
        let before = supplier.clone();
        let _ = adjust(&supplier, "Orchard, Singapore", &config);
        assert_eq!(supplier, before);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let config = EngineConfig::default();
        let mut supplier = jakarta_supplier();
        supplier.base_price = 3205; // 3205 x 1.1 = 3525.5 -> 3526
        let result = adjust(&supplier, "Jakarta Pusat, DKI Jakarta", &config);
        assert_eq!(result.adjusted_price, 3526);
    }
}

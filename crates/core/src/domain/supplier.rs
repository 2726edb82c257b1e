use serde::{Deserialize, Serialize};

use crate::config::AvailabilityThresholds;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SupplierId(pub String);

/// Closed enumeration of the sales platforms the catalog covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Shopee,
    Alibaba,
    Tokopedia,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Shopee, Platform::Alibaba, Platform::Tokopedia];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shopee" => Some(Self::Shopee),
            "alibaba" => Some(Self::Alibaba),
            "tokopedia" => Some(Self::Tokopedia),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Shopee => "Shopee",
            Self::Alibaba => "Alibaba",
            Self::Tokopedia => "Tokopedia",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stock status derived from an availability quantity. The numeric
/// thresholds come from configuration; the mapping is monotonic in the
/// quantity by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Limited,
    Unavailable,
}

impl AvailabilityStatus {
    pub fn from_quantity(available: u64, thresholds: &AvailabilityThresholds) -> Self {
        if available == 0 {
            Self::Unavailable
        } else if available < thresholds.limited_below {
            Self::Limited
        } else {
            Self::Available
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Limited => "limited",
            Self::Unavailable => "unavailable",
        }
    }
}

/// One declared item-availability record on a supplier. Status is not
/// stored; it is derived from `available` on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAvailability {
    pub name: String,
    pub available: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierLocation {
    /// Human-readable one-line location, e.g. "Jakarta Selatan, DKI Jakarta".
    pub summary: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

/// Contact and company-profile metadata carried through from the catalog
/// provider. The engine never branches on these fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub year_established: Option<u16>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// One immutable catalog entry. Populated once at catalog construction and
/// never mutated; every per-query adjustment produces derived values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    /// Currency-agnostic integer minor units, strictly positive.
    pub base_price: i64,
    /// Free-text lead-time range such as "1-2 days". Kept raw because the
    /// catalog provider is not guaranteed to supply a parseable range.
    pub lead_time: String,
    pub platform: Platform,
    /// 0.0..=5.0
    pub rating: f64,
    pub location: SupplierLocation,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub items: Vec<ItemAvailability>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub profile: SupplierProfile,
}

impl Supplier {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_price <= 0 {
            return Err(DomainError::InvariantViolation(format!(
                "supplier `{}`: base price must be positive, got {}",
                self.id.0, self.base_price
            )));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(DomainError::InvariantViolation(format!(
                "supplier `{}`: rating must be within 0..=5, got {}",
                self.id.0, self.rating
            )));
        }
        if let Some((min, max)) = parse_lead_time(&self.lead_time) {
            if min > max {
                return Err(DomainError::InvariantViolation(format!(
                    "supplier `{}`: lead-time range {}-{} has min above max",
                    self.id.0, min, max
                )));
            }
        }
        Ok(())
    }

    pub fn lead_time_bounds(&self) -> Option<(u32, u32)> {
        parse_lead_time(&self.lead_time)
    }
}

/// Extracts the first two integers from a free-text lead-time range, e.g.
/// "1-2 days" -> (1, 2). Returns `None` when fewer than two integers are
/// present, in which case callers pass the raw string through unchanged.
pub fn parse_lead_time(raw: &str) -> Option<(u32, u32)> {
    let mut numbers: Vec<u32> = Vec::with_capacity(2);
    let mut current = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            numbers.push(current.parse().ok()?);
            current.clear();
            if numbers.len() == 2 {
                break;
            }
        }
    }
    if numbers.len() < 2 && !current.is_empty() {
        numbers.push(current.parse().ok()?);
    }
    match numbers.as_slice() {
        [min, max, ..] => Some((*min, *max)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AvailabilityThresholds;

    use super::{
        parse_lead_time, AvailabilityStatus, Platform, Supplier, SupplierId, SupplierLocation,
        SupplierProfile,
    };

    fn supplier() -> Supplier {
        Supplier {
            id: SupplierId("acme-1".to_owned()),
            name: "Acme Foods".to_owned(),
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
            profile: SupplierProfile::default(),
        }
    }

    #[test]
    fn valid_record_passes_validation() {
        supplier().validate().expect("fixture should satisfy all invariants");
    }

    #[test]
    fn non_positive_base_price_is_rejected() {
        let mut record = supplier();
        record.base_price = 0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut record = supplier();
        record.rating = 5.1;
        assert!(record.validate().is_err());
    }

    #[test]
    fn inverted_lead_time_range_is_rejected() {
        let mut record = supplier();
        record.lead_time = "9-3 days".to_owned();
        assert!(record.validate().is_err());
    }

    #[test]
    fn lead_time_parsing_extracts_first_two_integers() {
        assert_eq!(parse_lead_time("1-2 days"), Some((1, 2)));
        assert_eq!(parse_lead_time("3-7 days"), Some((3, 7)));
        assert_eq!(parse_lead_time("around 10 to 14 days"), Some((10, 14)));
        assert_eq!(parse_lead_time("next week"), None);
        assert_eq!(parse_lead_time("7 days"), None);
    }

    #[test]
    fn availability_status_is_monotonic_in_quantity() {
        let thresholds = AvailabilityThresholds { limited_below: 4000 };
        assert_eq!(
            AvailabilityStatus::from_quantity(0, &thresholds),
            AvailabilityStatus::Unavailable
        );
        assert_eq!(
            AvailabilityStatus::from_quantity(3000, &thresholds),
            AvailabilityStatus::Limited
        );
        assert_eq!(
            AvailabilityStatus::from_quantity(4000, &thresholds),
            AvailabilityStatus::Available
        );
        assert_eq!(
            AvailabilityStatus::from_quantity(10_000, &thresholds),
            AvailabilityStatus::Available
        );
    }

    #[test]
    fn platform_parsing_is_case_insensitive() {
        assert_eq!(Platform::parse("tokopedia"), Some(Platform::Tokopedia));
        assert_eq!(Platform::parse(" Shopee "), Some(Platform::Shopee));
        assert_eq!(Platform::parse("ALIBABA"), Some(Platform::Alibaba));
        assert_eq!(Platform::parse("amazon"), None);
    }
}

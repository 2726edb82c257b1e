use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::supplier::Platform;
use crate::errors::MatchError;

/// One requested line in a product-mode request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub name: String,
    pub quantity: u64,
    pub unit: String,
    /// Buyer's target price in minor units, informational only.
    pub target_price: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimePreference {
    WithinTwoDays,
    UnderOneWeek,
    OneToTwoWeeks,
    TwoToFourWeeks,
    OneToTwoMonths,
    #[default]
    NoPreference,
}

impl LeadTimePreference {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "within 2 days" => Some(Self::WithinTwoDays),
            "< 1 week" => Some(Self::UnderOneWeek),
            "1-2 weeks" => Some(Self::OneToTwoWeeks),
            "2-4 weeks" => Some(Self::TwoToFourWeeks),
            "1-2 months" => Some(Self::OneToTwoMonths),
            "no preference" => Some(Self::NoPreference),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WithinTwoDays => "within 2 days",
            Self::UnderOneWeek => "< 1 week",
            Self::OneToTwoWeeks => "1-2 weeks",
            Self::TwoToFourWeeks => "2-4 weeks",
            Self::OneToTwoMonths => "1-2 months",
            Self::NoPreference => "no preference",
        }
    }
}

/// A normalized buyer request. The two modes carry disjoint payloads, so
/// consumers pattern-match instead of probing optional fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Query {
    Product {
        items: Vec<RequestedItem>,
        platforms: BTreeSet<Platform>,
        location: String,
        lead_time: LeadTimePreference,
    },
    Category {
        category: String,
        platforms: BTreeSet<Platform>,
        location: String,
        lead_time: LeadTimePreference,
    },
}

impl Query {
    pub fn location(&self) -> &str {
        match self {
            Self::Product { location, .. } | Self::Category { location, .. } => location,
        }
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        match self {
            Self::Product { platforms, .. } | Self::Category { platforms, .. } => platforms,
        }
    }

    pub fn lead_time(&self) -> LeadTimePreference {
        match self {
            Self::Product { lead_time, .. } | Self::Category { lead_time, .. } => *lead_time,
        }
    }

    pub fn items(&self) -> Option<&[RequestedItem]> {
        match self {
            Self::Product { items, .. } => Some(items),
            Self::Category { .. } => None,
        }
    }
}

/// One raw item row as submitted by the buyer, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub target_price: Option<i64>,
}

fn default_quantity() -> u64 {
    1
}

fn default_unit() -> String {
    "Pieces (Pcs)".to_owned()
}

/// The loosely-shaped buyer submission. `normalize` is the only path from
/// a raw submission into a `Query`; malformed submissions are surfaced as
/// `InvalidRequest`, never silently corrected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequest {
    pub mode: String,
    #[serde(default)]
    pub items: Vec<RawItem>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lead_time: String,
}

impl RawRequest {
    pub fn normalize(&self) -> Result<Query, MatchError> {
        let platforms = normalize_platforms(&self.platforms)?;

        let location = self.location.trim().to_owned();
        if location.is_empty() {
            return Err(MatchError::InvalidRequest(
                "a delivery location is required".to_owned(),
            ));
        }

        let lead_time = if self.lead_time.trim().is_empty() {
            LeadTimePreference::NoPreference
        } else {
            LeadTimePreference::parse(&self.lead_time).ok_or_else(|| {
                MatchError::InvalidRequest(format!(
                    "unknown lead-time preference `{}`",
                    self.lead_time.trim()
                ))
            })?
        };

        match self.mode.trim().to_ascii_lowercase().as_str() {
            "product" => {
                let items: Vec<RequestedItem> = self
                    .items
                    .iter()
                    .filter(|item| !item.product_name.trim().is_empty())
                    .map(|item| RequestedItem {
                        name: item.product_name.trim().to_owned(),
                        quantity: item.quantity.max(1),
                        unit: item.unit.clone(),
                        target_price: item.target_price,
                    })
                    .collect();
                if items.is_empty() {
                    return Err(MatchError::InvalidRequest(
                        "product search needs at least one named product".to_owned(),
                    ));
                }
                Ok(Query::Product { items, platforms, location, lead_time })
            }
            "category" => {
                let category = self
                    .category
                    .as_deref()
                    .map(str::trim)
                    .filter(|category| !category.is_empty())
                    .ok_or_else(|| {
                        MatchError::InvalidRequest(
                            "category search needs a supplier category".to_owned(),
                        )
                    })?;
                Ok(Query::Category { category: category.to_owned(), platforms, location, lead_time })
            }
            other => Err(MatchError::InvalidRequest(format!(
                "unsupported request mode `{other}` (expected product|category)"
            ))),
        }
    }
}

/// Expands the "All" sentinel and rejects empty or unknown platform sets.
fn normalize_platforms(raw: &[String]) -> Result<BTreeSet<Platform>, MatchError> {
    if raw.is_empty() {
        return Err(MatchError::InvalidRequest(
            "select at least one sales platform".to_owned(),
        ));
    }
    if raw.iter().any(|value| value.trim().eq_ignore_ascii_case("all")) {
        return Ok(Platform::ALL.into_iter().collect());
    }
    let mut platforms = BTreeSet::new();
    for value in raw {
        let platform = Platform::parse(value).ok_or_else(|| {
            MatchError::InvalidRequest(format!("unknown sales platform `{}`", value.trim()))
        })?;
        platforms.insert(platform);
    }
    Ok(platforms)
}

#[cfg(test)]
mod tests {
    use crate::domain::supplier::Platform;
    use crate::errors::MatchError;

    use super::{LeadTimePreference, Query, RawItem, RawRequest};

    fn raw_product_request() -> RawRequest {
        RawRequest {
            mode: "product".to_owned(),
            items: vec![RawItem {
                product_name: "instant noodles".to_owned(),
                quantity: 500,
                unit: "Carton".to_owned(),
                target_price: None,
            }],
            category: None,
            platforms: vec!["All".to_owned()],
            location: "Jakarta Selatan, DKI Jakarta".to_owned(),
            lead_time: "no preference".to_owned(),
        }
    }

    #[test]
    fn product_request_normalizes_into_product_query() {
        let query = raw_product_request().normalize().expect("valid request");
        match query {
            Query::Product { items, platforms, location, lead_time } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].name, "instant noodles");
                assert_eq!(items[0].quantity, 500);
                assert_eq!(platforms.len(), Platform::ALL.len());
                assert_eq!(location, "Jakarta Selatan, DKI Jakarta");
                assert_eq!(lead_time, LeadTimePreference::NoPreference);
            }
            Query::Category { .. } => panic!("expected product query"),
        }
    }

    #[test]
    fn product_request_without_named_items_is_rejected() {
        let mut raw = raw_product_request();
        raw.items = vec![RawItem { product_name: "   ".to_owned(), ..RawItem::default() }];
        assert!(matches!(raw.normalize(), Err(MatchError::InvalidRequest(_))));
    }

    #[test]
    fn category_request_without_category_is_rejected() {
        let mut raw = raw_product_request();
        raw.mode = "category".to_owned();
        raw.category = None;
        assert!(matches!(raw.normalize(), Err(MatchError::InvalidRequest(_))));
    }

    #[test]
    fn empty_platform_set_is_rejected() {
        let mut raw = raw_product_request();
        raw.platforms = Vec::new();
        assert!(matches!(raw.normalize(), Err(MatchError::InvalidRequest(_))));
    }

    #[test]
    fn unknown_platform_is_rejected_not_corrected() {
        let mut raw = raw_product_request();
        raw.platforms = vec!["Amazon".to_owned()];
        let error = raw.normalize().expect_err("unknown platform must fail");
        assert!(error.to_string().contains("Amazon"));
    }

    #[test]
    fn missing_location_signal_is_rejected() {
        let mut raw = raw_product_request();
        raw.location = "  ".to_owned();
        assert!(matches!(raw.normalize(), Err(MatchError::InvalidRequest(_))));
    }

    #[test]
    fn specific_platforms_survive_normalization() {
        let mut raw = raw_product_request();
        raw.platforms = vec!["Shopee".to_owned(), "tokopedia".to_owned()];
        let query = raw.normalize().expect("valid request");
        let platforms = query.platforms();
        assert!(platforms.contains(&Platform::Shopee));
        assert!(platforms.contains(&Platform::Tokopedia));
        assert!(!platforms.contains(&Platform::Alibaba));
    }

    #[test]
    fn zero_quantity_rows_are_clamped_to_one() {
        let mut raw = raw_product_request();
        raw.items[0].quantity = 0;
        let query = raw.normalize().expect("valid request");
        assert_eq!(query.items().expect("product query")[0].quantity, 1);
    }

    #[test]
    fn unknown_lead_time_label_is_rejected() {
        let mut raw = raw_product_request();
        raw.lead_time = "someday".to_owned();
        assert!(matches!(raw.normalize(), Err(MatchError::InvalidRequest(_))));
    }
}

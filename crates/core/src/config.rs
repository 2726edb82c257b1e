//! Engine configuration. Everything the matching pipeline could otherwise
//! hard-code lives here as an injectable table: the category enumeration,
//! the geography resolution tree, geo adjustment tiers, availability
//! thresholds, synonym buckets, and fulfillment fallbacks.
//! Defaults cover the reference catalog; a deployment swaps them via TOML
//! without a rebuild.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub availability: AvailabilityThresholds,
    pub fulfillment: FulfillmentConfig,
    pub geo: GeoConfig,
    /// Closed enumeration of supplier categories the catalog is
    /// partitioned by.
    pub categories: Vec<String>,
    pub geography: GeoTable,
    pub synonyms: Vec<SynonymBucket>,
    pub logging: LoggingConfig,
}

/// Quantity thresholds behind the derived availability status. Zero is
/// always `unavailable`; anything below `limited_below` is `limited`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityThresholds {
    pub limited_below: u64,
}

impl Default for AvailabilityThresholds {
    fn default() -> Self {
        Self { limited_below: 4000 }
    }
}

/// Fallback pricing and availability used when a requested item has no
/// matching availability record on the chosen supplier. Keeps fulfillment
/// always able to produce a quote from incomplete catalog data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentConfig {
    /// Minor units.
    pub fallback_unit_price: i64,
    /// Assumed stock for items the supplier did not declare.
    pub assumed_available: u64,
    pub default_unit: String,
    pub price_overrides: Vec<PriceOverride>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverride {
    /// Case-insensitive substring matched against the item name.
    pub name_contains: String,
    /// Minor units.
    pub unit_price: i64,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            fallback_unit_price: 3400,
            assumed_available: 1000,
            default_unit: "Carton".to_owned(),
            price_overrides: vec![PriceOverride {
                name_contains: "bear brand".to_owned(),
                unit_price: 42_000,
            }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub tiers: GeoTiers,
    /// Lowercased metro-area tokens; a query and a supplier sharing one of
    /// these land in the same-metro tier.
    pub metro_areas: Vec<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            tiers: GeoTiers::default(),
            metro_areas: vec![
                "jakarta".to_owned(),
                "surabaya".to_owned(),
                "bandung".to_owned(),
                "tangerang".to_owned(),
                "singapore".to_owned(),
                "kuala lumpur".to_owned(),
                "bangkok".to_owned(),
                "beijing".to_owned(),
                "shanghai".to_owned(),
                "shenzhen".to_owned(),
            ],
        }
    }
}

/// Price multiplier and lead-time shift for one proximity tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoTier {
    pub multiplier: Decimal,
    pub lead_time_offset_days: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoTiers {
    pub same_city: GeoTier,
    pub same_metro: GeoTier,
    pub same_country: GeoTier,
    pub cross_border: GeoTier,
}

impl Default for GeoTiers {
    fn default() -> Self {
        Self {
            same_city: GeoTier { multiplier: Decimal::new(10, 1), lead_time_offset_days: 0 },
            same_metro: GeoTier { multiplier: Decimal::new(11, 1), lead_time_offset_days: 1 },
            same_country: GeoTier { multiplier: Decimal::new(13, 1), lead_time_offset_days: 2 },
            cross_border: GeoTier { multiplier: Decimal::new(18, 1), lead_time_offset_days: 5 },
        }
    }
}

/// A synonym bucket groups request wording under one specialty tag, so a
/// request for "noodles" still reaches suppliers tagged with "Food".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymBucket {
    /// Canonical tag looked up in supplier specialties/name/description.
    pub bucket: String,
    /// Request tokens that activate this bucket.
    pub terms: Vec<String>,
}

impl SynonymBucket {
    /// True when any requested term (already lowercased) mentions one of
    /// this bucket's tokens.
    pub fn triggered_by(&self, terms: &[String]) -> bool {
        terms
            .iter()
            .any(|term| self.terms.iter().any(|token| term.contains(&token.to_lowercase())))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Nested geography resolution table: country -> province -> city ->
/// districts. Free-text locations are resolved against it by textual
/// containment, comma segment by comma segment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoTable {
    pub countries: Vec<CountryEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub name: String,
    #[serde(default)]
    pub provinces: Vec<ProvinceEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceEntry {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<CityEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(default)]
    pub districts: Vec<String>,
}

/// Best-effort structured reading of a free-text location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

impl GeoTable {
    /// Resolves a free-text location against the table. A country name in
    /// the text wins outright; otherwise a recognized province or city
    /// still pins down its country, so "Jakarta Selatan, DKI Jakarta"
    /// resolves without the country ever being spelled out.
    pub fn resolve(&self, location: &str) -> ResolvedLocation {
        let parts: Vec<String> = location
            .split(',')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return ResolvedLocation::default();
        }

        for country in &self.countries {
            if contains_name(&parts, &country.name) {
                return self.resolve_within(country, &parts);
            }
        }
        for country in &self.countries {
            for province in &country.provinces {
                if contains_name(&parts, &province.name) {
                    return self.resolve_within(country, &parts);
                }
                for city in &province.cities {
                    if contains_name(&parts, &city.name) {
                        return self.resolve_within(country, &parts);
                    }
                }
            }
        }
        ResolvedLocation::default()
    }

    fn resolve_within(&self, country: &CountryEntry, parts: &[String]) -> ResolvedLocation {
        let mut resolved = ResolvedLocation {
            country: Some(country.name.clone()),
            ..ResolvedLocation::default()
        };
        for province in &country.provinces {
            let province_hit = contains_name(parts, &province.name);
            for city in &province.cities {
                if contains_name(parts, &city.name) {
                    resolved.province = Some(province.name.clone());
                    resolved.city = Some(city.name.clone());
                    resolved.district = city
                        .districts
                        .iter()
                        .find(|district| contains_name(parts, district))
                        .cloned();
                    return resolved;
                }
            }
            if province_hit && resolved.province.is_none() {
                resolved.province = Some(province.name.clone());
            }
        }
        resolved
    }
}

fn contains_name(parts: &[String], name: &str) -> bool {
    let name = name.to_lowercase();
    parts.iter().any(|part| part.contains(&name))
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            availability: AvailabilityThresholds::default(),
            fulfillment: FulfillmentConfig::default(),
            geo: GeoConfig::default(),
            categories: default_categories(),
            geography: default_geography(),
            synonyms: default_synonyms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file, falling back to defaults for
    /// omitted sections, and validates the result. `None` yields the
    /// validated defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .map_err(|source| ConfigError::ReadFile { path: path.to_owned(), source })?;
                toml::from_str(&raw)
                    .map_err(|source| ConfigError::ParseFile { path: path.to_owned(), source })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (tier, name) in [
            (&self.geo.tiers.same_city, "same_city"),
            (&self.geo.tiers.same_metro, "same_metro"),
            (&self.geo.tiers.same_country, "same_country"),
            (&self.geo.tiers.cross_border, "cross_border"),
        ] {
            if tier.multiplier <= Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "geo tier `{name}` multiplier must be positive, got {}",
                    tier.multiplier
                )));
            }
        }
        if self.fulfillment.fallback_unit_price <= 0 {
            return Err(ConfigError::Validation(
                "fulfillment.fallback_unit_price must be positive".to_owned(),
            ));
        }
        if self.fulfillment.assumed_available == 0 {
            return Err(ConfigError::Validation(
                "fulfillment.assumed_available must be at least 1".to_owned(),
            ));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Validation(
                "at least one supplier category must be configured".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn unit_price_for(&self, item_name: &str) -> i64 {
        let name = item_name.to_lowercase();
        self.fulfillment
            .price_overrides
            .iter()
            .find(|entry| name.contains(&entry.name_contains.to_lowercase()))
            .map(|entry| entry.unit_price)
            .unwrap_or(self.fulfillment.fallback_unit_price)
    }
}

fn default_categories() -> Vec<String> {
    [
        "Heavy Equipment Supplier",
        "Packaging Supplier",
        "Chemical Supplier",
        "Food & Beverage Supplier",
        "Printing Supplier",
        "Electricity Solution Provider",
        "Electronics & Technology Supplier",
        "Textile & Apparel Supplier",
        "Construction Materials Supplier",
        "Automotive Parts Supplier",
        "Medical Equipment Supplier",
        "Office Supplies Supplier",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_synonyms() -> Vec<SynonymBucket> {
    vec![
        SynonymBucket {
            bucket: "food".to_owned(),
            terms: ["food", "noodle", "beverage", "snack", "drink", "coffee", "tea", "dairy"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        },
        SynonymBucket {
            bucket: "packaging".to_owned(),
            terms: ["packaging", "box", "container", "carton", "bottle", "film", "wrap"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        },
        SynonymBucket {
            bucket: "electronic".to_owned(),
            terms: ["electronic", "tech", "phone", "appliance", "television", "display"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        },
    ]
}

fn default_geography() -> GeoTable {
    fn city(name: &str, districts: &[&str]) -> CityEntry {
        CityEntry {
            name: name.to_owned(),
            districts: districts.iter().map(|district| (*district).to_owned()).collect(),
        }
    }
    fn province(name: &str, cities: Vec<CityEntry>) -> ProvinceEntry {
        ProvinceEntry { name: name.to_owned(), cities }
    }

    GeoTable {
        countries: vec![
            CountryEntry {
                name: "Indonesia".to_owned(),
                provinces: vec![
                    province(
                        "DKI Jakarta",
                        vec![
                            city("Jakarta Pusat", &["Menteng", "Tanah Abang", "Gambir"]),
                            city("Jakarta Utara", &["Penjaringan", "Kelapa Gading"]),
                            city("Jakarta Barat", &["Tambora", "Kebon Jeruk", "Cengkareng"]),
                            city("Jakarta Selatan", &["Kebayoran Baru", "Tebet", "Setiabudi"]),
                            city("Jakarta Timur", &["Matraman", "Cakung", "Duren Sawit"]),
                        ],
                    ),
                    province(
                        "West Java",
                        vec![
                            city("Bandung", &["Regol", "Lengkong"]),
                            city("Bekasi", &["Bekasi Timur", "Bekasi Barat"]),
                            city("Bogor", &["Bogor Tengah", "Bogor Utara"]),
                            city("Depok", &["Beji", "Sukmajaya"]),
                            city("Cikampek", &[]),
                        ],
                    ),
                    province(
                        "Central Java",
                        vec![
                            city("Semarang", &["Semarang Tengah", "Banyumanik"]),
                            city("Surakarta", &["Laweyan", "Jebres"]),
                        ],
                    ),
                    province(
                        "East Java",
                        vec![
                            city("Surabaya", &["Genteng", "Rungkut", "Gubeng"]),
                            city("Malang", &["Klojen", "Blimbing"]),
                        ],
                    ),
                    province(
                        "Banten",
                        vec![
                            city("Tangerang", &["Karawaci", "Cipondoh"]),
                            city("Tangerang Selatan", &["Serpong", "Ciputat"]),
                            city("Serang", &["Kasemen", "Walantaka"]),
                        ],
                    ),
                    province(
                        "Yogyakarta",
                        vec![city("Yogyakarta", &["Kraton", "Kotagede"]), city("Sleman", &[])],
                    ),
                ],
            },
            CountryEntry {
                name: "China".to_owned(),
                provinces: vec![
                    province("Beijing", vec![city("Beijing City", &["Chaoyang", "Haidian"])]),
                    province("Shanghai", vec![city("Shanghai City", &["Pudong", "Huangpu"])]),
                    province(
                        "Guangdong",
                        vec![
                            city("Guangzhou", &["Tianhe", "Yuexiu"]),
                            city("Shenzhen", &["Futian", "Nanshan"]),
                        ],
                    ),
                ],
            },
            CountryEntry {
                name: "Singapore".to_owned(),
                provinces: vec![
                    province(
                        "Central Region",
                        vec![
                            city("Downtown Core", &["Raffles Place", "Tanjong Pagar"]),
                            city("Orchard", &["Orchard Road", "Somerset"]),
                        ],
                    ),
                    province(
                        "East Region",
                        vec![city("Bedok", &["Bedok North"]), city("Tampines", &["Tampines East"])],
                    ),
                ],
            },
            CountryEntry {
                name: "Malaysia".to_owned(),
                provinces: vec![
                    province(
                        "Kuala Lumpur",
                        vec![city("Kuala Lumpur City", &["Bukit Bintang", "KLCC"])],
                    ),
                    province(
                        "Selangor",
                        vec![
                            city("Shah Alam", &[]),
                            city("Petaling Jaya", &["Damansara", "Kelana Jaya"]),
                        ],
                    ),
                ],
            },
            CountryEntry {
                name: "Thailand".to_owned(),
                provinces: vec![
                    province(
                        "Bangkok",
                        vec![city("Bangkok City", &["Phra Nakhon", "Bang Rak"])],
                    ),
                    province("Chiang Mai", vec![city("Chiang Mai City", &["Chang Khlan"])]),
                ],
            },
        ],
    }
}

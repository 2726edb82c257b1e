//! Filter stage: narrows the catalog to suppliers relevant to a query.
//! Every narrowing step carries a fallback so the stage never hands an
//! empty candidate set to ranking while the catalog itself is non-empty;
//! a thinner-than-ideal match beats no result.

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::domain::request::Query;
use crate::domain::supplier::Supplier;
use crate::errors::MatchError;

pub fn filter<'a>(
    catalog: &'a Catalog,
    query: &Query,
    config: &EngineConfig,
) -> Result<Vec<&'a Supplier>, MatchError> {
    if catalog.is_empty() {
        return Err(MatchError::EmptyCatalog);
    }

    let mut candidates: Vec<&Supplier> = match query {
        Query::Category { category, .. } => {
            let in_category = catalog.in_category(category);
            if in_category.is_empty() {
                catalog.all().iter().collect()
            } else {
                in_category
            }
        }
        Query::Product { items, .. } => {
            let terms: Vec<String> =
                items.iter().map(|item| item.name.to_lowercase()).collect();
            let matched: Vec<&Supplier> = catalog
                .all()
                .iter()
                .filter(|supplier| qualifies_for_items(supplier, &terms, config))
                .collect();
            if matched.is_empty() {
                catalog.all().iter().collect()
            } else {
                matched
            }
        }
    };

    let location = query.location().trim().to_lowercase();
    if !location.is_empty() {
        let narrowed: Vec<&Supplier> = candidates
            .iter()
            .copied()
            .filter(|supplier| location_matches(supplier, &location))
            .collect();
        if narrowed.is_empty() {
            // Staged fallback: widen to every supplier in the query's
            // country before giving up on the location signal entirely.
            if let Some(country) = config.geography.resolve(query.location()).country {
                let country_wide: Vec<&Supplier> = catalog
                    .all()
                    .iter()
                    .filter(|supplier| {
                        supplier
                            .location
                            .country
                            .as_deref()
                            .is_some_and(|c| c.eq_ignore_ascii_case(&country))
                    })
                    .collect();
                if !country_wide.is_empty() {
                    candidates = country_wide;
                }
            }
        } else {
            candidates = narrowed;
        }
    }

    if candidates.is_empty() {
        candidates = catalog.all().iter().collect();
    }
    Ok(candidates)
}

/// Product-mode relevance test. Suppliers with specialty tags qualify on a
/// lexical overlap with any requested term, or on sharing a synonym bucket
/// with the request; suppliers without specialty data qualify when their
/// name or description carries a bucket tag the request activated.
fn qualifies_for_items(supplier: &Supplier, terms: &[String], config: &EngineConfig) -> bool {
    if !supplier.specialties.is_empty() {
        let specialties: Vec<String> =
            supplier.specialties.iter().map(|s| s.to_lowercase()).collect();
        let direct = specialties.iter().any(|specialty| {
            terms
                .iter()
                .any(|term| specialty.contains(term.as_str()) || term.contains(specialty.as_str()))
        });
        if direct {
            return true;
        }
        return config.synonyms.iter().any(|bucket| {
            bucket.triggered_by(terms)
                && specialties.iter().any(|specialty| specialty.contains(&bucket.bucket))
        });
    }

    let name = supplier.name.to_lowercase();
    let description = supplier.description.as_deref().unwrap_or_default().to_lowercase();
    config.synonyms.iter().any(|bucket| {
        bucket.triggered_by(terms)
            && (name.contains(&bucket.bucket) || description.contains(&bucket.bucket))
    })
}

/// Textual containment test between a supplier's location fields and the
/// (already lowercased) query location, in either direction.
fn location_matches(supplier: &Supplier, location: &str) -> bool {
    let fields = &supplier.location;
    if fields.summary.to_lowercase().contains(location)
        || fields.address.to_lowercase().contains(location)
    {
        return true;
    }
    [&fields.country, &fields.province, &fields.city]
        .into_iter()
        .flatten()
        .any(|field| location.contains(&field.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::catalog::Catalog;
    use crate::config::EngineConfig;
    use crate::domain::request::{LeadTimePreference, Query, RequestedItem};
    use crate::domain::supplier::{
        Platform, Supplier, SupplierId, SupplierLocation,
    };
    use crate::errors::MatchError;

    use super::filter;

    fn supplier(id: &str, specialties: &[&str], summary: &str, country: &str) -> Supplier {
        Supplier {
            id: SupplierId(id.to_owned()),
            name: id.to_owned(),
            base_price: 3000,
            lead_time: "1-2 days".to_owned(),
            platform: Platform::Tokopedia,
            rating: 4.5,
            location: SupplierLocation {
                summary: summary.to_owned(),
                country: Some(country.to_owned()),
                ..Default::default()
            },
            distance_km: None,
            specialties: specialties.iter().map(|s| (*s).to_owned()).collect(),
            items: Vec::new(),
            description: None,
            profile: Default::default(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_partitions(BTreeMap::from([
            (
                "Food & Beverage Supplier".to_owned(),
                vec![
                    supplier("noodle-co", &["Instant Noodles"], "Jakarta Selatan, DKI Jakarta", "Indonesia"),
                    supplier("dairy-co", &["Dairy Products"], "Surabaya, East Java", "Indonesia"),
                ],
            ),
            (
                "Packaging Supplier".to_owned(),
                vec![supplier("glass-co", &["Glass Packaging", "Bottles"], "Shenzhen, Guangdong", "China")],
            ),
        ]))
        .expect("valid catalog")
    }

    fn product_query(item: &str, location: &str) -> Query {
        Query::Product {
            items: vec![RequestedItem {
                name: item.to_owned(),
                quantity: 1,
                unit: "Carton".to_owned(),
                target_price: None,
            }],
            platforms: Platform::ALL.into_iter().collect(),
            location: location.to_owned(),
            lead_time: LeadTimePreference::NoPreference,
        }
    }

    fn category_query(category: &str, location: &str) -> Query {
        Query::Category {
            category: category.to_owned(),
            platforms: Platform::ALL.into_iter().collect(),
            location: location.to_owned(),
            lead_time: LeadTimePreference::NoPreference,
        }
    }

    #[test]
    fn empty_catalog_is_the_only_error() {
        let empty = Catalog::from_partitions(BTreeMap::new()).expect("empty is constructible");
        let result = filter(&empty, &product_query("noodles", ""), &EngineConfig::default());
        assert_eq!(result.expect_err("must fail"), MatchError::EmptyCatalog);
    }

    #[test]
    fn category_mode_returns_category_partition() {
        let catalog = catalog();
        let candidates = filter(
            &catalog,
            &category_query("Packaging Supplier", ""),
            &EngineConfig::default(),
        )
        .expect("non-empty");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.0, "glass-co");
    }

    #[test]
    fn empty_category_falls_back_to_full_catalog() {
        let catalog = catalog();
        let candidates = filter(
            &catalog,
            &category_query("Heavy Equipment Supplier", ""),
            &EngineConfig::default(),
        )
        .expect("non-empty");
        assert_eq!(candidates.len(), catalog.len());
    }

    #[test]
    fn specialty_substring_match_selects_product_candidates() {
        let catalog = catalog();
        let candidates =
            filter(&catalog, &product_query("bottles", ""), &EngineConfig::default())
                .expect("non-empty");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.0, "glass-co");
    }

    #[test]
    fn synonym_bucket_reaches_suppliers_without_literal_overlap() {
        let catalog = catalog();
        // "snack" never appears in any specialty, but it activates the
        // food bucket, which both food suppliers' specialties miss --
        // "Instant Noodles" has no "food" substring. The filter then falls
        // back to the full catalog rather than returning nothing.
        let candidates =
            filter(&catalog, &product_query("snack", ""), &EngineConfig::default())
                .expect("non-empty");
        assert_eq!(candidates.len(), catalog.len());
    }

    #[test]
    fn noodle_synonym_hits_noodle_specialist_directly() {
        let catalog = catalog();
        let candidates =
            filter(&catalog, &product_query("noodle", ""), &EngineConfig::default())
                .expect("non-empty");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.0, "noodle-co");
    }

    #[test]
    fn location_narrows_candidates_textually() {
        let catalog = catalog();
        let candidates = filter(
            &catalog,
            &product_query("noodle", "Jakarta Selatan"),
            &EngineConfig::default(),
        )
        .expect("non-empty");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.0, "noodle-co");
    }

    #[test]
    fn unmatched_location_widens_to_same_country() {
        let catalog = catalog();
        // Bandung matches no supplier directly but resolves to Indonesia.
        let candidates = filter(
            &catalog,
            &category_query("Food & Beverage Supplier", "Bandung, West Java"),
            &EngineConfig::default(),
        )
        .expect("non-empty");
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|s| s.location.country.as_deref() == Some("Indonesia")));
    }

    #[test]
    fn unresolvable_location_keeps_pre_location_candidates() {
        let catalog = catalog();
        let candidates = filter(
            &catalog,
            &category_query("Packaging Supplier", "Atlantis"),
            &EngineConfig::default(),
        )
        .expect("non-empty");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.0, "glass-co");
    }
}

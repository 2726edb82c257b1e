//! Ranking stage: decorates the leading candidates with recommendation
//! metadata, then orders the whole set under the selected strategy. Every
//! sort is stable, so equal keys keep the order the candidates arrived in.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::matching::MatchResult;

/// How many leading candidates receive the recommendation decoration.
pub const RECOMMENDED_COUNT: usize = 2;

/// Match percentage of the top recommendation; each further rank drops by
/// `MATCH_PERCENTAGE_STEP`.
const MATCH_PERCENTAGE_TOP: u8 = 100;
const MATCH_PERCENTAGE_STEP: u8 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    #[default]
    AiRecommendation,
    PriceAsc,
    PriceDesc,
    LeadTime,
    Rating,
    Distance,
}

impl SortStrategy {
    pub const ALL: [SortStrategy; 6] = [
        SortStrategy::AiRecommendation,
        SortStrategy::PriceAsc,
        SortStrategy::PriceDesc,
        SortStrategy::LeadTime,
        SortStrategy::Rating,
        SortStrategy::Distance,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.label() == raw)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortStrategy::AiRecommendation => "ai-recommendation",
            SortStrategy::PriceAsc => "price-asc",
            SortStrategy::PriceDesc => "price-desc",
            SortStrategy::LeadTime => "lead-time",
            SortStrategy::Rating => "rating",
            SortStrategy::Distance => "distance",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flags the first `RECOMMENDED_COUNT` candidates, in the order they arrive
/// from filtering, with a descending match percentage and a rationale.
/// Pure: inputs are consumed and new values produced, nothing is mutated
/// in place behind the caller's back.
pub fn decorate_recommendations(candidates: Vec<MatchResult>) -> Vec<MatchResult> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| {
            if position < RECOMMENDED_COUNT {
                let percentage =
                    MATCH_PERCENTAGE_TOP - MATCH_PERCENTAGE_STEP * position as u8;
                let rationale = format!(
                    "{} leads on {} rating with {} delivery from {}",
                    candidate.supplier.name,
                    candidate.supplier.rating,
                    candidate.adjusted_lead_time,
                    candidate.supplier.location.summary,
                );
                MatchResult {
                    recommended: true,
                    match_percentage: Some(percentage),
                    rationale: Some(rationale),
                    ..candidate
                }
            } else {
                candidate
            }
        })
        .collect()
}

/// Orders decorated candidates under the strategy. Unparsable lead times
/// and missing distance figures sort last under their strategies.
pub fn rank(mut candidates: Vec<MatchResult>, strategy: SortStrategy) -> Vec<MatchResult> {
    match strategy {
        SortStrategy::AiRecommendation => {
            candidates.sort_by(|a, b| {
                b.recommended
                    .cmp(&a.recommended)
                    .then_with(|| {
                        b.match_percentage
                            .unwrap_or(0)
                            .cmp(&a.match_percentage.unwrap_or(0))
                    })
            });
        }
        SortStrategy::PriceAsc => {
            candidates.sort_by_key(|result| result.adjusted_price);
        }
        SortStrategy::PriceDesc => {
            candidates.sort_by(|a, b| b.adjusted_price.cmp(&a.adjusted_price));
        }
        SortStrategy::LeadTime => {
            candidates.sort_by_key(|result| {
                result.lead_time_lower_bound().unwrap_or(u32::MAX)
            });
        }
        SortStrategy::Rating => {
            candidates.sort_by(|a, b| compare_f64(b.supplier.rating, a.supplier.rating));
        }
        SortStrategy::Distance => {
            candidates.sort_by(|a, b| compare_distance(a.supplier.distance_km, b.supplier.distance_km));
        }
    }
    candidates
}

/// Splits an `ai-recommendation`-ordered list into the recommended group
/// and the remaining matches, both keeping their ranked order.
pub fn partition_recommended(
    ranked: Vec<MatchResult>,
) -> (Vec<MatchResult>, Vec<MatchResult>) {
    ranked.into_iter().partition(|result| result.recommended)
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_f64(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

//! Review filtering.
//!
//! Two matching policies coexist:
//! * [`ReviewFilter`] compares `channel`, `propertyName` and `status` exactly.
//! * [`property_name_contains`] backs the "reviews for a property" lookup and matches a
//!   case-insensitive substring.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{NormalizedReview, ReviewStatus};

pub const MIN_RATING_BOUND: f64 = 1.0;
pub const MAX_RATING_BOUND: f64 = 5.0;

/// Validated filter criteria. Every field is optional and all present fields must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}

impl ReviewFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, review: &NormalizedReview) -> bool {
        let rating = review.rating_or_zero();
        if self.min_rating.is_some_and(|min| rating < min) {
            return false;
        }
        if self.max_rating.is_some_and(|max| rating > max) {
            return false;
        }

        if let Some(channel) = &self.channel {
            if review.channel != *channel {
                return false;
            }
        }
        if let Some(property_name) = &self.property_name {
            if review.property_name != *property_name {
                return false;
            }
        }

        let submitted_on = review.submitted_at.date();
        if self.date_from.is_some_and(|from| submitted_on < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| submitted_on > to) {
            return false;
        }

        self.status.map_or(true, |status| review.status == status)
    }

    /// Matching reviews in input order.
    pub fn apply(&self, reviews: &[NormalizedReview]) -> Vec<NormalizedReview> {
        reviews
            .iter()
            .filter(|review| self.matches(review))
            .cloned()
            .collect()
    }
}

pub fn filter_reviews(reviews: &[NormalizedReview], criteria: &ReviewFilter) -> Vec<NormalizedReview> {
    criteria.apply(reviews)
}

/// Case-insensitive substring match used by the per-property lookup.
pub fn property_name_contains(review: &NormalizedReview, needle: &str) -> bool {
    review
        .property_name
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Untyped filter input as it arrives on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub channel: Option<String>,
    pub property_name: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<String>,
}

/// Every problem found while validating a [`FilterQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValidationError {
    pub problems: Vec<String>,
}

impl fmt::Display for FilterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.problems.join("; "))
    }
}

impl std::error::Error for FilterValidationError {}

impl TryFrom<FilterQuery> for ReviewFilter {
    type Error = FilterValidationError;

    fn try_from(query: FilterQuery) -> Result<Self, Self::Error> {
        let mut problems = Vec::new();

        let min_rating = query
            .min_rating
            .as_deref()
            .and_then(|raw| parse_rating_bound(raw, "minRating", &mut problems));
        let max_rating = query
            .max_rating
            .as_deref()
            .and_then(|raw| parse_rating_bound(raw, "maxRating", &mut problems));
        if let (Some(min), Some(max)) = (min_rating, max_rating) {
            if min > max {
                problems.push("minRating cannot be greater than maxRating".to_string());
            }
        }

        let channel = query
            .channel
            .as_deref()
            .and_then(|raw| non_empty(raw, "channel", &mut problems));
        let property_name = query
            .property_name
            .as_deref()
            .and_then(|raw| non_empty(raw, "propertyName", &mut problems));

        let date_from = query
            .date_from
            .as_deref()
            .and_then(|raw| parse_date_bound(raw, "dateFrom", &mut problems));
        let date_to = query
            .date_to
            .as_deref()
            .and_then(|raw| parse_date_bound(raw, "dateTo", &mut problems));
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                problems.push("dateFrom cannot be after dateTo".to_string());
            }
        }

        let status = query.status.as_deref().and_then(|raw| {
            let parsed = ReviewStatus::parse(raw);
            if parsed.is_none() {
                let allowed: Vec<&str> = ReviewStatus::ordered()
                    .into_iter()
                    .map(ReviewStatus::as_str)
                    .collect();
                problems.push(format!("status must be one of: {}", allowed.join(", ")));
            }
            parsed
        });

        if !problems.is_empty() {
            return Err(FilterValidationError { problems });
        }

        Ok(Self {
            min_rating,
            max_rating,
            channel,
            property_name,
            date_from,
            date_to,
            status,
        })
    }
}

fn parse_rating_bound(raw: &str, field: &str, problems: &mut Vec<String>) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if (MIN_RATING_BOUND..=MAX_RATING_BOUND).contains(&value) => Some(value),
        _ => {
            problems.push(format!(
                "{field} must be a number between {MIN_RATING_BOUND} and {MAX_RATING_BOUND}"
            ));
            None
        }
    }
}

fn non_empty(raw: &str, field: &str, problems: &mut Vec<String>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        problems.push(format!("{field} must be a non-empty string"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date_bound(raw: &str, field: &str, problems: &mut Vec<String>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            problems.push(format!("{field} must be a valid date (YYYY-MM-DD format)"));
            None
        }
    }
}

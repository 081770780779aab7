use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::rounding::{mean, round_half_up};
use super::timestamp;

/// Channel recorded when the export omits one.
pub const UNKNOWN_CHANNEL: &str = "unknown";

/// Stable review identifier as issued by the upstream export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub u64);

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewType {
    HostToGuest,
    GuestToHost,
}

impl ReviewType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HostToGuest => "host-to-guest",
            Self::GuestToHost => "guest-to-host",
        }
    }
}

/// Publication state reported by the upstream channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Published,
    Pending,
    Rejected,
}

impl ReviewStatus {
    pub const fn ordered() -> [ReviewStatus; 3] {
        [Self::Published, Self::Pending, Self::Rejected]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Exact, case-sensitive lookup of the wire name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCategory {
    pub category: String,
    pub rating: f64,
}

impl ReviewCategory {
    pub fn new(category: impl Into<String>, rating: f64) -> Self {
        Self {
            category: category.into(),
            rating,
        }
    }
}

/// Review exactly as it appears in the upstream export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub id: ReviewId,
    #[serde(rename = "type")]
    pub review_type: ReviewType,
    pub status: ReviewStatus,
    pub rating: Option<f64>,
    #[serde(default)]
    pub public_review: String,
    #[serde(default)]
    pub review_category: Vec<ReviewCategory>,
    #[serde(with = "timestamp")]
    pub submitted_at: NaiveDateTime,
    #[serde(default)]
    pub guest_name: String,
    pub listing_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl RawReview {
    /// Explicit rating when present, otherwise the rounded mean of the category ratings.
    pub fn overall_rating(&self) -> Option<f64> {
        if let Some(rating) = self.rating {
            return Some(rating);
        }

        mean(self.review_category.iter().map(|category| category.rating)).map(round_half_up)
    }

    /// Only a missing channel falls back to `"unknown"`; an empty string is kept.
    pub fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or(UNKNOWN_CHANNEL)
    }

    pub fn normalize(&self, is_approved: bool) -> NormalizedReview {
        NormalizedReview {
            id: self.id,
            review_type: self.review_type,
            status: self.status,
            overall_rating: self.overall_rating(),
            public_review: self.public_review.clone(),
            categories: self.review_category.clone(),
            submitted_at: self.submitted_at,
            guest_name: self.guest_name.clone(),
            property_name: self.listing_name.clone(),
            channel: self.channel().to_string(),
            is_approved,
        }
    }
}

/// Canonical review shape consumed by filtering and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    pub id: ReviewId,
    #[serde(rename = "type")]
    pub review_type: ReviewType,
    pub status: ReviewStatus,
    pub overall_rating: Option<f64>,
    pub public_review: String,
    pub categories: Vec<ReviewCategory>,
    #[serde(with = "timestamp")]
    pub submitted_at: NaiveDateTime,
    pub guest_name: String,
    pub property_name: String,
    pub channel: String,
    pub is_approved: bool,
}

impl NormalizedReview {
    /// Rating used by threshold comparisons; unrated reviews count as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.overall_rating.unwrap_or(0.0)
    }
}

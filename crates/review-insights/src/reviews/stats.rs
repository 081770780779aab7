use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::NormalizedReview;
use super::rounding::{mean, round_to_tenth};

/// Size of the trailing window feeding `recentTrends`.
pub const TREND_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Ordered by rating value; keys serialize as written, e.g. `"4.5"` or `"5"`.
    pub rating_distribution: BTreeMap<RatingKey, usize>,
    pub category_averages: BTreeMap<String, f64>,
    pub channel_breakdown: BTreeMap<String, usize>,
    pub recent_trends: Vec<TrendPoint>,
}

impl ReviewStats {
    pub fn rated_reviews(&self) -> usize {
        self.rating_distribution.values().sum()
    }

    /// Number of reviews rated exactly `rating`.
    pub fn rating_count(&self, rating: f64) -> usize {
        self.rating_distribution
            .get(&RatingKey(rating))
            .copied()
            .unwrap_or(0)
    }
}

/// Rating-distribution key: compares numerically, serializes as the rating text.
#[derive(Debug, Clone, Copy)]
pub struct RatingKey(pub f64);

impl PartialEq for RatingKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RatingKey {}

impl PartialOrd for RatingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RatingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for RatingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RatingKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RatingKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<f64>()
            .map(RatingKey)
            .map_err(|_| serde::de::Error::custom(format!("invalid rating key '{raw}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
    pub avg_rating: f64,
}

#[derive(Default)]
struct Tally {
    sum: f64,
    count: usize,
}

impl Tally {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn rounded_mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            round_to_tenth(self.sum / self.count as f64)
        }
    }
}

/// Aggregate a review collection. `now` anchors the trend window.
pub fn calculate_review_stats(reviews: &[NormalizedReview], now: NaiveDateTime) -> ReviewStats {
    if reviews.is_empty() {
        return ReviewStats::default();
    }

    let rated: Vec<f64> = reviews
        .iter()
        .filter_map(|review| review.overall_rating)
        .collect();
    let average_rating = mean(rated.iter().copied())
        .map(round_to_tenth)
        .unwrap_or(0.0);

    let mut rating_distribution = BTreeMap::new();
    for rating in &rated {
        *rating_distribution.entry(RatingKey(*rating)).or_insert(0) += 1;
    }

    let mut category_totals: HashMap<&str, Tally> = HashMap::new();
    for category in reviews.iter().flat_map(|review| &review.categories) {
        category_totals
            .entry(category.category.as_str())
            .or_default()
            .add(category.rating);
    }
    let category_averages = category_totals
        .into_iter()
        .map(|(name, tally)| (name.to_string(), tally.rounded_mean()))
        .collect();

    let mut channel_breakdown = BTreeMap::new();
    for review in reviews {
        *channel_breakdown.entry(review.channel.clone()).or_insert(0) += 1;
    }

    ReviewStats {
        total_reviews: reviews.len(),
        average_rating,
        rating_distribution,
        category_averages,
        channel_breakdown,
        recent_trends: recent_trends(reviews, now),
    }
}

/// Daily volume and rating over the trailing window, oldest day first.
pub fn recent_trends(reviews: &[NormalizedReview], now: NaiveDateTime) -> Vec<TrendPoint> {
    let window_start = now - Duration::days(TREND_WINDOW_DAYS);

    let mut days: BTreeMap<NaiveDate, (usize, Tally)> = BTreeMap::new();
    for review in reviews
        .iter()
        .filter(|review| review.submitted_at >= window_start)
    {
        let (count, ratings) = days.entry(review.submitted_at.date()).or_default();
        *count += 1;
        if let Some(rating) = review.overall_rating {
            ratings.add(rating);
        }
    }

    days.into_iter()
        .map(|(date, (count, ratings))| TrendPoint {
            date,
            count,
            avg_rating: ratings.rounded_mean(),
        })
        .collect()
}

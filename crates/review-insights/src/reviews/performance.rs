use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::NormalizedReview;
use super::stats::{calculate_review_stats, ReviewStats};

/// Per-property rollup shown on the manager dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPerformance {
    pub property_id: String,
    pub property_name: String,
    pub stats: ReviewStats,
    pub reviews: Vec<NormalizedReview>,
}

/// Slug for a property name: lower-cased, whitespace runs collapsed to one hyphen.
pub fn property_id(property_name: &str) -> String {
    let lowered = property_name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }

    slug
}

/// Group reviews by exact property name in first-seen order and aggregate each group.
pub fn group_by_property(
    reviews: &[NormalizedReview],
    now: NaiveDateTime,
) -> Vec<PropertyPerformance> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<NormalizedReview>)> = Vec::new();

    for review in reviews {
        let name = review.property_name.as_str();
        let index = *positions.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(review.clone());
    }

    groups
        .into_iter()
        .map(|(name, members)| PropertyPerformance {
            property_id: property_id(name),
            property_name: name.to_string(),
            stats: calculate_review_stats(&members, now),
            reviews: members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::domain::{ReviewId, ReviewStatus, ReviewType};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 20)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid now")
    }

    fn review(id: u64, property: &str, rating: Option<f64>) -> NormalizedReview {
        NormalizedReview {
            id: ReviewId(id),
            review_type: ReviewType::GuestToHost,
            status: ReviewStatus::Published,
            overall_rating: rating,
            public_review: String::new(),
            categories: Vec::new(),
            submitted_at: NaiveDate::from_ymd_opt(2024, 1, id as u32)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .expect("valid day"),
            guest_name: "Guest".to_string(),
            property_name: property.to_string(),
            channel: "Airbnb".to_string(),
            is_approved: false,
        }
    }

    #[test]
    fn slug_collapses_whitespace_runs() {
        assert_eq!(property_id("Test Property 1"), "test-property-1");
        assert_eq!(
            property_id("2B N1 A  -\t29 Shoreditch Heights"),
            "2b-n1-a---29-shoreditch-heights"
        );
        assert_eq!(property_id(" Camden "), "-camden-");
    }

    #[test]
    fn groups_in_first_seen_order() {
        let reviews = vec![
            review(1, "Property A", Some(4.5)),
            review(2, "Property B", Some(2.0)),
            review(3, "Property A", Some(3.8)),
        ];

        let groups = group_by_property(&reviews, now());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].property_name, "Property A");
        assert_eq!(groups[0].property_id, "property-a");
        let first_ids: Vec<u64> = groups[0].reviews.iter().map(|r| r.id.0).collect();
        assert_eq!(first_ids, vec![1, 3]);
        assert_eq!(groups[0].stats.total_reviews, 2);
        assert_eq!(groups[1].property_name, "Property B");
        assert_eq!(groups[1].reviews.len(), 1);
        assert_eq!(groups[1].stats.average_rating, 2.0);
    }

    #[test]
    fn names_differing_by_case_stay_separate() {
        let reviews = vec![review(1, "Flat A", None), review(2, "flat a", None)];
        let groups = group_by_property(&reviews, now());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].property_id, groups[1].property_id);
    }

    #[test]
    fn groups_partition_the_input() {
        let reviews = vec![
            review(1, "Property A", Some(5.0)),
            review(2, "Property B", None),
            review(3, "Property C", Some(1.0)),
            review(4, "Property B", Some(4.0)),
        ];

        let groups = group_by_property(&reviews, now());
        let total: usize = groups.iter().map(|group| group.stats.total_reviews).sum();
        assert_eq!(total, reviews.len());

        let mut seen: Vec<u64> = groups
            .iter()
            .flat_map(|group| group.reviews.iter().map(|review| review.id.0))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by_property(&[], now()).is_empty());
    }
}

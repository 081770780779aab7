use std::collections::HashSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::reviews::approval::{ApprovalStore, ApprovalStoreError, InMemoryApprovalStore};
use crate::reviews::clock::FixedClock;
use crate::reviews::domain::{RawReview, ReviewCategory, ReviewId, ReviewStatus, ReviewType};
use crate::reviews::{review_router, ReviewService};

pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid now")
}

pub(super) fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(16, 20, 0))
        .expect("valid timestamp")
}

pub(super) fn raw_review(
    id: u64,
    listing: &str,
    rating: Option<f64>,
    categories: &[(&str, f64)],
    channel: Option<&str>,
    submitted_at: NaiveDateTime,
) -> RawReview {
    RawReview {
        id: ReviewId(id),
        review_type: ReviewType::GuestToHost,
        status: ReviewStatus::Published,
        rating,
        public_review: format!("Stay #{id} at {listing}"),
        review_category: categories
            .iter()
            .map(|(name, rating)| ReviewCategory::new(*name, *rating))
            .collect(),
        submitted_at,
        guest_name: "Guest".to_string(),
        listing_name: listing.to_string(),
        channel: channel.map(str::to_string),
    }
}

/// Five reviews across two listings, spanning the trend window edge.
pub(super) fn portfolio() -> Vec<RawReview> {
    let mut pending = raw_review(
        7460,
        "Soho Studio",
        Some(2.0),
        &[("cleanliness", 2.0)],
        Some("VRBO"),
        at(2024, 6, 25),
    );
    pending.status = ReviewStatus::Pending;

    vec![
        raw_review(
            7453,
            "Camden Loft",
            Some(5.0),
            &[("cleanliness", 5.0), ("communication", 5.0)],
            Some("Airbnb"),
            at(2024, 6, 20),
        ),
        raw_review(
            7454,
            "Camden Loft",
            None,
            &[("cleanliness", 4.0), ("communication", 5.0)],
            Some("Booking.com"),
            at(2024, 6, 20),
        ),
        raw_review(7455, "Camden Loft", None, &[], None, at(2024, 4, 2)),
        pending,
        raw_review(
            7461,
            "Soho Studio",
            Some(4.0),
            &[("cleanliness", 4.0)],
            Some("Airbnb"),
            at(2024, 6, 28),
        ),
    ]
}

pub(super) type TestService = ReviewService<InMemoryApprovalStore, FixedClock>;

pub(super) fn build_service() -> (TestService, InMemoryApprovalStore) {
    let approvals = InMemoryApprovalStore::seeded([ReviewId(7454), ReviewId(7461)]);
    let service = ReviewService::new(
        portfolio(),
        Arc::new(approvals.clone()),
        Arc::new(FixedClock(now())),
    );
    (service, approvals)
}

pub(super) fn router() -> axum::Router {
    let (service, _) = build_service();
    review_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl ApprovalStore for UnavailableStore {
    fn is_approved(&self, _id: ReviewId) -> Result<bool, ApprovalStoreError> {
        Err(ApprovalStoreError::Unavailable("cache offline".to_string()))
    }

    fn approved_ids(&self) -> Result<HashSet<ReviewId>, ApprovalStoreError> {
        Err(ApprovalStoreError::Unavailable("cache offline".to_string()))
    }

    fn set_approval(&self, _id: ReviewId, _approved: bool) -> Result<(), ApprovalStoreError> {
        Err(ApprovalStoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

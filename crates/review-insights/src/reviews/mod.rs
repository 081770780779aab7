//! Guest review curation and analytics.
//!
//! Raw export records are normalized on demand, filtered, and rolled up into
//! [`ReviewStats`] globally and per property.

pub mod approval;
pub mod clock;
pub mod domain;
pub mod filter;
pub mod performance;
pub mod rounding;
pub mod router;
pub mod service;
pub mod source;
pub mod stats;
mod timestamp;

#[cfg(test)]
mod tests;

pub use approval::{
    ApprovalStore, ApprovalStoreError, InMemoryApprovalStore, DEFAULT_APPROVED_IDS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    NormalizedReview, RawReview, ReviewCategory, ReviewId, ReviewStatus, ReviewType,
    UNKNOWN_CHANNEL,
};
pub use filter::{
    filter_reviews, property_name_contains, FilterQuery, FilterValidationError, ReviewFilter,
};
pub use performance::{group_by_property, property_id, PropertyPerformance};
pub use router::{review_router, ApiResponse};
pub use service::{
    DashboardData, FilteredReviews, PropertyReviews, ReviewService, ReviewServiceError,
};
pub use source::{JsonReviewSource, ReviewSourceError};
pub use stats::{
    calculate_review_stats, RatingKey, ReviewStats, TrendPoint, TREND_WINDOW_DAYS,
};
pub use timestamp::parse_timestamp;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::approval::{ApprovalStore, ApprovalStoreError};
use super::clock::Clock;
use super::domain::{NormalizedReview, RawReview, ReviewId};
use super::filter::{property_name_contains, ReviewFilter};
use super::performance::{group_by_property, PropertyPerformance};
use super::stats::{calculate_review_stats, ReviewStats};

/// Facade over the loaded export, the approval flags and the clock.
///
/// Reviews are normalized fresh on every call so approval changes show up immediately.
pub struct ReviewService<S, C> {
    reviews: Arc<[RawReview]>,
    approvals: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for ReviewService<S, C> {
    fn clone(&self) -> Self {
        Self {
            reviews: Arc::clone(&self.reviews),
            approvals: Arc::clone(&self.approvals),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub overall_stats: ReviewStats,
    pub property_performance: Vec<PropertyPerformance>,
    pub total_reviews: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReviews {
    pub property_name: String,
    pub reviews: Vec<NormalizedReview>,
    pub stats: ReviewStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredReviews {
    pub reviews: Vec<NormalizedReview>,
    pub stats: ReviewStats,
    pub count: usize,
    pub filters: ReviewFilter,
}

impl<S, C> ReviewService<S, C>
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    pub fn new(reviews: Vec<RawReview>, approvals: Arc<S>, clock: Arc<C>) -> Self {
        info!(count = reviews.len(), "review service initialised");
        Self {
            reviews: reviews.into(),
            approvals,
            clock,
        }
    }

    pub fn approvals(&self) -> &Arc<S> {
        &self.approvals
    }

    pub fn get_all_reviews(&self) -> Result<Vec<NormalizedReview>, ReviewServiceError> {
        let approved = self.approvals.approved_ids()?;
        debug!(count = self.reviews.len(), "normalizing reviews");
        Ok(self
            .reviews
            .iter()
            .map(|review| review.normalize(approved.contains(&review.id)))
            .collect())
    }

    /// Case-insensitive substring lookup; `None` returns every review.
    pub fn get_reviews_by_property(
        &self,
        property_name: Option<&str>,
    ) -> Result<Vec<NormalizedReview>, ReviewServiceError> {
        let reviews = self.get_all_reviews()?;
        let Some(needle) = property_name else {
            return Ok(reviews);
        };

        Ok(reviews
            .into_iter()
            .filter(|review| property_name_contains(review, needle))
            .collect())
    }

    pub fn get_property_reviews(
        &self,
        property_name: &str,
    ) -> Result<PropertyReviews, ReviewServiceError> {
        let reviews = self.get_reviews_by_property(Some(property_name))?;
        let stats = calculate_review_stats(&reviews, self.clock.now());
        info!(property = property_name, count = reviews.len(), "property reviews resolved");
        Ok(PropertyReviews {
            property_name: property_name.to_string(),
            reviews,
            stats,
        })
    }

    pub fn get_approved_reviews(&self) -> Result<Vec<NormalizedReview>, ReviewServiceError> {
        Ok(self
            .get_all_reviews()?
            .into_iter()
            .filter(|review| review.is_approved)
            .collect())
    }

    /// Flip the approval flag for a review present in the loaded export.
    pub fn update_review_approval(
        &self,
        id: ReviewId,
        approved: bool,
    ) -> Result<bool, ReviewServiceError> {
        if !self.reviews.iter().any(|review| review.id == id) {
            warn!(review_id = %id, "approval update for unknown review");
            return Err(ReviewServiceError::NotFound(id));
        }

        self.approvals.set_approval(id, approved)?;
        info!(review_id = %id, approved, "review approval updated");
        Ok(true)
    }

    pub fn get_dashboard_data(&self) -> Result<DashboardData, ReviewServiceError> {
        let reviews = self.get_all_reviews()?;
        let now = self.clock.now();

        Ok(DashboardData {
            overall_stats: calculate_review_stats(&reviews, now),
            property_performance: group_by_property(&reviews, now),
            total_reviews: reviews.len(),
        })
    }

    pub fn get_filtered_reviews(
        &self,
        filters: ReviewFilter,
    ) -> Result<FilteredReviews, ReviewServiceError> {
        let reviews = filters.apply(&self.get_all_reviews()?);
        let stats = calculate_review_stats(&reviews, self.clock.now());
        debug!(matched = reviews.len(), ?filters, "filtered reviews");

        Ok(FilteredReviews {
            count: reviews.len(),
            reviews,
            stats,
            filters,
        })
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("review {0} not found")]
    NotFound(ReviewId),
    #[error(transparent)]
    Approvals(#[from] ApprovalStoreError),
}

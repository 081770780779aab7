use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::approval::ApprovalStore;
use super::clock::Clock;
use super::domain::ReviewId;
use super::filter::{FilterQuery, ReviewFilter};
use super::service::{ReviewService, ReviewServiceError};

/// Success envelope shared by every review endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = Some(data.len());
        Self {
            success: true,
            data,
            count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalUpdate {
    success: bool,
    review_id: ReviewId,
    is_approved: bool,
}

/// Router builder exposing the review curation and analytics endpoints.
pub fn review_router<S, C>(service: Arc<ReviewService<S, C>>) -> Router
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/reviews/hostaway", get(all_reviews_handler::<S, C>))
        .route("/api/reviews/dashboard", get(dashboard_handler::<S, C>))
        .route(
            "/api/reviews/property/:property_name",
            get(property_reviews_handler::<S, C>),
        )
        .route("/api/reviews/approved", get(approved_reviews_handler::<S, C>))
        .route(
            "/api/reviews/:review_id/approve",
            post(approval_handler::<S, C>),
        )
        .route("/api/reviews/filter", get(filter_handler::<S, C>))
        .with_state(service)
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let payload = json!({
        "success": false,
        "error": message.into(),
        "code": code,
    });
    (status, Json(payload)).into_response()
}

fn validation_error(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!(%message, "rejected review request");
    error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

fn service_error(context: &str, err: ReviewServiceError) -> Response {
    match err {
        ReviewServiceError::NotFound(id) => {
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", format!("Review {id} not found"))
        }
        other => {
            error!(error = %other, "failed to {}", context);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("Failed to {context}: {other}"),
            )
        }
    }
}

pub(crate) async fn all_reviews_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    match service.get_all_reviews() {
        Ok(reviews) => Json(ApiResponse::list(reviews)).into_response(),
        Err(err) => service_error("fetch all reviews", err),
    }
}

pub(crate) async fn dashboard_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    match service.get_dashboard_data() {
        Ok(dashboard) => Json(ApiResponse::ok(dashboard)).into_response(),
        Err(err) => service_error("fetch dashboard data", err),
    }
}

pub(crate) async fn property_reviews_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
    Path(property_name): Path<String>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    let property_name = property_name.trim();
    if property_name.is_empty() {
        return validation_error("propertyName parameter is required");
    }

    match service.get_property_reviews(property_name) {
        Ok(result) => Json(ApiResponse::ok(result)).into_response(),
        Err(err) => service_error("fetch reviews for property", err),
    }
}

pub(crate) async fn approved_reviews_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    match service.get_approved_reviews() {
        Ok(reviews) => Json(ApiResponse::list(reviews)).into_response(),
        Err(err) => service_error("fetch approved reviews", err),
    }
}

pub(crate) fn parse_review_id(raw: &str) -> Option<ReviewId> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(ReviewId)
}

pub(crate) async fn approval_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
    Path(review_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    let Some(id) = parse_review_id(&review_id) else {
        return validation_error("reviewId must be a positive integer");
    };

    let approved = body
        .ok()
        .and_then(|Json(payload)| payload.get("isApproved").and_then(Value::as_bool));
    let Some(approved) = approved else {
        return validation_error("isApproved must be a boolean value");
    };

    match service.update_review_approval(id, approved) {
        Ok(success) => Json(ApiResponse::ok(ApprovalUpdate {
            success,
            review_id: id,
            is_approved: approved,
        }))
        .into_response(),
        Err(err) => service_error("update review approval", err),
    }
}

pub(crate) async fn filter_handler<S, C>(
    State(service): State<Arc<ReviewService<S, C>>>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response
where
    S: ApprovalStore + 'static,
    C: Clock + 'static,
{
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return validation_error(format!("Invalid query parameters: {}", rejection.body_text()))
        }
    };

    let filters = match ReviewFilter::try_from(query) {
        Ok(filters) => filters,
        Err(err) => return validation_error(err.to_string()),
    };

    match service.get_filtered_reviews(filters) {
        Ok(result) => Json(ApiResponse::ok(result)).into_response(),
        Err(err) => service_error("fetch filtered reviews", err),
    }
}

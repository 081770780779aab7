use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::reviews::clock::FixedClock;
use crate::reviews::router::{approval_handler, parse_review_id};
use crate::reviews::{ReviewId, ReviewService};

async fn get(uri: &str) -> axum::response::Response {
    router()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes")
}

#[tokio::test]
async fn all_reviews_route_wraps_list_with_count() {
    let response = get("/api/reviews/hostaway").await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["count"], json!(5));
    assert_eq!(payload["data"][0]["propertyName"], json!("Camden Loft"));
    assert_eq!(payload["data"][1]["overallRating"], json!(5.0));
    assert_eq!(payload["data"][2]["channel"], json!("unknown"));
    assert_eq!(payload["data"][0]["submittedAt"], json!("2024-06-20T16:20:00"));
}

#[tokio::test]
async fn dashboard_route_returns_rollups() {
    let response = get("/api/reviews/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert!(payload.get("count").is_none());
    let data = &payload["data"];
    assert_eq!(data["totalReviews"], json!(5));
    assert_eq!(data["overallStats"]["averageRating"], json!(4.0));
    assert_eq!(data["propertyPerformance"][1]["propertyId"], json!("soho-studio"));
    assert_eq!(
        data["propertyPerformance"][0]["stats"]["channelBreakdown"],
        json!({ "Airbnb": 1, "Booking.com": 1, "unknown": 1 })
    );
}

#[tokio::test]
async fn property_route_matches_case_insensitive_substring() {
    let response = get("/api/reviews/property/soho").await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["propertyName"], json!("soho"));
    assert_eq!(payload["data"]["stats"]["totalReviews"], json!(2));
    assert_eq!(payload["data"]["reviews"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn property_route_rejects_blank_names() {
    let response = get("/api/reviews/property/%20%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn approved_route_lists_only_approved_reviews() {
    let payload = read_json_body(get("/api/reviews/approved").await).await;
    assert_eq!(payload["count"], json!(2));
    assert_eq!(payload["data"][0]["id"], json!(7454));
    assert_eq!(payload["data"][0]["isApproved"], json!(true));
}

#[tokio::test]
async fn filter_route_applies_exact_criteria_and_echoes_them() {
    let response =
        get("/api/reviews/filter?channel=Airbnb&minRating=4&propertyName=Soho%20Studio").await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let data = &payload["data"];
    assert_eq!(data["count"], json!(1));
    assert_eq!(data["reviews"][0]["id"], json!(7461));
    assert_eq!(data["stats"]["totalReviews"], json!(1));
    assert_eq!(
        data["filters"],
        json!({ "minRating": 4.0, "channel": "Airbnb", "propertyName": "Soho Studio" })
    );
}

#[tokio::test]
async fn filter_route_reports_validation_failures() {
    let response = get("/api/reviews/filter?minRating=0&status=draft").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(
        payload["error"],
        json!(
            "minRating must be a number between 1 and 5; status must be one of: published, pending, rejected"
        )
    );
}

#[tokio::test]
async fn filter_route_wraps_malformed_query_strings() {
    let response = get("/api/reviews/filter?minRating=2&minRating=3").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );

    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["code"], json!("VALIDATION_ERROR"));
    let message = payload["error"].as_str().expect("error message");
    assert!(message.starts_with("Invalid query parameters"));
    assert!(message.contains("minRating"));
}

#[tokio::test]
async fn approve_route_updates_flag() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let router = crate::reviews::review_router(service.clone());

    let response = router
        .oneshot(
            Request::post("/api/reviews/7453/approve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{ "isApproved": true }"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["data"],
        json!({ "success": true, "reviewId": 7453, "isApproved": true })
    );

    let approved = service.get_approved_reviews().expect("reviews load");
    assert!(approved.iter().any(|review| review.id == ReviewId(7453)));
}

#[tokio::test]
async fn approve_route_requires_boolean_flag() {
    let response = router()
        .oneshot(
            Request::post("/api/reviews/7453/approve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{ "isApproved": "yes" }"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("isApproved must be a boolean value"));
}

#[tokio::test]
async fn approve_route_rejects_unknown_reviews() {
    let response = router()
        .oneshot(
            Request::post("/api/reviews/1/approve")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{ "isApproved": false }"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn approval_handler_rejects_malformed_ids() {
    let (service, _) = build_service();
    let response = approval_handler::<_, FixedClock>(
        State(Arc::new(service)),
        Path("abc".to_string()),
        Ok(axum::Json(json!({ "isApproved": true }))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_review_id("0"), None);
    assert_eq!(parse_review_id(" 7453 "), Some(ReviewId(7453)));
}

#[tokio::test]
async fn store_failures_surface_as_internal_errors() {
    let service = ReviewService::new(
        portfolio(),
        Arc::new(UnavailableStore),
        Arc::new(FixedClock(now())),
    );
    let response = crate::reviews::review_router(Arc::new(service))
        .oneshot(
            Request::get("/api/reviews/dashboard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("INTERNAL_ERROR"));
}

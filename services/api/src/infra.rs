use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use review_insights::error::AppError;
use review_insights::reviews::{
    Clock, InMemoryApprovalStore, JsonReviewSource, ReviewService,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the export once and wire it to a fresh, default-seeded approval store.
pub(crate) fn build_review_service<C>(
    path: &Path,
    clock: C,
) -> Result<ReviewService<InMemoryApprovalStore, C>, AppError>
where
    C: Clock + 'static,
{
    let reviews = JsonReviewSource::from_path(path)?;
    let approvals = InMemoryApprovalStore::with_defaults();
    Ok(ReviewService::new(
        reviews,
        Arc::new(approvals),
        Arc::new(clock),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

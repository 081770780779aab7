use crate::infra::{build_review_service, parse_date};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use review_insights::config::AppConfig;
use review_insights::error::AppError;
use review_insights::reviews::{
    calculate_review_stats, group_by_property, FixedClock, PropertyPerformance, ReviewStats,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReviewSummaryArgs {
    /// Review export to summarize (defaults to REVIEWS_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Only include properties whose name contains this text (case-insensitive)
    #[arg(long)]
    pub(crate) property: Option<String>,
    /// Anchor date for the 30-day trend window (defaults to now)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_review_summary(args: ReviewSummaryArgs) -> Result<(), AppError> {
    let ReviewSummaryArgs {
        data,
        property,
        today,
    } = args;

    let reviews_path = match data {
        Some(path) => path,
        None => AppConfig::load()?.data.reviews_path,
    };
    let now = anchor(today);

    let service = build_review_service(&reviews_path, FixedClock(now))?;
    let reviews = service.get_reviews_by_property(property.as_deref())?;

    let overall = calculate_review_stats(&reviews, now);
    let properties = group_by_property(&reviews, now);

    print!(
        "{}",
        format_summary(&reviews_path, property.as_deref(), now, &overall, &properties)
    );
    Ok(())
}

fn anchor(today: Option<NaiveDate>) -> NaiveDateTime {
    match today.and_then(|date| date.and_hms_opt(23, 59, 59)) {
        Some(end_of_day) => end_of_day,
        None => Local::now().naive_local(),
    }
}

fn format_rating(value: f64) -> String {
    format!("{value:.1}")
}

pub(crate) fn format_summary(
    source: &std::path::Path,
    property: Option<&str>,
    now: NaiveDateTime,
    overall: &ReviewStats,
    properties: &[PropertyPerformance],
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Guest review summary");
    let _ = writeln!(out, "Source: {}", source.display());
    if let Some(needle) = property {
        let _ = writeln!(out, "Property filter: \"{needle}\"");
    }
    let _ = writeln!(out, "Evaluated at {}", now.format("%Y-%m-%d %H:%M"));

    let _ = writeln!(
        out,
        "\nOverall: {} reviews, average rating {} ({} rated)",
        overall.total_reviews,
        format_rating(overall.average_rating),
        overall.rated_reviews()
    );

    if !overall.channel_breakdown.is_empty() {
        let _ = writeln!(out, "\nChannels");
        for (channel, count) in &overall.channel_breakdown {
            let _ = writeln!(out, "- {channel}: {count}");
        }
    }

    if !overall.category_averages.is_empty() {
        let _ = writeln!(out, "\nCategory averages");
        for (category, average) in &overall.category_averages {
            let _ = writeln!(out, "- {category}: {}", format_rating(*average));
        }
    }

    if overall.recent_trends.is_empty() {
        let _ = writeln!(out, "\nLast 30 days: no reviews");
    } else {
        let _ = writeln!(out, "\nLast 30 days");
        for point in &overall.recent_trends {
            let _ = writeln!(
                out,
                "- {}: {} review(s), avg {}",
                point.date,
                point.count,
                format_rating(point.avg_rating)
            );
        }
    }

    if properties.is_empty() {
        let _ = writeln!(out, "\nProperties: none");
    } else {
        let _ = writeln!(out, "\nProperties");
        for entry in properties {
            let approved = entry
                .reviews
                .iter()
                .filter(|review| review.is_approved)
                .count();
            let _ = writeln!(
                out,
                "- {} [{}]: {} reviews, avg {}, {} approved",
                entry.property_name,
                entry.property_id,
                entry.stats.total_reviews,
                format_rating(entry.stats.average_rating),
                approved
            );
        }
    }

    out
}

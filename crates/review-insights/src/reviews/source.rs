use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::domain::RawReview;

#[derive(Debug)]
pub enum ReviewSourceError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ReviewSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewSourceError::Io(err) => write!(f, "failed to read review export: {}", err),
            ReviewSourceError::Json(err) => write!(f, "invalid review export data: {}", err),
        }
    }
}

impl std::error::Error for ReviewSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewSourceError::Io(err) => Some(err),
            ReviewSourceError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReviewSourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ReviewSourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Deserialize)]
struct ReviewExport {
    #[serde(default)]
    reviews: Vec<RawReview>,
}

/// Loader for the static `{ "reviews": [...] }` export.
pub struct JsonReviewSource;

impl JsonReviewSource {
    /// A missing file is treated as an empty export.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawReview>, ReviewSourceError> {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "review export not found; starting with no reviews");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let reviews = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), count = reviews.len(), "loaded review export");
        Ok(reviews)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawReview>, ReviewSourceError> {
        let export: ReviewExport = serde_json::from_reader(reader)?;
        Ok(export.reviews)
    }

    pub fn from_json(raw: &str) -> Result<Vec<RawReview>, ReviewSourceError> {
        Self::from_reader(raw.as_bytes())
    }
}

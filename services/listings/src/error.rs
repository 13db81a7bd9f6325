use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Listings service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ListingsServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Listing not found")]
    ListingNotFound,
    /// Carries the action-specific message shown to the caller.
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("Only draft listings can be published")]
    NotDraft,
    /// A concurrent writer stored the same slug first.
    #[error("Listing slug already in use")]
    SlugTaken,
    #[error("Listing quality score too low. Please improve your listing.")]
    QualityTooLow { score: f64, suggestions: Vec<String> },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ListingsServiceError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

impl ListingsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::ListingNotFound => "LISTING_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotDraft => "LISTING_NOT_DRAFT",
            Self::SlugTaken => "SLUG_CONFLICT",
            Self::QualityTooLow { .. } => "QUALITY_TOO_LOW",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ListingsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::NotDraft | Self::QualityTooLow { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::ListingNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::SlugTaken => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::QualityTooLow { score, suggestions } = self {
            body["qualityScore"] = serde_json::json!(score);
            body["suggestions"] = serde_json::json!(suggestions);
        }
        (status, axum::Json(body)).into_response()
    }
}

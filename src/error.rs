//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::export::ExportError;
use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match &self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} not found", what),
                None,
            ),
            AppError::Pricing(e) => {
                tracing::warn!("Pricing rejected: {}", e);
                let details = match e {
                    PricingError::InvalidInput { field, value, .. } => {
                        Some(serde_json::json!({ "field": field, "value": value }))
                    }
                    PricingError::NoOptionsSelected { service } => {
                        Some(serde_json::json!({ "service": service }))
                    }
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    e.error_type(),
                    e.to_string(),
                    details,
                )
            }
            AppError::Export(ExportError::MissingCustomerName) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_customer_name",
                ExportError::MissingCustomerName.to_string(),
                None,
            ),
            AppError::Export(e) => {
                tracing::error!("Export error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "export_failed",
                    "Export failed".to_string(),
                    None,
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "template_error",
                    "Template error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal error".to_string(),
                    None,
                )
            }
        };

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::NotFound("Quote session".to_string()), StatusCode::NOT_FOUND),
            (
                AppError::Pricing(PricingError::NoOptionsSelected {
                    service: "Driveway".to_string(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Export(ExportError::MissingCustomerName),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Export(ExportError::Document("broken".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}

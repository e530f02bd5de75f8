//! Error handling for the Shipquote server
//!
//! Provides consistent error responses in English and Turkish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::pricing::PricingError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_tr: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    // External service errors
    #[error("Email service error: {0}")]
    EmailService(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Field-level validation failure with both translations
    pub fn validation(field: &str, message: &str, message_tr: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_tr: message_tr.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_tr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_tr,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_tr: message_tr.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_tr: format!("Doğrulama hatası: {}", msg),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_tr: format!("{} bulunamadı", resource),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message_en: msg.clone(),
                    message_tr: format!("Geçersiz durum değişikliği: {}", msg),
                    field: Some("status".to_string()),
                },
            ),
            AppError::Pricing(err) => {
                let status = match err {
                    PricingError::DestinationNotFound { .. } | PricingError::InvalidInput(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    PricingError::UnsupportedOperation { .. } => StatusCode::BAD_REQUEST,
                    PricingError::ReferenceDataUnavailable { .. } | PricingError::PriceUnavailable { .. } => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                };
                (
                    status,
                    ErrorDetail {
                        code: err.code().to_string(),
                        message_en: err.user_message(),
                        message_tr: "Kargo fiyatı hesaplanamadı. Lütfen bilgileri kontrol edip tekrar deneyin."
                            .to_string(),
                        field: None,
                    },
                )
            }
            AppError::UnknownTool(name) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "UNKNOWN_TOOL".to_string(),
                    message_en: format!("Unknown tool: {}", name),
                    message_tr: format!("Bilinmeyen araç: {}", name),
                    field: None,
                },
            ),
            AppError::EmailService(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EMAIL_SERVICE_ERROR".to_string(),
                    message_en: "Email service unavailable".to_string(),
                    message_tr: "E-posta servisi kullanılamıyor".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: "Record not found".to_string(),
                    message_tr: "Kayıt bulunamadı".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_tr: "Bir veritabanı hatası oluştu".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(_) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal error occurred".to_string(),
                    message_tr: "Dahili bir hata oluştu".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

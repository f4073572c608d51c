//! HTTP error responses and mapping from repository errors.
//!
//! Every failure renders as `{ "error": message }` with the status of the
//! underlying [`AppError`]. Server-side failures are logged and their detail
//! replaced by a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kakeibo_db::{AssetError, DocumentError, MonthlyError, PaymentSourceError};
use kakeibo_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error returned by a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 401 with the default message.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self(AppError::Unauthorized("Unauthorized".to_string()))
    }

    /// 401 for a failed login.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ))
    }

    /// 400 with `message`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 404 with `message`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 500 for a missing store.
    #[must_use]
    pub fn store_unavailable() -> Self {
        Self(AppError::StoreUnavailable)
    }

    /// 500 with a detail that only reaches the logs.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self(AppError::Internal(detail.into()))
    }

    /// The HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }
        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<MonthlyError> for ApiError {
    fn from(err: MonthlyError) -> Self {
        match err {
            MonthlyError::AlreadyExists(month) => {
                Self(AppError::Conflict(format!("Month {month} already exists")))
            }
            MonthlyError::RecordNotFound(_) => Self::not_found("Monthly record not found"),
            MonthlyError::CardNotFound(_) => Self::not_found("Card not found"),
            MonthlyError::BankNotFound(_) => Self::not_found("Bank not found"),
            MonthlyError::NegativeAmount(_) => Self::validation("Amount must not be negative"),
            MonthlyError::Database(e) => e.into(),
        }
    }
}

impl From<PaymentSourceError> for ApiError {
    fn from(err: PaymentSourceError) -> Self {
        match err {
            PaymentSourceError::CardNotFound(_) => Self::not_found("Card not found"),
            PaymentSourceError::BankNotFound(_) => Self::not_found("Bank not found"),
            PaymentSourceError::DuplicateCard(name) => {
                Self(AppError::Conflict(format!("Card {name} already exists")))
            }
            PaymentSourceError::DuplicateBank(name) => {
                Self(AppError::Conflict(format!("Bank {name} already exists")))
            }
            e @ PaymentSourceError::InvalidPaymentDay(_) => Self::validation(e.to_string()),
            PaymentSourceError::Database(e) => e.into(),
        }
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::AlreadyExists(month) => Self(AppError::Conflict(format!(
                "Asset record for {month} already exists"
            ))),
            AssetError::RecordNotFound(_) => Self::not_found("Asset record not found"),
            AssetError::ItemNotFound(_) => Self::not_found("Asset item not found"),
            AssetError::CryptoNotFound(_) => Self::not_found("Crypto asset not found"),
            AssetError::GoldNotFound(_) => Self::not_found("Gold asset not found"),
            AssetError::SameRecord(_) => {
                Self::validation("Source and current asset records must differ")
            }
            AssetError::Database(e) => e.into(),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => Self::not_found("Not found"),
            DocumentError::ParentNotFound(_) => Self::not_found("Parent folder not found"),
            DocumentError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MonthlyError::AlreadyExists("2024-03".into()).into(), StatusCode::CONFLICT)]
    #[case(MonthlyError::RecordNotFound(1).into(), StatusCode::NOT_FOUND)]
    #[case(AssetError::AlreadyExists("2024-03".into()).into(), StatusCode::CONFLICT)]
    #[case(AssetError::GoldNotFound(1).into(), StatusCode::NOT_FOUND)]
    #[case(DocumentError::NotFound(1).into(), StatusCode::NOT_FOUND)]
    #[case(PaymentSourceError::InvalidPaymentDay(40).into(), StatusCode::BAD_REQUEST)]
    #[case(PaymentSourceError::DuplicateBank("A".into()).into(), StatusCode::CONFLICT)]
    #[case(ApiError::store_unavailable(), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_repository_errors_map_to_status(#[case] error: ApiError, #[case] status: StatusCode) {
        assert_eq!(error.status(), status);
    }

    #[test]
    fn test_conflict_message_names_month() {
        let error: ApiError = MonthlyError::AlreadyExists("2024-03".into()).into();
        assert_eq!(error.0.public_message(), "Month 2024-03 already exists");
    }

    #[test]
    fn test_database_detail_is_hidden() {
        let error: ApiError = DbErr::Custom("connection reset".into()).into();
        assert_eq!(error.0.public_message(), "An error occurred");
    }
}

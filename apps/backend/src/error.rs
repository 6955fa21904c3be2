use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::http::envelope::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedInvalidJwt")]
    UnauthorizedInvalidJwt,
    #[error("UnauthorizedExpiredJwt")]
    UnauthorizedExpiredJwt,
    #[error("Unauthorized: user not found")]
    UnauthorizedUserNotFound,
    #[error("Not found: {detail}")]
    NotFound { code: &'static str, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Stable machine-readable code for each error variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            AppError::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            AppError::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            AppError::UnauthorizedUserNotFound => "UNAUTHORIZED_USER_NOT_FOUND",
            AppError::NotFound { code, .. } => code,
            AppError::BadRequest { code, .. } => code,
            AppError::Db { .. } => "DB_ERROR",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    /// Human-readable detail for each error variant.
    pub fn detail(&self) -> String {
        match self {
            AppError::UnauthorizedMissingBearer => "Missing or malformed Bearer token".to_string(),
            AppError::UnauthorizedInvalidJwt => "Invalid token".to_string(),
            AppError::UnauthorizedExpiredJwt => "Token expired".to_string(),
            AppError::UnauthorizedUserNotFound => {
                "Token subject no longer exists".to_string()
            }
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Db { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt
            | AppError::UnauthorizedUserNotFound => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Db { .. } | AppError::Config { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::UnauthorizedInvalidJwt
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::UnauthorizedExpiredJwt
    }

    pub fn unauthorized_user_not_found() -> Self {
        Self::UnauthorizedUserNotFound
    }

    pub fn not_found(code: &'static str, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn bad_request(code: &'static str, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        // Client-facing failures are expected traffic; only log server faults loudly.
        if status.is_server_error() {
            tracing::error!(code = self.code(), detail = %self.detail(), "request failed");
        } else {
            tracing::debug!(code = self.code(), detail = %self.detail(), "request rejected");
        }

        HttpResponse::build(status).json(Envelope::<()>::failure(self.detail()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::AppError;

    #[test]
    fn unauthorized_variants_map_to_401() {
        for err in [
            AppError::unauthorized_missing_bearer(),
            AppError::unauthorized_invalid_jwt(),
            AppError::unauthorized_expired_jwt(),
            AppError::unauthorized_user_not_found(),
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn storage_failures_map_to_500() {
        assert_eq!(
            AppError::db("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_keeps_its_code() {
        let err = AppError::not_found("EXCURSION_NOT_FOUND", "nope".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "EXCURSION_NOT_FOUND");
    }
}

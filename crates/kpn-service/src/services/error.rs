//! Service layer error types
//!
//! Engine failures travel as [`ServiceError::Domain`] so their stable codes
//! reach the API untouched; the remaining variants cover input that never
//! made it to the engine.

use kpn_common::{domain_status, AppError};
use kpn_core::DomainError;

/// Service layer error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Engine rule violation or storage failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Application error (token, configuration)
    #[error(transparent)]
    App(#[from] AppError),

    /// Lookup of something that is not a governance entity
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Malformed request input
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kpn_core::Snowflake;

    #[test]
    fn test_domain_errors_keep_their_code() {
        let err = ServiceError::from(DomainError::UnauthorizedApprover(Snowflake::new(9)));
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "UNAUTHORIZED_APPROVER");
        assert!(err.as_domain().is_some());
    }

    #[test]
    fn test_business_rule_is_unprocessable() {
        let err = ServiceError::from(DomainError::SelfTarget);
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("jurisdiction level", "PROVINCE");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "jurisdiction level not found: PROVINCE");
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("title must not be empty");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::from(DomainError::AlreadyResolved(Snowflake::new(3))).into();
        assert_eq!(app_err.status_code(), 409);
        assert_eq!(app_err.error_code(), "ALREADY_RESOLVED");
    }
}

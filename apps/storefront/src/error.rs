//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  {"id":7,"cmd":"apply_discount","args":{"code":"DESC20"}}              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │                                                                  │  │
//! │  │  DbError ─────────────────────────────┐                          │  │
//! │  │  CoreError (DiscountAlreadyApplied) ──┼──► ApiError              │  │
//! │  │  ValidationError ─────────────────────┘                          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"id":7,"ok":false,"error":{"code":"DISCOUNT_ERROR",                  │
//! │                              "message":"Discount code DESC10 ..."}}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use folio_core::{CoreError, ValidationError};
use folio_db::DbError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CHECKOUT_ERROR",
///   "message": "Please complete the shipping information",
///   "section": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Checkout section the UI should reopen, for gate failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<u8>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Local storage operation failed
    DatabaseError,

    /// Business rule violated (e.g. out-of-order checkout step)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Checkout gate not satisfied
    CheckoutError,

    /// Discount code rejected
    DiscountError,

    /// Malformed request or unknown command
    BadRequest,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            section: None,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Local storage unavailable")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Local storage migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Local storage query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage operation failed")
            }
            DbError::Serialization { key, message } => {
                tracing::error!(key = %key, "Stored value could not be encoded: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Local storage operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Local storage is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal local storage error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Local storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::EmptyCart | CoreError::OutOfStock { .. } | CoreError::CartLocked => {
                ApiError::new(ErrorCode::CartError, message)
            }
            CoreError::InvalidDiscountCode(_) | CoreError::DiscountAlreadyApplied { .. } => {
                ApiError::new(ErrorCode::DiscountError, message)
            }
            CoreError::CheckoutIncomplete { section, .. } => ApiError {
                section: Some(section),
                ..ApiError::new(ErrorCode::CheckoutError, message)
            },
            CoreError::InvalidTransition { .. } => ApiError::new(ErrorCode::BusinessLogic, message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CoreError::CheckoutIncomplete {
            missing: "payment".to_string(),
            section: 2,
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CHECKOUT_ERROR");
        assert_eq!(json["message"], "Please complete the payment information");
        assert_eq!(json["section"], 2);

        let json = serde_json::to_value(ApiError::bad_request("nope")).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json.get("section").is_none());
    }

    #[test]
    fn test_core_error_codes() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::CartError);
        assert_eq!(
            ApiError::from(CoreError::InvalidDiscountCode("X".into())).code,
            ErrorCode::DiscountError
        );
        assert_eq!(
            ApiError::from(CoreError::InvalidTransition {
                from: "cart".into(),
                to: "completed".into()
            })
            .code,
            ErrorCode::BusinessLogic
        );
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("disk I/O error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }
}

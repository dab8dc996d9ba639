//! # Error Types
//!
//! Domain-specific error types for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                         │
//! │  ├── CoreError        - Cart, discount and checkout rule violations    │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  folio-db errors (separate crate)                                      │
//! │  └── DbError          - Local storage failures                         │
//! │                                                                         │
//! │  Storefront host errors                                                │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Storefront rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The book has no copies left.
    #[error("{title} is out of stock")]
    OutOfStock { title: String },

    /// The code is not in the discount table.
    #[error("Invalid discount code: {0}")]
    InvalidDiscountCode(String),

    /// A code is already active; it must be removed before applying another.
    ///
    /// ## User Workflow
    /// ```text
    /// DESC10 applied ──► user types ENVIOGRATIS ──► apply
    ///      │
    ///      ▼
    /// DiscountAlreadyApplied { active: "DESC10" }
    ///      │
    ///      ▼
    /// UI keeps DESC10 and offers "Remove"
    /// ```
    #[error("Discount code {active} is already applied")]
    DiscountAlreadyApplied { active: String },

    /// The cart is frozen between the checkout gate and the snapshot.
    #[error("Cart cannot change while an order awaits confirmation")]
    CartLocked,

    /// A checkout gate is not satisfied. `section` is the form to reopen.
    #[error("Please complete the {missing} information")]
    CheckoutIncomplete { missing: String, section: u8 },

    /// The checkout flow cannot move from `from` to `to`.
    #[error("Cannot move checkout from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form field validation errors.
///
/// Field names use the frontend's camelCase spelling so the UI can attach the
/// message to the right input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., email, postal code, card number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Two fields that must match differ (password confirmation).
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// A checkbox that must be ticked is not.
    #[error("{field} must be accepted")]
    MustAccept { field: String },
}

impl ValidationError {
    /// The field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::MustAccept { field } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DiscountAlreadyApplied {
            active: "DESC10".to_string(),
        };
        assert_eq!(err.to_string(), "Discount code DESC10 is already applied");

        let err = CoreError::CheckoutIncomplete {
            missing: "shipping".to_string(),
            section: 1,
        };
        assert_eq!(err.to_string(), "Please complete the shipping information");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "city".to_string(),
        };
        assert_eq!(err.to_string(), "city is required");
        assert_eq!(err.field(), "city");

        let err = ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "password".to_string(),
        };
        assert_eq!(err.to_string(), "confirmPassword does not match password");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustAccept {
            field: "acceptTerms".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

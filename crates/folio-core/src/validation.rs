//! # Validation Module
//!
//! Form validation for checkout and account screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Form Lifecycle                                     │
//! │                                                                         │
//! │  Keystroke ──► update_shipping / update_payment command                │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  validate_*(form) ← THIS MODULE (pure, framework independent)          │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  FormValidation { is_valid, field_errors }                             │
//! │        │                         │                                      │
//! │        ▼                         ▼                                      │
//! │  checkout gate boolean     inline message per field                    │
//! │                                                                         │
//! │  The same functions run again on submit.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_shipping, ShippingForm};
//!
//! let form = ShippingForm {
//!     full_name: "Ana Torres".to_string(),
//!     email: "ana@example.com".to_string(),
//!     address: "742 Evergreen Terrace".to_string(),
//!     city: "Springfield".to_string(),
//!     postal_code: "12345".to_string(),
//! };
//! assert!(validate_shipping(&form).is_valid);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::PaymentMethodKind;

/// Result type for single-value validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Form Result
// =============================================================================

/// Outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormValidation {
    pub is_valid: bool,
    /// Message per field name; only failing fields appear.
    pub field_errors: BTreeMap<String, String>,
}

impl FormValidation {
    /// Builds the result from collected errors. The first error per field wins.
    pub fn from_errors(errors: impl IntoIterator<Item = ValidationError>) -> Self {
        let mut field_errors = BTreeMap::new();
        for err in errors {
            field_errors
                .entry(err.field().to_string())
                .or_insert_with(|| err.to_string());
        }
        FormValidation {
            is_valid: field_errors.is_empty(),
            field_errors,
        }
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a field is not blank after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks the `local@domain.tld` shape.
///
/// ## Rules
/// - No whitespace anywhere
/// - Exactly one `@`, with something on both sides
/// - The domain contains a `.` that is neither its first nor last character
///
/// ## Example
/// ```rust
/// use folio_core::validation::is_valid_email;
///
/// assert!(is_valid_email("reader@books.mx"));
/// assert!(!is_valid_email("reader@books"));
/// assert!(!is_valid_email("read er@books.mx"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validates a required email field.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<()> {
    validate_required(field, email)?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }
    Ok(())
}

/// Validates a postal code: exactly 5 digits.
pub fn validate_postal_code(code: &str) -> ValidationResult<()> {
    validate_required("postalCode", code)?;
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "postalCode".to_string(),
            reason: "must be exactly 5 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Quantity
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Clamps a quantity control's value into `1..=max`.
///
/// A `max` below 1 is treated as 1; out-of-stock books are blocked before
/// they reach a quantity control.
///
/// ## Example
/// ```rust
/// use folio_core::validation::clamp_quantity;
///
/// assert_eq!(clamp_quantity(0, 10), 1);
/// assert_eq!(clamp_quantity(12, 10), 10);
/// assert_eq!(clamp_quantity(4, 10), 4);
/// ```
pub fn clamp_quantity(value: i64, max: i64) -> i64 {
    value.clamp(1, max.max(1))
}

// =============================================================================
// Shipping Form
// =============================================================================

/// Checkout step 1: where the order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ShippingForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Validates the shipping form. Every field is required.
pub fn validate_shipping(form: &ShippingForm) -> FormValidation {
    let errors = [
        validate_required("fullName", &form.full_name),
        validate_email("email", &form.email),
        validate_required("address", &form.address),
        validate_required("city", &form.city),
        validate_postal_code(&form.postal_code),
    ];
    FormValidation::from_errors(errors.into_iter().filter_map(Result::err))
}

// =============================================================================
// Payment Form
// =============================================================================

/// Card fields as typed into the payment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CardDetails {
    pub card_number: String,
    pub card_name: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl CardDetails {
    /// Applies the input masks to every field.
    pub fn formatted(&self) -> Self {
        CardDetails {
            card_number: format_card_number(&self.card_number),
            card_name: self.card_name.clone(),
            expiry_date: format_expiry_date(&self.expiry_date),
            cvv: format_cvv(&self.cvv),
        }
    }
}

/// Checkout step 2: the selected payment method and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "method", rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentForm {
    Card(CardDetails),
    Paypal {
        #[serde(default)]
        email: String,
    },
}

impl Default for PaymentForm {
    fn default() -> Self {
        PaymentForm::Card(CardDetails::default())
    }
}

impl PaymentForm {
    pub fn kind(&self) -> PaymentMethodKind {
        match self {
            PaymentForm::Card(_) => PaymentMethodKind::Card,
            PaymentForm::Paypal { .. } => PaymentMethodKind::Paypal,
        }
    }

    /// Applies input masks (card fields only).
    pub fn formatted(&self) -> Self {
        match self {
            PaymentForm::Card(card) => PaymentForm::Card(card.formatted()),
            PaymentForm::Paypal { email } => PaymentForm::Paypal {
                email: email.clone(),
            },
        }
    }
}

fn digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Card number mask: digits only, at most 16, a space after every 4th digit.
///
/// ```rust
/// use folio_core::validation::format_card_number;
///
/// assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("4111-11"), "4111 11");
/// ```
pub fn format_card_number(raw: &str) -> String {
    let digits = digits(raw, 16);
    let mut out = String::with_capacity(19);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Expiry mask: digits only, at most 4, `/` inserted after the month.
///
/// ```rust
/// use folio_core::validation::format_expiry_date;
///
/// assert_eq!(format_expiry_date("1227"), "12/27");
/// assert_eq!(format_expiry_date("1"), "1");
/// ```
pub fn format_expiry_date(raw: &str) -> String {
    let digits = digits(raw, 4);
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// CVV mask: digits only, at most 4.
pub fn format_cvv(raw: &str) -> String {
    digits(raw, 4)
}

fn validate_card(card: &CardDetails) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let number: String = card
        .card_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if number.is_empty() {
        errors.push(ValidationError::Required {
            field: "cardNumber".to_string(),
        });
    } else if number.len() != 16 || !number.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ValidationError::InvalidFormat {
            field: "cardNumber".to_string(),
            reason: "must have 16 digits".to_string(),
        });
    }

    if let Err(e) = validate_required("cardName", &card.card_name) {
        errors.push(e);
    }

    if card.expiry_date.is_empty() {
        errors.push(ValidationError::Required {
            field: "expiryDate".to_string(),
        });
    } else if !is_valid_expiry(&card.expiry_date) {
        errors.push(ValidationError::InvalidFormat {
            field: "expiryDate".to_string(),
            reason: "must be MM/YY".to_string(),
        });
    }

    if card.cvv.is_empty() {
        errors.push(ValidationError::Required {
            field: "cvv".to_string(),
        });
    } else if !(3..=4).contains(&card.cvv.len()) || !card.cvv.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            reason: "must have 3 or 4 digits".to_string(),
        });
    }

    errors
}

fn is_valid_expiry(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'/' {
        return false;
    }
    if ![0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit()) {
        return false;
    }
    let month = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    (1..=12).contains(&month)
}

/// Validates the payment form for its selected method.
pub fn validate_payment(form: &PaymentForm) -> FormValidation {
    match form {
        PaymentForm::Card(card) => FormValidation::from_errors(validate_card(card)),
        PaymentForm::Paypal { email } => {
            FormValidation::from_errors(validate_email("email", email).err())
        }
    }
}

// =============================================================================
// Account Forms
// =============================================================================

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn validate_login(form: &LoginForm) -> FormValidation {
    let errors = [
        validate_email("email", &form.email),
        validate_required("password", &form.password),
    ];
    FormValidation::from_errors(errors.into_iter().filter_map(Result::err))
}

/// Account registration form. `rfc` (tax id) is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub address: String,
    pub phone: String,
    pub rfc: String,
    pub accept_terms: bool,
}

pub fn validate_registration(form: &RegisterForm) -> FormValidation {
    let mut errors: Vec<ValidationError> = [
        validate_required("fullName", &form.full_name),
        validate_email("email", &form.email),
        validate_required("password", &form.password),
        validate_required("address", &form.address),
        validate_required("phone", &form.phone),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if form.password != form.confirm_password {
        errors.push(ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "password".to_string(),
        });
    }

    if !form.accept_terms {
        errors.push(ValidationError::MustAccept {
            field: "acceptTerms".to_string(),
        });
    }

    FormValidation::from_errors(errors)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_shipping() -> ShippingForm {
        ShippingForm {
            full_name: "Ana Torres".to_string(),
            email: "ana.torres@example.com".to_string(),
            address: "Av. Reforma 222".to_string(),
            city: "CDMX".to_string(),
            postal_code: "06600".to_string(),
        }
    }

    fn valid_card() -> CardDetails {
        CardDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            card_name: "ANA TORRES".to_string(),
            expiry_date: "09/28".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email(" user@example.com"));
    }

    #[test]
    fn test_postal_code() {
        assert!(validate_postal_code("12345").is_ok());
        assert!(validate_postal_code("1234").is_err());
        assert!(validate_postal_code("123456").is_err());
        assert!(validate_postal_code("12a45").is_err());
        assert!(matches!(
            validate_postal_code("  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());

        assert_eq!(clamp_quantity(-5, 3), 1);
        assert_eq!(clamp_quantity(99, 3), 3);
        assert_eq!(clamp_quantity(2, 0), 1);
    }

    #[test]
    fn test_valid_shipping_form() {
        let result = validate_shipping(&valid_shipping());
        assert!(result.is_valid);
        assert!(result.field_errors.is_empty());
    }

    #[test]
    fn test_shipping_reports_each_failing_field() {
        let form = ShippingForm {
            full_name: "   ".to_string(),
            email: "ana@example".to_string(),
            postal_code: "123".to_string(),
            ..valid_shipping()
        };

        let result = validate_shipping(&form);
        assert!(!result.is_valid);
        assert_eq!(result.field_errors.len(), 3);
        assert_eq!(result.error_for("fullName"), Some("fullName is required"));
        assert!(result.error_for("email").unwrap().contains("valid email"));
        assert!(result.error_for("postalCode").unwrap().contains("5 digits"));
        assert!(result.error_for("city").is_none());
    }

    #[test]
    fn test_empty_shipping_form_requires_everything() {
        let result = validate_shipping(&ShippingForm::default());
        assert_eq!(result.field_errors.len(), 5);
        assert_eq!(result.error_for("email"), Some("email is required"));
    }

    #[test]
    fn test_card_masks() {
        assert_eq!(format_card_number("4111 1111 1111 11119999"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("abcd"), "");
        assert_eq!(format_card_number("41111"), "4111 1");
        assert_eq!(format_expiry_date("12/2"), "12/2");
        assert_eq!(format_expiry_date("0928xx"), "09/28");
        assert_eq!(format_expiry_date("12"), "12/");
        assert_eq!(format_cvv("12a34 5"), "1234");
    }

    #[test]
    fn test_valid_card() {
        let result = validate_payment(&PaymentForm::Card(valid_card()));
        assert!(result.is_valid);
    }

    #[test]
    fn test_card_field_errors() {
        let card = CardDetails {
            card_number: "4111 1111".to_string(),
            card_name: String::new(),
            expiry_date: "13/28".to_string(),
            cvv: "12".to_string(),
        };

        let result = validate_payment(&PaymentForm::Card(card));
        assert!(!result.is_valid);
        assert!(result.error_for("cardNumber").unwrap().contains("16 digits"));
        assert_eq!(result.error_for("cardName"), Some("cardName is required"));
        assert!(result.error_for("expiryDate").unwrap().contains("MM/YY"));
        assert!(result.error_for("cvv").unwrap().contains("3 or 4"));
    }

    #[test]
    fn test_formatted_card_validates() {
        let raw = CardDetails {
            card_number: "4111-1111-1111-1111".to_string(),
            card_name: "ANA".to_string(),
            expiry_date: "0928".to_string(),
            cvv: "1234".to_string(),
        };
        assert!(!validate_payment(&PaymentForm::Card(raw.clone())).is_valid);

        let formatted = PaymentForm::Card(raw).formatted();
        assert!(validate_payment(&formatted).is_valid);
    }

    #[test]
    fn test_paypal_email() {
        let ok = PaymentForm::Paypal {
            email: "buyer@paypal.com".to_string(),
        };
        let bad = PaymentForm::Paypal {
            email: "buyer".to_string(),
        };
        assert!(validate_payment(&ok).is_valid);
        assert!(!validate_payment(&bad).is_valid);
        assert_eq!(ok.kind(), PaymentMethodKind::Paypal);
    }

    #[test]
    fn test_payment_form_json_tag() {
        let form: PaymentForm =
            serde_json::from_str(r#"{"method":"paypal","email":"a@b.co"}"#).unwrap();
        assert_eq!(form.kind(), PaymentMethodKind::Paypal);

        let form: PaymentForm =
            serde_json::from_str(r#"{"method":"card","cardNumber":"4111"}"#).unwrap();
        assert!(matches!(form, PaymentForm::Card(ref c) if c.card_number == "4111"));
    }

    #[test]
    fn test_login() {
        let ok = LoginForm {
            email: "reader@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_login(&ok).is_valid);

        let missing = validate_login(&LoginForm::default());
        assert_eq!(missing.field_errors.len(), 2);
    }

    #[test]
    fn test_registration() {
        let form = RegisterForm {
            full_name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            address: "Av. Reforma 222".to_string(),
            phone: "55 1234 5678".to_string(),
            rfc: String::new(),
            accept_terms: true,
        };
        assert!(validate_registration(&form).is_valid);

        let mismatch = RegisterForm {
            confirm_password: "hunter23".to_string(),
            accept_terms: false,
            ..form
        };
        let result = validate_registration(&mismatch);
        assert!(!result.is_valid);
        assert_eq!(
            result.error_for("confirmPassword"),
            Some("confirmPassword does not match password")
        );
        assert_eq!(result.error_for("acceptTerms"), Some("acceptTerms must be accepted"));
    }
}

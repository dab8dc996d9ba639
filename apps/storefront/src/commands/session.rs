//! # Session Commands
//!
//! The login endpoint itself lives on the REST backend. The frontend posts
//! the credentials there and hands the result to `record_login`; these
//! commands own only what is kept locally.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use folio_core::validation::{validate_login, validate_registration as check_registration};
use folio_core::{FormValidation, LoginForm, RegisterForm, Session};

/// Response for `record_login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session: Session,
    /// `/dashboard` for admins, `/` for everyone else.
    pub landing_path: &'static str,
}

/// Stores the session returned by `POST /auth/login`.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a blank user id
pub async fn record_login(db: &DbState, session: Session) -> Result<LoginResponse, ApiError> {
    debug!(user_id = %session.user_id, "record_login command");

    if session.user_id.trim().is_empty() {
        return Err(ApiError::validation("userId is required"));
    }

    db.inner().sessions().record_login(&session).await?;
    let landing_path = session.landing_path();
    Ok(LoginResponse {
        session,
        landing_path,
    })
}

pub async fn current_session(db: &DbState) -> Result<Option<Session>, ApiError> {
    debug!("current_session command");
    Ok(db.inner().sessions().current().await?)
}

pub async fn logout(db: &DbState) -> Result<(), ApiError> {
    debug!("logout command");
    db.inner().sessions().logout().await?;
    info!("Logged out");
    Ok(())
}

/// Checks the sign-in form before it is posted.
pub fn validate_login_form(form: &LoginForm) -> FormValidation {
    debug!("validate_login_form command");
    validate_login(form)
}

/// Checks the registration form before it is posted to `/auth/register`.
pub fn validate_registration(form: &RegisterForm) -> FormValidation {
    debug!("validate_registration command");
    check_registration(form)
}

//! # Commands Module
//!
//! All commands exposed to the storefront frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch table)
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Checkout forms, discount, gate
//! ├── order.rs     ◄─── Confirmation and receipt
//! ├── session.rs   ◄─── Login state, form checks
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  invoke('add_to_cart', { book, quantity: 2 })                           │
//! │         │                                                               │
//! │         │ {"id":3,"cmd":"add_to_cart","args":{...}}  (stdin, one line)  │
//! │         ▼                                                               │
//! │  dispatch(state, "add_to_cart", args)                                   │
//! │         │  args parsed into a typed struct (BAD_REQUEST on mismatch)    │
//! │         ▼                                                               │
//! │  cart::add_to_cart(&state.cart, &state.checkout, book, quantity)        │
//! │         │  Result<CartResponse, ApiError>                               │
//! │         ▼                                                               │
//! │  {"id":3,"ok":true,"data":{"items":[...],"totals":{...}}}  (stdout)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod order;
pub mod session;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::StorefrontState;
use folio_core::{Book, LoginForm, PaymentForm, RegisterForm, Session, ShippingForm};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartArgs {
    book: Book,
    quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemArgs {
    id: i64,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct ItemArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ShippingArgs {
    form: ShippingForm,
}

#[derive(Debug, Deserialize)]
struct PaymentArgs {
    form: PaymentForm,
}

#[derive(Debug, Deserialize)]
struct SectionArgs {
    section: u8,
}

#[derive(Debug, Deserialize)]
struct DiscountArgs {
    code: String,
}

#[derive(Debug, Deserialize)]
struct LoginArgs {
    session: Session,
}

#[derive(Debug, Deserialize)]
struct LoginFormArgs {
    form: LoginForm,
}

#[derive(Debug, Deserialize)]
struct RegisterArgs {
    form: RegisterForm,
}

fn parse_args<T: DeserializeOwned>(cmd: &str, args: Value) -> Result<T, ApiError> {
    serde_json::from_value(args)
        .map_err(|e| ApiError::bad_request(format!("Invalid arguments for {}: {}", cmd, e)))
}

fn to_value<T: Serialize>(data: T) -> Result<Value, ApiError> {
    serde_json::to_value(data)
        .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))
}

/// Routes a command name to its handler.
///
/// ## Errors
/// - `BAD_REQUEST` for an unknown command or arguments of the wrong shape
/// - whatever the command itself returns
pub async fn dispatch(state: &StorefrontState, cmd: &str, args: Value) -> Result<Value, ApiError> {
    match cmd {
        // Cart commands
        "get_cart" => to_value(cart::get_cart(&state.cart).await),
        "add_to_cart" => {
            let AddToCartArgs { book, quantity } = parse_args(cmd, args)?;
            to_value(cart::add_to_cart(&state.cart, &state.checkout, book, quantity).await?)
        }
        "update_cart_item" => {
            let UpdateItemArgs { id, quantity } = parse_args(cmd, args)?;
            to_value(cart::update_cart_item(&state.cart, &state.checkout, id, quantity).await?)
        }
        "increment_cart_item" => {
            let ItemArgs { id } = parse_args(cmd, args)?;
            to_value(cart::increment_cart_item(&state.cart, &state.checkout, id).await?)
        }
        "decrement_cart_item" => {
            let ItemArgs { id } = parse_args(cmd, args)?;
            to_value(cart::decrement_cart_item(&state.cart, &state.checkout, id).await?)
        }
        "remove_from_cart" => {
            let ItemArgs { id } = parse_args(cmd, args)?;
            to_value(cart::remove_from_cart(&state.cart, &state.checkout, id).await?)
        }
        "clear_cart" => to_value(cart::clear_cart(&state.cart, &state.checkout).await?),

        // Checkout commands
        "begin_checkout" => to_value(checkout::begin_checkout(&state.cart, &state.checkout).await?),
        "update_shipping" => {
            let ShippingArgs { form } = parse_args(cmd, args)?;
            to_value(checkout::update_shipping(&state.checkout, form).await)
        }
        "update_payment" => {
            let PaymentArgs { form } = parse_args(cmd, args)?;
            to_value(checkout::update_payment(&state.checkout, form).await)
        }
        "toggle_section" => {
            let SectionArgs { section } = parse_args(cmd, args)?;
            to_value(checkout::toggle_section(&state.checkout, section).await?)
        }
        "apply_discount" => {
            let DiscountArgs { code } = parse_args(cmd, args)?;
            to_value(checkout::apply_discount(&state.cart, &state.checkout, code).await?)
        }
        "remove_discount" => to_value(checkout::remove_discount(&state.cart, &state.checkout).await),
        "get_order_summary" => {
            to_value(checkout::get_order_summary(&state.cart, &state.checkout).await)
        }
        "continue_to_confirmation" => {
            to_value(checkout::continue_to_confirmation(&state.db, &state.cart, &state.checkout).await?)
        }

        // Order commands
        "confirm_order" => {
            to_value(order::confirm_order(&state.db, &state.cart, &state.checkout).await?)
        }
        "finish_order" => to_value(order::finish_order(&state.db, &state.checkout).await?),

        // Session commands
        "record_login" => {
            let LoginArgs { session } = parse_args(cmd, args)?;
            to_value(session::record_login(&state.db, session).await?)
        }
        "current_session" => to_value(session::current_session(&state.db).await?),
        "logout" => to_value(session::logout(&state.db).await?),
        "validate_login" => {
            let LoginFormArgs { form } = parse_args(cmd, args)?;
            to_value(session::validate_login_form(&form))
        }
        "validate_registration" => {
            let RegisterArgs { form } = parse_args(cmd, args)?;
            to_value(session::validate_registration(&form))
        }

        // Config commands
        "get_config" => to_value(config::get_config(&state.config)),

        _ => Err(ApiError::bad_request(format!("Unknown command: {}", cmd))),
    }
}

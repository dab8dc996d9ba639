//! # State Module
//!
//! Application state for the storefront host.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  StorefrontState (owned by the invoke loop)                            │
//! │          │                                                              │
//! │          ├──────────────────┬──────────────────┬────────────────┐        │
//! │          ▼                  ▼                  ▼                ▼        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │   DbState    │  │  CartState   │  │CheckoutState │  │  Config    │  │
//! │  │  Database    │  │  Mutex<      │  │  Mutex<      │  │ read-only  │  │
//! │  │  (pool)      │  │  CartStore>  │  │  Session>    │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  Commands take only the parts they need.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod checkout;
mod db;

pub use cart::CartState;
pub use checkout::{CheckoutSession, CheckoutState};
pub use db::DbState;

use folio_db::{CartStore, Database};

use crate::config::StorefrontConfig;

/// Everything the commands can reach.
#[derive(Debug)]
pub struct StorefrontState {
    pub db: DbState,
    pub cart: CartState,
    pub checkout: CheckoutState,
    pub config: StorefrontConfig,
}

impl StorefrontState {
    /// Builds the state, rehydrating the cart from `db`.
    pub async fn new(db: Database, config: StorefrontConfig) -> Self {
        let cart = CartStore::load(&db).await;
        StorefrontState {
            db: DbState::new(db),
            cart: CartState::new(cart),
            checkout: CheckoutState::new(),
            config,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use folio_core::validation::CardDetails;
    use folio_core::{Book, Money, PaymentForm, ShippingForm};
    use folio_db::DbConfig;

    pub async fn state() -> StorefrontState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        StorefrontState::new(db, StorefrontConfig::default()).await
    }

    pub fn book(id: i64, cents: i64, stock: i64) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Gabriel García Márquez".to_string(),
            image: String::new(),
            price: Money::from_cents(cents),
            stock,
        }
    }

    pub fn shipping() -> ShippingForm {
        ShippingForm {
            full_name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            address: "Av. Reforma 222".to_string(),
            city: "CDMX".to_string(),
            postal_code: "06600".to_string(),
        }
    }

    /// Raw card input; the payment command applies the masks.
    pub fn card() -> PaymentForm {
        PaymentForm::Card(CardDetails {
            card_number: "4111111111111111".to_string(),
            card_name: "ANA TORRES".to_string(),
            expiry_date: "0929".to_string(),
            cvv: "123".to_string(),
        })
    }
}

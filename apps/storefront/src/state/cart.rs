//! # Cart State
//!
//! The process-wide cart, owned here and lent to commands.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► cart.lock().await ──► mutate ──► persist ──► unlock        │
//! │                                                                         │
//! │  The guard is held across the storage write, so the next request       │
//! │  always sees both the new cart and its persisted copy.                 │
//! │                                                                         │
//! │  Lock order when both are needed: CartState, then CheckoutState.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tokio `Mutex` rather than `std::sync::Mutex` because the guard lives
//! across `.await`.

use tokio::sync::{Mutex, MutexGuard};

use folio_db::CartStore;

#[derive(Debug)]
pub struct CartState {
    store: Mutex<CartStore>,
}

impl CartState {
    pub fn new(store: CartStore) -> Self {
        CartState {
            store: Mutex::new(store),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.store.lock().await
    }
}

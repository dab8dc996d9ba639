//! # folio-db: Local Storage for the Folio Storefront
//!
//! A SQLite key/value table, accessed with sqlx, that plays the role of the
//! browser's local storage: the cart, the login session and the checkout
//! draft all live here between runs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Data Flow                                  │
//! │                                                                         │
//! │  Storefront command (add_to_cart)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  CartStore    │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  Repositories │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ LocalStorage  │    │ 001_local_   │  │   │
//! │  │   │               │    │ Session       │    │   storage    │  │   │
//! │  │   │               │    │ CheckoutDraft │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   local_storage(key TEXT PRIMARY KEY, value TEXT, updated_at)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Typed access to storage keys
//! - [`cart_store`] - The persisted cart
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::{CartStore, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/folio.db")).await?;
//! let mut cart = CartStore::load(&db).await;
//! cart.add_to_cart(&book, 1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_store::CartStore;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{keys, CheckoutDraft, CheckoutDraftRepository, LocalStorage, SessionRepository};

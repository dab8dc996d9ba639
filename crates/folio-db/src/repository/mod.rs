//! # Repository Module
//!
//! Typed access to the local storage table.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Storefront command                                                    │
//! │       │                                                                 │
//! │       │  db.sessions().record_login(&session)                          │
//! │       ▼                                                                 │
//! │  SessionRepository / CheckoutDraftRepository   (typed keys)            │
//! │       │                                                                 │
//! │       │  storage.set_item("user_id", "42")                             │
//! │       ▼                                                                 │
//! │  LocalStorage                                  (raw string keys)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  local_storage table                                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persisted cart goes through [`crate::CartStore`] instead of a
//! repository, since it also owns the in-memory copy.
//!
//! ## Available Repositories
//!
//! - [`LocalStorage`] - get/set/remove on raw keys
//! - [`SessionRepository`] - login session keys
//! - [`CheckoutDraftRepository`] - transient checkout keys

pub mod checkout;
pub mod session;
pub mod storage;

pub use checkout::{CheckoutDraft, CheckoutDraftRepository};
pub use session::SessionRepository;
pub use storage::{keys, LocalStorage};

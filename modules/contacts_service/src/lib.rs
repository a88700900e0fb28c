//! Contacts Service Module
//!
//! Multi-user address book with email-confirmed registration, JWT bearer
//! authentication and per-user contact storage.

// Public exports
pub mod contract;
pub use contract::{
    client::ContactsApi, error::ContactsError, Contact, ContactDraft, ContactFilter, NewUser,
    User, UserRole,
};

pub mod module;
pub use module::ContactsServiceModule;

pub mod config;
pub use config::AppConfig;

pub mod lifecycle;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

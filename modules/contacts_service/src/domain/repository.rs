//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{Contact, ContactDraft, ContactFilter, NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

/// Repository for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a new user
    async fn create(&self, user: &NewUser) -> Result<User>;

    /// Mark the account with this email as confirmed
    async fn confirm_email(&self, email: &str) -> Result<()>;

    /// Store a new avatar URL, returning the updated user
    async fn update_avatar(&self, email: &str, url: &str) -> Result<Option<User>>;

    /// Replace the password hash, returning the updated user
    async fn update_password(&self, user_id: i32, hashed_password: &str) -> Result<Option<User>>;
}

/// Repository for contacts; every query is scoped to an owner
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List contacts matching substring filters, with pagination
    async fn list(&self, filter: &ContactFilter, owner_id: i32) -> Result<Vec<Contact>>;

    async fn find_by_id(&self, contact_id: i32, owner_id: i32) -> Result<Option<Contact>>;

    async fn create(&self, draft: &ContactDraft, owner_id: i32) -> Result<Contact>;

    /// Overwrite writable fields; `None` when the contact does not exist
    async fn update(
        &self,
        contact_id: i32,
        draft: &ContactDraft,
        owner_id: i32,
    ) -> Result<Option<Contact>>;

    /// Delete and return the removed contact
    async fn remove(&self, contact_id: i32, owner_id: i32) -> Result<Option<Contact>>;

    /// Whether any contact already uses this email or phone number
    async fn exists_with_email_or_phone(&self, email: &str, phone_number: &str) -> Result<bool>;

    /// All of the owner's contacts that have a birth date
    async fn list_with_birth_date(&self, owner_id: i32) -> Result<Vec<Contact>>;
}

//! Native client trait for in-process access
//!
//! Other components use this trait to work with a user's address book
//! without going through HTTP.

use super::{
    error::ContactsError,
    model::{Contact, ContactDraft, ContactFilter, User},
};
use async_trait::async_trait;

/// Contacts service API for in-process callers
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// List the owner's contacts matching the filter
    async fn list_contacts(
        &self,
        filter: ContactFilter,
        owner: &User,
    ) -> Result<Vec<Contact>, ContactsError>;

    /// Get one contact
    async fn get_contact(&self, contact_id: i32, owner: &User) -> Result<Contact, ContactsError>;

    /// Create a contact
    async fn create_contact(
        &self,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError>;

    /// Replace all writable fields of a contact
    async fn update_contact(
        &self,
        contact_id: i32,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError>;

    /// Delete a contact, returning what was removed
    async fn remove_contact(&self, contact_id: i32, owner: &User)
        -> Result<Contact, ContactsError>;

    /// Contacts whose birthday falls within the next `days` days
    async fn upcoming_birthdays(&self, days: u32, owner: &User)
        -> Result<Vec<Contact>, ContactsError>;
}

//! Native client implementation - wraps the contact service for in-process calls

use crate::contract::{Contact, ContactDraft, ContactFilter, ContactsApi, ContactsError, User};
use crate::domain::ContactService;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<ContactService>,
}

impl NativeClient {
    pub fn new(service: Arc<ContactService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ContactsApi for NativeClient {
    async fn list_contacts(
        &self,
        filter: ContactFilter,
        owner: &User,
    ) -> Result<Vec<Contact>, ContactsError> {
        self.service.get_contacts(filter, owner).await
    }

    async fn get_contact(&self, contact_id: i32, owner: &User) -> Result<Contact, ContactsError> {
        self.service.get_contact(contact_id, owner).await
    }

    async fn create_contact(
        &self,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        self.service.create_contact(draft, owner).await
    }

    async fn update_contact(
        &self,
        contact_id: i32,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        self.service.update_contact(contact_id, draft, owner).await
    }

    async fn remove_contact(
        &self,
        contact_id: i32,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        self.service.remove_contact(contact_id, owner).await
    }

    async fn upcoming_birthdays(
        &self,
        days: u32,
        owner: &User,
    ) -> Result<Vec<Contact>, ContactsError> {
        self.service.get_upcoming_birthdays(days, owner).await
    }
}

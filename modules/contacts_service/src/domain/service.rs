//! Contact service - address book business rules

use crate::contract::{Contact, ContactDraft, ContactFilter, ContactsError, User};
use crate::domain::{birthdays, messages, validation};
use super::repository::ContactRepository;
use std::sync::Arc;

/// Domain service for a user's contacts
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// List the owner's contacts with substring filters
    pub async fn get_contacts(
        &self,
        filter: ContactFilter,
        owner: &User,
    ) -> Result<Vec<Contact>, ContactsError> {
        validation::validate_filter(&filter)?;
        self.repo
            .list(&filter, owner.id)
            .await
            .map_err(internal("list contacts"))
    }

    pub async fn get_contact(&self, contact_id: i32, owner: &User) -> Result<Contact, ContactsError> {
        self.repo
            .find_by_id(contact_id, owner.id)
            .await
            .map_err(internal("load contact"))?
            .ok_or_else(|| ContactsError::contact_not_found(contact_id))
    }

    /// Create a contact; email and phone number must be unused
    pub async fn create_contact(
        &self,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        validation::validate_contact(&draft)?;

        let taken = self
            .repo
            .exists_with_email_or_phone(&draft.email, &draft.phone_number)
            .await
            .map_err(internal("check contact uniqueness"))?;
        if taken {
            return Err(ContactsError::bad_request(messages::contact_exists(
                &draft.email,
                &draft.phone_number,
            )));
        }

        let contact = self
            .repo
            .create(&draft, owner.id)
            .await
            .map_err(internal("create contact"))?;
        tracing::info!(contact_id = contact.id, user_id = owner.id, "contact created");
        Ok(contact)
    }

    pub async fn update_contact(
        &self,
        contact_id: i32,
        draft: ContactDraft,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        validation::validate_contact(&draft)?;

        self.repo
            .update(contact_id, &draft, owner.id)
            .await
            .map_err(internal("update contact"))?
            .ok_or_else(|| ContactsError::contact_not_found(contact_id))
    }

    pub async fn remove_contact(
        &self,
        contact_id: i32,
        owner: &User,
    ) -> Result<Contact, ContactsError> {
        let removed = self
            .repo
            .remove(contact_id, owner.id)
            .await
            .map_err(internal("remove contact"))?
            .ok_or_else(|| ContactsError::contact_not_found(contact_id))?;
        tracing::info!(contact_id, user_id = owner.id, "contact removed");
        Ok(removed)
    }

    /// Contacts with a birthday in the next `days` days, soonest first
    pub async fn get_upcoming_birthdays(
        &self,
        days: u32,
        owner: &User,
    ) -> Result<Vec<Contact>, ContactsError> {
        self.upcoming_birthdays_from(days, owner, chrono::Local::now().date_naive())
            .await
    }

    pub async fn upcoming_birthdays_from(
        &self,
        days: u32,
        owner: &User,
        today: chrono::NaiveDate,
    ) -> Result<Vec<Contact>, ContactsError> {
        if days == 0 {
            return Err(ContactsError::validation("days must be at least 1"));
        }

        let contacts = self
            .repo
            .list_with_birth_date(owner.id)
            .await
            .map_err(internal("list birthdays"))?;
        Ok(birthdays::select_upcoming(contacts, today, days))
    }
}

/// Log a repository failure and hide it behind `Internal`
pub(crate) fn internal(action: &'static str) -> impl Fn(anyhow::Error) -> ContactsError {
    move |e| {
        tracing::error!(error = ?e, action, "repository failure");
        ContactsError::Internal
    }
}

//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use crate::contract::{Contact, ContactDraft, User, UserRole};
use super::entity;
use sea_orm::ActiveValue::{NotSet, Set};

// ===== User Conversions =====

impl From<entity::user::Model> for User {
    fn from(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            hashed_password: entity.hashed_password,
            avatar: entity.avatar,
            confirmed: entity.confirmed,
            role: entity.role.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "unknown role stored, treating as user");
                UserRole::User
            }),
            created_at: entity.created_at,
        }
    }
}

impl From<&crate::contract::NewUser> for entity::user::ActiveModel {
    fn from(model: &crate::contract::NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(model.username.clone()),
            email: Set(model.email.clone()),
            hashed_password: Set(model.hashed_password.clone()),
            created_at: Set(chrono::Utc::now()),
            avatar: Set(model.avatar.clone()),
            confirmed: Set(false),
            role: Set(model.role.as_str().to_string()),
        }
    }
}

// ===== Contact Conversions =====

impl From<entity::Model> for Contact {
    fn from(entity: entity::Model) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone_number: entity.phone_number,
            birth_date: entity.birth_date,
            info: entity.info,
            user_id: entity.user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Active model for a fresh contact row
pub fn new_contact(draft: &ContactDraft, owner_id: i32) -> entity::ActiveModel {
    let now = chrono::Utc::now();
    let mut active = entity::ActiveModel {
        id: NotSet,
        created_at: Set(now),
        user_id: Set(owner_id),
        ..Default::default()
    };
    apply_draft(&mut active, draft);
    active
}

/// Copy writable fields and bump `updated_at`
pub fn apply_draft(active: &mut entity::ActiveModel, draft: &ContactDraft) {
    active.first_name = Set(draft.first_name.clone());
    active.last_name = Set(draft.last_name.clone());
    active.email = Set(draft.email.clone());
    active.phone_number = Set(draft.phone_number.clone());
    active.birth_date = Set(draft.birth_date);
    active.info = Set(draft.info.clone());
    active.updated_at = Set(chrono::Utc::now());
}

//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract::{self, UserRole};
use crate::domain::Registration;

// ===== User conversions =====

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => RoleDto::User,
            UserRole::Admin => RoleDto::Admin,
        }
    }
}

impl From<RoleDto> for UserRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => UserRole::User,
            RoleDto::Admin => UserRole::Admin,
        }
    }
}

impl From<contract::User> for UserDto {
    fn from(user: contract::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            role: user.role.into(),
        }
    }
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role.into(),
        }
    }
}

// ===== Contact conversions =====

impl From<contract::Contact> for ContactDto {
    fn from(contact: contract::Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone_number: contact.phone_number,
            birth_date: contact.birth_date,
            info: contact.info,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

impl From<ContactRequest> for contract::ContactDraft {
    fn from(req: ContactRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            birth_date: req.birth_date,
            info: req.info,
        }
    }
}

impl From<ListContactsQuery> for contract::ContactFilter {
    fn from(query: ListContactsQuery) -> Self {
        Self {
            first_name: query.first_name,
            last_name: query.last_name,
            email: query.email,
            skip: query.skip,
            limit: query.limit,
        }
    }
}

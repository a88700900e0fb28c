//! Bearer-token authentication extractor

use super::error::{map_domain_error, Problem};
use super::state::AppState;
use crate::contract::{ContactsError, User};
use crate::domain::messages;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

/// The user owning the bearer token of the request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AppState>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppState extension missing from router");
                Problem::internal()
            })?;

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| map_domain_error(ContactsError::unauthorized(messages::UNAUTHORIZED)))?;

        let user = state
            .users
            .authenticate(token)
            .await
            .map_err(map_domain_error)?;
        Ok(Self(user))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

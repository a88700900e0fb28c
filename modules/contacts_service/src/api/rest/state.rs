//! Shared state handed to REST handlers through an `Extension`

use super::rate_limit::RateLimiter;
use crate::domain::{ContactService, UserService};
use std::sync::Arc;

pub struct AppState {
    pub contacts: Arc<ContactService>,
    pub users: Arc<UserService>,
    /// Budget for `GET /api/users/me`
    pub me_limiter: Arc<RateLimiter>,
}

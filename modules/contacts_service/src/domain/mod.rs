//! Domain layer - business logic and services

pub mod auth;
pub mod avatar;
pub mod birthdays;
pub mod messages;
pub mod notify;
pub mod repository;
pub mod service;
pub mod users;
pub mod validation;

pub use auth::{PasswordHasher, TokenService};
pub use avatar::AvatarStorage;
pub use notify::{NoOpNotifier, Notification, Notifier};
pub use repository::{ContactRepository, UserRepository};
pub use service::ContactService;
pub use users::{Registration, UserService};

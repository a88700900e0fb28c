//! User service - registration, login, email confirmation, password reset
//! and avatars

use crate::contract::{ContactsError, NewUser, User, UserRole};
use crate::domain::auth::{PasswordHasher, TokenService};
use crate::domain::avatar::{avatar_public_id, gravatar_url, AvatarStorage};
use crate::domain::notify::{dispatch, Notification, Notifier};
use crate::domain::service::internal;
use crate::domain::{messages, validation};
use super::repository::UserRepository;
use std::sync::Arc;

/// Registration request after transport decoding
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Domain service for accounts and authentication
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    notifier: Arc<dyn Notifier>,
    avatars: Arc<dyn AvatarStorage>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        notifier: Arc<dyn Notifier>,
        avatars: Arc<dyn AvatarStorage>,
    ) -> Self {
        Self {
            repo,
            tokens,
            hasher,
            notifier,
            avatars,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an unconfirmed account and email a confirmation link to it
    pub async fn register(
        &self,
        registration: Registration,
        base_url: &str,
    ) -> Result<User, ContactsError> {
        validation::validate_length("username", &registration.username, 1, 50)?;
        validation::validate_email("email", &registration.email)?;
        validation::validate_password(&registration.password)?;

        if self.find_by_email(&registration.email).await?.is_some() {
            return Err(ContactsError::Conflict {
                reason: messages::USER_EMAIL_ALREADY_EXISTS.to_string(),
            });
        }
        if self.find_by_username(&registration.username).await?.is_some() {
            return Err(ContactsError::Conflict {
                reason: messages::USER_NAME_ALREADY_EXISTS.to_string(),
            });
        }

        let new_user = NewUser {
            avatar: Some(gravatar_url(&registration.email)),
            hashed_password: self.hasher.hash(&registration.password).await?,
            username: registration.username,
            email: registration.email,
            role: registration.role,
        };
        let user = self
            .repo
            .create(&new_user)
            .await
            .map_err(internal("create user"))?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        self.send_confirmation(&user, base_url)?;
        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ContactsError> {
        let user = self.find_by_username(username).await?;
        let verified = match &user {
            Some(user) => self.hasher.verify(password, &user.hashed_password).await,
            None => false,
        };
        let Some(user) = user.filter(|_| verified) else {
            return Err(ContactsError::unauthorized(messages::INVALID_CREDENTIALS));
        };
        if !user.confirmed {
            return Err(ContactsError::unauthorized(messages::USER_NOT_CONFIRMED));
        }

        self.tokens.create_access_token(&user.username)
    }

    /// Resolve the user behind a bearer token
    pub async fn authenticate(&self, token: &str) -> Result<User, ContactsError> {
        let username = self.tokens.username_from_access_token(token)?;
        self.find_by_username(&username)
            .await?
            .ok_or_else(|| ContactsError::unauthorized(messages::UNAUTHORIZED))
    }

    pub fn require_admin(&self, user: &User) -> Result<(), ContactsError> {
        if user.is_admin() {
            Ok(())
        } else {
            Err(ContactsError::Forbidden {
                reason: messages::FORBIDDEN.to_string(),
            })
        }
    }

    /// Confirm the email carried by a confirmation token
    pub async fn confirm_email(&self, token: &str) -> Result<&'static str, ContactsError> {
        let email = self.tokens.email_from_token(token)?;
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ContactsError::bad_request(messages::VERIFICATION_ERROR))?;

        if user.confirmed {
            return Ok(messages::EMAIL_ALREADY_CONFIRMED);
        }
        self.repo
            .confirm_email(&email)
            .await
            .map_err(internal("confirm email"))?;
        tracing::info!(user_id = user.id, "email confirmed");
        Ok(messages::EMAIL_CONFIRMED)
    }

    /// Re-send the confirmation email
    pub async fn request_email(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<&'static str, ContactsError> {
        match self.find_by_email(email).await? {
            Some(user) if user.confirmed => Ok(messages::EMAIL_ALREADY_CONFIRMED),
            Some(user) => {
                self.send_confirmation(&user, base_url)?;
                Ok(messages::CHECK_YOUR_EMAIL)
            }
            None => Ok(messages::CHECK_YOUR_EMAIL),
        }
    }

    /// Email a link that, once opened, sets `new_password`
    pub async fn request_password_reset(
        &self,
        email: &str,
        new_password: &str,
        base_url: &str,
    ) -> Result<&'static str, ContactsError> {
        validation::validate_password(new_password)?;

        // Unknown addresses get the same answer as known ones
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(messages::CHECK_YOUR_EMAIL);
        };
        if !user.confirmed {
            return Err(ContactsError::bad_request(messages::EMAIL_NOT_CONFIRMED));
        }

        let hashed = self.hasher.hash(new_password).await?;
        let token = self.tokens.create_reset_token(&user.email, &hashed)?;
        dispatch(
            self.notifier.clone(),
            Notification::ResetPassword {
                to: user.email.clone(),
                username: user.username.clone(),
                reset_link: format!("{base_url}api/auth/confirm_reset_password/{token}"),
            },
        );
        Ok(messages::CHECK_YOUR_EMAIL)
    }

    /// Apply the password hash carried by a reset token
    pub async fn confirm_password_reset(&self, token: &str) -> Result<&'static str, ContactsError> {
        let (email, hashed) = self.tokens.reset_from_token(token)?;
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ContactsError::NotFound {
                resource: "user".to_string(),
                id: email.clone(),
                message: messages::USER_WITH_SUCH_EMAIL_NOT_FOUND.to_string(),
            })?;

        self.repo
            .update_password(user.id, &hashed)
            .await
            .map_err(internal("update password"))?;
        tracing::info!(user_id = user.id, "password reset");
        Ok(messages::PASSWORD_CHANGED)
    }

    /// Upload a new avatar image (admins only) and store its URL
    pub async fn update_avatar(
        &self,
        user: &User,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<User, ContactsError> {
        self.require_admin(user)?;
        if bytes.is_empty() {
            return Err(ContactsError::validation("file must not be empty"));
        }

        let url = self
            .avatars
            .upload(&avatar_public_id(&user.username), file_name, bytes)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, user_id = user.id, "avatar upload failed");
                ContactsError::Internal
            })?;

        self.repo
            .update_avatar(&user.email, &url)
            .await
            .map_err(internal("update avatar"))?
            .ok_or_else(|| ContactsError::unauthorized(messages::UNAUTHORIZED))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ContactsError> {
        self.repo
            .find_by_email(email)
            .await
            .map_err(internal("find user by email"))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ContactsError> {
        self.repo
            .find_by_username(username)
            .await
            .map_err(internal("find user by username"))
    }

    fn send_confirmation(&self, user: &User, base_url: &str) -> Result<(), ContactsError> {
        let token = self.tokens.create_email_token(&user.email)?;
        dispatch(
            self.notifier.clone(),
            Notification::ConfirmEmail {
                to: user.email.clone(),
                username: user.username.clone(),
                host: base_url.to_string(),
                token,
            },
        );
        Ok(())
    }
}

//! Contacts service module: wires storage, domain services and the REST API

use crate::api::native::NativeClient;
use crate::api::rest::{self, rate_limit::RateLimiter, AppState};
use crate::config::{AppConfig, DatabaseConfig};
use crate::contract::ContactsApi;
use crate::domain::{
    AvatarStorage, ContactService, NoOpNotifier, Notifier, PasswordHasher, TokenService,
    UserService,
};
use crate::infra::{
    avatar::CloudinaryStorage,
    mail::SmtpNotifier,
    storage::repositories::{SeaOrmContactRepository, SeaOrmUserRepository},
};
use crate::lifecycle::DatabaseMigrator;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

/// Contacts service module
pub struct ContactsServiceModule {
    config: AppConfig,
    db: Arc<DatabaseConnection>,
    contacts: Arc<ContactService>,
    users: Arc<UserService>,
}

impl ContactsServiceModule {
    /// Build the module with SMTP mail (when configured) and Cloudinary avatars
    pub fn init(config: AppConfig, db: DatabaseConnection) -> Result<Self> {
        let notifier: Arc<dyn Notifier> = if config.mail.is_configured() {
            Arc::new(SmtpNotifier::new(&config.mail)?)
        } else {
            tracing::warn!("mail.server is not set, outgoing mail will only be logged");
            Arc::new(NoOpNotifier)
        };
        let avatars = Arc::new(CloudinaryStorage::new(config.cloudinary.clone()));

        Self::with_integrations(config, db, notifier, avatars)
    }

    /// Build the module with explicit mail and avatar backends
    pub fn with_integrations(
        config: AppConfig,
        db: DatabaseConnection,
        notifier: Arc<dyn Notifier>,
        avatars: Arc<dyn AvatarStorage>,
    ) -> Result<Self> {
        let db = Arc::new(db);

        // Build repositories
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let contact_repo = Arc::new(SeaOrmContactRepository::new(db.clone()));

        // Build domain services
        let tokens = Arc::new(TokenService::from_config(&config.jwt)?);
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);
        let users = Arc::new(UserService::new(user_repo, tokens, hasher, notifier, avatars));
        let contacts = Arc::new(ContactService::new(contact_repo));

        tracing::info!("contacts service initialized");
        Ok(Self {
            config,
            db,
            contacts,
            users,
        })
    }

    /// Open the connection pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        Database::connect(options)
            .await
            .with_context(|| format!("failed to connect to database ({})", redact(&config.url)))
    }

    /// HTTP router with every route of the service
    pub fn router(&self) -> axum::Router {
        let state = Arc::new(AppState {
            contacts: self.contacts.clone(),
            users: self.users.clone(),
            me_limiter: Arc::new(RateLimiter::per_minute(
                self.config.server.me_rate_limit_per_minute,
            )),
        });
        tracing::info!("registering contacts service REST routes");
        rest::build_router(state, &self.config.server)
    }

    pub fn migrator(&self) -> DatabaseMigrator {
        DatabaseMigrator::new(self.db.clone())
    }

    /// In-process client for other components
    pub fn client(&self) -> Arc<dyn ContactsApi> {
        Arc::new(NativeClient::new(self.contacts.clone()))
    }

    pub fn users(&self) -> Arc<UserService> {
        self.users.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Hide the password of a connection URL
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let userinfo = &url[scheme_end + 3..at];
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{}{}:***{}", &url[..scheme_end + 3], user, &url[at..])
        }
        _ => url.to_string(),
    }
}

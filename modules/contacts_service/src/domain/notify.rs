//! Outgoing user notifications
//!
//! The domain decides *when* a user is emailed; delivery (SMTP, templates)
//! lives in `infra::mail`. Delivery failures are logged and never reach the
//! HTTP caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Notification kinds sent to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Ask the user to confirm their email address
    ConfirmEmail {
        to: String,
        username: String,
        /// Base URL of the API as seen by the client, with trailing slash
        host: String,
        token: String,
    },
    /// Deliver a password reset confirmation link
    ResetPassword {
        to: String,
        username: String,
        reset_link: String,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::ConfirmEmail { to, .. } | Notification::ResetPassword { to, .. } => to,
        }
    }
}

/// Delivery channel for notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Notifier that only logs; used when SMTP is not configured
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            recipient = notification.recipient(),
            "mail delivery disabled, notification dropped"
        );
        Ok(())
    }
}

/// Send in the background; the request does not wait for delivery
pub fn dispatch(notifier: std::sync::Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&notification).await {
            tracing::warn!(
                recipient = notification.recipient(),
                error = %e,
                "failed to deliver notification"
            );
        }
    });
}

//! SMTP delivery of user notifications

use crate::config::MailConfig;
use crate::domain::notify::{Notification, Notifier};
use anyhow::Context as _;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tera::{Context, Tera};

const VERIFY_EMAIL: &str = "verify_email.html";
const RESET_PASSWORD: &str = "reset_password.html";

/// Compile the bundled HTML templates
pub fn templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (VERIFY_EMAIL, include_str!("templates/verify_email.html")),
        (RESET_PASSWORD, include_str!("templates/reset_password.html")),
    ])
    .context("failed to compile mail templates")?;
    Ok(tera)
}

/// Subject and HTML body for a notification
pub fn render(templates: &Tera, notification: &Notification) -> anyhow::Result<(String, String)> {
    let mut ctx = Context::new();
    let (subject, template) = match notification {
        Notification::ConfirmEmail {
            username,
            host,
            token,
            ..
        } => {
            ctx.insert("username", username);
            ctx.insert("host", host);
            ctx.insert("token", token);
            ("Confirm your email", VERIFY_EMAIL)
        }
        Notification::ResetPassword {
            username,
            reset_link,
            ..
        } => {
            ctx.insert("username", username);
            ctx.insert("reset_link", reset_link);
            ("Important: Update your account information", RESET_PASSWORD)
        }
    };

    let body = templates
        .render(template, &ctx)
        .with_context(|| format!("failed to render {template}"))?;
    Ok((subject.to_string(), body))
}

/// Notifier that sends HTML mail over SMTP
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: Tera,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let mut builder = if config.ssl_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
                .with_context(|| format!("invalid SMTP host '{}'", config.server))?
        } else if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .with_context(|| format!("invalid SMTP host '{}'", config.server))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };

        builder = builder.port(config.port);
        if config.use_credentials {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from)
            .parse()
            .with_context(|| format!("invalid sender address '{}'", config.from))?;

        tracing::info!(server = %config.server, port = config.port, "SMTP notifier configured");
        Ok(Self {
            transport: builder.build(),
            from,
            templates: templates()?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        let (subject, body) = render(&self.templates, notification)?;
        let to: Mailbox = notification
            .recipient()
            .parse()
            .with_context(|| format!("invalid recipient '{}'", notification.recipient()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("failed to build message")?;

        self.transport.send(message).await.context("SMTP send failed")?;
        tracing::debug!(recipient = notification.recipient(), "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_mail_links_to_confirm_endpoint() {
        let tera = templates().unwrap();
        let (subject, body) = render(
            &tera,
            &Notification::ConfirmEmail {
                to: "deadpool@example.com".to_string(),
                username: "deadpool".to_string(),
                host: "http://localhost:8000/".to_string(),
                token: "abc.def.ghi".to_string(),
            },
        )
        .unwrap();

        assert_eq!(subject, "Confirm your email");
        assert!(body.contains("Hello deadpool"));
        assert!(body.contains("http://localhost:8000/api/auth/confirmed_email/abc.def.ghi"));
    }

    #[test]
    fn reset_mail_contains_link() {
        let tera = templates().unwrap();
        let (_, body) = render(
            &tera,
            &Notification::ResetPassword {
                to: "deadpool@example.com".to_string(),
                username: "deadpool".to_string(),
                reset_link: "http://localhost:8000/api/auth/confirm_reset_password/tok".to_string(),
            },
        )
        .unwrap();

        assert!(body.contains("confirm_reset_password/tok"));
    }

    #[test]
    fn usernames_are_escaped() {
        let tera = templates().unwrap();
        let (_, body) = render(
            &tera,
            &Notification::ResetPassword {
                to: "x@example.com".to_string(),
                username: "<script>".to_string(),
                reset_link: "http://h/".to_string(),
            },
        )
        .unwrap();

        assert!(!body.contains("<script>"));
    }
}

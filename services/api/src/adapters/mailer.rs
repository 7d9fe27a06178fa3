//! services/api/src/adapters/mailer.rs
//!
//! This module contains the SMTP adapter for the `NotificationService` port.
//! A missing mail configuration yields `UnconfiguredNotifier`, which fails every
//! relay with the reason instead of blocking startup.

use crate::config::{MailConfig, MailSettings};
use async_trait::async_trait;
use birthday_card_core::domain::Note;
use birthday_card_core::ports::{NotificationService, PortError, PortResult};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Picks the notifier the configuration allows.
pub fn notifier_from_config(mail: &MailConfig) -> Arc<dyn NotificationService> {
    match mail.settings() {
        Ok(settings) => match SmtpNotifier::new(&settings) {
            Ok(notifier) => {
                info!("Mail relay configured via {}:{}", settings.host, settings.port);
                Arc::new(notifier)
            }
            Err(e) => {
                warn!("Mail relay disabled: {}", e);
                Arc::new(UnconfiguredNotifier::new(e.to_string()))
            }
        },
        Err(reason) => {
            warn!("Mail relay disabled: {}", reason);
            Arc::new(UnconfiguredNotifier::new(reason))
        }
    }
}

//=========================================================================================
// SMTP Adapter
//=========================================================================================

/// An adapter that implements the `NotificationService` port over SMTP.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Creates a new `SmtpNotifier`. Implicit TLS when `secure`, STARTTLS otherwise.
    pub fn new(settings: &MailSettings) -> PortResult<Self> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| PortError::Unavailable(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(settings.user.clone(), settings.pass.clone()))
            .build();

        let from = parse_mailbox("EMAIL_FROM", &settings.from)?;
        let to = parse_mailbox("EMAIL_TO", &settings.to)?;
        Ok(Self { transport, from, to })
    }
}

fn parse_mailbox(var: &str, raw: &str) -> PortResult<Mailbox> {
    raw.parse::<Mailbox>()
        .map_err(|e| PortError::Unavailable(format!("Invalid {var} address '{raw}': {e}")))
}

#[async_trait]
impl NotificationService for SmtpNotifier {
    async fn notify_new_note(&self, note: &Note) -> PortResult<()> {
        let content = EmailContent::for_note(note);
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.transport.send(email).await.map_err(|e| {
            error!("Error sending mail for note {}: {}", note.id, e);
            PortError::Unavailable(e.to_string())
        })?;
        Ok(())
    }
}

//=========================================================================================
// Unconfigured Relay
//=========================================================================================

/// Stands in when mail settings are incomplete; every relay fails with `reason`.
#[derive(Debug, Clone)]
pub struct UnconfiguredNotifier {
    reason: String,
}

impl UnconfiguredNotifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl NotificationService for UnconfiguredNotifier {
    async fn notify_new_note(&self, _note: &Note) -> PortResult<()> {
        Err(PortError::Unavailable(self.reason.clone()))
    }
}

//=========================================================================================
// Message Content
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailContent {
    pub fn for_note(note: &Note) -> Self {
        let from = note.name.as_deref().unwrap_or("Anonymous");
        let when = note.created_at.format("%Y-%m-%d %H:%M UTC").to_string();
        let time = note.created_at.to_rfc3339();

        let subject = format!("New note from {from} - {when}");
        let text = [
            "You received a new note on your birthday site.".to_string(),
            String::new(),
            format!("From: {from}"),
            format!("Time: {time}"),
            String::new(),
            "Message:".to_string(),
            note.message.clone(),
            String::new(),
            "--".to_string(),
            "Sent by the birthday site.".to_string(),
        ]
        .join("\n");
        let html = format!(
            r#"<div style="font-family: Arial, Helvetica, sans-serif; color: #333;">
  <h2>New note from {name}</h2>
  <div style="font-size: 13px; color: #666;">{when}</div>
  <hr />
  <p style="white-space: pre-wrap; line-height: 1.4;">{message}</p>
  <hr />
  <p style="font-size:12px; color:#888;">This message was sent from your birthday site.</p>
</div>"#,
            name = escape_html(from),
            when = when,
            message = escape_html(&note.message),
        );
        Self {
            subject,
            text,
            html,
        }
    }
}

/// Escapes `&`, `<` and `>` for the HTML body.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(name: Option<&str>, message: &str) -> Note {
        Note {
            id: "1714564800000-abc1234".into(),
            name: name.map(Into::into),
            message: message.into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            email_sent: None,
            email_error: None,
            reply: None,
        }
    }

    #[test]
    fn html_body_is_escaped() {
        assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
        let content = EmailContent::for_note(&note(Some("<Sam>"), "1 < 2 & 3 > 2"));
        assert!(content.html.contains("1 &lt; 2 &amp; 3 &gt; 2"));
        assert!(content.html.contains("New note from &lt;Sam&gt;"));
        assert!(content.text.contains("1 < 2 & 3 > 2"));
    }

    #[test]
    fn anonymous_subject() {
        let content = EmailContent::for_note(&note(None, "hi"));
        assert_eq!(content.subject, "New note from Anonymous - 2024-05-01 12:00 UTC");
        assert!(content.text.contains("From: Anonymous"));
    }

    #[tokio::test]
    async fn unconfigured_relay_reports_the_reason() {
        let notifier = notifier_from_config(&MailConfig::default());
        let err = notifier.notify_new_note(&note(None, "hi")).await.unwrap_err();
        assert!(err.to_string().contains("Missing SMTP config"));
    }
}

use axum::async_trait;
use tracing::info;

/// Outbound mail message. Plain text only; rendering fancier templates is the
/// transport's concern, not ours.
#[derive(Debug, Clone)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn password_reset(to: &str, name: &str, reset_link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Reset your password".into(),
            body: format!(
                "Hi {name},\n\n\
                 A password reset was requested for your account. Open the link \
                 below within one hour to choose a new password:\n\n{reset_link}\n\n\
                 If you did not request this, you can ignore this message.\n"
            ),
        }
    }

    pub fn password_changed(to: &str, name: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Your password was changed".into(),
            body: format!(
                "Hi {name},\n\n\
                 The password for your account was just reset. All active \
                 sessions have been signed out. If this was not you, contact \
                 support immediately.\n"
            ),
        }
    }

    pub fn contact_notification(
        inbox: &str,
        sender_name: &str,
        sender_email: &str,
        subject: Option<&str>,
        message: &str,
    ) -> Self {
        Self {
            to: inbox.to_string(),
            subject: format!(
                "Contact form: {}",
                subject.unwrap_or("(no subject)")
            ),
            body: format!("From: {sender_name} <{sender_email}>\n\n{message}\n"),
        }
    }
}

/// Mail delivery seam. Handlers only ever see this trait; the SMTP transport
/// lives behind it and tests swap in fakes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

/// Development transport: writes the message to the log instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "mail (log transport)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_mail_carries_raw_link() {
        let mail = Mail::password_reset(
            "a@b.com",
            "Ada",
            "https://app.example/reset-password?token=abc123",
        );
        assert_eq!(mail.to, "a@b.com");
        assert!(mail.body.contains("token=abc123"));
        assert!(mail.body.contains("Ada"));
    }

    #[test]
    fn contact_notification_names_the_sender() {
        let mail =
            Mail::contact_notification("inbox@x.com", "Bob", "bob@x.com", None, "hello there");
        assert!(mail.subject.contains("(no subject)"));
        assert!(mail.body.contains("Bob <bob@x.com>"));
        assert!(mail.body.contains("hello there"));
    }

    #[tokio::test]
    async fn log_mailer_always_delivers() {
        let mail = Mail::password_changed("a@b.com", "Ada");
        assert!(LogMailer.send(mail).await.is_ok());
    }
}

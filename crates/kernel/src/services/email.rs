//! Email delivery using lettre/SMTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;

use crate::config::Config;
use crate::models::ValidationErrors;
use crate::routes::helpers::html_escape;

/// Subject line for contact form mail.
pub const INQUIRY_SUBJECT: &str = "New Bird Inquiry";

/// Outgoing mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

/// SMTP mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer.
    ///
    /// `encryption` selects the transport mode:
    /// - `"starttls"` (default): STARTTLS, usually port 587
    /// - `"tls"`: implicit TLS, usually port 465
    /// - `"none"`: unencrypted, local development only
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        smtp_username: Option<&str>,
        smtp_password: Option<&str>,
        encryption: &str,
        from_email: String,
    ) -> Result<Self> {
        let mut builder = match encryption {
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
                .context("failed to create SMTP relay transport")?
                .port(smtp_port),
            "none" => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host).port(smtp_port)
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
                .context("failed to create SMTP STARTTLS transport")?
                .port(smtp_port),
        };

        if let (Some(user), Some(pass)) = (smtp_username, smtp_password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from_email,
        })
    }

    /// Build from config; `None` when no SMTP host is set.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(None);
        };

        Self::new(
            host,
            config.smtp_port,
            config.smtp_username.as_deref(),
            config.smtp_password.as_deref(),
            &config.smtp_encryption,
            config.smtp_from_email.clone(),
        )
        .map(Some)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .context("invalid from email address")?,
            )
            .to(to.parse().context("invalid recipient email address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("failed to send email")?;

        Ok(())
    }
}

/// Contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInquiry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactInquiry {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(&self.name, "Name is Required");
        errors.require(&self.email, "Email is Required");
        errors.require(&self.message, "Message is Required");
        errors.finish(())
    }

    /// HTML body for the shop's inbox. Every value is escaped.
    pub fn to_html(&self) -> String {
        format!(
            "<p>You have a new inquiry</p>\n\
             <h3>Contact Details</h3>\n\
             <p><b>Name:</b> {}</p>\n\
             <p><b>Email:</b> {}</p>\n\
             <p><b>Phone:</b> {}</p>\n\
             <h3>Message</h3>\n\
             <p>{}</p>\n",
            html_escape(self.name.trim()),
            html_escape(self.email.trim()),
            html_escape(self.phone.trim()),
            html_escape(self.message.trim()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn smtp_mailer_supports_every_mode() {
        // Construction is lazy; no connection is attempted.
        for mode in ["starttls", "tls", "none"] {
            let mailer = SmtpMailer::new(
                "localhost",
                25,
                Some("user"),
                Some("pass"),
                mode,
                "shop@example.com".to_string(),
            );
            assert!(mailer.is_ok(), "mode {mode}");
        }
    }

    #[test]
    fn inquiry_html_escapes_input() {
        let inquiry = ContactInquiry {
            name: "<b>Eve</b>".to_string(),
            email: "eve@example.com".to_string(),
            phone: String::new(),
            message: "a & b <script>".to_string(),
        };
        let html = inquiry.to_html();
        assert!(html.contains("<p><b>Name:</b> &lt;b&gt;Eve&lt;/b&gt;</p>"));
        assert!(html.contains("a &amp; b &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn inquiry_requires_name_email_and_message() {
        let errors = ContactInquiry {
            phone: "555".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.messages().len(), 3);
    }
}

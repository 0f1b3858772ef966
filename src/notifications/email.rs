//! SMTP delivery and message rendering for ticket notifications.

use anyhow::Result;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::TicketNotice;
use crate::config::EmailConfig;

/// Outbound mail service backed by the configured SMTP account.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Check if email sending is configured and enabled
    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Send one message to one or more recipients, with HTML and plain
    /// text alternatives.
    pub async fn send(
        &self,
        to_addresses: &[String],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()> {
        let smtp_host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMTP host not configured"))?;
        let from_address = self
            .config
            .from_address
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("From address not configured"))?;

        let from: Mailbox = format!("{} <{}>", self.config.from_name, from_address).parse()?;

        let mut builder = Message::builder().from(from).subject(subject);
        for address in to_addresses {
            builder = builder.to(address.parse()?);
        }

        let message = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
        )?;

        let mailer = if self.config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer.build().send(message).await?;

        tracing::info!(
            recipients = to_addresses.len(),
            subject = %subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

/// HTML confirmation sent to the employee who raised the ticket.
pub fn render_confirmation_html(name: &str, notice: &TicketNotice) -> String {
    format!(
        r#"<h3>Your Ticket has been submitted successfully</h3>
<p>Hi {name},</p>
<p>Your ticket has been raised successfully. Below are the details:</p>
<p><strong>Ticket ID:</strong> {ticket_id}</p>
<p><strong>Asset Serial:</strong> {serial_no}</p>
<p><strong>Description:</strong> {description}</p>
<p><strong>Status:</strong> {status}</p>
<p>We will notify you when there are updates.</p>"#,
        name = html_escape(name),
        ticket_id = notice.ticket_id,
        serial_no = html_escape(&notice.serial_no),
        description = html_escape(&notice.description),
        status = html_escape(&notice.status),
    )
}

/// Plain text version of the confirmation.
pub fn render_confirmation_text(name: &str, notice: &TicketNotice) -> String {
    format!(
        r#"Your ticket has been submitted successfully.

Hi {name},

Ticket ID: {ticket_id}
Asset Serial: {serial_no}
Description: {description}
Status: {status}

We will notify you when there are updates."#,
        name = name,
        ticket_id = notice.ticket_id,
        serial_no = notice.serial_no,
        description = notice.description,
        status = notice.status,
    )
}

/// HTML alert sent to every admin.
pub fn render_admin_alert_html(raised_by: &str, contact: &str, notice: &TicketNotice) -> String {
    format!(
        r#"<h3>New Ticket Raised</h3>
<p><strong>Ticket ID:</strong> {ticket_id}</p>
<p><strong>Raised By:</strong> {raised_by} ({contact})</p>
<p><strong>Asset Serial:</strong> {serial_no}</p>
<p><strong>Description:</strong> {description}</p>
<p><strong>Status:</strong> {status}</p>"#,
        ticket_id = notice.ticket_id,
        raised_by = html_escape(raised_by),
        contact = html_escape(contact),
        serial_no = html_escape(&notice.serial_no),
        description = html_escape(&notice.description),
        status = html_escape(&notice.status),
    )
}

/// Plain text version of the admin alert.
pub fn render_admin_alert_text(raised_by: &str, contact: &str, notice: &TicketNotice) -> String {
    format!(
        r#"New Ticket Raised

Ticket ID: {ticket_id}
Raised By: {raised_by} ({contact})
Asset Serial: {serial_no}
Description: {description}
Status: {status}"#,
        ticket_id = notice.ticket_id,
        raised_by = raised_by,
        contact = contact,
        serial_no = notice.serial_no,
        description = notice.description,
        status = notice.status,
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notice() -> TicketNotice {
        TicketNotice {
            ticket_id: 42,
            emp_id: "E100".to_string(),
            serial_no: "SN-7781".to_string(),
            description: "Screen flickers on battery".to_string(),
            status: "Open".to_string(),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_render_confirmation() {
        let notice = sample_notice();
        let html = render_confirmation_html("jane", &notice);
        assert!(html.contains("Hi jane"));
        assert!(html.contains("42"));
        assert!(html.contains("SN-7781"));
        assert!(html.contains("Screen flickers on battery"));
        assert!(html.contains("Open"));

        let text = render_confirmation_text("jane", &notice);
        assert!(text.contains("jane"));
        assert!(text.contains("Ticket ID: 42"));
    }

    #[test]
    fn test_render_admin_alert() {
        let notice = sample_notice();
        let html = render_admin_alert_html("jane", "jane@example.com", &notice);
        assert!(html.contains("New Ticket Raised"));
        assert!(html.contains("jane (jane@example.com)"));
        assert!(html.contains("SN-7781"));

        let text = render_admin_alert_text("jane", "Unknown", &notice);
        assert!(text.contains("jane (Unknown)"));
    }

    #[test]
    fn test_description_is_escaped_in_html() {
        let mut notice = sample_notice();
        notice.description = "<img onerror=x>".to_string();
        let html = render_confirmation_html("jane", &notice);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_unconfigured_mailer_is_disabled() {
        let mailer = Mailer::new(EmailConfig::default());
        assert!(!mailer.is_enabled());
    }
}

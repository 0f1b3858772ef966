//! Best-effort ticket notifications.
//!
//! Fan-out happens after the ticket row is committed: a confirmation to the
//! employee who raised it and an alert to every admin. Nothing here may fail
//! the enclosing request: lookup and delivery failures are logged and
//! reported back only as a `false` delivery flag.

pub mod email;

pub use email::Mailer;

use crate::db::{queries, DbPool};

/// Details of a freshly created ticket, as rendered into the emails.
#[derive(Debug, Clone)]
pub struct TicketNotice {
    pub ticket_id: i64,
    pub emp_id: String,
    pub serial_no: String,
    pub description: String,
    pub status: String,
}

/// Returns whether every attempted delivery succeeded. Zero recipients
/// counts as delivered; an unconfigured mailer does not.
pub async fn notify_ticket_created(db: &DbPool, mailer: &Mailer, notice: &TicketNotice) -> bool {
    if !mailer.is_enabled() {
        tracing::warn!(
            ticket_id = notice.ticket_id,
            "email not configured, skipping ticket notifications"
        );
        return false;
    }

    // A dangling emp_id does not abort the fan-out.
    let contact = match queries::employee_contact(db, &notice.emp_id).await {
        Ok(contact) => contact,
        Err(err) => {
            tracing::warn!(error = %err, emp_id = %notice.emp_id, "employee lookup failed");
            None
        }
    };

    let mut delivered = true;

    if let Some((address, username)) = &contact {
        let subject = format!("Ticket Submitted (#{})", notice.ticket_id);
        let html = email::render_confirmation_html(username, notice);
        let text = email::render_confirmation_text(username, notice);
        if let Err(err) = mailer.send(&[address.clone()], &subject, &html, &text).await {
            tracing::warn!(error = %err, to = %address, "ticket confirmation email failed");
            delivered = false;
        }
    }

    let admin_addresses = match queries::admin_emails(db).await {
        Ok(addresses) => addresses,
        Err(err) => {
            tracing::warn!(error = %err, "admin lookup failed");
            Vec::new()
        }
    };

    if !admin_addresses.is_empty() {
        let raised_by = contact
            .as_ref()
            .map(|(_, username)| username.clone())
            .unwrap_or_else(|| notice.emp_id.clone());
        let contact_address = contact
            .as_ref()
            .map(|(address, _)| address.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let subject = format!("New Ticket Raised (#{})", notice.ticket_id);
        let html = email::render_admin_alert_html(&raised_by, &contact_address, notice);
        let text = email::render_admin_alert_text(&raised_by, &contact_address, notice);
        if let Err(err) = mailer.send(&admin_addresses, &subject, &html, &text).await {
            tracing::warn!(error = %err, "admin alert email failed");
            delivered = false;
        }
    }

    delivered
}

//! Gallery notification mails.
//!
//! [`Mailer`] is cheap to clone and never blocks the caller: every message is
//! sent from a spawned task and failures are only logged. Without SMTP
//! configuration it is a no-op.

use std::sync::Arc;

use galeria_core::{contact, newsletter};

use super::email::EmailDelivery;

#[derive(Clone, Default)]
pub struct Mailer {
    delivery: Option<Arc<EmailDelivery>>,
    /// Recipient of contact-form notifications (`ADMIN_NOTIFY_EMAIL`).
    admin_email: Option<String>,
}

impl Mailer {
    pub fn new(delivery: Option<EmailDelivery>, admin_email: Option<String>) -> Self {
        Self {
            delivery: delivery.map(Arc::new),
            admin_email,
        }
    }

    /// Mailer that drops every message.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.delivery.is_some()
    }

    /// Tell the gallery owner about a new contact-form message. Replies go
    /// straight to the sender.
    pub fn notify_contact_message(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
        subject: &str,
        message: &str,
    ) {
        let Some(to) = self.admin_email.clone() else {
            tracing::debug!("ADMIN_NOTIFY_EMAIL not set, skipping contact notification");
            return;
        };
        let body = format!(
            "Nombre: {name}\nEmail: {email}\nTeléfono: {}\nAsunto: {subject}\n\n{message}",
            phone.unwrap_or("-")
        );
        self.dispatch(
            to,
            contact::notification_subject(subject),
            body,
            Some(email.to_string()),
        );
    }

    /// Welcome a new (or returning) newsletter subscriber.
    pub fn send_newsletter_welcome(&self, email: &str, name: Option<&str>) {
        let (subject, body) = newsletter::welcome_message(name);
        self.dispatch(email.to_string(), subject, body, None);
    }

    fn dispatch(&self, to: String, subject: String, body: String, reply_to: Option<String>) {
        let Some(delivery) = self.delivery.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = delivery
                .send(&to, &subject, body, reply_to.as_deref())
                .await
            {
                tracing::warn!(error = %e, to = %to, subject = %subject, "Email delivery failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_mailer_ignores_messages() {
        let mailer = Mailer::disabled();
        assert!(!mailer.is_enabled());
        // No runtime needed: nothing is spawned when disabled.
        mailer.send_newsletter_welcome("ana@example.com", Some("Ana"));
        mailer.notify_contact_message("Ana", "ana@example.com", None, "info", "Hola");
    }
}

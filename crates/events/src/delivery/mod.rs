//! Outbound e-mail: the SMTP transport and the gallery's notification mails.

pub mod email;
pub mod mailer;

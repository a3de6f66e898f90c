//! Public contact-form messages.

pub const SUBJECT_COMPRA: &str = "compra";
pub const SUBJECT_INFO: &str = "info";
pub const SUBJECT_EXPOSICION: &str = "exposicion";
pub const SUBJECT_ENCARGO: &str = "encargo";
pub const SUBJECT_OTRO: &str = "otro";

pub const VALID_SUBJECTS: &[&str] = &[
    SUBJECT_COMPRA,
    SUBJECT_INFO,
    SUBJECT_EXPOSICION,
    SUBJECT_ENCARGO,
    SUBJECT_OTRO,
];

pub const STATUS_NEW: &str = "new";
pub const STATUS_READ: &str = "read";
pub const STATUS_REPLIED: &str = "replied";
pub const STATUS_ARCHIVED: &str = "archived";

pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_READ, STATUS_REPLIED, STATUS_ARCHIVED];

/// Subject line of the admin notification e-mail.
pub fn notification_subject(subject: &str) -> String {
    format!("Nuevo mensaje de contacto: {subject}")
}

pub fn validate_subject(subject: &str) -> Result<(), String> {
    crate::validation::validate_choice("subject", subject, VALID_SUBJECTS)
}

pub fn validate_status(status: &str) -> Result<(), String> {
    crate::validation::validate_choice("status", status, VALID_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects() {
        assert!(validate_subject("encargo").is_ok());
        assert!(validate_subject("spam").is_err());
    }

    #[test]
    fn statuses() {
        assert!(validate_status("replied").is_ok());
        assert!(validate_status("deleted").is_err());
    }

    #[test]
    fn notification_subject_line() {
        assert_eq!(notification_subject("compra"), "Nuevo mensaje de contacto: compra");
    }
}

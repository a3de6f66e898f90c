//! Small validators shared across resources.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Check that `value` is one of `allowed`, producing the standard message.
pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

/// Validate an optional choice; `None` is always accepted.
pub fn validate_optional_choice(
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<(), String> {
    match value {
        Some(v) => validate_choice(field, v, allowed),
        None => Ok(()),
    }
}

/// Loose e-mail shape check (`local@domain.tld`, no whitespace).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate an e-mail address, returning a message on failure.
pub fn validate_email(email: &str) -> Result<(), String> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(format!("Invalid email address '{email}'"))
    }
}

/// Require a non-blank string no longer than `max` characters.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} cannot exceed {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_choice ----------------------------------------------------

    #[test]
    fn choice_accepts_listed_value() {
        assert!(validate_choice("status", "new", &["new", "read"]).is_ok());
    }

    #[test]
    fn choice_rejects_unlisted_value() {
        let err = validate_choice("status", "gone", &["new", "read"]).unwrap_err();
        assert_eq!(err, "Invalid status 'gone'. Must be one of: new, read");
    }

    #[test]
    fn optional_choice_accepts_none() {
        assert!(validate_optional_choice("status", None, &["new"]).is_ok());
        assert!(validate_optional_choice("status", Some("x"), &["new"]).is_err());
    }

    // -- is_valid_email -----------------------------------------------------

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.com.ar"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email(""));
    }

    // -- validate_required_text ---------------------------------------------

    #[test]
    fn required_text_rules() {
        assert!(validate_required_text("title", "Hola", 200).is_ok());
        assert_eq!(
            validate_required_text("title", "   ", 200).unwrap_err(),
            "title is required"
        );
        assert!(validate_required_text("title", &"x".repeat(201), 200).is_err());
        assert!(validate_required_text("title", &"ñ".repeat(200), 200).is_ok());
    }
}

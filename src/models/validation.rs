//! Shared form constraints used by the `validator` derives on input types.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Absolute http(s) URL pointing at an image file.
pub static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://.+\.(jpg|jpeg|png|gif|bmp|webp|tiff|svg)$")
        .expect("static regex")
});

/// `#abc` / `#aabbcc` with the hash optional.
pub static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([a-fA-F0-9]{6}|[a-fA-F0-9]{3})$").expect("static regex"));

/// E.164-ish phone number.
pub static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("static regex"));

const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Reject lists that contain the same entry twice.
pub fn unique_entries(values: &Vec<String>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if values.iter().all(|v| seen.insert(v.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_entries").with_message("entries must be unique".into()))
    }
}

/// Reject strings that are only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}

/// At least 8 characters drawn from letters, digits and `@$!%*?&`, containing at least
/// one of each class.
pub fn strong_password(value: &str) -> Result<(), ValidationError> {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let strong = value.chars().count() >= 8
        && allowed
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if strong {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password").with_message(
            "password needs 8+ characters with upper, lower, digit and one of @$!%*?&".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_pattern() {
        assert!(IMAGE_URL.is_match("https://cdn.example.com/a/b.PNG"));
        assert!(!IMAGE_URL.is_match("https://cdn.example.com/a/b.pdf"));
        assert!(!IMAGE_URL.is_match("ftp://cdn.example.com/a.png"));
    }

    #[test]
    fn duplicate_tags_rejected() {
        let tags = vec!["rust".to_string(), "axum".to_string(), "rust".to_string()];
        assert!(unique_entries(&tags).is_err());
        assert!(unique_entries(&vec!["a".to_string(), "b".to_string()]).is_ok());
    }

    #[test]
    fn password_strength() {
        assert!(strong_password("Sup3r$ecret").is_ok());
        assert!(strong_password("short1!A").is_ok());
        assert!(strong_password("alllowercase1!").is_err());
        assert!(strong_password("NoDigits!!").is_err());
        assert!(strong_password("N0Symbols").is_err());
        assert!(strong_password("Sp ace1!A").is_err());
    }
}

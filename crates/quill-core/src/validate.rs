//! Field-level validation.
//!
//! Validation failures carry the offending field so the edge can surface
//! per-field detail; nothing is written when any field fails.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::domain::{PostFields, ProfileFields};

/// A single rejected field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// URL-safe identifier charset: latin letters, digits, hyphen, underscore.
pub fn is_url_safe(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    }
}

fn bounded(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

pub fn post_fields(fields: &PostFields, config: &SiteConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require(&mut errors, "title", &fields.title);
    bounded(
        &mut errors,
        "title",
        &fields.title,
        config.charfield_max_length,
    );
    require(&mut errors, "text", &fields.text);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn comment_text(text: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require(&mut errors, "text", text);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn profile_fields(fields: &ProfileFields, config: &SiteConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if !fields.email.contains('@') {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
    bounded(
        &mut errors,
        "first_name",
        &fields.first_name,
        config.charfield_max_length,
    );
    bounded(
        &mut errors,
        "last_name",
        &fields.last_name,
        config.charfield_max_length,
    );
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn username(name: &str, config: &SiteConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if !is_url_safe(name) {
        errors.push(FieldError::new(
            "username",
            "only latin letters, digits, hyphen and underscore are allowed",
        ));
    }
    bounded(&mut errors, "username", name, config.charfield_max_length);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fields(title: &str, text: &str) -> PostFields {
        PostFields {
            title: title.to_owned(),
            text: text.to_owned(),
            pub_date: Utc::now(),
            is_published: true,
            category_id: None,
            location_id: None,
            image: None,
        }
    }

    #[test]
    fn rejects_blank_title_and_text() {
        let errs = post_fields(&fields("  ", ""), &SiteConfig::default()).unwrap_err();
        let rejected: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert_eq!(rejected, vec!["title", "text"]);
    }

    #[test]
    fn rejects_overlong_title() {
        let config = SiteConfig {
            charfield_max_length: 8,
            ..SiteConfig::default()
        };
        assert!(post_fields(&fields("short", "body"), &config).is_ok());
        assert!(post_fields(&fields("way too long title", "body"), &config).is_err());
    }

    #[test]
    fn url_safe_charset() {
        assert!(is_url_safe("summer-2024_trip"));
        assert!(!is_url_safe("летний"));
        assert!(!is_url_safe("with space"));
        assert!(!is_url_safe(""));
    }
}

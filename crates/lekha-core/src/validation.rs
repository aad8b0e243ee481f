//! Per-field validation errors and the rule helpers used by the command layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::DomainError;
use crate::slug::is_valid_slug;

/// Maximum accepted upload size for images (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image MIME types accepted by the upload endpoint.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Validation messages keyed by field name, rendered as `{field: [messages]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

pub fn required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {} field is required.", label(field)));
    }
}

pub fn max_chars(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {max} characters.",
                label(field)
            ),
        );
    }
}

pub fn optional_max_chars(errors: &mut FieldErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        max_chars(errors, field, value, max);
    }
}

pub fn min_chars(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(
            field,
            format!("The {} field must be at least {min} characters.", label(field)),
        );
    }
}

/// Explicit slugs must already be in slug form; blank means "derive it".
pub fn slug_format(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    max_chars(errors, field, value, 255);
    if !is_valid_slug(value) {
        errors.add(
            field,
            "The slug may only contain lowercase letters, numbers and hyphens.",
        );
    }
}

/// Upload checks: presence, MIME allow-list and the 5 MiB cap.
pub fn image_upload(content_type: Option<&str>, len: usize) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match content_type {
        Some(ct) if ALLOWED_IMAGE_TYPES.contains(&ct) => {}
        _ => errors.add("image", "The image field must be an image."),
    }
    if len == 0 {
        errors.add("image", "The image field is required.");
    } else if len > MAX_IMAGE_BYTES {
        errors.add(
            "image",
            "The image field must not be greater than 5120 kilobytes.",
        );
    }
    errors
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

//! URL slugs for posts and categories.

/// Derive a slug from a human-readable title or name.
///
/// Non-ASCII text (Bangla included) is transliterated before slugging, so the
/// result may be empty only for input without any letters or digits.
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Lowercase ASCII letters, digits and single inner hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 255 {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

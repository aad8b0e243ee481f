//! Data Transfer Objects - request/response types for the server.

use serde::{Deserialize, Deserializer, Serialize};

/// Request to sign in. Accepted as JSON or as an urlencoded form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub remember: bool,
}

/// Post create/update body. Every field is optional on the wire so that
/// missing values surface as field errors, not as a rejected body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub category_id: String,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_score: Option<i64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_published: bool,
    pub published_at: Option<String>,
}

/// Category create/update body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_active: bool,
    pub order: i64,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            description: None,
            is_active: true,
            order: 0,
        }
    }
}

/// Query string of the public listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Query string of the admin listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoGenerateRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// The signed-in admin, as exposed to page props.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Accept `true`/`false`, `1`/`0` and the HTML checkbox values `"on"`,
/// `"true"`, `"1"`, `"yes"`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match BoolLike::deserialize(deserializer)? {
        BoolLike::Bool(b) => b,
        BoolLike::Int(n) => n != 0,
        BoolLike::Text(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
    })
}

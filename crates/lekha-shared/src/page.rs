//! Page envelope for server-driven rendering: `{component, props, url}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rendered page. Sent as JSON to client navigations, embedded in the
/// HTML shell on first load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    pub props: Value,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One-shot messages carried across a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Search-engine metadata for public article pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub image: Option<String>,
    pub canonical: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub published_time: Option<String>,
    pub section: Option<String>,
    pub author: String,
}

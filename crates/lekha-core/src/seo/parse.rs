use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::SeoSuggestion;

const DEFAULT_SCORE: i64 = 70;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*").expect("fence pattern is valid"));
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*").expect("fence pattern is valid"));

/// Remove markdown code-fence markers the model sometimes wraps JSON in.
pub fn strip_code_fences(text: &str) -> String {
    let text = JSON_FENCE.replace_all(text, "");
    FENCE.replace_all(&text, "").trim().to_string()
}

/// Parse the model's text into a clamped suggestion bundle.
///
/// Returns `None` unless the text is a JSON object. Missing fields default:
/// meta title to `title`, score to 70, everything else to empty.
pub fn parse_suggestion(text: &str, title: &str) -> Option<SeoSuggestion> {
    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(&cleaned).ok()?;
    let obj = value.as_object()?;

    let string = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let strings = |key: &str| -> Vec<String> {
        obj.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    Some(
        SeoSuggestion {
            success: true,
            meta_title: string("meta_title").unwrap_or_else(|| title.to_string()),
            meta_description: string("meta_description").unwrap_or_default(),
            focus_keyword: string("focus_keyword").unwrap_or_default(),
            keywords: strings("keywords"),
            excerpt: string("excerpt").unwrap_or_default(),
            seo_score: score(obj.get("seo_score")),
            tips: strings("tips"),
        }
        .clamped(),
    )
}

fn score(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(DEFAULT_SCORE),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(DEFAULT_SCORE),
        _ => DEFAULT_SCORE,
    };
    raw.clamp(0, 100) as u8
}

use super::CONTENT_PREVIEW_CHARS;
use crate::text::{strip_tags, truncate_chars};

/// Prompt asking the model for a JSON suggestion bundle about one post.
pub fn build_prompt(title: &str, content: &str) -> String {
    let preview = truncate_chars(&strip_tags(content), CONTENT_PREVIEW_CHARS);

    format!(
        r#"You are an expert SEO specialist. Analyze the following blog post and generate optimized SEO content.

**Title:** {title}

**Content Preview:**
{preview}

Generate the following in JSON format (respond ONLY with valid JSON, no markdown code blocks):
{{
    "meta_title": "SEO-optimized title (max 60 chars, include primary keyword)",
    "meta_description": "Compelling meta description (max 155 chars, include keyword, call-to-action)",
    "focus_keyword": "Primary focus keyword (2-4 words)",
    "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
    "excerpt": "Engaging 2-sentence summary for blog cards (max 200 chars)",
    "seo_score": 85,
    "tips": ["tip1", "tip2", "tip3"]
}}

Rules:
- meta_title must be under 60 characters
- meta_description must be under 155 characters
- keywords should be 5 relevant terms
- seo_score is 0-100 based on content quality
- tips are improvement suggestions
- Support both English and Bangla content"#
    )
}

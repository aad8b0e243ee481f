//! Page rendering: the `{component, props, url}` envelope as JSON for
//! client-side navigations, or embedded in the HTML shell on first load.

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::{Map, Value, json};

use lekha_shared::{Page, SeoMeta};

use crate::middleware::auth::current_session;
use crate::state::AppState;

pub const INERTIA_HEADER: &str = "X-Inertia";

/// One-shot success message carried across a redirect.
pub const FLASH_COOKIE: &str = "lekha_flash";

/// Whether the request is a client-side page visit expecting JSON.
pub fn is_inertia(req: &HttpRequest) -> bool {
    req.headers()
        .get(INERTIA_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Render `component` with `props` plus the shared props (app, auth, flash).
pub fn render(req: &HttpRequest, state: &AppState, component: &str, props: Value) -> HttpResponse {
    let flash = req.cookie(FLASH_COOKIE).map(|c| c.value().to_string());

    let mut merged = match props {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    for (key, value) in shared_props(req, state, flash.clone()) {
        merged.entry(key).or_insert(value);
    }

    let page = Page {
        component: component.to_string(),
        props: Value::Object(merged),
        url: req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.path().to_string()),
        version: None,
    };

    let mut builder = HttpResponse::Ok();
    if flash.is_some() {
        let mut spent = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        spent.make_removal();
        builder.cookie(spent);
    }

    if is_inertia(req) {
        builder
            .insert_header((INERTIA_HEADER, "true"))
            .insert_header((header::VARY, INERTIA_HEADER))
            .json(page)
    } else {
        builder
            .insert_header((header::VARY, INERTIA_HEADER))
            .content_type("text/html; charset=utf-8")
            .body(html_shell(&page, &state.site.name))
    }
}

fn shared_props(req: &HttpRequest, state: &AppState, flash: Option<String>) -> Map<String, Value> {
    let user = current_session(req)
        .ok()
        .map(|s| json!({ "id": s.user_id, "email": s.email }));

    let mut shared = Map::new();
    shared.insert(
        "app".to_string(),
        json!({ "name": state.site.name, "url": state.site.url }),
    );
    shared.insert("auth".to_string(), json!({ "user": user }));
    shared.insert("flash".to_string(), json!({ "success": flash }));
    shared
}

/// 303 to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 303 to `location`, showing `message` on the next rendered page.
pub fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
    let cookie = Cookie::build(FLASH_COOKIE, message.to_string())
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .append_header((header::SET_COOKIE, cookie.encoded().to_string()))
        .finish()
}

fn html_shell(page: &Page, app_name: &str) -> String {
    let seo = page
        .props
        .get("seo")
        .and_then(|v| serde_json::from_value::<SeoMeta>(v.clone()).ok());

    let title = match &seo {
        Some(meta) => format!("{} - {}", meta.title, app_name),
        None => app_name.to_string(),
    };
    let head = seo
        .as_ref()
        .map(|meta| seo_tags(meta, app_name))
        .unwrap_or_default();
    let data_page = serde_json::to_string(page).unwrap_or_else(|_| "{}".to_string());

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n",
            "{head}",
            "<script type=\"module\" src=\"/build/app.js\" defer></script>\n",
            "</head>\n",
            "<body>\n",
            "<div id=\"app\" data-page=\"{data_page}\"></div>\n",
            "</body>\n",
            "</html>\n"
        ),
        title = escape_html(&title),
        head = head,
        data_page = escape_html(&data_page),
    )
}

/// Description, keywords, canonical, Open Graph, Twitter and article tags,
/// followed by `BlogPosting` structured data.
fn seo_tags(meta: &SeoMeta, app_name: &str) -> String {
    let mut tags = Vec::new();
    let mut name = |key: &str, value: &str| {
        tags.push(format!(
            "<meta name=\"{key}\" content=\"{}\">",
            escape_html(value)
        ))
    };
    name("description", &meta.description);
    if !meta.keywords.is_empty() {
        name("keywords", &meta.keywords.join(", "));
    }
    name("twitter:card", "summary_large_image");
    name("twitter:title", &meta.title);
    name("twitter:description", &meta.description);
    if let Some(image) = &meta.image {
        name("twitter:image", image);
    }

    let mut property = |key: &str, value: &str| {
        tags.push(format!(
            "<meta property=\"{key}\" content=\"{}\">",
            escape_html(value)
        ))
    };
    property("og:type", &meta.kind);
    property("og:title", &meta.title);
    property("og:description", &meta.description);
    property("og:url", &meta.url);
    property("og:site_name", app_name);
    if let Some(image) = &meta.image {
        property("og:image", image);
    }
    if let Some(published) = &meta.published_time {
        property("article:published_time", published);
    }
    if let Some(section) = &meta.section {
        property("article:section", section);
    }
    property("article:author", &meta.author);

    tags.push(format!(
        "<link rel=\"canonical\" href=\"{}\">",
        escape_html(&meta.canonical)
    ));

    let structured = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": meta.title,
        "description": meta.description,
        "image": meta.image,
        "url": meta.url,
        "datePublished": meta.published_time,
        "keywords": meta.keywords.join(", "),
        "articleSection": meta.section,
        "author": { "@type": "Person", "name": meta.author },
        "publisher": { "@type": "Organization", "name": app_name },
        "mainEntityOfPage": { "@type": "WebPage", "@id": meta.canonical },
    });
    let structured = serde_json::to_string(&structured)
        .unwrap_or_default()
        .replace("</", "<\\/");
    tags.push(format!(
        "<script type=\"application/ld+json\">{structured}</script>"
    ));

    let mut head = tags.join("\n");
    head.push('\n');
    head
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

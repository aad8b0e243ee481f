//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lekha_infra::database::DatabaseConfig;
use lekha_infra::{GeminiConfig, JwtConfig, RateLimitConfig};

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub site: SiteConfig,
    /// `None` runs on the in-memory repositories.
    pub database: Option<DatabaseConfig>,
    pub session: SessionConfig,
    pub seo: SeoConfig,
    pub upload: UploadConfig,
    pub admin: Option<AdminSeed>,
    /// Login attempts per minute per client address.
    pub login_rate_limit: u32,
    pub telemetry: TelemetryConfig,
}

/// Public identity of the site, used in page props and SEO tags.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
}

impl SiteConfig {
    /// Absolute URL for a site path.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn is_https(&self) -> bool {
        self.url.starts_with("https://")
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SeoConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

/// Admin account created at startup when no user has this email.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = JwtConfig::default();
        let gemini = GeminiConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            site: SiteConfig {
                name: "Lekha".to_string(),
                url: "http://localhost:8080".to_string(),
            },
            database: None,
            session: SessionConfig {
                secret: session.secret,
                ttl_hours: session.session_ttl_hours,
            },
            seo: SeoConfig {
                api_key: None,
                model: gemini.model,
                base_url: gemini.base_url,
            },
            upload: UploadConfig {
                dir: PathBuf::from("./storage"),
            },
            admin: None,
            login_rate_limit: 5,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
            });

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            site: SiteConfig {
                name: env::var("APP_NAME").unwrap_or(defaults.site.name),
                url: env::var("APP_URL").unwrap_or(defaults.site.url),
            },
            database,
            session: SessionConfig {
                secret: env::var("SESSION_SECRET").unwrap_or(defaults.session.secret),
                ttl_hours: parse_var("SESSION_TTL_HOURS").unwrap_or(defaults.session.ttl_hours),
            },
            seo: SeoConfig {
                api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.seo.model),
                base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.seo.base_url),
            },
            upload: UploadConfig {
                dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload.dir),
            },
            admin,
            login_rate_limit: parse_var("LOGIN_RATE_LIMIT").unwrap_or(defaults.login_rate_limit),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.session.secret.clone(),
            session_ttl_hours: self.session.ttl_hours,
            ..JwtConfig::default()
        }
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.seo.api_key.clone(),
            model: self.seo.model.clone(),
            base_url: self.seo.base_url.clone(),
            ..GeminiConfig::default()
        }
    }

    pub fn login_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.login_rate_limit,
            window: Duration::from_secs(60),
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_joins_site_url() {
        let site = SiteConfig {
            name: "Lekha".to_string(),
            url: "https://blog.example.com/".to_string(),
        };

        assert_eq!(site.absolute("/blog/hello"), "https://blog.example.com/blog/hello");
        assert_eq!(site.absolute("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert!(site.is_https());
    }

    #[test]
    fn defaults_run_without_database() {
        let config = AppConfig::default();

        assert!(config.database.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.login_limit().max_requests, 5);
        assert_eq!(config.jwt().issuer, "lekha");
        assert!(config.gemini().api_key.is_none());
    }
}

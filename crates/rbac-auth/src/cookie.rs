//! Access token cookie

use rbac_core::config::{AuthConfig, SameSite};

/// Attributes of the cookie carrying the access token
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "access_token".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::None,
            max_age: 30 * 60,
        }
    }
}

impl CookieConfig {
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self {
            name: auth.cookie_name.clone(),
            secure: auth.cookie_secure,
            same_site: auth.cookie_same_site,
            max_age: auth.token_expiration_minutes * 60,
            ..Default::default()
        }
    }

    /// Plain-HTTP configuration for local development and tests
    pub fn development() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
            ..Default::default()
        }
    }

    /// `Set-Cookie` value carrying `token`
    pub fn build_cookie(&self, token: &str) -> String {
        self.render(token, self.max_age)
    }

    /// `Set-Cookie` value that removes the cookie
    pub fn build_clear_cookie(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: i64) -> String {
        let mut parts = vec![format!("{}={}", self.name, value)];
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        parts.push(format!("Path={}", self.path));
        parts.push(format!("Max-Age={}", max_age));
        parts.join("; ")
    }
}

/// Extract a cookie value from a `Cookie` header
pub fn extract_cookie(cookie_header: &str, cookie_name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console server configuration.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use estate_core::guard::DEFAULT_LOGIN_PATH;

use crate::signing::ephemeral_secret;

// =============================================================================
// ApiConfig
// =============================================================================

/// Console server settings. Durations accept humantime strings (`"750ms"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Where unauthenticated page requests are sent.
    pub login_path: String,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Session cookie attributes.
    pub cookies: CookieConfig,
    /// Upper bound for a whole request, enforced by a tower layer.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How long a page waits for the menu before rendering without it.
    #[serde(with = "humantime_serde")]
    pub menu_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            cors: CorsConfig::default(),
            cookies: CookieConfig::default(),
            request_timeout: Duration::from_secs(30),
            menu_timeout: Duration::from_millis(3000),
        }
    }
}

impl ApiConfig {
    /// `host:port`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Redirect target for requests without a session.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Shorter waits make pages render sooner when the backend is slow.
    pub fn with_menu_timeout(mut self, timeout: Duration) -> Self {
        self.menu_timeout = timeout;
        self
    }
}

// =============================================================================
// CorsConfig
// =============================================================================

/// Cross-origin policy for the JSON endpoints. `"*"` in a list allows any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API.
    pub allowed_origins: Vec<String>,
    /// Methods allowed cross-origin.
    pub allowed_methods: Vec<String>,
    /// Request headers allowed cross-origin.
    pub allowed_headers: Vec<String>,
    /// Whether cookies travel cross-origin. Not combinable with `"*"` origins.
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["*".to_string()],
            allow_credentials: false,
            max_age: 3600,
        }
    }
}

// =============================================================================
// CookieConfig
// =============================================================================

/// Attributes applied to every session cookie the server sets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Adds the `Secure` attribute.
    pub secure: bool,
    /// `Max-Age` in seconds; `None` makes browser-session cookies.
    pub max_age_secs: Option<u64>,
    /// `SameSite` attribute value.
    pub same_site: SameSitePolicy,
    /// HMAC secret for the identity cookie. Defaults to a per-process
    /// random secret.
    #[serde(skip_serializing)]
    pub secret: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_secs: Some(400 * 24 * 60 * 60),
            same_site: SameSitePolicy::Lax,
            secret: ephemeral_secret().to_string(),
        }
    }
}

impl fmt::Debug for CookieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieConfig")
            .field("secure", &self.secure)
            .field("max_age_secs", &self.max_age_secs)
            .field("same_site", &self.same_site)
            .field("secret", &"***")
            .finish()
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// Same-site requests only.
    Strict,
    /// Also top-level navigations.
    #[default]
    Lax,
    /// Only honoured by browsers together with `Secure`.
    None,
}

impl SameSitePolicy {
    /// Attribute value as written in `Set-Cookie`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::None => "None",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.menu_timeout, Duration::from_secs(3));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cookies.same_site.as_str(), "Lax");
    }

    #[test]
    fn test_cookie_secret_is_redacted() {
        let config = CookieConfig {
            secret: "do-not-print-me".to_string(),
            ..CookieConfig::default()
        };
        assert!(!format!("{:?}", config).contains("do-not-print-me"));
        assert!(!serde_json::to_string(&config).unwrap().contains("do-not-print-me"));
    }

    #[test]
    fn test_humantime_durations() {
        let config: ApiConfig = serde_json::from_str(
            r#"{"request_timeout":"10s","menu_timeout":"750ms","cookies":{"secure":true}}"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.menu_timeout, Duration::from_millis(750));
        assert!(config.cookies.secure);
        assert_eq!(config.cookies.max_age_secs, Some(400 * 24 * 60 * 60));
    }
}

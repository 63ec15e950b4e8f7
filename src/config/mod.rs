use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Startup configuration for the admin console.
///
/// Resolved once in `main` and handed to the components that need it; nothing
/// reads the process environment after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base address of the upstream fleet API, without a trailing slash
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure_cookies: bool,
}

pub const DEFAULT_SESSION_COOKIE: &str = "smartflex_session";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("ADMIN_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("BACKEND_URL") {
            match Url::parse(&v) {
                Ok(_) => self.backend.base_url = v.trim_end_matches('/').to_string(),
                Err(e) => {
                    tracing::warn!("ignoring invalid BACKEND_URL {:?}: {}", v, e);
                }
            }
        }

        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            if !v.is_empty() {
                self.session.cookie_name = v;
            }
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_SECS") {
            self.session.max_age_secs = v.parse().unwrap_or(self.session.max_age_secs);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.session.secure_cookies = v.parse().unwrap_or(self.session.secure_cookies);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_URL.to_string(),
            },
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                max_age_secs: 60 * 60 * 24, // 24 hours
                secure_cookies: false,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            ..Self::development()
        }
        .with_secure_cookies()
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::development()
        }
        .with_secure_cookies()
    }

    fn with_secure_cookies(mut self) -> Self {
        self.session.secure_cookies = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.session.cookie_name, DEFAULT_SESSION_COOKIE);
        assert_eq!(config.session.max_age_secs, 86_400);
        assert!(!config.session.secure_cookies);
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.session.secure_cookies);
    }
}

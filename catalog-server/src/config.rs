//! Service settings - loaded once at startup, immutable afterwards
//!
//! Configuration is loaded from environment variables:
//! - `PROJECT_NAME`: shown by the root endpoint (default: My Project)
//! - `API_V1_STR`: prefix for product routes (default: /api/v1)
//! - `DATABASE_URL`: SQLite URL (default: sqlite://./app.db)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `CRUD_IMPL`: storage backend, `orm` or `template` (default: orm)
//! - `CATALOG_BIND`: listen address (default: 127.0.0.1:8000)
//! - `BACKEND_CORS_ORIGINS`: comma-separated allowed origins (default: none)

use std::net::SocketAddr;

use crate::db::DEFAULT_MAX_CONNECTIONS;
use crate::store::StoreKind;

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} cannot be empty")]
    Empty { key: &'static str },

    #[error("invalid {key} '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub api_prefix: String,
    pub database_url: String,
    pub max_connections: u32,
    pub store_kind: StoreKind,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "My Project".to_string(),
            api_prefix: "/api/v1".to_string(),
            database_url: "sqlite://./app.db".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            store_kind: StoreKind::Orm,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origins: Vec::new(),
        }
    }
}

impl Settings {
    /// Create settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create settings from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(name) = lookup("PROJECT_NAME") {
            settings.project_name = name;
        }
        if let Some(prefix) = lookup("API_V1_STR") {
            settings.api_prefix = prefix;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections = max.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: max.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(kind) = lookup("CRUD_IMPL") {
            settings.store_kind = kind.parse().map_err(|e| ConfigError::Invalid {
                key: "CRUD_IMPL",
                value: kind.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(bind) = lookup("CATALOG_BIND") {
            settings.bind_addr = bind.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "CATALOG_BIND",
                value: bind.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(origins) = lookup("BACKEND_CORS_ORIGINS") {
            settings.cors_origins = parse_origins(&origins);
        }

        settings.validate()
    }

    /// Check and normalize settings.
    ///
    /// - database URL must be non-empty and use the `sqlite:` scheme
    /// - API prefix must start with `/` (or be empty for the root); a
    ///   trailing `/` is dropped
    /// - CORS origins must start with `http://` or `https://`
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = self.database_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Empty {
                key: "DATABASE_URL",
            });
        }
        if !url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                value: self.database_url.clone(),
                reason: "must start with a valid prefix: sqlite:".to_string(),
            });
        }
        self.database_url = url.to_string();

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "API_V1_STR",
                value: self.api_prefix.clone(),
                reason: "must start with '/'".to_string(),
            });
        }
        self.api_prefix = self.api_prefix.trim_end_matches('/').to_string();

        for origin in &self.cors_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: "BACKEND_CORS_ORIGINS",
                    value: origin.clone(),
                    reason: "origins must start with http:// or https://".to_string(),
                });
            }
        }

        Ok(self)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.project_name, "My Project");
        assert_eq!(settings.api_prefix, "/api/v1");
        assert_eq!(settings.store_kind, StoreKind::Orm);
        assert_eq!(settings.bind_addr.port(), 8000);
        assert!(settings.cors_origins.is_empty());
    }

    #[test]
    fn reads_backend_switch() {
        let settings = settings_from(&[("CRUD_IMPL", "template")]).unwrap();
        assert_eq!(settings.store_kind, StoreKind::Template);

        let err = settings_from(&[("CRUD_IMPL", "graph")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CRUD_IMPL", .. }));
    }

    #[test]
    fn rejects_non_sqlite_urls() {
        let err = settings_from(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_URL", .. }));

        let err = settings_from(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { key: "DATABASE_URL" }));
    }

    #[test]
    fn normalizes_prefix() {
        let settings = settings_from(&[("API_V1_STR", "/api/v2/")]).unwrap();
        assert_eq!(settings.api_prefix, "/api/v2");

        let settings = settings_from(&[("API_V1_STR", "/")]).unwrap();
        assert_eq!(settings.api_prefix, "");
        // Validating twice keeps a root prefix valid
        assert_eq!(settings.validate().unwrap().api_prefix, "");

        assert!(settings_from(&[("API_V1_STR", "api")]).is_err());
    }

    #[test]
    fn parses_cors_origins() {
        let settings = settings_from(&[(
            "BACKEND_CORS_ORIGINS",
            "http://localhost:3000, https://shop.example.com,",
        )])
        .unwrap();
        assert_eq!(
            settings.cors_origins,
            vec!["http://localhost:3000", "https://shop.example.com"]
        );

        let err = settings_from(&[("BACKEND_CORS_ORIGINS", "localhost:3000")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "BACKEND_CORS_ORIGINS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(settings_from(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert!(settings_from(&[("CATALOG_BIND", "nowhere")]).is_err());
    }
}

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub entitlements: EntitlementConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

/// Settings consumed by the entitlement resolver and its provider caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementConfig {
    /// Feature names accessible without a premium subscription. Anything
    /// not listed here classifies as premium-required.
    pub free_features: Vec<String>,
    /// How long cached role/subscription reads stay fresh.
    pub cache_ttl_secs: u64,
    /// Upper bound on a single provider read; on elapse the resolver
    /// falls back to an empty result (fail closed).
    pub provider_timeout_ms: u64,
}

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
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging =
                v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes =
                v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Entitlement overrides
        if let Ok(v) = env::var("ENTITLEMENT_FREE_FEATURES") {
            self.entitlements.free_features =
                v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("ENTITLEMENT_CACHE_TTL_SECS") {
            self.entitlements.cache_ttl_secs =
                v.parse().unwrap_or(self.entitlements.cache_ttl_secs);
        }
        if let Ok(v) = env::var("ENTITLEMENT_PROVIDER_TIMEOUT_MS") {
            self.entitlements.provider_timeout_ms =
                v.parse().unwrap_or(self.entitlements.provider_timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                // Development only; deployments must set SECURITY_JWT_SECRET
                jwt_secret: "studyhall-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            entitlements: EntitlementConfig {
                free_features: Self::default_free_features(),
                cache_ttl_secs: 30,
                provider_timeout_ms: 5000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.studyhall.app".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            entitlements: EntitlementConfig {
                free_features: Self::default_free_features(),
                cache_ttl_secs: 60,
                provider_timeout_ms: 3000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://studyhall.app".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            entitlements: EntitlementConfig {
                free_features: Self::default_free_features(),
                cache_ttl_secs: 120,
                provider_timeout_ms: 2000,
            },
        }
    }

    fn default_free_features() -> Vec<String> {
        vec!["subject-browsing".to_string(), "forum".to_string()]
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Development
        )
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Production
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.api.enable_request_logging);
        assert_eq!(config.entitlements.cache_ttl_secs, 30);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.enable_request_logging);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.entitlements.cache_ttl_secs, 120);
    }

    #[test]
    fn test_free_features_default() {
        let config = AppConfig::development();
        assert_eq!(
            config.entitlements.free_features,
            vec!["subject-browsing".to_string(), "forum".to_string()]
        );
    }
}

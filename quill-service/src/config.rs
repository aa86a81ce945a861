/// Configuration management for quill-service
///
/// All settings come from environment variables with development defaults.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Uploaded media storage
    pub media: MediaConfig,
    /// Listing pagination
    pub pagination: PaginationConfig,
    /// Landing page cache
    pub cache: CacheConfig,
    /// Login sessions
    pub session: SessionConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Uploaded media storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded images are written under
    pub root: String,
}

/// Listing pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Posts per listing page
    pub posts_per_page: i64,
}

/// Landing page cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a rendered landing page stays cached
    pub index_ttl_secs: u64,
}

/// Login sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Days a session cookie stays valid
    pub lifetime_days: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                return Err("DATABASE_URL must be set in production".to_string())
            }
            Err(_) => "postgresql://localhost/quill".to_string(),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("QUILL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("QUILL_PORT", 8080),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_env_or("DATABASE_MAX_CONNECTIONS", 10),
            },
            media: MediaConfig {
                root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            },
            pagination: PaginationConfig {
                posts_per_page: parse_env_or("POSTS_PER_PAGE", 10),
            },
            cache: CacheConfig {
                index_ttl_secs: parse_env_or("INDEX_CACHE_TTL_SECS", 20),
            },
            session: SessionConfig {
                lifetime_days: parse_env_or("SESSION_LIFETIME_DAYS", 30),
            },
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "DATABASE_URL",
            "QUILL_HOST",
            "QUILL_PORT",
            "DATABASE_MAX_CONNECTIONS",
            "MEDIA_ROOT",
            "POSTS_PER_PAGE",
            "INDEX_CACHE_TTL_SECS",
            "SESSION_LIFETIME_DAYS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.pagination.posts_per_page, 10);
        assert_eq!(config.cache.index_ttl_secs, 20);
        assert_eq!(config.session.lifetime_days, 30);
        assert_eq!(config.media.root, "media");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("QUILL_PORT", "9001");
        std::env::set_var("POSTS_PER_PAGE", "5");
        std::env::set_var("INDEX_CACHE_TTL_SECS", "60");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9001);
        assert_eq!(config.pagination.posts_per_page, 5);
        assert_eq!(config.cache.index_ttl_secs, 60);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_production_requires_database_url() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("DATABASE_URL", "postgresql://db/quill");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_numeric_falls_back() {
        clear_env();
        std::env::set_var("QUILL_PORT", "not-a-port");
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8080);
        clear_env();
    }
}

use once_cell::sync::Lazy;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` selects the in-memory store
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub max_per_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Signs session tokens
    #[serde(skip_serializing, default)]
    pub secret_key: String,
    pub secret_key_file: PathBuf,
    pub session_expiry_hours: u64,
    pub secure_cookies: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub image_root: PathBuf,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "gamecafe=debug,tower_http=debug",
            Environment::Staging => "gamecafe=info,tower_http=info",
            Environment::Production => "gamecafe=info,tower_http=warn",
        }
    }
}

/// Tracing directives from `RUST_LOG`, else the `APP_ENV` default.
///
/// Reads nothing else, so the subscriber can be installed before [`config`]
/// runs and any warning raised while loading settings is recorded.
pub fn log_filter_from_env() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| Environment::from_env().default_log_filter().to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_env();

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("GAMECAFE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("GAMECAFE_HOST") {
            self.server.host = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_MAX_PER_PAGE") {
            self.pagination.max_per_page = v.parse().unwrap_or(self.pagination.max_per_page);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY_FILE") {
            self.security.secret_key_file = PathBuf::from(v);
        }
        self.security.secret_key = match env::var("SECRET_KEY") {
            Ok(v) if !v.is_empty() => v,
            _ => load_secret_key(&self.security.secret_key_file),
        };
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Storage overrides
        if let Ok(v) = env::var("IMAGE_STORAGE_ROOT") {
            self.storage.image_root = PathBuf::from(v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            pagination: PaginationConfig { max_per_page: 50 },
            security: SecurityConfig {
                secret_key: String::new(),
                secret_key_file: PathBuf::from(".secret_key"),
                session_expiry_hours: 24 * 7, // 1 week
                secure_cookies: false,
                enable_cors: true,
                cors_origins: vec!["http://localhost:8080".to_string()],
            },
            storage: StorageConfig {
                image_root: PathBuf::from("./data"),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            pagination: PaginationConfig { max_per_page: 50 },
            security: SecurityConfig {
                secret_key: String::new(),
                secret_key_file: PathBuf::from(".secret_key"),
                session_expiry_hours: 24,
                secure_cookies: true,
                enable_cors: false,
                cors_origins: vec![],
            },
            storage: StorageConfig {
                image_root: PathBuf::from("/data"),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 80,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            pagination: PaginationConfig { max_per_page: 50 },
            security: SecurityConfig {
                secret_key: String::new(),
                secret_key_file: PathBuf::from("/config/.secret_key"),
                session_expiry_hours: 24,
                secure_cookies: true,
                enable_cors: false,
                cors_origins: vec![],
            },
            storage: StorageConfig {
                image_root: PathBuf::from("/data"),
            },
        }
    }
}

/// Reads the signing secret from `path`, generating and persisting a new
/// random one when the file is missing or empty. A read-only filesystem only
/// costs persistence: the generated secret is still returned.
fn load_secret_key(path: &Path) -> String {
    if let Ok(existing) = fs::read_to_string(path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return existing.to_string();
        }
    }

    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = hex::encode(bytes);

    if let Err(e) = fs::write(path, &secret) {
        tracing::warn!("Could not persist secret key to {}: {}", path.display(), e);
    }
    secret
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

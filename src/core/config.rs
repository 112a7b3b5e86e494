use std::env;
use std::time::Duration;

use crate::features::catalog::engine::ColorStrategy;

/// Process configuration, read once from the environment at startup and
/// passed into services explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub admin: AdminConfig,
    pub minio: MinIOConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Absolute base URL this API is reachable at, used to build file URLs
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Content-management API mount point and its basic-auth credentials
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub path: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// MinIO/S3 storage configuration for image uploads
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing files
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix every object key starts with (e.g., "uploads")
    pub key_prefix: String,
}

/// Catalog behaviour knobs
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Populate the default catalog at startup when no category exists
    pub seed_on_empty: bool,
    pub graph_coloring: ColorStrategy,
    /// Interactive view sessions idle longer than this are dropped
    pub view_idle_ttl: Duration,
    pub view_max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{} must be true or false", name)),
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            public_base_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Skill Map API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Business analysis skill map and product directory API".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl AdminConfig {
    const DEFAULT_PATH: &'static str = "/api/admin";

    pub fn from_env() -> Result<Self, String> {
        let raw_path = env::var("ADMIN_PATH").unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        let path = Self::normalize_path(&raw_path)?;

        let username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        Ok(Self {
            path,
            username,
            password,
        })
    }

    /// Leading slash, no trailing slash, not the bare root
    fn normalize_path(raw: &str) -> Result<String, String> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err("ADMIN_PATH must not be empty or '/'".to_string());
        }
        Ok(format!("/{}", trimmed))
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "skillmap-uploads".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let key_prefix = env::var("MINIO_KEY_PREFIX")
            .unwrap_or_else(|_| "uploads".to_string())
            .trim_matches('/')
            .to_string();

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            key_prefix,
        })
    }
}

impl CatalogConfig {
    const DEFAULT_VIEW_IDLE_TTL_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_VIEW_MAX_SESSIONS: usize = 10_000;

    pub fn from_env() -> Result<Self, String> {
        let seed_on_empty = parse_bool(
            "SEED_ON_EMPTY",
            &env::var("SEED_ON_EMPTY").unwrap_or_else(|_| "true".to_string()),
        )?;

        let graph_coloring = env::var("GRAPH_COLORING")
            .unwrap_or_else(|_| "rank".to_string())
            .parse::<ColorStrategy>()
            .map_err(|e| format!("GRAPH_COLORING must be 'rank' or 'id': {}", e))?;

        let view_idle_ttl_secs = env::var("VIEW_IDLE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_VIEW_IDLE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "VIEW_IDLE_TTL_SECS must be a valid number".to_string())?;

        let view_max_sessions = env::var("VIEW_MAX_SESSIONS")
            .unwrap_or_else(|_| Self::DEFAULT_VIEW_MAX_SESSIONS.to_string())
            .parse::<usize>()
            .map_err(|_| "VIEW_MAX_SESSIONS must be a valid number".to_string())?;

        if view_max_sessions == 0 {
            return Err("VIEW_MAX_SESSIONS must be greater than zero".to_string());
        }

        Ok(Self {
            seed_on_empty,
            graph_coloring,
            view_idle_ttl: Duration::from_secs(view_idle_ttl_secs),
            view_max_sessions,
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_on_empty: true,
            graph_coloring: ColorStrategy::default(),
            view_idle_ttl: Duration::from_secs(Self::DEFAULT_VIEW_IDLE_TTL_SECS),
            view_max_sessions: Self::DEFAULT_VIEW_MAX_SESSIONS,
        }
    }
}

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct AssetStoreSettings {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub asset_store: AssetStoreSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10u32)?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let cors_origins = parse_cors_origins(std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
            "http://localhost:3000,http://127.0.0.1:3000,http://127.0.0.1:8080".to_string()
        }));
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        // base64 image payloads travel inside the JSON body
        let http_request_body_limit_bytes =
            parse_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 10 * 1024 * 1024usize)?;
        let http_concurrency_limit = parse_env("HTTP_CONCURRENCY_LIMIT", 256usize)?;
        let http_request_timeout_secs = parse_env("HTTP_REQUEST_TIMEOUT_SECS", 30u64)?;

        let asset_store = AssetStoreSettings {
            base_url: std::env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com".to_string()),
            cloud_name: get_required("CLOUDINARY_CLOUD_NAME")
                .context("CLOUDINARY_CLOUD_NAME is required")?,
            api_key: get_required("CLOUDINARY_API_KEY").context("CLOUDINARY_API_KEY is required")?,
            api_secret: get_required("CLOUDINARY_API_SECRET")
                .context("CLOUDINARY_API_SECRET is required")?,
            folder: std::env::var("CLOUDINARY_FOLDER")
                .ok()
                .map(|folder| folder.trim().to_string())
                .filter(|folder| !folder.is_empty()),
            timeout_secs: parse_env("CLOUDINARY_TIMEOUT_SECS", 20u64)?,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            asset_store,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + std::fmt::Display + PartialEq + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    parse_positive(key, &raw)
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = raw
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

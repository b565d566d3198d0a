//! API configuration.

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// MongoDB database name
    pub mongodb_database: String,
    /// Directory uploaded images are written to and served from
    pub upload_dir: String,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size (bounds multipart uploads)
    pub max_body_size: usize,
    /// Run post create/delete dual writes in a MongoDB transaction.
    /// Requires a replica set; disable for standalone deployments.
    pub db_transactions: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "worknear".to_string(),
            upload_dir: "uploads".to_string(),
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            db_transactions: true,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            mongodb_uri: std::env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_database: std::env::var("MONGODB_DATABASE")
                .unwrap_or(defaults.mongodb_database),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            db_transactions: std::env::var("WORKNEAR_DB_TRANSACTIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.db_transactions),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

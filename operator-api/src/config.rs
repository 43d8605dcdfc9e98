//! Operator API configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Operator API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for operator authentication
    pub jwt_secret: String,
    /// Directory uploaded course images are written to
    pub upload_dir: String,
    /// URL prefix uploaded files are served under
    pub upload_public_url: String,
    /// Optional directory for daily rolling log files
    pub log_dir: Option<String>,
    /// Upper per-page bound for the orders listing
    pub orders_max_per_page: i64,
    /// Upper per-page bound for every other listing
    pub list_max_per_page: i64,
    /// Lower per-page bound shared by all listings
    pub min_per_page: i64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Parse an integer env var, falling back to `default` when unset.
    fn int_var(name: &str, default: i64) -> Result<i64, BoxError> {
        match std::env::var(name) {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|e| format!("{name} must be an integer: {e}").into()),
            Err(_) => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://operator.db?mode=rwc".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            upload_public_url: std::env::var("UPLOAD_PUBLIC_URL")
                .unwrap_or_else(|_| "/uploads".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            orders_max_per_page: Self::int_var("ORDERS_MAX_PER_PAGE", 50)?,
            list_max_per_page: Self::int_var("LIST_MAX_PER_PAGE", 100)?,
            min_per_page: Self::int_var("MIN_PER_PAGE", 5)?,
        })
    }
}

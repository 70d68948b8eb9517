use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// External ML microservice endpoints and timeout.
    pub ml: MlSettings,
}

/// Connection settings for the external ML microservice.
#[derive(Debug, Clone)]
pub struct MlSettings {
    /// Full URL of the failure-classifier endpoint.
    pub predict_url: String,
    /// Full URL of the chatbot endpoint.
    pub chatbot_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                           |
    /// |------------------------|-----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                         |
    /// | `PORT`                 | `3000`                            |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                              |
    /// | `ML_PREDICT_URL`       | `http://localhost:8000/predict`   |
    /// | `ML_CHATBOT_URL`       | `http://localhost:8000/chat`      |
    /// | `ML_TIMEOUT_SECS`      | `30`                              |
    ///
    /// JWT settings are loaded by [`JwtConfig::from_env`] (the secret is
    /// required).
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let ml = MlSettings {
            predict_url: std::env::var("ML_PREDICT_URL")
                .unwrap_or_else(|_| "http://localhost:8000/predict".into()),
            chatbot_url: std::env::var("ML_CHATBOT_URL")
                .unwrap_or_else(|_| "http://localhost:8000/chat".into()),
            timeout_secs: std::env::var("ML_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("ML_TIMEOUT_SECS must be a valid u64"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            ml,
        }
    }
}

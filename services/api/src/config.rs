/// Service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8080). Env var: `API_PORT`.
    pub api_port: u16,
    /// Directory for uploaded images (default "media"). Env var: `MEDIA_ROOT`.
    pub media_root: String,
    /// Host used in short links when the request carries no Host header
    /// (default "localhost"). Env var: `PUBLIC_HOST`.
    pub public_host: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            media_root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_owned()),
            public_host: std::env::var("PUBLIC_HOST").unwrap_or_else(|_| "localhost".to_owned()),
        }
    }
}

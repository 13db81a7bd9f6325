use crate::domain::types::BCRYPT_COST;

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL. When unset, OTP challenges are kept in process memory.
    pub redis_url: Option<String>,
    /// HMAC secret for signing JWTs. Checked when the token service is built.
    pub jwt_secret: Option<String>,
    /// Deployment environment (`APP_ENV`). `production` switches OTPs to random codes.
    pub app_env: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// bcrypt cost factor (default 12). Env var: `BCRYPT_COST`.
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            jwt_secret: std::env::var("JWT_SECRET").ok(),
            app_env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_owned()),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3112),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(BCRYPT_COST),
        }
    }
}

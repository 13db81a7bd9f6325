/// Listings service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ListingsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret shared with the auth service, used to validate bearer tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3114). Env var: `LISTINGS_PORT`.
    pub listings_port: u16,
}

impl ListingsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET")
                .ok()
                .filter(|v| !v.is_empty())
                .expect("JWT_SECRET"),
            listings_port: std::env::var("LISTINGS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}

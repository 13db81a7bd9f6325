use sea_orm::Database;
use tracing::info;

use nhadat_auth::config::AuthConfig;
use nhadat_auth::infra::cache::RedisOtpStore;
use nhadat_auth::infra::memory::InMemoryOtpStore;
use nhadat_auth::infra::otp_store::OtpBackend;
use nhadat_auth::router::build_router;
use nhadat_auth::state::AppState;
use nhadat_auth::usecase::otp::OtpMode;
use nhadat_auth::usecase::token::TokenService;

#[tokio::main]
async fn main() {
    nhadat_core::tracing::init_tracing("nhadat_auth=info,tower_http=info");

    let config = AuthConfig::from_env();

    let tokens = TokenService::new(config.jwt_secret.as_deref()).expect("JWT_SECRET");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let otp_store = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            info!("otp store: redis");
            OtpBackend::Redis(RedisOtpStore { pool })
        }
        None => {
            info!("otp store: in-process memory");
            OtpBackend::Memory(InMemoryOtpStore::new())
        }
    };

    let otp_mode = OtpMode::for_environment(&config.app_env);
    info!(app_env = %config.app_env, ?otp_mode, "otp mode selected");

    let state = AppState {
        db,
        otp_store,
        otp_mode,
        tokens,
        bcrypt_cost: config.bcrypt_cost,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

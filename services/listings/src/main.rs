use sea_orm::Database;
use tracing::info;

use nhadat_listings::config::ListingsConfig;
use nhadat_listings::router::build_router;
use nhadat_listings::state::AppState;

#[tokio::main]
async fn main() {
    nhadat_core::tracing::init_tracing("nhadat_listings=info,tower_http=info");

    let config = ListingsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.listings_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("listings service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

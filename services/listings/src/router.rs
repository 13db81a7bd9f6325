use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use nhadat_core::health::{healthz, readyz};
use nhadat_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::listing::{
    contact_listing, create_listing, delete_listing, get_listing, get_listing_by_code,
    get_listing_by_slug, get_my_listings, get_quality, publish_listing, save_listing,
    search_listings, update_listing,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Listings
        .route("/listings", post(create_listing).get(search_listings))
        .route("/listings/user/my-listings", get(get_my_listings))
        .route("/listings/code/{code}", get(get_listing_by_code))
        .route("/listings/slug/{slug}", get(get_listing_by_slug))
        .route(
            "/listings/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/listings/{id}/publish", post(publish_listing))
        .route("/listings/{id}/save", post(save_listing))
        .route("/listings/{id}/contact", post(contact_listing))
        .route("/listings/{id}/quality", get(get_quality))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}

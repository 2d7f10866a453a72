mod assets;
mod health;
mod products;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::{AppState, middleware::operator_auth};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let operator_routes = Router::new()
        .route("/products", post(products::create_product))
        .route_layer(middleware::from_fn_with_state(state.clone(), operator_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/assets/{*key}", get(assets::get_asset))
        .nest("/admin", operator_routes)
}

//! bankd - transactional backing store and REST API for a banking service.
//!
//! The core is the transactional store (`store`): a generic
//! run-in-one-database-transaction executor and the composite
//! operations built on it (fund transfer, user creation with an
//! attached side effect, email verification). Around it sit the HTTP
//! surface (`handlers`, `middleware`), the token subsystem (`token`),
//! and the asynchronous verification-email pipeline (`worker`).

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;
pub mod token;
pub mod util;
pub mod worker;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{config::Config, store::Store, token::TokenMaker, worker::TaskDistributor};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub token_maker: Arc<dyn TokenMaker>,
    pub distributor: Arc<dyn TaskDistributor>,
    pub config: Arc<Config>,
}

/// Build the HTTP router: public routes, authenticated routes behind
/// the bearer-token middleware, and request tracing.
pub fn app(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        // Account management routes
        .route("/api/v1/accounts", post(handlers::accounts::create_account))
        .route("/api/v1/accounts", get(handlers::accounts::list_accounts))
        .route(
            "/api/v1/accounts/{id}",
            get(handlers::accounts::get_account),
        )
        .route(
            "/api/v1/accounts/{id}/balance",
            put(handlers::accounts::adjust_balance),
        )
        .route(
            "/api/v1/accounts/{id}",
            delete(handlers::accounts::delete_account),
        )
        // Transfer route
        .route(
            "/api/v1/transfers",
            post(handlers::transfers::create_transfer),
        )
        // User management routes
        .route(
            "/api/v1/users/role",
            patch(handlers::users::update_user_role),
        )
        .route(
            "/api/v1/users/resend_verify_email",
            post(handlers::users::resend_verify_email),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/users", post(handlers::users::create_user))
        .route("/api/v1/users/login", post(handlers::users::login_user))
        .route(
            "/api/v1/users/verify_email",
            post(handlers::users::verify_email),
        )
        .route(
            "/api/v1/tokens/renew_access",
            post(handlers::tokens::renew_access_token),
        )
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Request tracing for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod alerts;
pub mod database;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        // Session
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Customers
        .route(
            "/api/customers",
            get(handlers::customers::list).post(handlers::customers::create),
        )
        .route(
            "/api/customers/:id",
            put(handlers::customers::update).delete(handlers::customers::remove),
        )
        // Devices
        .route(
            "/api/devices",
            get(handlers::devices::list).post(handlers::devices::create),
        )
        .route(
            "/api/devices/:id",
            put(handlers::devices::update).delete(handlers::devices::remove),
        )
        .route("/api/devices/:id/history", get(handlers::devices::history))
        // Technicians
        .route(
            "/api/technicians",
            get(handlers::technicians::list).post(handlers::technicians::create),
        )
        .route(
            "/api/technicians/:id",
            put(handlers::technicians::update).delete(handlers::technicians::remove),
        )
        // Receivers
        .route(
            "/api/receivers",
            get(handlers::receivers::list).post(handlers::receivers::create),
        )
        .route(
            "/api/receivers/:id",
            put(handlers::receivers::update).delete(handlers::receivers::remove),
        )
        // Suppliers
        .route(
            "/api/suppliers",
            get(handlers::suppliers::list).post(handlers::suppliers::create),
        )
        .route(
            "/api/suppliers/:id",
            put(handlers::suppliers::update).delete(handlers::suppliers::remove),
        )
        // Inventory
        .route(
            "/api/inventory",
            get(handlers::inventory::list).post(handlers::inventory::create),
        )
        .route(
            "/api/inventory/:id",
            put(handlers::inventory::update).delete(handlers::inventory::remove),
        )
        // Tickets
        .route(
            "/api/tickets",
            get(handlers::tickets::list).post(handlers::tickets::create),
        )
        .route(
            "/api/tickets/:id",
            put(handlers::tickets::update).delete(handlers::tickets::remove),
        )
        .route("/api/tickets/:id/items", get(handlers::tickets::items))
        .route("/api/tickets/:id/public", get(handlers::tickets::public))
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list).post(handlers::notifications::create),
        )
        .route(
            "/api/notifications/analyze",
            get(handlers::notifications::analyze),
        )
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(2 * 1024 * 1024)), // 2MB
        )
        .with_state(db)
}

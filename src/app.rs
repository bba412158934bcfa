use axum::{
    Router,
    http::Method,
    routing::{delete, get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, auth, contact, flights, health, radar, stats, stays, users},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/me", patch(users::update_profile))
        .route(
            "/api/flights",
            post(flights::create_flight).get(flights::list_flights),
        )
        .route(
            "/api/flights/:id",
            get(flights::get_flight)
                .put(flights::replace_flight)
                .delete(flights::delete_flight),
        )
        .route(
            "/api/stays",
            post(stays::create_stay).get(stays::list_stays),
        )
        .route(
            "/api/stays/:id",
            get(stays::get_stay)
                .put(stays::replace_stay)
                .delete(stays::delete_stay),
        )
        .route("/api/stats", get(stats::get_stats))
        .route("/api/contact", post(contact::submit_message))
        .route(
            "/api/admin/invites",
            post(admin::create_invite).get(admin::list_invites),
        )
        .route("/api/admin/invites/:code", delete(admin::revoke_invite))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:id", delete(admin::delete_user))
        .route("/api/admin/users/:id/approve", post(admin::approve_user))
        .route("/api/admin/messages", get(admin::list_messages))
        .route("/api/radr/update", post(radar::update_location))
        .route("/api/radr/nearby", get(radar::nearby))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

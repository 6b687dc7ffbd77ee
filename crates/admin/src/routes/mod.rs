//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (user store reachable)
//!
//! # Users
//! GET  /                       - User list (?sort=&dir=&page=)
//! POST /refresh                - Drop cached queries, back to the list
//! GET  /users/new              - Create form
//! POST /users/new              - Create submit / skill row actions
//! GET  /users/{id}/edit        - Edit form
//! POST /users/{id}/edit        - Update submit / skill row actions
//! GET  /users/{id}/delete      - Delete confirmation
//! POST /users/{id}/delete      - Delete
//! ```

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use crate::state::AppState;

pub mod health;
pub mod users;

/// Build the admin router (without static assets or middleware layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Users
        .route("/", get(users::index))
        .route("/refresh", post(users::refresh))
        .route("/users/new", get(users::new_user).post(users::create))
        .route("/users/{id}/edit", get(users::edit).post(users::update))
        .route(
            "/users/{id}/delete",
            get(users::confirm_delete).post(users::delete),
        )
}

/// Render a template, falling back to a plain error body if rendering fails.
pub fn render_html(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

pub mod flow;
pub mod handlers;
pub mod models;
pub mod views;

use axum::{Router, routing::get};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use handlers::{callback_handler, index_handler, login_handler, logout_handler};
use models::AppState;

/// Routes of the login server, wrapped in a memory-backed session layer.
pub fn build_router(app_state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_expiry = Expiry::OnInactivity(Duration::hours(6));
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(session_expiry);

    Router::new()
        .route("/", get(index_handler))
        .route("/login", get(login_handler))
        .route("/oauth", get(callback_handler))
        .route("/logout", get(logout_handler))
        .layer(session_layer)
        .with_state(app_state)
}

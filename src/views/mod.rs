//! Server-rendered views.
//!
//! The view layer talks to the same repositories as the REST API, but
//! authenticates with a session cookie and reports outcomes through one-shot
//! flash flags followed by a redirect back to the list page.

use axum::Router;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::infra::state::AppState;

pub mod login;
pub mod logout;
pub mod shopping_list;

/// View routes.
pub fn views(state: AppState, session_store: PostgresStore) -> Router {
    let session_expiry = state.config().server.session_expiry;
    let expiry = Expiry::OnInactivity(time::Duration::seconds(session_expiry.as_secs() as i64));
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(expiry);
    Router::new()
        .merge(shopping_list::routes())
        .merge(login::routes())
        .merge(logout::routes())
        .with_state(state)
        .layer(session_layer)
}

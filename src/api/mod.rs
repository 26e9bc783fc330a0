//! REST API implementation.
//!
//! # Examples
//!
//! Info API.
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! # let url = shopping_list::app::spawn_app().await;
//! let response = reqwest::get(format!("{}/info", url)).await.unwrap();
//! assert_eq!(200, response.status());
//! # });
//! ```

use axum::Router;

use crate::infra::state::AppState;

pub mod info;
pub mod shopping_list;
pub mod user;

/// Constructs the full REST API including middleware.
pub fn api(state: AppState) -> Router {
    Router::new()
        .merge(info::info_api::routes())
        .merge(shopping_list::shopping_list_api::routes())
        .merge(user::user_api::routes())
        .with_state(state)
}

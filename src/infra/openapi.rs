//! OpenAPI configuration.

use crate::api::{
    info::info_api,
    shopping_list::{
        completed_shopping_list_repository, shopping_list_api, shopping_list_repository,
    },
    user::user_api,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        info_api::info,
        user_api::user,
        shopping_list_api::list_items,
        shopping_list_api::register_item,
        shopping_list_api::get_item,
        shopping_list_api::delete_item,
        shopping_list_api::complete_item,
    ),
    components(
        schemas(
            info_api::AppInfo,
            shopping_list_repository::NewShoppingListItem,
            shopping_list_repository::ShoppingListItem,
            completed_shopping_list_repository::CompletedShoppingListItem,
            crate::infra::error::ErrorBody
        )
    ),
    modifiers(&SecurityAddon)
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;

/// Security settings
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            )
        }
    }
}

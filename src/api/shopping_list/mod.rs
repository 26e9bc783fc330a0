//! The shopping list feature.
//!
//! Active items live in one table, completed items in another. An item is
//! moved between the two by [`completion_service`], the only multi-step
//! write in the application.

pub mod completed_shopping_list_repository;
pub mod completion_service;
pub mod shopping_list_api;
pub mod shopping_list_repository;

//! A per-user shopping list web service.
//!
//! Active items can be registered, listed, deleted, and completed.
//! Completing an item moves it to a separate completed list in a single
//! transaction, so an item is always on exactly one of the two lists.

pub mod api;
pub mod app;
pub mod infra;
pub mod views;

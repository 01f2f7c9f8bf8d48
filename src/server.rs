//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::catalog::CatalogStore;
use crate::services::{InventoryMatcher, LoadoutComposer, PriceCache, SearchService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub prices: Arc<PriceCache>,
    pub search: Arc<SearchService>,
    pub loadout: Arc<LoadoutComposer>,
    pub inventory: Arc<InventoryMatcher>,
}

/// Wire up services around a catalog store and price cache.
pub fn create_app_state(store: Arc<dyn CatalogStore>, prices: Arc<PriceCache>) -> AppState {
    let search = Arc::new(SearchService::new(Arc::clone(&store), Arc::clone(&prices)));
    let loadout = Arc::new(LoadoutComposer::new(Arc::clone(&store), Arc::clone(&prices)));
    let inventory = Arc::new(InventoryMatcher::new(Arc::clone(&store)));
    AppState {
        store,
        prices,
        search,
        loadout,
        inventory,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/skins", get(api::handle_list))
        .route("/api/skins/search", get(api::handle_color_search))
        .route("/api/skins/:id/similar", get(api::handle_similar))
        .route("/api/loadout", post(api::handle_loadout))
        .route("/api/inventory/match", post(api::handle_inventory_match))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

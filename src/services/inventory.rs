//! Owned-item matching.
//!
//! Callers supply raw market listing names from an inventory import;
//! this strips the market decorations and resolves each name against
//! the catalog. How the names were obtained is not this service's
//! concern.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::error::ApiError;
use crate::models::SkinItem;

use super::pricing::clean_market_name;

pub struct InventoryMatcher {
    store: Arc<dyn CatalogStore>,
}

impl InventoryMatcher {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Resolve raw listing names to catalog items. Duplicate names
    /// (multiple wears of the same skin) collapse to one item; names
    /// with no catalog counterpart are dropped silently.
    pub async fn match_names(&self, raw_names: &[String]) -> Result<Vec<SkinItem>, ApiError> {
        let mut seen = HashSet::new();
        let cleaned: Vec<String> = raw_names
            .iter()
            .map(|n| clean_market_name(n))
            .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
            .collect();
        self.store.by_exact_names(&cleaned).await
    }
}

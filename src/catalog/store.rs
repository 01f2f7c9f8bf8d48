//! Catalog storage seam.
//!
//! The vector store is a collaborator: production deployments may back
//! it with a real vector database, but the in-memory implementation
//! here is the correctness baseline — a full scan with exact cosine
//! distances that everything else is tested against.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::color::Histogram;
use crate::error::ApiError;
use crate::models::SkinItem;
use crate::services::pricing::clean_market_name;

/// Query interface over the fixed catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert or replace an item. Re-seeding the same id is a no-op
    /// level update, never a duplicate row.
    async fn upsert(&self, item: SkinItem) -> Result<(), ApiError>;

    async fn by_id(&self, id: &str) -> Result<Option<SkinItem>, ApiError>;

    /// All items ranked by cosine distance to the target, ascending,
    /// with `offset`/`limit` paging.
    async fn by_vector(
        &self,
        target: &Histogram,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<(SkinItem, f32)>, ApiError>;

    /// Every item whose distance to the target is below `max_distance`.
    /// Used for loadout candidate pooling; not paged.
    async fn by_threshold(
        &self,
        target: &Histogram,
        max_distance: f32,
    ) -> Result<Vec<(SkinItem, f32)>, ApiError>;

    /// Case-insensitive name search. Every whitespace-delimited term in
    /// `text` must occur in the item name.
    async fn by_name_substring(
        &self,
        text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SkinItem>, ApiError>;

    /// Items whose cleaned name exactly matches one of `names`,
    /// case-insensitively. Both sides are stripped of market
    /// decorations, so a star-prefixed knife row matches its plain
    /// listing name.
    async fn by_exact_names(&self, names: &[String]) -> Result<Vec<SkinItem>, ApiError>;

    async fn contains(&self, id: &str) -> Result<bool, ApiError>;

    async fn count(&self) -> Result<usize, ApiError>;
}

/// In-memory catalog with JSON file persistence.
pub struct InMemoryCatalog {
    items: RwLock<HashMap<String, SkinItem>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Load a catalog persisted by [`InMemoryCatalog::save`].
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<SkinItem> = serde_json::from_str(&content)?;
        tracing::info!(items = items.len(), path = %path.display(), "Loaded catalog");
        Ok(Self {
            items: RwLock::new(items.into_iter().map(|i| (i.id.clone(), i)).collect()),
        })
    }

    /// Persist the catalog as a JSON array, sorted by id so re-runs
    /// produce identical files.
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        let items = self.items.read().await;
        let mut sorted: Vec<&SkinItem> = items.values().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        let json = serde_json::to_string(&sorted)?;
        std::fs::write(path, json)?;
        tracing::info!(items = sorted.len(), path = %path.display(), "Saved catalog");
        Ok(())
    }

    async fn ranked(&self, target: &Histogram) -> Vec<(SkinItem, f32)> {
        let items = self.items.read().await;
        let mut ranked: Vec<(SkinItem, f32)> = items
            .values()
            .map(|item| (item.clone(), target.cosine_distance(&item.histogram)))
            .collect();
        // Tie-break on id so paging is deterministic
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        ranked
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn upsert(&self, item: SkinItem) -> Result<(), ApiError> {
        let mut items = self.items.write().await;
        items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn by_id(&self, id: &str) -> Result<Option<SkinItem>, ApiError> {
        let items = self.items.read().await;
        Ok(items.get(id).cloned())
    }

    async fn by_vector(
        &self,
        target: &Histogram,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<(SkinItem, f32)>, ApiError> {
        Ok(self
            .ranked(target)
            .await
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn by_threshold(
        &self,
        target: &Histogram,
        max_distance: f32,
    ) -> Result<Vec<(SkinItem, f32)>, ApiError> {
        Ok(self
            .ranked(target)
            .await
            .into_iter()
            .take_while(|(_, d)| *d < max_distance)
            .collect())
    }

    async fn by_name_substring(
        &self,
        text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SkinItem>, ApiError> {
        let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let items = self.items.read().await;
        let mut matches: Vec<SkinItem> = items
            .values()
            .filter(|item| {
                let name = item.name.to_lowercase();
                terms.iter().all(|term| name.contains(term))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(matches.into_iter().skip(offset).take(limit).collect())
    }

    async fn by_exact_names(&self, names: &[String]) -> Result<Vec<SkinItem>, ApiError> {
        let wanted: Vec<String> = names
            .iter()
            .map(|n| clean_market_name(n).to_lowercase())
            .collect();
        let items = self.items.read().await;
        let mut matches: Vec<SkinItem> = items
            .values()
            .filter(|item| wanted.contains(&clean_market_name(&item.name).to_lowercase()))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }

    async fn contains(&self, id: &str) -> Result<bool, ApiError> {
        let items = self.items.read().await;
        Ok(items.contains_key(id))
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let items = self.items.read().await;
        Ok(items.len())
    }
}

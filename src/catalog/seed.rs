//! Offline catalog construction.
//!
//! Seeding downloads a public skin descriptor list, fetches each item
//! image, computes its histogram and dominant swatch, and upserts the
//! result into the catalog. The run is resumable: items already in the
//! store are skipped, so an interrupted run picks up where it left off.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tokio::time::{sleep, Duration};

use crate::color::{dominant_swatch, histogram_from_image, Histogram, NEUTRAL_SWATCH};
use crate::models::{Category, SkinItem};

use super::store::CatalogStore;

/// Retries per image download, after the initial attempt.
const IMAGE_FETCH_RETRIES: u32 = 2;
/// Base delay between retries; attempt `n` waits `n` times this.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("descriptor fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("descriptor parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

/// One entry of the upstream descriptor list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSkin {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub weapon: Option<NamedField>,
    #[serde(default)]
    pub rarity: Option<NamedField>,
    #[serde(default)]
    pub category: Option<NamedField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedField {
    pub name: String,
}

/// Where seed descriptors and images come from.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn descriptors(&self) -> Result<Vec<RawSkin>, SeedError>;
    async fn image(&self, url: &str) -> Result<Vec<u8>, SeedError>;
}

/// HTTP-backed seed source.
pub struct HttpSeedSource {
    client: reqwest::Client,
    source_url: String,
}

impl HttpSeedSource {
    pub fn new(source_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            source_url,
        }
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn descriptors(&self) -> Result<Vec<RawSkin>, SeedError> {
        let body = self
            .client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn image(&self, url: &str) -> Result<Vec<u8>, SeedError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Map a raw descriptor onto an equipment slot category.
///
/// The upstream list only labels agents explicitly; knives and gloves
/// are recognized from the weapon name.
pub fn derive_category(raw: &RawSkin) -> Category {
    if let Some(category) = &raw.category {
        if category.name.eq_ignore_ascii_case("agents") {
            return Category::Agent;
        }
    }
    let weapon = raw
        .weapon
        .as_ref()
        .map(|w| w.name.to_lowercase())
        .unwrap_or_default();
    if weapon.contains("glove") || weapon.contains("wraps") {
        Category::Glove
    } else if weapon.contains("knife")
        || weapon.contains("bayonet")
        || weapon.contains("karambit")
        || weapon.contains("daggers")
    {
        Category::Knife
    } else if weapon.contains("zeus") {
        Category::Other
    } else if weapon.is_empty() {
        Category::Other
    } else {
        Category::Weapon
    }
}

/// Outcome counts of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub total: usize,
    pub seeded: usize,
    pub skipped: usize,
    pub placeholders: usize,
}

/// Runs the seeding pipeline against a store.
pub struct Seeder<S: SeedSource> {
    source: Arc<S>,
    store: Arc<dyn CatalogStore>,
    concurrency: usize,
}

impl<S: SeedSource + 'static> Seeder<S> {
    pub fn new(source: Arc<S>, store: Arc<dyn CatalogStore>, concurrency: usize) -> Self {
        Self {
            source,
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(&self) -> Result<SeedSummary, SeedError> {
        let descriptors = self.source.descriptors().await?;
        let mut summary = SeedSummary {
            total: descriptors.len(),
            ..SeedSummary::default()
        };
        tracing::info!(total = summary.total, "Seeding catalog");

        let mut pending = Vec::new();
        for raw in descriptors {
            if self
                .store
                .contains(&raw.id)
                .await
                .map_err(|e| SeedError::Store(e.to_string()))?
            {
                summary.skipped += 1;
            } else {
                pending.push(raw);
            }
        }

        let mut analyses = stream::iter(pending)
            .map(|raw| {
                let source = Arc::clone(&self.source);
                async move {
                    let analysis = analyze_image(source.as_ref(), &raw.image).await;
                    (raw, analysis)
                }
            })
            .buffer_unordered(self.concurrency);

        while let Some((raw, analysis)) = analyses.next().await {
            let (histogram, dominant_hex) = match analysis {
                Some(pair) => pair,
                None => {
                    // Keep the item findable by name even without colors
                    tracing::warn!(id = %raw.id, image = %raw.image, "Image analysis failed, storing placeholder");
                    summary.placeholders += 1;
                    (Histogram::zero(), NEUTRAL_SWATCH.to_string())
                }
            };
            let item = SkinItem {
                category: derive_category(&raw),
                id: raw.id,
                name: raw.name,
                image: raw.image,
                weapon: raw.weapon.map(|w| w.name),
                rarity: raw.rarity.map(|r| r.name).unwrap_or_default(),
                dominant_hex,
                histogram,
            };
            self.store
                .upsert(item)
                .await
                .map_err(|e| SeedError::Store(e.to_string()))?;
            summary.seeded += 1;
            if summary.seeded % 500 == 0 {
                tracing::info!(seeded = summary.seeded, "Seeding progress");
            }
        }

        tracing::info!(
            seeded = summary.seeded,
            skipped = summary.skipped,
            placeholders = summary.placeholders,
            "Seeding complete"
        );
        Ok(summary)
    }
}

/// Fetch and analyze one image, retrying transient fetch failures.
/// Returns `None` when the image stays unreachable or undecodable.
async fn analyze_image<S: SeedSource>(source: &S, url: &str) -> Option<(Histogram, String)> {
    let mut attempt = 0;
    let bytes = loop {
        match source.image(url).await {
            Ok(bytes) => break bytes,
            Err(e) if attempt < IMAGE_FETCH_RETRIES => {
                attempt += 1;
                tracing::debug!(%e, url, attempt, "Image fetch failed, retrying");
                sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(e) => {
                tracing::debug!(%e, url, "Image fetch exhausted retries");
                return None;
            }
        }
    };
    let img = image::load_from_memory(&bytes).ok()?;
    let histogram = histogram_from_image(&img);
    let swatch = dominant_swatch(&img);
    Some((histogram, swatch))
}

//! Color similarity search with price-aware ranking.

use std::sync::Arc;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::catalog::CatalogStore;
use crate::color::{target_from_colors, Histogram, Rgb};
use crate::error::ApiError;
use crate::models::{PriceRange, SkinItem};

use super::pricing::PriceCache;

/// How price folds into the color-distance ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Nudge expensive items up: among equally matching skins, show the
    /// prestigious one first.
    #[default]
    Premium,
    /// Strongly favor cheap items.
    Budget,
}

/// Candidates fetched per page slot before budget re-ranking. Price can
/// only reorder within this pool, so a hopeless color match never wins
/// on cheapness alone.
const BUDGET_POOL_FACTOR: usize = 5;
/// Placeholder cents for items the feed does not list; large enough to
/// sink them below any listed item in budget mode.
const UNKNOWN_PRICE_CENTS: u32 = 500_000;
/// Keeps free-or-near-free items from collapsing the budget score to
/// zero regardless of color distance.
const BUDGET_DISTANCE_EPSILON: f32 = 0.01;
const BUDGET_PRICE_EXPONENT: f32 = 0.4;
const PREMIUM_PRICE_WEIGHT: f32 = 0.05;
const PREMIUM_PRICE_EXPONENT: f32 = 1.5;

/// One search result: the item with its raw color distance and the
/// price range joined in from the current snapshot.
#[derive(Debug, Clone)]
pub struct RankedSkin {
    pub item: SkinItem,
    pub distance: f32,
    pub price: Option<PriceRange>,
}

impl RankedSkin {
    /// Mode-dependent ranking score; lower is better in both modes.
    pub fn score(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Premium => {
                let dollars = self.price.map(|p| p.min as f32 / 100.0).unwrap_or(0.0);
                self.distance
                    / (1.0 + PREMIUM_PRICE_WEIGHT * (dollars + 1.0).log10().powf(PREMIUM_PRICE_EXPONENT))
            }
            Mode::Budget => {
                let cents = self.price.map(|p| p.min).unwrap_or(UNKNOWN_PRICE_CENTS) as f32;
                (self.distance + BUDGET_DISTANCE_EPSILON) * cents.powf(BUDGET_PRICE_EXPONENT)
            }
        }
    }
}

/// Stateless facade over the catalog and price cache.
pub struct SearchService {
    store: Arc<dyn CatalogStore>,
    prices: Arc<PriceCache>,
}

impl SearchService {
    pub fn new(store: Arc<dyn CatalogStore>, prices: Arc<PriceCache>) -> Self {
        Self { store, prices }
    }

    /// Rank the catalog against a set of seed colors.
    pub async fn by_colors(
        &self,
        colors: &[Rgb],
        mode: Mode,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RankedSkin>, ApiError> {
        let target = target_from_colors(colors);
        self.ranked(&target, mode, limit, offset, None).await
    }

    /// Rank the catalog against an existing item's stored histogram,
    /// keeping its full chromatic detail as the target. The seed item
    /// never appears in its own results.
    pub async fn similar_to(
        &self,
        id: &str,
        mode: Mode,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RankedSkin>, ApiError> {
        let seed = self
            .store
            .by_id(id)
            .await?
            .ok_or(ApiError::SkinNotFound)?;
        let target = seed.histogram.clone();
        self.ranked(&target, mode, limit, offset, Some(id)).await
    }

    async fn ranked(
        &self,
        target: &Histogram,
        mode: Mode,
        limit: usize,
        offset: usize,
        exclude_id: Option<&str>,
    ) -> Result<Vec<RankedSkin>, ApiError> {
        // The extra slot only compensates for an excluded seed item.
        // In premium mode the pool must equal the page exactly, so the
        // price bonus can reorder within it but never buy an item into
        // it past a closer match.
        let extra = usize::from(exclude_id.is_some());
        let pool = match mode {
            Mode::Premium => offset + limit + extra,
            Mode::Budget => (offset + limit) * BUDGET_POOL_FACTOR + extra,
        };
        let candidates = self.store.by_vector(target, pool, 0).await?;
        let snapshot = self.prices.snapshot().await;

        let mut ranked: Vec<RankedSkin> = candidates
            .into_iter()
            .filter(|(item, _)| exclude_id != Some(item.id.as_str()))
            .map(|(item, distance)| {
                let price = snapshot.range_for(&item.name);
                RankedSkin {
                    item,
                    distance,
                    price,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.score(mode)
                .total_cmp(&b.score(mode))
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        Ok(ranked.into_iter().skip(offset).take(limit).collect())
    }
}

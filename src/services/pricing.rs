//! Market price cache.
//!
//! Prices come from an external full-price dump and change constantly,
//! so they are never stored on catalog items. A background task
//! refreshes an immutable snapshot; readers grab an `Arc` to it and
//! join prices in at query time.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Duration;

use crate::models::{PriceFeedConfig, PriceRange};

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("price fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("price parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row of the upstream price dump. Prices are integer cents.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PriceEntry {
    pub name: String,
    pub price: u32,
}

/// Where raw price entries come from.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PriceEntry>, PriceFeedError>;
}

pub struct HttpPriceFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpPriceFeed {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn fetch(&self) -> Result<Vec<PriceEntry>, PriceFeedError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Strip market decorations from a listing name so it matches the
/// catalog's plain item names: `StatTrak™`/`Souvenir`/`★` prefixes and
/// the parenthesized wear suffix.
pub fn clean_market_name(name: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    static WEAR: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| {
        Regex::new(r"^(?:★\s*)?(?:StatTrak™\s*)?(?:Souvenir\s*)?").unwrap()
    });
    let wear = WEAR.get_or_init(|| {
        Regex::new(r"\s*\((?:Factory New|Minimal Wear|Field-Tested|Well-Worn|Battle-Scarred)\)$")
            .unwrap()
    });
    let stripped = prefix.replace(name, "");
    wear.replace(&stripped, "").trim().to_string()
}

/// Immutable view of one feed fetch.
///
/// Entries are stored sorted by cleaned name so a lookup is a binary
/// search for the equal range.
pub struct PriceSnapshot {
    // (cleaned name, price in cents), sorted by name
    entries: Vec<(String, u32)>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl PriceSnapshot {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn from_entries(raw: Vec<PriceEntry>, refreshed_at: DateTime<Utc>) -> Self {
        let mut entries: Vec<(String, u32)> = raw
            .into_iter()
            .map(|e| (clean_market_name(&e.name), e.price))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            entries,
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Min/max price over every listing whose cleaned name starts with
    /// the cleaned item name, across wears and StatTrak/Souvenir
    /// variants. Both sides are cleaned: seeded knife and glove names
    /// carry the upstream `★ ` prefix just like the feed's listings.
    /// Zero-priced listings are delisted placeholders and are ignored.
    pub fn range_for(&self, item_name: &str) -> Option<PriceRange> {
        let refreshed_at = self.refreshed_at?;
        let wanted = clean_market_name(item_name);
        let start = self
            .entries
            .partition_point(|(n, _)| n.as_str() < wanted.as_str());
        let mut min = u32::MAX;
        let mut max = 0u32;
        for (name, price) in &self.entries[start..] {
            if !name.starts_with(wanted.as_str()) {
                break;
            }
            if *price == 0 {
                continue;
            }
            min = min.min(*price);
            max = max.max(*price);
        }
        if max == 0 {
            return None;
        }
        Some(PriceRange {
            min,
            max,
            refreshed_at,
        })
    }
}

/// Shared handle over the current snapshot. Refreshes swap the whole
/// snapshot atomically; a failed refresh keeps the previous one.
pub struct PriceCache {
    snapshot: RwLock<Arc<PriceSnapshot>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(PriceSnapshot::empty())),
        }
    }

    pub async fn snapshot(&self) -> Arc<PriceSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    pub async fn refresh(&self, feed: &dyn PriceFeed) -> Result<usize, PriceFeedError> {
        let entries = feed.fetch().await?;
        let snapshot = Arc::new(PriceSnapshot::from_entries(entries, Utc::now()));
        let count = snapshot.len();
        *self.snapshot.write().await = snapshot;
        Ok(count)
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the periodic refresh task. The first tick fires immediately
/// so the cache is warm shortly after startup.
pub fn spawn_refresher(
    cache: Arc<PriceCache>,
    feed: Arc<dyn PriceFeed>,
    config: PriceFeedConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(config.refresh_secs.max(1)));
        loop {
            interval.tick().await;
            match cache.refresh(feed.as_ref()).await {
                Ok(count) => tracing::info!(listings = count, "Refreshed price cache"),
                Err(e) => tracing::warn!(%e, "Price refresh failed, keeping previous snapshot"),
            }
        }
    })
}

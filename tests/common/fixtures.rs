//! Shared fixtures: catalog items and a canned price feed.

use async_trait::async_trait;

use skinmatch::catalog::CatalogStore;
use skinmatch::color::{target_from_colors, Rgb};
use skinmatch::models::{Category, SkinItem};
use skinmatch::services::pricing::{PriceEntry, PriceFeedError};
use skinmatch::services::PriceFeed;

use super::app::TestApp;

pub fn skin(id: &str, name: &str, weapon: Option<&str>, category: Category, color: Rgb) -> SkinItem {
    SkinItem {
        id: id.into(),
        name: name.into(),
        image: format!("https://example.com/{id}.png"),
        weapon: weapon.map(Into::into),
        rarity: "Covert".into(),
        category,
        dominant_hex: color.to_hex(),
        histogram: target_from_colors(&[color]),
    }
}

pub struct StaticFeed(pub Vec<PriceEntry>);

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn fetch(&self) -> Result<Vec<PriceEntry>, PriceFeedError> {
        Ok(self.0.clone())
    }
}

impl TestApp {
    pub async fn seed(&self, items: Vec<SkinItem>) {
        for item in items {
            self.store.upsert(item).await.unwrap();
        }
    }

    /// Load the price cache from (raw listing name, cents) pairs.
    pub async fn set_prices(&self, prices: &[(&str, u32)]) {
        let feed = StaticFeed(
            prices
                .iter()
                .map(|(name, price)| PriceEntry {
                    name: (*name).into(),
                    price: *price,
                })
                .collect(),
        );
        self.prices.refresh(&feed).await.unwrap();
    }
}

/// A small red/blue catalog used across test files.
pub async fn seed_basic_catalog(app: &TestApp) {
    app.seed(vec![
        skin("ak-red", "AK-47 | Crimson Web", Some("AK-47"), Category::Weapon, Rgb::new(255, 0, 0)),
        skin("ak-dark", "AK-47 | Bloodline", Some("AK-47"), Category::Weapon, Rgb::new(230, 80, 30)),
        skin("awp-red", "AWP | Scarlet", Some("AWP"), Category::Weapon, Rgb::new(240, 10, 10)),
        skin("glock-red", "Glock-18 | Ruby", Some("Glock-18"), Category::Weapon, Rgb::new(230, 15, 15)),
        skin("awp-blue", "AWP | Cobalt", Some("AWP"), Category::Weapon, Rgb::new(0, 0, 255)),
        skin("knife-red", "Karambit | Crimson Web", Some("Karambit"), Category::Knife, Rgb::new(250, 5, 5)),
        skin("knife-blue", "Bayonet | Cobalt", Some("Bayonet"), Category::Knife, Rgb::new(10, 10, 250)),
    ])
    .await;
}

//! Catalog item model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::color::Histogram;

/// Equipment slot category of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weapon,
    Knife,
    Glove,
    Agent,
    Other,
}

impl Category {
    /// Categories that occupy a single exclusive loadout slot each.
    pub fn is_exclusive_slot(self) -> bool {
        matches!(self, Category::Knife | Category::Glove | Category::Agent)
    }
}

/// Observed market price range for an item, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRange {
    /// Lowest observed price in cents.
    pub min: u32,
    /// Highest observed price in cents.
    pub max: u32,
    /// When the snapshot this range came from was fetched.
    pub refreshed_at: DateTime<Utc>,
}

/// One item in the fixed catalog.
///
/// Created once by the offline seeding run; the histogram and swatch
/// are immutable afterwards. Prices are not stored here: they are
/// joined in from the price cache snapshot at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinItem {
    pub id: String,
    /// Display name, e.g. "AK-47 | Redline".
    pub name: String,
    /// Source image URL.
    pub image: String,
    /// Weapon or agent-team label, if any.
    pub weapon: Option<String>,
    pub rarity: String,
    pub category: Category,
    /// Representative display color as `#rrggbb`.
    pub dominant_hex: String,
    /// Fixed-shape color histogram (all-zero for placeholder rows).
    pub histogram: Histogram,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{histogram_from_image, Bin};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn sample_item() -> SkinItem {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])));
        SkinItem {
            id: "skin-1".into(),
            name: "AK-47 | Test".into(),
            image: "https://example.com/ak47.png".into(),
            weapon: Some("AK-47".into()),
            rarity: "Classified".into(),
            category: Category::Weapon,
            dominant_hex: "#ff0000".into(),
            histogram: histogram_from_image(&img),
        }
    }

    #[test]
    fn test_item_serde_round_trip() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        let back: SkinItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
        assert_eq!(back.histogram.get(Bin::Red), item.histogram.get(Bin::Red));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Knife).unwrap(), "\"knife\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"agent\"").unwrap(),
            Category::Agent
        );
    }

    #[test]
    fn test_exclusive_slot_categories() {
        assert!(Category::Knife.is_exclusive_slot());
        assert!(Category::Glove.is_exclusive_slot());
        assert!(Category::Agent.is_exclusive_slot());
        assert!(!Category::Weapon.is_exclusive_slot());
        assert!(!Category::Other.is_exclusive_slot());
    }
}

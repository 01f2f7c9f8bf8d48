pub mod config;
pub mod skin;

pub use config::{AppConfig, PriceFeedConfig, SeedConfig};
pub use skin::{Category, PriceRange, SkinItem};

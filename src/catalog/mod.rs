pub mod seed;
pub mod store;

pub use seed::{derive_category, HttpSeedSource, RawSkin, SeedError, SeedSource, SeedSummary, Seeder};
pub use store::{CatalogStore, InMemoryCatalog};

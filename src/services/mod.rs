pub mod inventory;
pub mod loadout;
pub mod pricing;
pub mod search;

pub use inventory::InventoryMatcher;
pub use loadout::{LoadoutComposer, LoadoutEntry, LoadoutRequest};
pub use pricing::{spawn_refresher, HttpPriceFeed, PriceCache, PriceFeed, PriceSnapshot};
pub use search::{Mode, RankedSkin, SearchService};

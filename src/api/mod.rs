//! HTTP API handlers.

pub mod inventory;
pub mod loadout;
pub mod skins;

pub use inventory::{handle_inventory_match, MatchBody, MatchResponse};
pub use loadout::{handle_loadout, LoadoutBody, LoadoutEntryDto, LoadoutResponse};
pub use skins::{handle_color_search, handle_list, handle_similar, SkinDto};

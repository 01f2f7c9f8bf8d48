//! Loadout composition.
//!
//! Builds a full equipment set matching a target color scheme under a
//! budget, honoring caller-pinned (locked) items. The output is a flat
//! list; grouping into slots is a presentation concern.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::color::{target_from_colors, Rgb};
use crate::error::ApiError;
use crate::models::Category;

use super::pricing::PriceCache;
use super::search::{Mode, RankedSkin};

/// Candidate recall cutoff: anything at or past this cosine distance is
/// not a plausible member of the color scheme.
const RECALL_THRESHOLD: f32 = 0.65;
/// Browsable alternatives kept per knife/glove/agent slot.
const ALTERNATES_PER_CATEGORY: usize = 5;

/// Display priority for the standard weapon roster, pistols through
/// heavy. Weapons not listed here sort after the roster by score.
const WEAPON_PRIORITY: &[&str] = &[
    "Glock-18",
    "USP-S",
    "P2000",
    "P250",
    "Dual Berettas",
    "Five-SeveN",
    "Tec-9",
    "CZ75-Auto",
    "Desert Eagle",
    "R8 Revolver",
    "Nova",
    "XM1014",
    "Sawed-Off",
    "MAG-7",
    "MAC-10",
    "MP9",
    "MP7",
    "MP5-SD",
    "UMP-45",
    "P90",
    "PP-Bizon",
    "Galil AR",
    "FAMAS",
    "AK-47",
    "M4A4",
    "M4A1-S",
    "SG 553",
    "AUG",
    "SSG 08",
    "AWP",
    "G3SG1",
    "SCAR-20",
    "M249",
    "Negev",
];

fn weapon_priority(name: &str) -> Option<usize> {
    WEAPON_PRIORITY.iter().position(|w| *w == name)
}

/// Composition parameters. Budget and prices are in cents.
#[derive(Debug, Clone)]
pub struct LoadoutRequest {
    pub colors: Vec<Rgb>,
    pub mode: Mode,
    pub max_budget: Option<u32>,
    pub locked_ids: Vec<String>,
}

/// One loadout slot holder or alternative.
#[derive(Debug, Clone)]
pub struct LoadoutEntry {
    pub skin: RankedSkin,
    pub locked: bool,
}

pub struct LoadoutComposer {
    store: Arc<dyn CatalogStore>,
    prices: Arc<PriceCache>,
}

impl LoadoutComposer {
    pub fn new(store: Arc<dyn CatalogStore>, prices: Arc<PriceCache>) -> Self {
        Self { store, prices }
    }

    pub async fn compose(&self, request: &LoadoutRequest) -> Result<Vec<LoadoutEntry>, ApiError> {
        let target = target_from_colors(&request.colors);
        let snapshot = self.prices.snapshot().await;

        // Locked items come first: they spend budget and close their
        // weapon or category slot before anything else is considered.
        let mut locked_entries: Vec<LoadoutEntry> = Vec::new();
        let mut locked_ids: HashSet<&str> = HashSet::new();
        let mut locked_weapons: HashSet<String> = HashSet::new();
        let mut locked_categories: HashSet<Category> = HashSet::new();
        let mut spent: u32 = 0;
        for id in &request.locked_ids {
            let Some(item) = self.store.by_id(id).await? else {
                tracing::warn!(id, "Ignoring unknown locked item");
                continue;
            };
            locked_ids.insert(id.as_str());
            if item.category.is_exclusive_slot() {
                locked_categories.insert(item.category);
            } else if let Some(weapon) = &item.weapon {
                locked_weapons.insert(weapon.clone());
            }
            let price = snapshot.range_for(&item.name);
            spent = spent.saturating_add(price.map(|p| p.min).unwrap_or(0));
            let distance = target.cosine_distance(&item.histogram);
            locked_entries.push(LoadoutEntry {
                skin: RankedSkin {
                    item,
                    distance,
                    price,
                },
                locked: true,
            });
        }

        // Clamp instead of failing: an over-committed budget just means
        // no unlocked items get added.
        let remaining = request.max_budget.map(|b| b.saturating_sub(spent));

        let pool = self.store.by_threshold(&target, RECALL_THRESHOLD).await?;
        let mut affordable: Vec<RankedSkin> = Vec::new();
        for (item, distance) in pool {
            if locked_ids.contains(item.id.as_str()) {
                continue;
            }
            match item.category {
                Category::Other => continue,
                Category::Weapon => {
                    let Some(weapon) = &item.weapon else { continue };
                    if locked_weapons.contains(weapon) {
                        continue;
                    }
                }
                category => {
                    if locked_categories.contains(&category) {
                        continue;
                    }
                }
            }
            let price = snapshot.range_for(&item.name);
            // Hard cutoff applies to known prices only
            if let (Some(budget), Some(range)) = (remaining, price) {
                if range.min > budget {
                    continue;
                }
            }
            affordable.push(RankedSkin {
                item,
                distance,
                price,
            });
        }

        let mode = request.mode;
        affordable.sort_by(|a, b| {
            a.score(mode)
                .total_cmp(&b.score(mode))
                .then_with(|| a.item.id.cmp(&b.item.id))
        });

        // One winner per weapon name, up to five per exclusive category
        let mut weapon_winners: HashMap<String, RankedSkin> = HashMap::new();
        let mut category_picks: HashMap<Category, Vec<RankedSkin>> = HashMap::new();
        for candidate in affordable {
            match candidate.item.category {
                Category::Weapon => {
                    let weapon = candidate
                        .item
                        .weapon
                        .clone()
                        .unwrap_or_default();
                    weapon_winners.entry(weapon).or_insert(candidate);
                }
                category => {
                    let picks = category_picks.entry(category).or_default();
                    if picks.len() < ALTERNATES_PER_CATEGORY {
                        picks.push(candidate);
                    }
                }
            }
        }

        let mut unlocked: Vec<LoadoutEntry> = weapon_winners
            .into_values()
            .chain(category_picks.into_values().flatten())
            .map(|skin| LoadoutEntry {
                skin,
                locked: false,
            })
            .collect();
        // Roster weapons in roster order, everything else by score
        unlocked.sort_by(|a, b| {
            let key = |e: &LoadoutEntry| {
                e.skin
                    .item
                    .weapon
                    .as_deref()
                    .filter(|_| e.skin.item.category == Category::Weapon)
                    .and_then(weapon_priority)
            };
            match (key(a), key(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a
                    .skin
                    .score(mode)
                    .total_cmp(&b.skin.score(mode))
                    .then_with(|| a.skin.item.id.cmp(&b.skin.item.id)),
            }
        });

        locked_entries.extend(unlocked);
        Ok(locked_entries)
    }
}

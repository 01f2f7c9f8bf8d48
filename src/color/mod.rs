//! The color-perception engine: bin taxonomy, per-sample classifier,
//! histogram builder, dominant swatch extractor and target vectors.

pub mod bins;
pub mod classify;
pub mod histogram;
pub mod space;
pub mod swatch;
pub mod target;

pub use bins::{Bin, BIN_COUNT, TAXONOMY_VERSION};
pub use classify::{classify, Classification};
pub use histogram::{histogram_from_image, Histogram};
pub use space::{Oklch, ParseColorError, Rgb};
pub use swatch::{dominant_swatch, NEUTRAL_SWATCH};
pub use target::{seed_colors_for_item, target_from_colors};

//! Per-sample color classification.
//!
//! Maps one RGBA sample to a weight distribution over the fixed bin
//! taxonomy. Lightness and chroma decisions are made in OkLCh; the hue
//! sector is picked on the HSL hue wheel with soft binning between the
//! two nearest sector centers, so near-identical colors at a sector
//! boundary do not land in different bins.

use crate::color::bins::{Bin, BIN_COUNT, HUE_BIN_COUNT, HUE_SECTOR_WIDTH};
use crate::color::space::{hsl_hue, Oklch, Rgb};

/// Minimum alpha for a sample to contribute at all.
pub const ALPHA_OPAQUE_MIN: u8 = 230;

/// OkLCh lightness below which a sample is Black.
pub const LIGHTNESS_BLACK: f32 = 0.15;

/// OkLCh lightness above which a sample is White.
pub const LIGHTNESS_WHITE: f32 = 0.95;

/// OkLCh chroma below which a sample is Gray.
pub const CHROMA_GRAY: f32 = 0.05;

/// Chroma ceiling for the White decision. Vivid light colors (pure
/// yellow has L ~ 0.97) must fall through to hue binning instead of
/// washing out to White.
pub const CHROMA_WHITE_LIMIT: f32 = 0.12;

// Brown carve-out: dull samples in the orange/yellow hue range read as
// brown, not as a dark orange.
const BROWN_HUE_MIN: f32 = 15.0;
const BROWN_HUE_MAX: f32 = 100.0;
const BROWN_LIGHTNESS_MAX: f32 = 0.4;
const BROWN_CHROMA_MAX: f32 = 0.1;

/// Result of classifying one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// Alpha below [`ALPHA_OPAQUE_MIN`]; contributes no weight and is
    /// excluded from any normalization denominator.
    Transparent,
    /// Full weight in one bin.
    Single(Bin),
    /// Weight split between two adjacent hue sectors. `upper_weight` is
    /// the share given to `upper`; `lower` gets the remainder.
    Split {
        lower: Bin,
        upper: Bin,
        upper_weight: f32,
    },
}

impl Classification {
    /// Add this sample's weight into a running bin accumulator.
    /// Returns the total weight contributed (1.0, or 0.0 if transparent).
    pub fn accumulate(&self, bins: &mut [f32; BIN_COUNT]) -> f32 {
        match *self {
            Classification::Transparent => 0.0,
            Classification::Single(bin) => {
                bins[bin.index()] += 1.0;
                1.0
            }
            Classification::Split {
                lower,
                upper,
                upper_weight,
            } => {
                bins[lower.index()] += 1.0 - upper_weight;
                bins[upper.index()] += upper_weight;
                1.0
            }
        }
    }

    /// The bin holding the largest share of this sample's weight.
    pub fn dominant_bin(&self) -> Option<Bin> {
        match *self {
            Classification::Transparent => None,
            Classification::Single(bin) => Some(bin),
            Classification::Split {
                lower,
                upper,
                upper_weight,
            } => Some(if upper_weight > 0.5 { upper } else { lower }),
        }
    }
}

/// Classify one RGBA sample into a bin weight distribution.
///
/// Decision order: transparency, black, white, gray, brown carve-out,
/// then soft hue binning.
pub fn classify(rgb: Rgb, alpha: u8) -> Classification {
    if alpha < ALPHA_OPAQUE_MIN {
        return Classification::Transparent;
    }

    let lch = Oklch::from(rgb);
    if lch.l < LIGHTNESS_BLACK {
        return Classification::Single(Bin::Black);
    }
    if lch.l > LIGHTNESS_WHITE && lch.c < CHROMA_WHITE_LIMIT {
        return Classification::Single(Bin::White);
    }
    if lch.c < CHROMA_GRAY {
        return Classification::Single(Bin::Gray);
    }

    let hue = hsl_hue(rgb);
    if (BROWN_HUE_MIN..BROWN_HUE_MAX).contains(&hue)
        && (lch.l < BROWN_LIGHTNESS_MAX || lch.c < BROWN_CHROMA_MAX)
    {
        return Classification::Single(Bin::Brown);
    }

    // Soft binning: sector centers sit at i * 20 degrees; a sample
    // between two centers splits its weight by angular distance.
    let pos = hue / HUE_SECTOR_WIDTH;
    let sector = pos.floor() as usize % HUE_BIN_COUNT;
    let upper_weight = pos - pos.floor();
    if upper_weight == 0.0 {
        Classification::Single(Bin::hue_bin(sector))
    } else {
        Classification::Split {
            lower: Bin::hue_bin(sector),
            upper: Bin::hue_bin(sector + 1),
            upper_weight,
        }
    }
}

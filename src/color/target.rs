//! Query-time target vectors.
//!
//! A target vector has the same shape as a stored histogram but is
//! derived from 1-3 seed colors and never persisted. Each seed color
//! contributes with equal weight, so one saturated swatch cannot drown
//! out the others in a multi-color query.

use std::str::FromStr;

use crate::color::classify::classify;
use crate::color::histogram::Histogram;
use crate::color::space::Rgb;

/// Histogram bins lighter than this weight are too faint to act as a
/// secondary seed color.
pub const SECONDARY_BIN_CUTOFF: f32 = 0.1;

/// A target vector uses at most this many seed colors.
pub const MAX_SEED_COLORS: usize = 3;

/// Build a target vector from seed colors.
///
/// Each color is classified as one fully opaque sample; the per-color
/// vectors are averaged with equal weight per color.
pub fn target_from_colors(colors: &[Rgb]) -> Histogram {
    let per_color: Vec<Histogram> = colors
        .iter()
        .map(|&rgb| Histogram::from_classification(&classify(rgb, 255)))
        .collect();
    Histogram::mean(&per_color)
}

/// Derive up to [`MAX_SEED_COLORS`] effective seed colors from a
/// catalog item's stored dominant swatch and histogram.
///
/// The dominant hex leads; the item's heaviest remaining histogram bins
/// above [`SECONDARY_BIN_CUTOFF`] follow as their representative
/// colors, deduplicated against the dominant swatch's own bin. This
/// carries an item's secondary coloring into loadout seeding instead of
/// reducing it to a single swatch.
pub fn seed_colors_for_item(dominant_hex: &str, histogram: &Histogram) -> Vec<Rgb> {
    let mut colors = Vec::with_capacity(MAX_SEED_COLORS);

    let dominant = Rgb::from_str(dominant_hex).ok();
    let dominant_bin = dominant.and_then(|rgb| classify(rgb, 255).dominant_bin());
    if let Some(rgb) = dominant {
        colors.push(rgb);
    }

    for (bin, weight) in histogram.top_bins() {
        if colors.len() >= MAX_SEED_COLORS {
            break;
        }
        if weight <= SECONDARY_BIN_CUTOFF {
            break;
        }
        if Some(bin) == dominant_bin {
            continue;
        }
        colors.push(bin.representative_color());
    }

    if colors.is_empty() {
        // Unparsable swatch and empty histogram: fall back to neutral
        colors.push(Rgb::new(0x80, 0x80, 0x80));
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::bins::{Bin, BIN_COUNT};
    use crate::color::histogram::WEIGHT_SUM_EPSILON;

    #[test]
    fn test_single_red_seed_is_all_red() {
        let target = target_from_colors(&[Rgb::new(255, 0, 0)]);
        assert!(
            target.get(Bin::Red) > 0.99,
            "#ff0000 target should be ~100% Red, got {}",
            target.get(Bin::Red)
        );
        assert!((target.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON);
    }

    #[test]
    fn test_two_seeds_split_evenly() {
        let target = target_from_colors(&[Rgb::new(255, 0, 0), Rgb::new(0, 200, 0)]);
        assert!(
            (target.get(Bin::Red) - 0.5).abs() < 0.01,
            "each seed color gets equal weight, Red={}",
            target.get(Bin::Red)
        );
        assert!(
            (target.get(Bin::Green) - 0.5).abs() < 0.01,
            "each seed color gets equal weight, Green={}",
            target.get(Bin::Green)
        );
    }

    #[test]
    fn test_empty_seed_list_gives_zero_vector() {
        let target = target_from_colors(&[]);
        assert!(target.is_zero());
    }

    #[test]
    fn test_target_has_fixed_shape() {
        let target = target_from_colors(&[Rgb::new(10, 20, 200)]);
        assert_eq!(target.weights().len(), BIN_COUNT);
    }

    #[test]
    fn test_item_seeds_lead_with_dominant_hex() {
        let hist = target_from_colors(&[Rgb::new(255, 0, 0)]);
        let seeds = seed_colors_for_item("#00c800", &hist);
        assert_eq!(seeds[0], Rgb::new(0, 200, 0), "dominant hex leads");
    }

    #[test]
    fn test_item_seeds_dedupe_dominant_bin() {
        // Dominant swatch is red and the histogram is all red: the Red
        // bin must not be added a second time.
        let hist = target_from_colors(&[Rgb::new(255, 0, 0)]);
        let seeds = seed_colors_for_item("#ff0000", &hist);
        assert_eq!(seeds.len(), 1, "red bin duplicates the red swatch");
    }

    #[test]
    fn test_item_seeds_include_material_secondary_bins() {
        // Histogram: half green, half blue; dominant swatch green.
        let hist = target_from_colors(&[Rgb::new(0, 200, 0), Rgb::new(0, 0, 255)]);
        let seeds = seed_colors_for_item("#00c800", &hist);
        assert!(
            seeds.len() >= 2,
            "a 0.5-weight secondary bin must become a seed, got {seeds:?}"
        );
    }

    #[test]
    fn test_item_seeds_skip_faint_bins() {
        // 19 red + 1 green seeds leave Green at 0.05, under the cutoff
        let mut colors = vec![Rgb::new(255, 0, 0); 19];
        colors.push(Rgb::new(0, 200, 0));
        let hist = Histogram::mean(
            &colors
                .iter()
                .map(|&c| target_from_colors(&[c]))
                .collect::<Vec<_>>(),
        );
        let seeds = seed_colors_for_item("#ff0000", &hist);
        assert_eq!(
            seeds.len(),
            1,
            "bins at or below the cutoff stay out, got {seeds:?}"
        );
    }

    #[test]
    fn test_item_seeds_cap_at_three() {
        let hist = target_from_colors(&[
            Rgb::new(255, 0, 0),
            Rgb::new(0, 200, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 0),
        ]);
        let seeds = seed_colors_for_item("#ff0000", &hist);
        assert!(seeds.len() <= MAX_SEED_COLORS);
    }

    #[test]
    fn test_unparsable_swatch_falls_back_to_neutral() {
        let seeds = seed_colors_for_item("not-a-color", &Histogram::zero());
        assert_eq!(seeds, vec![Rgb::new(0x80, 0x80, 0x80)]);
    }
}

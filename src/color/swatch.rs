//! Dominant swatch extraction.
//!
//! Picks one representative display color for an item by clustering a
//! sample of its opaque pixels in Oklab space. Cluster scoring favors
//! chroma so that a rare vivid accent can beat a numerous but dull trim
//! color; clusters near black or white are down-weighted unless they
//! keep meaningful chroma.

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::color::classify::{ALPHA_OPAQUE_MIN, CHROMA_GRAY};
use crate::color::space::{Oklab, Oklch, Rgb};

/// Neutral gray fallback when an image has no usable pixels.
pub const NEUTRAL_SWATCH: &str = "#808080";

const CLUSTER_COUNT: usize = 4;
const MAX_ITERATIONS: usize = 12;
const MAX_SAMPLES: usize = 4096;

/// Minimum population share for a cluster to win on score alone.
const MIN_CLUSTER_SHARE: f32 = 0.08;

// Chroma at which a cluster counts as fully vivid for scoring.
const VIVID_CHROMA: f32 = 0.12;

/// Extract the dominant display color of an image as a hex string.
///
/// Falls back to [`NEUTRAL_SWATCH`] when no opaque pixels exist.
pub fn dominant_swatch(image: &DynamicImage) -> String {
    let samples = sample_opaque_pixels(image);
    if samples.is_empty() {
        return NEUTRAL_SWATCH.to_string();
    }
    let clusters = k_means(&samples);
    let winner = pick_winner(&clusters, samples.len());
    Rgb::from(winner).to_hex()
}

fn sample_opaque_pixels(image: &DynamicImage) -> Vec<Oklab> {
    let rgba = image.to_rgba8();
    let total = (rgba.width() * rgba.height()) as usize;
    let stride = (total / MAX_SAMPLES).max(1);

    rgba.pixels()
        .step_by(stride)
        .filter(|p| p.0[3] >= ALPHA_OPAQUE_MIN)
        .map(|p| Oklab::from(Rgb::new(p.0[0], p.0[1], p.0[2])))
        .take(MAX_SAMPLES)
        .collect()
}

struct Cluster {
    centroid: Oklab,
    population: usize,
}

fn distance_squared(a: Oklab, b: Oklab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}

fn k_means(samples: &[Oklab]) -> Vec<Cluster> {
    let k = CLUSTER_COUNT.min(samples.len());
    // Fixed seed keeps swatch extraction deterministic across seeding
    // re-runs, which the idempotence contract depends on.
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut centroids: Vec<Oklab> = samples
        .choose_multiple(&mut rng, k)
        .copied()
        .collect();

    let mut assignments = vec![0usize; samples.len()];
    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, sample) in samples.iter().enumerate() {
            let nearest = centroids
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    distance_squared(*sample, **a).total_cmp(&distance_squared(*sample, **b))
                })
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        let mut sums = vec![(0.0f32, 0.0f32, 0.0f32, 0usize); k];
        for (sample, &cluster) in samples.iter().zip(assignments.iter()) {
            let entry = &mut sums[cluster];
            entry.0 += sample.l;
            entry.1 += sample.a;
            entry.2 += sample.b;
            entry.3 += 1;
        }
        for (centroid, &(l, a, b, n)) in centroids.iter_mut().zip(sums.iter()) {
            if n > 0 {
                let n = n as f32;
                *centroid = Oklab {
                    l: l / n,
                    a: a / n,
                    b: b / n,
                };
            }
        }

        if !changed {
            break;
        }
    }

    let mut clusters: Vec<Cluster> = centroids
        .into_iter()
        .map(|centroid| Cluster {
            centroid,
            population: 0,
        })
        .collect();
    for &assignment in &assignments {
        clusters[assignment].population += 1;
    }
    clusters.retain(|c| c.population > 0);
    clusters
}

fn score(cluster: &Cluster, total: usize) -> f32 {
    let share = cluster.population as f32 / total as f32;
    let lch = Oklch::from(cluster.centroid);
    let vividness = (lch.c / VIVID_CHROMA).min(1.0);
    let mut score = share * (0.35 + 0.65 * vividness);
    // A big pile of near-black or near-white pixels is usually backdrop
    // or trim, not the color the skin reads as.
    if (lch.l < 0.15 || lch.l > 0.9) && lch.c < CHROMA_GRAY {
        score *= 0.2;
    }
    score
}

fn pick_winner(clusters: &[Cluster], total: usize) -> Oklab {
    let best = clusters
        .iter()
        .max_by(|a, b| score(a, total).total_cmp(&score(b, total)));
    let largest = clusters.iter().max_by_key(|c| c.population);

    match (best, largest) {
        (Some(best), Some(largest)) => {
            let share = best.population as f32 / total as f32;
            if share >= MIN_CLUSTER_SHARE {
                best.centroid
            } else {
                largest.centroid
            }
        }
        // No clusters: neutral gray in Oklab
        _ => Oklab::from(Rgb::new(0x80, 0x80, 0x80)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::space::Rgb;
    use image::{Rgba, RgbaImage};
    use std::str::FromStr;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(rgba)))
    }

    #[test]
    fn test_fully_transparent_image_gives_neutral_gray() {
        let swatch = dominant_swatch(&solid(16, 16, [200, 10, 10, 0]));
        assert_eq!(swatch, NEUTRAL_SWATCH);
    }

    #[test]
    fn test_solid_color_returns_that_color() {
        let swatch = dominant_swatch(&solid(16, 16, [200, 30, 30, 255]));
        let rgb = Rgb::from_str(&swatch).unwrap();
        assert!(
            (rgb.r as i32 - 200).abs() <= 2
                && (rgb.g as i32 - 30).abs() <= 2
                && (rgb.b as i32 - 30).abs() <= 2,
            "solid image swatch should match the fill, got {swatch}"
        );
    }

    #[test]
    fn test_vivid_accent_beats_dull_majority() {
        // 80% near-black, 20% vivid red: the red accent should win.
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([8, 8, 8, 255]));
        for y in 0..20 {
            for x in 0..4 {
                img.put_pixel(x, y, Rgba([230, 20, 20, 255]));
            }
        }
        let swatch = dominant_swatch(&DynamicImage::ImageRgba8(img));
        let rgb = Rgb::from_str(&swatch).unwrap();
        assert!(
            rgb.r > 150 && rgb.g < 90 && rgb.b < 90,
            "vivid red accent should win over dull black majority, got {swatch}"
        );
    }

    #[test]
    fn test_swatch_is_deterministic() {
        let mut img = RgbaImage::from_pixel(24, 24, Rgba([40, 90, 160, 255]));
        for y in 0..24 {
            for x in 0..8 {
                img.put_pixel(x, y, Rgba([220, 210, 60, 255]));
            }
        }
        let image = DynamicImage::ImageRgba8(img);
        let first = dominant_swatch(&image);
        for _ in 0..3 {
            assert_eq!(
                dominant_swatch(&image),
                first,
                "swatch extraction must be deterministic"
            );
        }
    }

    #[test]
    fn test_swatch_is_valid_hex() {
        let swatch = dominant_swatch(&solid(8, 8, [1, 2, 3, 255]));
        assert!(Rgb::from_str(&swatch).is_ok(), "swatch {swatch} must parse");
    }
}

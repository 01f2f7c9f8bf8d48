//! Fixed-shape color histograms and the image histogram builder.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::color::bins::{Bin, BIN_COUNT};
use crate::color::classify::{classify, Classification};
use crate::color::space::Rgb;

/// Maximum edge length an image is downsampled to before sampling.
/// Bounds the per-image cost and keeps seeding deterministic.
pub const MAX_SAMPLE_DIM: u32 = 128;

/// Tolerance for the weights-sum-to-one invariant.
pub const WEIGHT_SUM_EPSILON: f32 = 1e-4;

/// An ordered vector of [`BIN_COUNT`] non-negative bin weights.
///
/// Invariant: the weights sum to 1 (within [`WEIGHT_SUM_EPSILON`]), or
/// are all zero when the source had no opaque pixels. Serializes as a
/// plain array so the bin order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram([f32; BIN_COUNT]);

impl Histogram {
    /// The all-zero histogram (placeholder for unusable sources).
    pub fn zero() -> Self {
        Self([0.0; BIN_COUNT])
    }

    /// Build a normalized histogram from raw accumulated bin totals.
    /// A zero total yields the all-zero histogram.
    pub fn from_accumulated(bins: [f32; BIN_COUNT], total: f32) -> Self {
        if total <= 0.0 {
            return Self::zero();
        }
        Self(bins.map(|w| w / total))
    }

    /// Build a single-sample histogram from one classification.
    pub fn from_classification(classification: &Classification) -> Self {
        let mut bins = [0.0; BIN_COUNT];
        let total = classification.accumulate(&mut bins);
        Self::from_accumulated(bins, total)
    }

    #[inline]
    pub fn weights(&self) -> &[f32; BIN_COUNT] {
        &self.0
    }

    #[inline]
    pub fn get(&self, bin: Bin) -> f32 {
        self.0[bin.index()]
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0.0)
    }

    fn norm(&self) -> f32 {
        self.0.iter().map(|w| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &Histogram) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cosine distance: 0.0 for identical direction, up to 2.0 for
    /// opposite. Zero-norm vectors are maximally distant (1.0) from
    /// everything, so placeholder rows sink to the bottom of rankings.
    pub fn cosine_distance(&self, other: &Histogram) -> f32 {
        let denom = self.norm() * other.norm();
        if denom <= f32::EPSILON {
            return 1.0;
        }
        1.0 - self.dot(other) / denom
    }

    /// Bins with non-zero weight, heaviest first. Ties break in bin
    /// order so the result is deterministic.
    pub fn top_bins(&self) -> Vec<(Bin, f32)> {
        let mut entries: Vec<(Bin, f32)> = Bin::ALL
            .iter()
            .map(|&bin| (bin, self.get(bin)))
            .filter(|&(_, w)| w > 0.0)
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Average several histograms with equal weight per input.
    pub fn mean(histograms: &[Histogram]) -> Histogram {
        if histograms.is_empty() {
            return Histogram::zero();
        }
        let mut bins = [0.0; BIN_COUNT];
        for h in histograms {
            for (acc, w) in bins.iter_mut().zip(h.0.iter()) {
                *acc += w;
            }
        }
        let n = histograms.len() as f32;
        Histogram(bins.map(|w| w / n))
    }
}

/// Build an item's permanent histogram from its source image.
///
/// The image is downsampled to at most [`MAX_SAMPLE_DIM`] on each edge
/// (aspect preserved) before every remaining pixel is classified. Fully
/// transparent images produce the all-zero histogram.
pub fn histogram_from_image(image: &DynamicImage) -> Histogram {
    let scaled = if image.width() > MAX_SAMPLE_DIM || image.height() > MAX_SAMPLE_DIM {
        image.thumbnail(MAX_SAMPLE_DIM, MAX_SAMPLE_DIM)
    } else {
        image.clone()
    };
    let rgba = scaled.to_rgba8();

    let mut bins = [0.0; BIN_COUNT];
    let mut total = 0.0;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        total += classify(Rgb::new(r, g, b), a).accumulate(&mut bins);
    }
    Histogram::from_accumulated(bins, total)
}

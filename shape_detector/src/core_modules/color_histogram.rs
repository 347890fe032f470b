// THEORY:
// The `ColorHistogram` is the color "signature" of a detected region. It is a
// 3-dimensional table of pixel counts indexed by (red bin, green bin, blue bin),
// gathered only over pixels selected by a mask.
//
// Key architectural principles:
// 1.  **Uniform Bins**: Each channel's [0, 256) range is split into `bins` equal
//     slots. With the default 32 bins, each slot spans 8 intensity levels, which
//     absorbs sensor noise while keeping distinct colors apart.
// 2.  **Exact Counting**: Counts are integers. Every masked pixel lands in exactly
//     one cell, so the table's total always equals the mask's pixel count.
// 3.  **Owned Storage**: Each histogram owns its table. Shapes never share one.
// 4.  **Correlation As Similarity**: Two signatures are compared with the Pearson
//     correlation of their cell counts. 1.0 means identical distributions
//     (up to scale), 0 means unrelated, negative means anti-correlated.

use image::{GrayImage, RgbImage};

/// Number of bins per channel used when no other resolution is configured.
pub const DEFAULT_BINS: usize = 32;

/// A mask-restricted 3-D RGB histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistogram {
    /// Bins per channel.
    bins: usize,
    /// Flattened `bins^3` table, indexed as `(r * bins + g) * bins + b`.
    counts: Vec<u32>,
}

impl ColorHistogram {
    /// An all-zero histogram with `bins` slots per channel.
    pub fn empty(bins: usize) -> Self {
        Self {
            bins,
            counts: vec![0; bins * bins * bins],
        }
    }

    /// Accumulates every `frame` pixel whose `mask` value is non-zero.
    /// `frame` and `mask` must share dimensions.
    pub fn from_masked(frame: &RgbImage, mask: &GrayImage, bins: usize) -> Self {
        let mut histogram = Self::empty(bins);
        for (pixel, mask_value) in frame.pixels().zip(mask.pixels()) {
            if mask_value.0[0] != 0 {
                let [r, g, b] = pixel.0;
                histogram.add(r, g, b);
            }
        }
        histogram
    }

    fn add(&mut self, r: u8, g: u8, b: u8) {
        let index = self.index_of(self.bin_of(r), self.bin_of(g), self.bin_of(b));
        self.counts[index] += 1;
    }

    fn bin_of(&self, value: u8) -> usize {
        value as usize * self.bins / 256
    }

    fn index_of(&self, r_bin: usize, g_bin: usize, b_bin: usize) -> usize {
        (r_bin * self.bins + g_bin) * self.bins + b_bin
    }

    fn count(&self, r_bin: usize, g_bin: usize, b_bin: usize) -> u32 {
        self.counts[self.index_of(r_bin, g_bin, b_bin)]
    }

    /// The count in the cell a given color falls into.
    pub fn count_for_color(&self, r: u8, g: u8, b: u8) -> u32 {
        self.count(self.bin_of(r), self.bin_of(g), self.bin_of(b))
    }

    /// Sum over all cells, i.e. the number of pixels accumulated.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Pearson correlation between the two tables, in [-1, 1].
    ///
    /// If either table has zero variance the score is 1.0. Returns `None` when
    /// the bin resolutions differ.
    pub fn correlation(&self, other: &ColorHistogram) -> Option<f64> {
        if self.bins != other.bins {
            return None;
        }
        let n = self.counts.len() as f64;
        if n == 0.0 {
            return Some(1.0);
        }
        let mean_a = self.counts.iter().map(|&c| c as f64).sum::<f64>() / n;
        let mean_b = other.counts.iter().map(|&c| c as f64).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance_a = 0.0;
        let mut variance_b = 0.0;
        for (&a, &b) in self.counts.iter().zip(&other.counts) {
            let da = a as f64 - mean_a;
            let db = b as f64 - mean_b;
            covariance += da * db;
            variance_a += da * da;
            variance_b += db * db;
        }

        let denominator = variance_a * variance_b;
        if denominator.abs() <= f64::EPSILON {
            return Some(1.0);
        }
        Some((covariance / denominator.sqrt()).clamp(-1.0, 1.0))
    }
}

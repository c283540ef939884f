//! Fixed-binning histograms, the accumulators of the analyses
//!
//! Bin contents are laid out the way ROOT lays out TH1D/TH2D: bin 0 is the
//! underflow bin, bins 1..=N cover the axis range, and bin N+1 is the
//! overflow bin. For 2D histograms, the global bin index is
//! `x_bin + (num_x_bins + 2) * y_bin`.

use crate::{numeric::Float, scheduling::Merge};
use serde::Serialize;

/// Regular binning of one axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Axis {
    /// Number of bins within the range
    pub num_bins: usize,

    /// Lower edge of the first bin
    pub min: Float,

    /// Upper edge of the last bin
    pub max: Float,
}
//
impl Axis {
    /// Set up a regular binning
    pub fn new(num_bins: usize, min: Float, max: Float) -> Self {
        assert!(num_bins > 0, "An axis needs at least one bin");
        assert!(min < max, "Axis range must be ordered");
        Self { num_bins, min, max }
    }

    /// Bin index of a value, including the underflow and overflow bins
    ///
    /// Lower bin edges are inclusive, upper bin edges are exclusive.
    pub fn find_bin(&self, x: Float) -> usize {
        if x < self.min {
            0
        } else if x >= self.max {
            self.num_bins + 1
        } else {
            let fraction = (x - self.min) / (self.max - self.min);
            // Rounding can push values right below max into the overflow bin
            1 + ((fraction * self.num_bins as Float) as usize).min(self.num_bins - 1)
        }
    }

    /// Width of the bins
    pub fn bin_width(&self) -> Float {
        (self.max - self.min) / self.num_bins as Float
    }

    /// Lower edge of a bin (1-based)
    pub fn bin_low_edge(&self, bin: usize) -> Float {
        self.min + (bin as Float - 1.) * self.bin_width()
    }
}

/// One-dimensional histogram
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hist1D {
    /// Identifier in the output file
    pub name: String,

    /// Title and axis labels, ROOT style
    pub title: String,

    /// Binning
    pub axis: Axis,

    /// Bin contents, underflow and overflow included
    pub contents: Vec<Float>,

    /// Number of fill operations
    pub entries: usize,
}
//
impl Hist1D {
    /// Create an empty histogram
    pub fn new(name: &str, title: &str, num_bins: usize, min: Float, max: Float) -> Self {
        let axis = Axis::new(num_bins, min, max);
        Self {
            name: name.to_owned(),
            title: title.to_owned(),
            axis,
            contents: vec![0.; num_bins + 2],
            entries: 0,
        }
    }

    /// Record one value. NaN values are not recorded.
    pub fn fill(&mut self, x: Float) {
        if x.is_nan() {
            return;
        }
        self.contents[self.axis.find_bin(x)] += 1.;
        self.entries += 1;
    }

    /// Content of a bin, 0 being underflow and N+1 overflow
    pub fn bin_content(&self, bin: usize) -> Float {
        self.contents[bin]
    }

    /// Sum of the contents of the in-range bins
    pub fn integral(&self) -> Float {
        self.contents[1..=self.axis.num_bins].iter().sum()
    }
}
//
impl Merge for Hist1D {
    fn merge(&mut self, other: Self) {
        assert_eq!(self.axis, other.axis, "Cannot merge histograms of different binning");
        for (acc, x) in self.contents.iter_mut().zip(other.contents) {
            *acc += x;
        }
        self.entries += other.entries;
    }
}

/// Two-dimensional histogram
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hist2D {
    /// Identifier in the output file
    pub name: String,

    /// Title and axis labels, ROOT style
    pub title: String,

    /// Horizontal binning
    pub x_axis: Axis,

    /// Vertical binning
    pub y_axis: Axis,

    /// Bin contents, underflow and overflow included, x-major
    pub contents: Vec<Float>,

    /// Number of fill operations
    pub entries: usize,
}
//
impl Hist2D {
    /// Create an empty histogram
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        title: &str,
        num_x_bins: usize,
        x_min: Float,
        x_max: Float,
        num_y_bins: usize,
        y_min: Float,
        y_max: Float,
    ) -> Self {
        let x_axis = Axis::new(num_x_bins, x_min, x_max);
        let y_axis = Axis::new(num_y_bins, y_min, y_max);
        Self {
            name: name.to_owned(),
            title: title.to_owned(),
            x_axis,
            y_axis,
            contents: vec![0.; (num_x_bins + 2) * (num_y_bins + 2)],
            entries: 0,
        }
    }

    /// Global bin index of a (x bin, y bin) pair
    pub fn bin(&self, x_bin: usize, y_bin: usize) -> usize {
        x_bin + (self.x_axis.num_bins + 2) * y_bin
    }

    /// Record one (x, y) pair. Pairs with a NaN coordinate are not recorded.
    pub fn fill(&mut self, x: Float, y: Float) {
        if x.is_nan() || y.is_nan() {
            return;
        }
        let bin = self.bin(self.x_axis.find_bin(x), self.y_axis.find_bin(y));
        self.contents[bin] += 1.;
        self.entries += 1;
    }

    /// Content of a (x bin, y bin) cell
    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> Float {
        self.contents[self.bin(x_bin, y_bin)]
    }

    /// Sum of the contents of the in-range cells
    pub fn integral(&self) -> Float {
        (1..=self.y_axis.num_bins)
            .flat_map(|y_bin| (1..=self.x_axis.num_bins).map(move |x_bin| (x_bin, y_bin)))
            .map(|(x_bin, y_bin)| self.bin_content(x_bin, y_bin))
            .sum()
    }
}
//
impl Merge for Hist2D {
    fn merge(&mut self, other: Self) {
        assert_eq!(
            (self.x_axis, self.y_axis),
            (other.x_axis, other.y_axis),
            "Cannot merge histograms of different binning"
        );
        for (acc, x) in self.contents.iter_mut().zip(other.contents) {
            *acc += x;
        }
        self.entries += other.entries;
    }
}

/// Any histogram, as stored in an output file
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Histogram {
    /// One-dimensional histogram
    #[serde(rename = "TH1D")]
    H1(Hist1D),

    /// Two-dimensional histogram
    #[serde(rename = "TH2D")]
    H2(Hist2D),
}
//
impl Histogram {
    /// Identifier in the output file
    pub fn name(&self) -> &str {
        match self {
            Self::H1(h) => &h.name,
            Self::H2(h) => &h.name,
        }
    }
}

impl From<Hist1D> for Histogram {
    fn from(h: Hist1D) -> Self {
        Self::H1(h)
    }
}

impl From<Hist2D> for Histogram {
    fn from(h: Hist2D) -> Self {
        Self::H2(h)
    }
}

//! Distribution summaries over a table's scores, backing the report's
//! box plot line and histogram.

use std::cmp::Ordering;

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 20;

/// Five-number summary plus mean over a non-empty score vector.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
}

impl ScoreSummary {
    /// Computes the summary, or `None` when `values` is empty.
    /// Quartiles use linear interpolation between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<ScoreSummary> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        Some(ScoreSummary {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median: percentile(&sorted, 0.5),
            q1: percentile(&sorted, 0.25),
            q3: percentile(&sorted, 0.75),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey fences at 1.5 IQR delimiting the box plot whiskers.
    pub fn fences(&self) -> (f64, f64) {
        let spread = 1.5 * self.iqr();
        (self.q1 - spread, self.q3 + spread)
    }

    /// Count of values falling outside the whiskers.
    pub fn outside_fences(&self, values: &[f64]) -> usize {
        let (low, high) = self.fences();
        values.iter().filter(|v| **v < low || **v > high).count()
    }
}

/// `sorted` must be ascending and non-empty, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let low = pos.floor() as usize;
    let high = pos.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        let frac = pos - low as f64;
        sorted[low] * (1.0 - frac) + sorted[high] * frac
    }
}

/// A single equal-width histogram bin.
#[derive(PartialEq, Debug, Clone)]
pub struct HistogramBin {
    /// Left edge, inclusive.
    pub left: f64,
    /// Right edge, exclusive except for the last bin.
    pub right: f64,
    pub count: usize,
}

/// Equal-width histogram over a score vector.
#[derive(PartialEq, Debug, Clone)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    total: usize,
}

impl Histogram {
    /// Bins `values` into `bin_count` equal-width bins spanning the data
    /// range. The last bin includes its right edge. A constant vector
    /// collapses into a single bin. Returns `None` when `values` is
    /// empty or `bin_count` is zero.
    pub fn from_values(values: &[f64], bin_count: usize) -> Option<Histogram> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return Some(Histogram {
                bins: vec![HistogramBin {
                    left: min,
                    right: max,
                    count: values.len(),
                }],
                total: values.len(),
            });
        }
        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                left: min + width * i as f64,
                right: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();
        for v in values {
            let mut idx = ((v - min) / width) as usize;
            if idx >= bin_count {
                idx = bin_count - 1;
            }
            bins[idx].count += 1;
        }
        Some(Histogram {
            bins,
            total: values.len(),
        })
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Largest bin count, used to scale bar rendering.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

//! Monthly trend chart model.
//!
//! A pure function of the series: one point per entry, in series order.
//! Missing months are not filled in.

use crate::data::SeriesPoint;

/// Plot-ready form of the monthly series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    /// `(index, visits)` pairs.
    pub points: Vec<(f64, f64)>,
    /// X-axis labels, one per point.
    pub labels: Vec<String>,
    /// Largest value in the series.
    pub max: u64,
}

impl TrendChart {
    /// Build the chart, or `None` when there is nothing to plot.
    pub fn from_series(series: &[SeriesPoint]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let points = series
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value as f64))
            .collect();
        let labels = series.iter().map(|p| p.name.clone()).collect();
        let max = series.iter().map(|p| p.value).max().unwrap_or(0);

        Some(Self {
            points,
            labels,
            max,
        })
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.points.len().saturating_sub(1)).max(1) as f64]
    }

    /// Y range with a little headroom; never collapses to zero height.
    pub fn y_bounds(&self) -> [f64; 2] {
        let top = (self.max as f64 * 1.1).ceil().max(1.0);
        [0.0, top]
    }

    /// Up to `max_labels` evenly spaced x labels, always keeping both ends.
    pub fn axis_labels(&self, max_labels: usize) -> Vec<String> {
        let n = self.labels.len();
        if n <= max_labels || max_labels < 2 {
            return self.labels.clone();
        }

        let step = (n - 1) as f64 / (max_labels - 1) as f64;
        (0..max_labels)
            .map(|i| self.labels[((i as f64 * step).round() as usize).min(n - 1)].clone())
            .collect()
    }
}

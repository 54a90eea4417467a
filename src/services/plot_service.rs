//! Scatter-chart data: blended workload cost per model and a least-squares
//! trendline over the cloud of points.

use serde::Serialize;

use crate::models::record::{ModelRecord, RecordSource};

/// Token volumes behind the blended cost axis, in millions.
/// Roughly a 22:1 input:output mix.
const INPUT_TOKENS_M: f64 = 11_102_525.0 / 1_000_000.0;
const OUTPUT_TOKENS_M: f64 = 502_975.0 / 1_000_000.0;

/// One scatter point: blended dollar cost against normalized efficiency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub cost: f64,
    pub efficiency: f64,
    pub is_favorite: bool,
    pub is_modified: bool,
    pub input_cost: f64,
    pub output_cost: f64,
    pub source: RecordSource,
}

/// Straight line fitted through the chart points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
}

impl Trendline {
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Build chart points for records that can be plotted: a positive score,
/// both costs present, and a non-empty name.
pub fn chart_points(records: &[ModelRecord], favorites: &[String]) -> Vec<ChartPoint> {
    records
        .iter()
        .filter(|r| {
            r.efficiency_score > 0.0 && r.input_cost > 0.0 && r.output_cost > 0.0 && !r.name.is_empty()
        })
        .map(|r| ChartPoint {
            name: r.name.clone(),
            cost: round2(blended_cost(r)),
            efficiency: r.efficiency_score,
            is_favorite: favorites.iter().any(|id| id == &r.id),
            is_modified: r.is_modified,
            input_cost: r.input_cost,
            output_cost: r.output_cost,
            source: r.source,
        })
        .collect()
}

/// Dollar cost of running the fixed mixed workload through a model.
pub fn blended_cost(record: &ModelRecord) -> f64 {
    INPUT_TOKENS_M * record.input_cost + OUTPUT_TOKENS_M * record.output_cost
}

/// Ordinary least-squares fit over (cost, efficiency). `None` for fewer
/// than two points or zero x-variance, where the slope is undefined.
pub fn linear_trendline(points: &[ChartPoint]) -> Option<Trendline> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.cost).sum();
    let sum_y: f64 = points.iter().map(|p| p.efficiency).sum();
    let sum_xy: f64 = points.iter().map(|p| p.cost * p.efficiency).sum();
    let sum_x2: f64 = points.iter().map(|p| p.cost * p.cost).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(Trendline { slope, intercept })
}

/// Drop points outside 1.5 IQR of either axis.
pub fn remove_outliers(points: &[ChartPoint]) -> Vec<ChartPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let (cost_lo, cost_hi) = iqr_fence(points.iter().map(|p| p.cost).collect());
    let (eff_lo, eff_hi) = iqr_fence(points.iter().map(|p| p.efficiency).collect());

    points
        .iter()
        .filter(|p| {
            p.cost >= cost_lo && p.cost <= cost_hi && p.efficiency >= eff_lo && p.efficiency <= eff_hi
        })
        .cloned()
        .collect()
}

fn iqr_fence(mut values: Vec<f64>) -> (f64, f64) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

// Linear-interpolation quantile over an already-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (position - lower as f64) * (sorted[upper] - sorted[lower])
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

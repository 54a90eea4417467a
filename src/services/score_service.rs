//! Record processing and whole-batch score normalization.

use crate::models::raw::RawModel;
use crate::models::record::{ModelRecord, RecordSource};

/// Costs are kept as dollars per one million tokens.
const COST_SCALE: f64 = 1_000_000.0;
/// Rounding factor for scaled costs: 10 fractional digits, enough to swallow
/// float artifacts from the rescale before any display-level rounding.
const COST_ROUND: f64 = 1e10;

/// Map one raw provider record into the internal shape.
///
/// The returned `efficiency_score` is the raw (pre-normalization) score;
/// callers run the full batch through [`normalize_scores`] afterwards.
pub fn process_model(raw: &RawModel) -> ModelRecord {
    let pricing = raw.pricing.as_ref();
    let input_cost = scale_cost(pricing.and_then(|p| p.prompt.as_deref()));
    let output_cost = scale_cost(pricing.and_then(|p| p.completion.as_deref()));

    let top = raw.top_provider.as_ref();
    let max_output = top.and_then(|t| t.max_completion_tokens).unwrap_or(0);
    let context_size = top.and_then(|t| t.context_length).unwrap_or(0);

    ModelRecord {
        id: raw.id.clone(),
        name: raw.name.clone(),
        input_cost,
        output_cost,
        max_output,
        context_size,
        efficiency_score: raw_efficiency_score(input_cost, output_cost, max_output, context_size),
        source: RecordSource::Provider,
        is_modified: false,
        original_data: Some(raw.clone()),
    }
}

/// Parse a decimal-string unit price and rescale it to dollars per one
/// million tokens. Missing, unparsable, non-finite, or negative values
/// become 0 rather than failing the record.
fn scale_cost(price: Option<&str>) -> f64 {
    let unit = price
        .and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0);
    (unit * COST_SCALE * COST_ROUND).round() / COST_ROUND
}

/// Raw capability-per-cost ratio. Cost-free or capability-free records are
/// defined as zero efficiency, never infinite.
pub(crate) fn raw_efficiency_score(
    input_cost: f64,
    output_cost: f64,
    max_output: u64,
    context_size: u64,
) -> f64 {
    if input_cost == 0.0 && output_cost == 0.0 {
        return 0.0;
    }

    let average_cost = (input_cost + output_cost) / 2.0;
    if average_cost == 0.0 || max_output == 0 || context_size == 0 {
        return 0.0;
    }

    let capability = (max_output as f64 * context_size as f64).max(1.0).ln();
    capability / (average_cost * 1_000_000.0)
}

/// Rescale a batch of raw scores onto [0, 100].
///
/// Z-scores over the finite positive ("valid") raw scores are mapped so that
/// ±3 standard deviations span the range, clamped at the extremes and rounded
/// to 2 decimals. Invalid scores become 0. One pass per batch; scores from
/// different batches are not comparable.
pub fn normalize_scores(records: &mut [ModelRecord]) {
    let valid: Vec<f64> = records
        .iter()
        .map(|r| r.efficiency_score)
        .filter(|s| is_valid_score(*s))
        .collect();

    if valid.is_empty() {
        for record in records.iter_mut() {
            record.efficiency_score = 0.0;
        }
        return;
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    // Sample standard deviation; a single-element batch falls through to the
    // zero-stddev substitution below and lands on z = 0.
    let std_dev = if valid.len() < 2 {
        0.0
    } else {
        let variance = valid.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;
        variance.sqrt()
    };
    let std_dev = if std_dev == 0.0 { 1.0 } else { std_dev };

    for record in records.iter_mut() {
        let raw = record.efficiency_score;
        record.efficiency_score = if is_valid_score(raw) {
            let z = (raw - mean) / std_dev;
            round2((((z + 3.0) / 6.0) * 100.0).clamp(0.0, 100.0))
        } else {
            0.0
        };
    }
}

fn is_valid_score(score: f64) -> bool {
    score.is_finite() && score > 0.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

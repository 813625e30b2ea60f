use serde::Serialize;

/// Distribution statistics for a sample of run profits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistStats {
    pub n: usize,
    pub min: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); 0 for a single value.
    pub std_dev: f64,
}

/// Arithmetic mean, summed in sample order so that equal samples give
/// bit-equal means regardless of how they were produced.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Summarise a sample. Quantiles interpolate linearly between neighbouring
/// sorted values. Returns `None` for an empty sample.
pub fn summarise(values: &[f64]) -> Option<DistStats> {
    let mean = mean(values)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let last = sorted.len() - 1;

    let quantile = |q: f64| {
        let pos = q * last as f64;
        let below = pos as usize;
        let above = (below + 1).min(last);
        sorted[below] + (sorted[above] - sorted[below]) * (pos - below as f64)
    };
    let [p5, p25, p50, p75, p95] = [0.05, 0.25, 0.50, 0.75, 0.95].map(quantile);

    let squared_deviations: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    let std_dev = if last == 0 { 0.0 } else { (squared_deviations / last as f64).sqrt() };

    Some(DistStats {
        n: sorted.len(),
        min: sorted[0],
        max: sorted[last],
        p5,
        p25,
        p50,
        p75,
        p95,
        mean,
        std_dev,
    })
}

/// Trailing simple moving average of `data` over `period` values.
///
/// The output is aligned to the end of `data`: element `i` is the mean of
/// `data[i..i + period]`, so exactly `data.len() - period + 1` values are produced. Shorter
/// input, or a zero period, yields no values.
pub fn simple_moving_average(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    data.windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

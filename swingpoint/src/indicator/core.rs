/// A column derived from aligned high/low/close series.
///
/// Inputs may contain nulls; the output has one entry per input row.
pub trait Indicator {
    fn name(&self) -> &str;
    fn compute(
        &self,
        highs: &[Option<f64>],
        lows: &[Option<f64>],
        closes: &[Option<f64>],
    ) -> Vec<Option<f64>>;
}

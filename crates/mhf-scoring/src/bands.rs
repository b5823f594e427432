//! Data-defined point bands.
//!
//! Every banded measurement in the scorers is an ordered slice of closed
//! `(lo, hi, points)` intervals plus one of the lookup helpers below, so
//! adding or adjusting a table is a data change, not new branching logic.
//! Well-formedness (sorted, disjoint, gap-free where the model requires it)
//! is asserted by the table owners' tests via [`is_well_formed`].

/// One closed band `[lo, hi]` worth a fixed number of points.
pub type Band = (f64, f64, i32);

/// Points of the band containing `value`, or `None` when no band covers it.
pub fn band_points(bands: &[Band], value: f64) -> Option<i32> {
    bands
        .iter()
        .find(|(lo, hi, _)| *lo <= value && value <= *hi)
        .map(|(_, _, points)| *points)
}

/// Lower-bound threshold lookup: points of the highest threshold that is
/// `<= value`, or `None` when `value` is below the lowest threshold.
pub fn threshold_points(thresholds: &[(f64, i32)], value: f64) -> Option<i32> {
    thresholds
        .iter()
        .rev()
        .find(|(lo, _)| value >= *lo)
        .map(|(_, points)| *points)
}

/// Bands are sorted, non-overlapping, and each is non-empty.
pub fn is_well_formed(bands: &[Band]) -> bool {
    bands.iter().all(|(lo, hi, _)| lo <= hi)
        && bands.windows(2).all(|w| w[0].1 < w[1].0)
}

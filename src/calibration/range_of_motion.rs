//! Conversion of turning points into corrected range-of-motion bounds.

use super::{Direction, RomBounds, TurningPoint};

/// Fraction of each extremum trimmed off as sensor overshoot.
pub const MARGIN: f64 = 0.05;
/// Fraction of the raw span trimmed from each side when it exceeds `MARGIN`.
pub const ERROR_CORRECTION_FRACTION: f64 = 0.2;

/// Midpoint of the last two turning points in `direction`, if they agree to
/// within `max_difference`.
fn settled_extremum(points: &[TurningPoint], direction: Direction, max_difference: f64) -> Option<f64> {
    let mut latest = points.iter().rev().filter(|p| p.direction == direction);
    let b = latest.next()?.value;
    let a = latest.next()?.value;
    if (a - b).abs() <= max_difference {
        Some(0.5 * (a + b))
    } else {
        None
    }
}

/// Derives ROM bounds from the turning points collected so far.
///
/// Needs at least two turning points per direction whose latest pair agrees
/// to within `max_difference`; otherwise `None` is returned and the caller
/// should keep collecting. Maxima come from `Increasing` turning points and
/// minima from `Decreasing` ones. Both ends are pulled inwards by the larger
/// of a 5% margin and a fifth of the raw span, and the result is reordered
/// if the correction crossed them over. Bounds with no span are never
/// returned.
pub fn compute_bounds(points: &[TurningPoint], max_difference: f64) -> Option<RomBounds> {
    let high_raw = settled_extremum(points, Direction::Increasing, max_difference)?;
    let low_raw = settled_extremum(points, Direction::Decreasing, max_difference)?;

    let error_correction = ERROR_CORRECTION_FRACTION * (high_raw - low_raw);
    let high = high_raw - (high_raw * MARGIN).max(error_correction);
    let low = low_raw + (low_raw * MARGIN).max(error_correction);

    let bounds = RomBounds::new(low, high);
    if bounds.is_degenerate() {
        None
    } else {
        Some(bounds)
    }
}

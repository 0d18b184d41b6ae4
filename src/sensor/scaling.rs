//! Mapping from raw sensor distance to the normalized pull amount.
//!
//! The pull amount is 1 when the reading sits at the low bound (fully pulled)
//! and 0 at the high bound. Sensors mounted the other way round set the
//! `inverted` flag, which flips the result once more.

use tracing::trace;

use super::filter::InputSmoothingFilter;
use crate::calibration::RomBounds;
use crate::error::{CalibrationError, Result};

/// Position of `raw` inside `bounds`, clamped to [0, 1].
pub fn normalize(raw: f64, bounds: &RomBounds) -> f64 {
    ((raw - bounds.low()) / bounds.span()).clamp(0.0, 1.0)
}

/// Normalized pull amount for a raw reading.
pub fn pull_amount(raw: f64, bounds: &RomBounds, inverted: bool) -> f64 {
    let pulled = (normalize(raw, bounds) - 1.0).abs();
    if inverted {
        1.0 - pulled
    } else {
        pulled
    }
}

fn ensure_usable(bounds: &RomBounds) -> Result<()> {
    if bounds.is_degenerate() {
        return Err(CalibrationError::DegenerateBounds {
            low: bounds.low(),
            high: bounds.high(),
        });
    }
    Ok(())
}

/// Scales raw readings against the active bounds and smooths the result.
pub struct ScalingPipeline {
    bounds: RomBounds,
    inverted: bool,
    filter: Option<InputSmoothingFilter>,
    smoothed: f64,
}

impl ScalingPipeline {
    /// Builds a pipeline for `bounds`.
    ///
    /// With `prevent_filtering` set the scaled value passes straight through;
    /// this is what an automated calibration pass uses.
    pub fn new(bounds: RomBounds, inverted: bool, prevent_filtering: bool) -> Result<Self> {
        ensure_usable(&bounds)?;
        Ok(Self {
            bounds,
            inverted,
            filter: (!prevent_filtering).then(|| InputSmoothingFilter::for_bounds(&bounds)),
            smoothed: 0.0,
        })
    }

    pub fn scale(&self, raw: f64) -> f64 {
        pull_amount(raw, &self.bounds, self.inverted)
    }

    /// Scales and smooths one raw reading, returning the new control value.
    ///
    /// Non-finite readings are ignored and the previous output is returned.
    pub fn feed(&mut self, raw: f64) -> f64 {
        if !raw.is_finite() {
            trace!(raw, "ignoring non-finite reading");
            return self.smoothed;
        }
        let scaled = self.scale(raw);
        self.smoothed = match self.filter.as_mut() {
            Some(filter) => filter.feed(scaled),
            None => scaled,
        };
        self.smoothed
    }

    pub fn smoothed_pull_amount(&self) -> f64 {
        self.smoothed
    }

    /// Applies new session settings.
    ///
    /// The smoothing filter is sized from the bounds, so it is rebuilt (and
    /// its history dropped) whenever the bounds change or filtering is
    /// switched back on.
    pub fn reconfigure(
        &mut self,
        bounds: RomBounds,
        inverted: bool,
        prevent_filtering: bool,
    ) -> Result<()> {
        ensure_usable(&bounds)?;
        let bounds_changed = bounds != self.bounds;
        self.bounds = bounds;
        self.inverted = inverted;

        if prevent_filtering {
            self.filter = None;
        } else if bounds_changed || self.filter.is_none() {
            self.filter = Some(InputSmoothingFilter::for_bounds(&bounds));
        }
        Ok(())
    }

    pub fn bounds(&self) -> RomBounds {
        self.bounds
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    /// Capacity of the active smoothing filter, if filtering is on.
    pub fn filter_amount(&self) -> Option<usize> {
        self.filter.as_ref().map(InputSmoothingFilter::capacity)
    }
}

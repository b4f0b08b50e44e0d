mod null_engine;
mod snapshot;

pub use null_engine::NullEngine;
pub use snapshot::PropertySnapshot;

use chrono::TimeDelta;

use crate::error::ChartResult;

/// Animation speed used while no speed is configured on the control.
pub const DEFAULT_ANIMATION_SPEED_MS: i64 = 300;

/// Contract implemented by the calculation engine behind a chart control.
///
/// The control calls the engine synchronously and never re-enters it: changes
/// made from inside `update` or `redraw` are deferred by the control.
pub trait CalculationEngine {
    /// Recomputes the chart model from the current property values.
    fn update(&mut self, snapshot: &PropertySnapshot) -> ChartResult<()>;

    /// Redraws without recomputing the model.
    fn redraw(&mut self, _snapshot: &PropertySnapshot) -> ChartResult<()> {
        Ok(())
    }

    fn default_animation_speed(&self) -> TimeDelta {
        TimeDelta::milliseconds(DEFAULT_ANIMATION_SPEED_MS)
    }
}

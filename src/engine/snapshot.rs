use std::fmt;
use std::rc::Rc;

use chrono::TimeDelta;

use crate::api::UpdateReason;
use crate::core::{AxesCollection, Color, LegendLocation, SeriesCollection, ZoomingOptions};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{LegendPresenter, TooltipPresenter};

/// Property values handed to the calculation engine on every call.
///
/// Collections are shared handles, so the engine reads members as they are
/// at call time. Style indices and colors are resolved by the control.
#[derive(Clone)]
pub struct PropertySnapshot {
    pub reason: UpdateReason,
    pub axis_x: Option<AxesCollection>,
    pub axis_y: Option<AxesCollection>,
    pub series: Option<SeriesCollection>,
    pub series_style_indices: Vec<usize>,
    pub series_colors: Vec<Color>,
    pub zoom: ZoomingOptions,
    pub zooming_speed: f64,
    pub legend_location: LegendLocation,
    pub legend: Option<Rc<dyn LegendPresenter>>,
    pub tooltip: Option<Rc<dyn TooltipPresenter>>,
    pub hoverable: bool,
    pub animation_cadence: TimeDelta,
    pub has_data_click_handler: bool,
}

impl PropertySnapshot {
    #[must_use]
    pub fn series_len(&self) -> usize {
        self.series.as_ref().map_or(0, SeriesCollection::len)
    }

    /// Checks the invariants the control guarantees before calling the engine.
    pub fn validate(&self) -> ChartResult<()> {
        if self.series_style_indices.len() != self.series_colors.len() {
            return Err(ChartError::InvalidData(format!(
                "snapshot carries {} style indices but {} series colors",
                self.series_style_indices.len(),
                self.series_colors.len()
            )));
        }
        if self.animation_cadence < TimeDelta::zero() {
            return Err(ChartError::InvalidData(
                "snapshot animation cadence must not be negative".to_owned(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for PropertySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySnapshot")
            .field("reason", &self.reason)
            .field("axis_x", &self.axis_x)
            .field("axis_y", &self.axis_y)
            .field("series", &self.series)
            .field("series_style_indices", &self.series_style_indices)
            .field("zoom", &self.zoom)
            .field("legend_location", &self.legend_location)
            .field("legend", &self.legend.as_ref().map(|legend| legend.id().to_owned()))
            .field(
                "tooltip",
                &self.tooltip.as_ref().map(|tooltip| tooltip.id().to_owned()),
            )
            .field("hoverable", &self.hoverable)
            .field("animation_cadence", &self.animation_cadence)
            .finish_non_exhaustive()
    }
}

use std::fmt;
use std::rc::Rc;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::{AxesCollection, LegendLocation, SeriesCollection, UpdaterState, ZoomingOptions};
use crate::extensions::{LegendPresenter, TooltipPresenter};

/// Default for [`PropertyKey::ZoomingSpeed`].
pub const DEFAULT_ZOOMING_SPEED: f64 = 0.8;

/// Identity of a configuration property on a chart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKey {
    AxisX,
    AxisY,
    Series,
    Zoom,
    ZoomingSpeed,
    LegendLocation,
    ChartLegend,
    AnimationsSpeed,
    DisableAnimations,
    DataTooltip,
    Hoverable,
    UpdaterState,
}

impl PropertyKey {
    pub const ALL: [Self; 12] = [
        Self::AxisX,
        Self::AxisY,
        Self::Series,
        Self::Zoom,
        Self::ZoomingSpeed,
        Self::LegendLocation,
        Self::ChartLegend,
        Self::AnimationsSpeed,
        Self::DisableAnimations,
        Self::DataTooltip,
        Self::Hoverable,
        Self::UpdaterState,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AxisX => "AxisX",
            Self::AxisY => "AxisY",
            Self::Series => "Series",
            Self::Zoom => "Zoom",
            Self::ZoomingSpeed => "ZoomingSpeed",
            Self::LegendLocation => "LegendLocation",
            Self::ChartLegend => "ChartLegend",
            Self::AnimationsSpeed => "AnimationsSpeed",
            Self::DisableAnimations => "DisableAnimations",
            Self::DataTooltip => "DataTooltip",
            Self::Hoverable => "Hoverable",
            Self::UpdaterState => "UpdaterState",
        }
    }

    /// Declared value type.
    #[must_use]
    pub const fn value_type(self) -> PropertyType {
        match self {
            Self::AxisX | Self::AxisY => PropertyType::Axes,
            Self::Series => PropertyType::Series,
            Self::Zoom => PropertyType::Zoom,
            Self::ZoomingSpeed => PropertyType::Ratio,
            Self::LegendLocation => PropertyType::LegendLocation,
            Self::ChartLegend => PropertyType::Legend,
            Self::AnimationsSpeed => PropertyType::Duration,
            Self::DisableAnimations | Self::Hoverable => PropertyType::Flag,
            Self::DataTooltip => PropertyType::Tooltip,
            Self::UpdaterState => PropertyType::UpdaterState,
        }
    }

    #[must_use]
    pub fn default_value(self) -> PropertyValue {
        match self {
            Self::AxisX | Self::AxisY => PropertyValue::Axes(None),
            Self::Series => PropertyValue::Series(None),
            Self::Zoom => PropertyValue::Zoom(ZoomingOptions::default()),
            Self::ZoomingSpeed => PropertyValue::Ratio(DEFAULT_ZOOMING_SPEED),
            Self::LegendLocation => PropertyValue::LegendLocation(LegendLocation::default()),
            Self::ChartLegend => PropertyValue::Legend(None),
            Self::AnimationsSpeed => PropertyValue::Duration(None),
            Self::DisableAnimations => PropertyValue::Flag(false),
            Self::Hoverable => PropertyValue::Flag(true),
            Self::DataTooltip => PropertyValue::Tooltip(None),
            Self::UpdaterState => PropertyValue::UpdaterState(UpdaterState::default()),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Axes,
    Series,
    Zoom,
    Ratio,
    LegendLocation,
    Legend,
    Duration,
    Flag,
    Tooltip,
    UpdaterState,
}

impl PropertyType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Axes => "axes collection",
            Self::Series => "series collection",
            Self::Zoom => "zooming options",
            Self::Ratio => "ratio",
            Self::LegendLocation => "legend location",
            Self::Legend => "legend presenter",
            Self::Duration => "duration",
            Self::Flag => "flag",
            Self::Tooltip => "tooltip presenter",
            Self::UpdaterState => "updater state",
        }
    }
}

/// Stored value of a configuration property.
///
/// Collections and presenters compare by reference identity; everything else
/// compares by value.
#[derive(Clone)]
pub enum PropertyValue {
    Axes(Option<AxesCollection>),
    Series(Option<SeriesCollection>),
    Zoom(ZoomingOptions),
    Ratio(f64),
    LegendLocation(LegendLocation),
    Legend(Option<Rc<dyn LegendPresenter>>),
    /// `None` lets the engine pick its default.
    Duration(Option<TimeDelta>),
    Flag(bool),
    Tooltip(Option<Rc<dyn TooltipPresenter>>),
    UpdaterState(UpdaterState),
}

impl PropertyValue {
    #[must_use]
    pub const fn value_type(&self) -> PropertyType {
        match self {
            Self::Axes(_) => PropertyType::Axes,
            Self::Series(_) => PropertyType::Series,
            Self::Zoom(_) => PropertyType::Zoom,
            Self::Ratio(_) => PropertyType::Ratio,
            Self::LegendLocation(_) => PropertyType::LegendLocation,
            Self::Legend(_) => PropertyType::Legend,
            Self::Duration(_) => PropertyType::Duration,
            Self::Flag(_) => PropertyType::Flag,
            Self::Tooltip(_) => PropertyType::Tooltip,
            Self::UpdaterState(_) => PropertyType::UpdaterState,
        }
    }

    #[must_use]
    pub fn as_axes(&self) -> Option<&AxesCollection> {
        match self {
            Self::Axes(axes) => axes.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&SeriesCollection> {
        match self {
            Self::Series(series) => series.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ratio(&self) -> Option<f64> {
        match self {
            Self::Ratio(ratio) => Some(*ratio),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Duration(duration) => *duration,
            _ => None,
        }
    }

    #[must_use]
    pub fn as_zoom(&self) -> Option<ZoomingOptions> {
        match self {
            Self::Zoom(zoom) => Some(*zoom),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_legend_location(&self) -> Option<LegendLocation> {
        match self {
            Self::LegendLocation(location) => Some(*location),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_legend(&self) -> Option<&Rc<dyn LegendPresenter>> {
        match self {
            Self::Legend(legend) => legend.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tooltip(&self) -> Option<&Rc<dyn TooltipPresenter>> {
        match self {
            Self::Tooltip(tooltip) => tooltip.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_updater_state(&self) -> Option<UpdaterState> {
        match self {
            Self::UpdaterState(state) => Some(*state),
            _ => None,
        }
    }
}

fn same_rc<T: ?Sized>(left: &Option<Rc<T>>, right: &Option<Rc<T>>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => std::ptr::addr_eq(Rc::as_ptr(left), Rc::as_ptr(right)),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Axes(left), Self::Axes(right)) => match (left, right) {
                (Some(left), Some(right)) => left.ptr_eq(right),
                (None, None) => true,
                _ => false,
            },
            (Self::Series(left), Self::Series(right)) => match (left, right) {
                (Some(left), Some(right)) => left.ptr_eq(right),
                (None, None) => true,
                _ => false,
            },
            (Self::Zoom(left), Self::Zoom(right)) => left == right,
            (Self::Ratio(left), Self::Ratio(right)) => left.to_bits() == right.to_bits(),
            (Self::LegendLocation(left), Self::LegendLocation(right)) => left == right,
            (Self::Legend(left), Self::Legend(right)) => same_rc(left, right),
            (Self::Duration(left), Self::Duration(right)) => left == right,
            (Self::Flag(left), Self::Flag(right)) => left == right,
            (Self::Tooltip(left), Self::Tooltip(right)) => same_rc(left, right),
            (Self::UpdaterState(left), Self::UpdaterState(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axes(axes) => f.debug_tuple("Axes").field(axes).finish(),
            Self::Series(series) => f.debug_tuple("Series").field(series).finish(),
            Self::Zoom(zoom) => f.debug_tuple("Zoom").field(zoom).finish(),
            Self::Ratio(ratio) => f.debug_tuple("Ratio").field(ratio).finish(),
            Self::LegendLocation(location) => {
                f.debug_tuple("LegendLocation").field(location).finish()
            }
            Self::Legend(legend) => f
                .debug_tuple("Legend")
                .field(&legend.as_ref().map(|legend| legend.id().to_owned()))
                .finish(),
            Self::Duration(duration) => f.debug_tuple("Duration").field(duration).finish(),
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Tooltip(tooltip) => f
                .debug_tuple("Tooltip")
                .field(&tooltip.as_ref().map(|tooltip| tooltip.id().to_owned()))
                .finish(),
            Self::UpdaterState(state) => f.debug_tuple("UpdaterState").field(state).finish(),
        }
    }
}

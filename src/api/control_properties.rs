use std::rc::Rc;

use chrono::TimeDelta;

use crate::core::{AxesCollection, LegendLocation, SeriesCollection, UpdaterState, ZoomingOptions};
use crate::engine::CalculationEngine;
use crate::error::ChartResult;
use crate::extensions::{LegendPresenter, TooltipPresenter};

use super::{
    ChartControl, DEFAULT_ZOOMING_SPEED, HandlerId, PropertyChange, PropertyKey, PropertyValue,
};

impl<E: CalculationEngine + 'static> ChartControl<E> {
    #[must_use]
    pub fn property(&self, key: PropertyKey) -> PropertyValue {
        self.core.properties.borrow().get(key).clone()
    }

    /// Generic setter. Returns `Ok(false)` when `value` equals the stored value.
    ///
    /// Invalid values are rejected before anything is stored or notified.
    /// Engine and handler errors are returned after the value is stored.
    pub fn set_property(&self, key: PropertyKey, value: PropertyValue) -> ChartResult<bool> {
        self.core.set_property(key, value)
    }

    fn read<T>(&self, key: PropertyKey, f: impl FnOnce(&PropertyValue) -> T) -> T {
        f(self.core.properties.borrow().get(key))
    }

    #[must_use]
    pub fn axis_x(&self) -> Option<AxesCollection> {
        self.read(PropertyKey::AxisX, |value| value.as_axes().cloned())
    }

    pub fn set_axis_x(&self, axes: Option<AxesCollection>) -> ChartResult<bool> {
        self.set_property(PropertyKey::AxisX, PropertyValue::Axes(axes))
    }

    #[must_use]
    pub fn axis_y(&self) -> Option<AxesCollection> {
        self.read(PropertyKey::AxisY, |value| value.as_axes().cloned())
    }

    pub fn set_axis_y(&self, axes: Option<AxesCollection>) -> ChartResult<bool> {
        self.set_property(PropertyKey::AxisY, PropertyValue::Axes(axes))
    }

    #[must_use]
    pub fn series(&self) -> Option<SeriesCollection> {
        self.read(PropertyKey::Series, |value| value.as_series().cloned())
    }

    /// Binds a series collection. Passing the collection already bound is a
    /// no-op; use [`ChartControl::rebind_series`] to force a reindex.
    pub fn set_series(&self, series: Option<SeriesCollection>) -> ChartResult<bool> {
        self.set_property(PropertyKey::Series, PropertyValue::Series(series))
    }

    /// Re-subscribes to the current series collection, reassigns style
    /// indices and requests a model update.
    pub fn rebind_series(&self) -> ChartResult<()> {
        self.core.rebind_series()
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomingOptions {
        self.read(PropertyKey::Zoom, |value| value.as_zoom().unwrap_or_default())
    }

    pub fn set_zoom(&self, zoom: ZoomingOptions) -> ChartResult<bool> {
        self.set_property(PropertyKey::Zoom, PropertyValue::Zoom(zoom))
    }

    #[must_use]
    pub fn zooming_speed(&self) -> f64 {
        self.read(PropertyKey::ZoomingSpeed, |value| {
            value.as_ratio().unwrap_or(DEFAULT_ZOOMING_SPEED)
        })
    }

    pub fn set_zooming_speed(&self, speed: f64) -> ChartResult<bool> {
        self.set_property(PropertyKey::ZoomingSpeed, PropertyValue::Ratio(speed))
    }

    #[must_use]
    pub fn legend_location(&self) -> LegendLocation {
        self.read(PropertyKey::LegendLocation, |value| {
            value.as_legend_location().unwrap_or_default()
        })
    }

    pub fn set_legend_location(&self, location: LegendLocation) -> ChartResult<bool> {
        self.set_property(
            PropertyKey::LegendLocation,
            PropertyValue::LegendLocation(location),
        )
    }

    #[must_use]
    pub fn chart_legend(&self) -> Option<Rc<dyn LegendPresenter>> {
        self.read(PropertyKey::ChartLegend, |value| value.as_legend().cloned())
    }

    pub fn set_chart_legend(&self, legend: Option<Rc<dyn LegendPresenter>>) -> ChartResult<bool> {
        self.set_property(PropertyKey::ChartLegend, PropertyValue::Legend(legend))
    }

    /// Configured animation speed; `None` means the engine default.
    #[must_use]
    pub fn animations_speed(&self) -> Option<TimeDelta> {
        self.read(PropertyKey::AnimationsSpeed, PropertyValue::as_duration)
    }

    pub fn set_animations_speed(&self, speed: Option<TimeDelta>) -> ChartResult<bool> {
        self.set_property(PropertyKey::AnimationsSpeed, PropertyValue::Duration(speed))
    }

    #[must_use]
    pub fn disable_animations(&self) -> bool {
        self.read(PropertyKey::DisableAnimations, |value| {
            value.as_flag().unwrap_or(false)
        })
    }

    pub fn set_disable_animations(&self, disable: bool) -> ChartResult<bool> {
        self.set_property(PropertyKey::DisableAnimations, PropertyValue::Flag(disable))
    }

    #[must_use]
    pub fn data_tooltip(&self) -> Option<Rc<dyn TooltipPresenter>> {
        self.read(PropertyKey::DataTooltip, |value| value.as_tooltip().cloned())
    }

    pub fn set_data_tooltip(&self, tooltip: Option<Rc<dyn TooltipPresenter>>) -> ChartResult<bool> {
        self.set_property(PropertyKey::DataTooltip, PropertyValue::Tooltip(tooltip))
    }

    #[must_use]
    pub fn hoverable(&self) -> bool {
        self.read(PropertyKey::Hoverable, |value| value.as_flag().unwrap_or(true))
    }

    pub fn set_hoverable(&self, hoverable: bool) -> ChartResult<bool> {
        self.set_property(PropertyKey::Hoverable, PropertyValue::Flag(hoverable))
    }

    #[must_use]
    pub fn updater_state(&self) -> UpdaterState {
        self.read(PropertyKey::UpdaterState, |value| {
            value.as_updater_state().unwrap_or_default()
        })
    }

    /// Pausing holds model updates in the pending flag; resuming issues one
    /// update that covers everything held.
    pub fn set_updater_state(&self, state: UpdaterState) -> ChartResult<bool> {
        self.set_property(PropertyKey::UpdaterState, PropertyValue::UpdaterState(state))
    }

    /// Registers a handler that runs after every effective change of `key`,
    /// once the control has reacted to it.
    pub fn add_property_changed_handler(
        &self,
        key: PropertyKey,
        handler: impl Fn(&PropertyChange) -> ChartResult<()> + 'static,
    ) -> HandlerId {
        self.core
            .properties
            .borrow_mut()
            .add_handler(key, Rc::new(handler))
    }

    pub fn remove_property_changed_handler(&self, key: PropertyKey, id: HandlerId) -> bool {
        self.core.properties.borrow_mut().remove_handler(key, id)
    }

    #[must_use]
    pub fn has_tooltip(&self) -> bool {
        self.read(PropertyKey::DataTooltip, |value| value.as_tooltip().is_some())
    }

    #[must_use]
    pub fn has_chart_legend(&self) -> bool {
        self.read(PropertyKey::ChartLegend, |value| value.as_legend().is_some())
    }

    #[must_use]
    pub fn has_data_click_handler(&self) -> bool {
        !self.core.data_click.borrow().is_empty()
    }

    /// Whether the drawing layer should render hover affordances: the
    /// control is hoverable and a tooltip, legend or click handler exists.
    #[must_use]
    pub fn has_hover_consumers(&self) -> bool {
        self.hoverable()
            && (self.has_tooltip() || self.has_chart_legend() || self.has_data_click_handler())
    }
}

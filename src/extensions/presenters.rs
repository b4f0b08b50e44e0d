use crate::core::{ChartPoint, LegendLocation};

/// Legend visual attached to a chart control.
///
/// The control never draws the legend itself; it stores the instance, tells
/// the drawing layer whether one exists, and hands it to the engine through the
/// property snapshot. Instances are compared by reference identity.
pub trait LegendPresenter {
    fn id(&self) -> &str;

    /// Called by engines after a model update with the current series titles.
    fn on_series_titles(&self, _titles: &[String], _location: LegendLocation) {}
}

/// Tooltip visual attached to a chart control. Compared by reference identity.
pub trait TooltipPresenter {
    fn id(&self) -> &str;

    /// Called by the drawing layer when the hovered point changes.
    fn on_hover(&self, _point: Option<ChartPoint>) {}
}

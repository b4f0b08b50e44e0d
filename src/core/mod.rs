pub mod collection;
pub mod palette;
pub mod series;
pub mod types;

pub use collection::{CollectionDelta, CollectionObserver, ObservableCollection, SubscriptionId};
pub use palette::{DEFAULT_SERIES_COLORS, SharedPalette};
pub use series::{Axis, AxisPosition, Series};
pub use types::{ChartPoint, Color, ControlId, LegendLocation, UpdaterState, ZoomingOptions};

/// Series collection bound to a chart control.
pub type SeriesCollection = ObservableCollection<Series>;

/// Axes of one dimension bound to a chart control.
pub type AxesCollection = ObservableCollection<Axis>;

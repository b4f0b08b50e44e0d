//! Invalidation and update-scheduling core of the chart control.

mod animation;
mod change_classifier;
mod collection_tracker;
mod control;
mod control_config;
mod control_properties;
mod control_updates;
mod data_click;
mod diagnostics;
mod lifecycle;
mod property;
mod property_store;
mod series_tracker;
mod update_scheduler;
mod validation;

pub use animation::AnimationFrequencyController;
pub use change_classifier::{
    ChangeClass, ChangeKind, Classification, CollectionTarget, classify_collection_delta,
    classify_property, classify_property_change,
};
pub use collection_tracker::CollectionTracker;
pub use control::ChartControl;
pub use control_config::ChartControlConfig;
pub use data_click::{DataClickEvent, DataClickHandler, DataClickHandlerId};
pub use diagnostics::ControlDiagnostics;
pub use lifecycle::{Lifecycle, LoadState};
pub use property::{DEFAULT_ZOOMING_SPEED, PropertyKey, PropertyType, PropertyValue};
pub use property_store::{HandlerId, PropertyChange, PropertyChangedHandler, PropertyStore};
pub use series_tracker::SeriesCollectionTracker;
pub use update_scheduler::{
    Admission, DeferredCall, EngineCall, PendingUpdate, SchedulerStats, UpdateReason,
    UpdateScheduler,
};

//! chart-control: invalidation and update scheduling for a declarative chart control.
//!
//! A [`ChartControl`] owns a typed property store, observes the bound series
//! and axis collections, and decides when the [`engine::CalculationEngine`]
//! behind it recomputes the chart model or only redraws.

pub mod api;
pub mod core;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod telemetry;

pub use api::{ChartControl, ChartControlConfig, PropertyKey, PropertyValue};
pub use engine::{CalculationEngine, NullEngine, PropertySnapshot};
pub use error::{ChartError, ChartResult};

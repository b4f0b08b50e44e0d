use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::{LegendLocation, UpdaterState, ZoomingOptions};
use crate::error::{ChartError, ChartResult};

use super::validation::validate_property_value;
use super::{DEFAULT_ZOOMING_SPEED, PropertyKey, PropertyValue};

/// Construction-time configuration of a chart control.
///
/// Serializable so hosts can persist chart setup. Every value goes through
/// the same validation as a runtime property write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartControlConfig {
    /// Draw the first default series color from the shared palette source.
    #[serde(default)]
    pub randomize_starting_color: bool,
    /// `None` uses the engine's default speed.
    #[serde(default)]
    pub animations_speed_ms: Option<i64>,
    #[serde(default)]
    pub disable_animations: bool,
    #[serde(default = "default_hoverable")]
    pub hoverable: bool,
    #[serde(default)]
    pub legend_location: LegendLocation,
    #[serde(default)]
    pub zoom: ZoomingOptions,
    #[serde(default = "default_zooming_speed")]
    pub zooming_speed: f64,
    #[serde(default)]
    pub updater_state: UpdaterState,
}

fn default_hoverable() -> bool {
    true
}

fn default_zooming_speed() -> f64 {
    DEFAULT_ZOOMING_SPEED
}

// Only i64::MIN is out of range, and it is negative anyway.
fn speed_from_ms(speed_ms: i64) -> TimeDelta {
    TimeDelta::try_milliseconds(speed_ms).unwrap_or(TimeDelta::MIN)
}

impl Default for ChartControlConfig {
    fn default() -> Self {
        Self {
            randomize_starting_color: false,
            animations_speed_ms: None,
            disable_animations: false,
            hoverable: default_hoverable(),
            legend_location: LegendLocation::default(),
            zoom: ZoomingOptions::default(),
            zooming_speed: default_zooming_speed(),
            updater_state: UpdaterState::default(),
        }
    }
}

impl ChartControlConfig {
    #[must_use]
    pub fn with_randomized_starting_color(mut self, randomize: bool) -> Self {
        self.randomize_starting_color = randomize;
        self
    }

    #[must_use]
    pub fn with_animations_speed_ms(mut self, speed_ms: Option<i64>) -> Self {
        self.animations_speed_ms = speed_ms;
        self
    }

    #[must_use]
    pub fn with_disable_animations(mut self, disable: bool) -> Self {
        self.disable_animations = disable;
        self
    }

    #[must_use]
    pub fn with_hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    #[must_use]
    pub fn with_legend_location(mut self, location: LegendLocation) -> Self {
        self.legend_location = location;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomingOptions) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_zooming_speed(mut self, speed: f64) -> Self {
        self.zooming_speed = speed;
        self
    }

    #[must_use]
    pub fn with_updater_state(mut self, state: UpdaterState) -> Self {
        self.updater_state = state;
        self
    }

    /// Initial property values described by this config.
    #[must_use]
    pub fn property_values(&self) -> Vec<(PropertyKey, PropertyValue)> {
        vec![
            (
                PropertyKey::AnimationsSpeed,
                PropertyValue::Duration(self.animations_speed_ms.map(speed_from_ms)),
            ),
            (
                PropertyKey::DisableAnimations,
                PropertyValue::Flag(self.disable_animations),
            ),
            (PropertyKey::Hoverable, PropertyValue::Flag(self.hoverable)),
            (
                PropertyKey::LegendLocation,
                PropertyValue::LegendLocation(self.legend_location),
            ),
            (PropertyKey::Zoom, PropertyValue::Zoom(self.zoom)),
            (
                PropertyKey::ZoomingSpeed,
                PropertyValue::Ratio(self.zooming_speed),
            ),
            (
                PropertyKey::UpdaterState,
                PropertyValue::UpdaterState(self.updater_state),
            ),
        ]
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (key, value) in self.property_values() {
            validate_property_value(key, &value)?;
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse control config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize control config: {e}"))
        })
    }
}

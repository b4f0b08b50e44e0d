use serde::{Deserialize, Serialize};

use super::types::Color;

/// Plotted sequence of values plus the presentation metadata the control
/// needs for default styling.
///
/// Point geometry is the calculation engine's concern; the control only
/// tracks membership and assigns default style indices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    pub title: String,
    pub values: Vec<f64>,
    /// Explicit fill; `None` falls back to the palette color for the series slot.
    #[serde(default)]
    pub fill: Option<Color>,
}

impl Series {
    #[must_use]
    pub fn new(title: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            values,
            fill: None,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Side of the plot an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisPosition {
    #[default]
    LeftBottom,
    RightTop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub position: AxisPosition,
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
}

fn default_show_labels() -> bool {
    true
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            title: String::new(),
            min_value: None,
            max_value: None,
            position: AxisPosition::default(),
            show_labels: default_show_labels(),
        }
    }
}

impl Axis {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_limits(mut self, min_value: Option<f64>, max_value: Option<f64>) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = position;
        self
    }
}

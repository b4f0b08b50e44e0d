use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// 8-bit RGBA color used by the default series palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(value: &str) -> ChartResult<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(ChartError::InvalidData(format!(
                "color `{value}` must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ChartError::InvalidData(format!("color `{value}` is not hex")))
        };
        let alpha = if digits.len() == 8 {
            channel(6..8)?
        } else {
            255
        };
        Ok(Self::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// Where the legend is placed relative to the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LegendLocation {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

/// Axes the user is allowed to zoom and pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ZoomingOptions {
    #[default]
    None,
    X,
    Y,
    Xy,
}

/// Whether the control forwards model updates to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UpdaterState {
    #[default]
    Running,
    Paused,
}

/// Descriptor of a data point activated by user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub series_index: usize,
    pub point_index: usize,
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    #[must_use]
    pub fn new(series_index: usize, point_index: usize, x: f64, y: f64) -> Self {
        Self {
            series_index,
            point_index,
            x,
            y,
        }
    }
}

/// Process-unique identity of a control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(u64);

impl ControlId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ControlId};

    #[test]
    fn hex_colors_parse_with_and_without_alpha() {
        assert_eq!(Color::from_hex("#2195F2").expect("rgb"), Color::rgb(33, 149, 242));
        assert_eq!(
            Color::from_hex("F4433680").expect("rgba"),
            Color::rgba(244, 67, 54, 128)
        );
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn control_ids_are_unique() {
        let first = ControlId::next();
        let second = ControlId::next();
        assert_ne!(first, second);
        assert!(second.raw() > first.raw());
    }
}

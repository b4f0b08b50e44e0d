use crate::error::{ChartError, ChartResult};

use super::{PropertyKey, PropertyValue};

/// Rejects values of the wrong declared type and out-of-range values.
pub(super) fn validate_property_value(key: PropertyKey, value: &PropertyValue) -> ChartResult<()> {
    let expected = key.value_type();
    let found = value.value_type();
    if expected != found {
        return Err(ChartError::PropertyTypeMismatch {
            property: key.name(),
            expected: expected.name(),
            found: found.name(),
        });
    }

    match value {
        PropertyValue::Duration(Some(duration)) if *duration < chrono::TimeDelta::zero() => {
            Err(ChartError::InvalidConfiguration {
                property: key.name(),
                reason: format!(
                    "duration must not be negative, got {} ms",
                    duration.num_milliseconds()
                ),
            })
        }
        PropertyValue::Ratio(ratio) => validate_zooming_speed(key, *ratio),
        _ => Ok(()),
    }
}

fn validate_zooming_speed(key: PropertyKey, ratio: f64) -> ChartResult<()> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
        return Err(ChartError::InvalidConfiguration {
            property: key.name(),
            reason: format!("must be finite and in (0, 1], got {ratio}"),
        });
    }
    Ok(())
}

use serde::{Deserialize, Serialize};

use crate::core::{CollectionDelta, UpdaterState};

use super::{PropertyKey, PropertyValue};

/// How much work a change requires from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeClass {
    Ignore,
    RedrawOnly,
    ModelUpdate,
    /// Model update that also reassigns sequential series style indices.
    ModelUpdateWithReindex,
}

impl ChangeClass {
    #[must_use]
    pub const fn requires_model_update(self) -> bool {
        matches!(self, Self::ModelUpdate | Self::ModelUpdateWithReindex)
    }

    #[must_use]
    pub const fn requires_reindex(self) -> bool {
        matches!(self, Self::ModelUpdateWithReindex)
    }
}

/// Whether the change replaced collection identity/membership or a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Structural,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub class: ChangeClass,
    pub kind: ChangeKind,
    /// The effective animation cadence must be recomputed.
    pub recompute_cadence: bool,
}

impl Classification {
    const fn structural(class: ChangeClass) -> Self {
        Self {
            class,
            kind: ChangeKind::Structural,
            recompute_cadence: false,
        }
    }

    const fn value(class: ChangeClass) -> Self {
        Self {
            class,
            kind: ChangeKind::Value,
            recompute_cadence: false,
        }
    }

    const fn cadence() -> Self {
        Self {
            class: ChangeClass::RedrawOnly,
            kind: ChangeKind::Value,
            recompute_cadence: true,
        }
    }
}

/// Collection a member-level delta came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionTarget {
    Series,
    AxisX,
    AxisY,
}

impl CollectionTarget {
    #[must_use]
    pub const fn property(self) -> PropertyKey {
        match self {
            Self::Series => PropertyKey::Series,
            Self::AxisX => PropertyKey::AxisX,
            Self::AxisY => PropertyKey::AxisY,
        }
    }
}

/// Static classification table keyed by property identity.
#[must_use]
pub const fn classify_property(key: PropertyKey) -> Classification {
    match key {
        PropertyKey::AxisX | PropertyKey::AxisY => {
            Classification::structural(ChangeClass::ModelUpdate)
        }
        PropertyKey::Series => Classification::structural(ChangeClass::ModelUpdateWithReindex),
        PropertyKey::Zoom | PropertyKey::UpdaterState => {
            Classification::value(ChangeClass::ModelUpdate)
        }
        PropertyKey::AnimationsSpeed | PropertyKey::DisableAnimations => Classification::cadence(),
        PropertyKey::LegendLocation
        | PropertyKey::ChartLegend
        | PropertyKey::DataTooltip
        | PropertyKey::Hoverable => Classification::value(ChangeClass::RedrawOnly),
        PropertyKey::ZoomingSpeed => Classification::value(ChangeClass::Ignore),
    }
}

/// Classifies a stored change. Pausing the updater is the one value-dependent
/// entry: it schedules nothing.
#[must_use]
pub fn classify_property_change(key: PropertyKey, new_value: &PropertyValue) -> Classification {
    if let PropertyValue::UpdaterState(UpdaterState::Paused) = new_value {
        return Classification::value(ChangeClass::Ignore);
    }
    classify_property(key)
}

/// Classifies a member-level mutation of a bound collection.
#[must_use]
pub const fn classify_collection_delta(
    target: CollectionTarget,
    delta: CollectionDelta,
) -> Classification {
    match target {
        CollectionTarget::Series if delta.changes_membership() => {
            Classification::structural(ChangeClass::ModelUpdateWithReindex)
        }
        CollectionTarget::Series | CollectionTarget::AxisX | CollectionTarget::AxisY => {
            Classification::structural(ChangeClass::ModelUpdate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChangeClass, ChangeKind, CollectionTarget, classify_collection_delta, classify_property,
        classify_property_change,
    };
    use crate::api::{PropertyKey, PropertyValue};
    use crate::core::{CollectionDelta, UpdaterState};

    #[test]
    fn model_affecting_properties_request_updates() {
        for key in [PropertyKey::AxisX, PropertyKey::AxisY, PropertyKey::Zoom] {
            assert_eq!(classify_property(key).class, ChangeClass::ModelUpdate, "{key}");
        }
        let series = classify_property(PropertyKey::Series);
        assert_eq!(series.class, ChangeClass::ModelUpdateWithReindex);
        assert_eq!(series.kind, ChangeKind::Structural);
    }

    #[test]
    fn visual_properties_only_redraw() {
        for key in [
            PropertyKey::LegendLocation,
            PropertyKey::ChartLegend,
            PropertyKey::DataTooltip,
            PropertyKey::Hoverable,
        ] {
            let classification = classify_property(key);
            assert_eq!(classification.class, ChangeClass::RedrawOnly, "{key}");
            assert!(!classification.recompute_cadence);
        }
    }

    #[test]
    fn animation_inputs_recompute_cadence_without_model_update() {
        for key in [PropertyKey::AnimationsSpeed, PropertyKey::DisableAnimations] {
            let classification = classify_property(key);
            assert_eq!(classification.class, ChangeClass::RedrawOnly);
            assert!(classification.recompute_cadence);
        }
    }

    #[test]
    fn pausing_is_ignored_and_resuming_updates() {
        let paused = classify_property_change(
            PropertyKey::UpdaterState,
            &PropertyValue::UpdaterState(UpdaterState::Paused),
        );
        let running = classify_property_change(
            PropertyKey::UpdaterState,
            &PropertyValue::UpdaterState(UpdaterState::Running),
        );
        assert_eq!(paused.class, ChangeClass::Ignore);
        assert_eq!(running.class, ChangeClass::ModelUpdate);
    }

    #[test]
    fn series_membership_changes_reindex_but_slot_swaps_do_not() {
        let added = classify_collection_delta(
            CollectionTarget::Series,
            CollectionDelta::Added { index: 0, count: 1 },
        );
        let replaced = classify_collection_delta(
            CollectionTarget::Series,
            CollectionDelta::Replaced { index: 0 },
        );
        let axis_reset = classify_collection_delta(CollectionTarget::AxisX, CollectionDelta::Reset);

        assert_eq!(added.class, ChangeClass::ModelUpdateWithReindex);
        assert_eq!(replaced.class, ChangeClass::ModelUpdate);
        assert_eq!(axis_reset.class, ChangeClass::ModelUpdate);
    }
}

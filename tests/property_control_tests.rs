use std::cell::RefCell;
use std::rc::Rc;

use chart_control::api::{
    ChartControl, ChartControlConfig, PropertyChange, PropertyKey, PropertyValue,
};
use chart_control::core::{LegendLocation, ZoomingOptions};
use chart_control::engine::NullEngine;
use chart_control::error::ChartError;
use chrono::TimeDelta;
use proptest::prelude::*;

const LOCATIONS: [LegendLocation; 5] = [
    LegendLocation::None,
    LegendLocation::Top,
    LegendLocation::Bottom,
    LegendLocation::Left,
    LegendLocation::Right,
];

const ZOOMS: [ZoomingOptions; 4] = [
    ZoomingOptions::None,
    ZoomingOptions::X,
    ZoomingOptions::Y,
    ZoomingOptions::Xy,
];

fn build_control() -> ChartControl<NullEngine> {
    ChartControl::new(NullEngine::default(), ChartControlConfig::default()).expect("control init")
}

fn update_count(control: &ChartControl<NullEngine>) -> usize {
    control
        .with_engine(|engine| engine.update_count)
        .expect("engine idle")
}

fn count_changes(control: &ChartControl<NullEngine>, key: PropertyKey) -> Rc<RefCell<usize>> {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    control.add_property_changed_handler(key, move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });
    calls
}

proptest! {
    #[test]
    fn handlers_fire_once_per_effective_change(
        picks in prop::collection::vec(0usize..LOCATIONS.len(), 1..40)
    ) {
        let control = build_control();
        let calls = count_changes(&control, PropertyKey::LegendLocation);

        let mut current = control.legend_location();
        let mut expected = 0usize;
        for pick in picks {
            let next = LOCATIONS[pick];
            let changed = control.set_legend_location(next).expect("legend location");
            prop_assert_eq!(changed, next != current);
            if next != current {
                expected += 1;
                current = next;
            }
        }

        prop_assert_eq!(*calls.borrow(), expected);
        prop_assert_eq!(control.legend_location(), current);
    }

    #[test]
    fn loaded_controls_forward_one_update_per_effective_change(
        picks in prop::collection::vec(0usize..ZOOMS.len(), 1..40)
    ) {
        let control = build_control();
        control.on_attached_to_surface().expect("attach");

        let mut current = control.zoom();
        let mut expected = 0usize;
        for pick in picks {
            let next = ZOOMS[pick];
            control.set_zoom(next).expect("zoom");
            if next != current {
                expected += 1;
                current = next;
            }
        }

        prop_assert_eq!(update_count(&control), expected);
    }

    #[test]
    fn nothing_reaches_the_engine_before_load(
        picks in prop::collection::vec(0usize..ZOOMS.len(), 0..40)
    ) {
        let control = build_control();
        let initial = control.zoom();
        for &pick in &picks {
            control.set_zoom(ZOOMS[pick]).expect("zoom");
        }
        let any_change = picks.iter().any(|&pick| ZOOMS[pick] != initial);
        prop_assert_eq!(update_count(&control), 0);

        control.on_attached_to_surface().expect("attach");

        prop_assert_eq!(update_count(&control), usize::from(any_change));
        prop_assert!(!control.has_pending_update());
    }

    #[test]
    fn disabled_animations_always_have_zero_cadence(
        speed_ms in 0i64..86_400_000,
        disable_first in any::<bool>()
    ) {
        let control = build_control();
        let speed = TimeDelta::milliseconds(speed_ms);
        if disable_first {
            control.set_disable_animations(true).expect("disable");
            control.set_animations_speed(Some(speed)).expect("speed");
        } else {
            control.set_animations_speed(Some(speed)).expect("speed");
            control.set_disable_animations(true).expect("disable");
        }

        prop_assert_eq!(control.effective_animation_cadence(), TimeDelta::zero());
        prop_assert_eq!(control.snapshot().animation_cadence, TimeDelta::zero());
    }
}

#[test]
fn handlers_see_old_and_new_values_in_registration_order() {
    let control = build_control();
    let log = Rc::new(RefCell::new(Vec::new()));
    for label in ["first", "second"] {
        let log = Rc::clone(&log);
        control.add_property_changed_handler(PropertyKey::Zoom, move |change: &PropertyChange| {
            log.borrow_mut()
                .push((label, change.old_value.clone(), change.new_value.clone()));
            Ok(())
        });
    }

    control.set_zoom(ZoomingOptions::Xy).expect("zoom");

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "first");
    assert_eq!(log[1].0, "second");
    assert_eq!(log[0].1, PropertyValue::Zoom(ZoomingOptions::None));
    assert_eq!(log[0].2, PropertyValue::Zoom(ZoomingOptions::Xy));
}

#[test]
fn removed_handlers_stop_firing() {
    let control = build_control();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = control.add_property_changed_handler(PropertyKey::Hoverable, move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    control.set_hoverable(false).expect("hoverable");
    assert!(control.remove_property_changed_handler(PropertyKey::Hoverable, id));
    assert!(!control.remove_property_changed_handler(PropertyKey::Hoverable, id));
    control.set_hoverable(true).expect("hoverable");

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn invalid_values_are_rejected_and_the_previous_value_kept() {
    let control = build_control();
    control.on_attached_to_surface().expect("attach");
    let calls = count_changes(&control, PropertyKey::AnimationsSpeed);
    let speed = TimeDelta::milliseconds(200);
    control.set_animations_speed(Some(speed)).expect("valid speed");

    let err = control
        .set_animations_speed(Some(TimeDelta::milliseconds(-5)))
        .expect_err("negative speed");

    assert!(matches!(
        err,
        ChartError::InvalidConfiguration {
            property: "AnimationsSpeed",
            ..
        }
    ));
    assert_eq!(control.animations_speed(), Some(speed));
    assert_eq!(control.effective_animation_cadence(), speed);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn zooming_speed_must_stay_within_unit_interval() {
    let control = build_control();

    assert!(control.set_zooming_speed(1.5).is_err());
    assert!(control.set_zooming_speed(0.0).is_err());
    assert!(control.set_zooming_speed(f64::NAN).is_err());
    assert!(control.set_zooming_speed(1.0).expect("upper bound"));
    assert_eq!(control.zooming_speed(), 1.0);
}

#[test]
fn generic_setter_rejects_values_of_the_wrong_type() {
    let control = build_control();

    let err = control
        .set_property(PropertyKey::Zoom, PropertyValue::Flag(true))
        .expect_err("type mismatch");

    assert!(matches!(
        err,
        ChartError::PropertyTypeMismatch {
            property: "Zoom",
            ..
        }
    ));
    assert_eq!(control.property(PropertyKey::Zoom), PropertyValue::Zoom(ZoomingOptions::None));
}

#[test]
fn handler_failure_keeps_the_new_value_stored() {
    let control = build_control();
    control.on_attached_to_surface().expect("attach");
    control.add_property_changed_handler(PropertyKey::Zoom, |_| {
        Err(ChartError::InvalidData("rejected".to_owned()))
    });

    let err = control.set_zoom(ZoomingOptions::X).expect_err("handler failure");

    assert_eq!(err, ChartError::InvalidData("rejected".to_owned()));
    assert_eq!(control.zoom(), ZoomingOptions::X);
    assert_eq!(update_count(&control), 1);
}

#[test]
fn animation_cadence_falls_back_to_the_engine_default() {
    let control = build_control();
    assert_eq!(
        control.effective_animation_cadence(),
        TimeDelta::milliseconds(300)
    );

    control
        .set_animations_speed(Some(TimeDelta::zero()))
        .expect("zero speed");
    assert_eq!(control.effective_animation_cadence(), TimeDelta::zero());

    control.set_animations_speed(None).expect("unset speed");
    control.set_disable_animations(true).expect("disable");
    assert_eq!(control.effective_animation_cadence(), TimeDelta::zero());

    control.set_disable_animations(false).expect("enable");
    assert_eq!(
        control.effective_animation_cadence(),
        TimeDelta::milliseconds(300)
    );
}

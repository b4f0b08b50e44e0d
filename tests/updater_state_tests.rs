use chart_control::api::{ChartControl, ChartControlConfig, PropertyKey, UpdateReason};
use chart_control::core::{LegendLocation, UpdaterState, ZoomingOptions};
use chart_control::engine::NullEngine;

fn update_count(control: &ChartControl<NullEngine>) -> usize {
    control
        .with_engine(|engine| engine.update_count)
        .expect("engine idle")
}

#[test]
fn paused_updater_holds_changes_until_resumed() {
    let control =
        ChartControl::new(NullEngine::default(), ChartControlConfig::default()).expect("control");
    control.on_attached_to_surface().expect("attach");

    control
        .set_updater_state(UpdaterState::Paused)
        .expect("pause");
    control.set_zoom(ZoomingOptions::X).expect("zoom");
    control
        .set_legend_location(LegendLocation::Top)
        .expect("legend location");

    assert_eq!(update_count(&control), 0);
    assert_eq!(
        control
            .with_engine(|engine| engine.redraw_count)
            .expect("engine idle"),
        0
    );
    assert!(control.has_pending_update());
    assert!(!control.dispatch_deferred().expect("paused tick"));

    control
        .set_updater_state(UpdaterState::Running)
        .expect("resume");

    assert_eq!(update_count(&control), 1);
    assert!(!control.has_pending_update());
    let reason = control
        .with_engine(|engine| engine.last_snapshot.as_ref().map(|snapshot| snapshot.reason))
        .expect("engine idle");
    assert_eq!(reason, Some(UpdateReason::Property(PropertyKey::UpdaterState)));
}

#[test]
fn controls_created_paused_stay_quiet_after_attach() {
    let config = ChartControlConfig::default().with_updater_state(UpdaterState::Paused);
    let control = ChartControl::new(NullEngine::default(), config).expect("control");
    control.set_zoom(ZoomingOptions::Y).expect("zoom");

    control.on_attached_to_surface().expect("attach");

    assert_eq!(update_count(&control), 0);
    assert!(control.has_pending_update());

    control
        .set_updater_state(UpdaterState::Running)
        .expect("resume");
    assert_eq!(update_count(&control), 1);
}

#[test]
fn resuming_without_held_changes_still_refreshes_once() {
    let control =
        ChartControl::new(NullEngine::default(), ChartControlConfig::default()).expect("control");
    control.on_attached_to_surface().expect("attach");

    control
        .set_updater_state(UpdaterState::Paused)
        .expect("pause");
    control
        .set_updater_state(UpdaterState::Running)
        .expect("resume");

    assert_eq!(update_count(&control), 1);
    assert_eq!(control.updater_state(), UpdaterState::Running);
}

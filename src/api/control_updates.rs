use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::core::{
    AxesCollection, Axis, CollectionDelta, CollectionObserver, Color, SeriesCollection,
    UpdaterState,
};
use crate::engine::{CalculationEngine, PropertySnapshot};
use crate::error::ChartResult;

use super::control::ControlCore;
use super::property_store::dispatch_change;
use super::{
    Admission, ChangeClass, CollectionTarget, CollectionTracker, DEFAULT_ZOOMING_SPEED,
    DeferredCall, EngineCall, PropertyChange, PropertyKey, PropertyValue, UpdateReason,
    classify_collection_delta, classify_property_change,
};

impl<E: CalculationEngine + 'static> ControlCore<E> {
    /// Stores `value`, reacts to the change, then runs the user handlers.
    ///
    /// Returns `Ok(false)` for no-op writes. When both the reaction and a
    /// handler fail, the reaction's error is returned.
    pub(super) fn set_property(&self, key: PropertyKey, value: PropertyValue) -> ChartResult<bool> {
        let change = self.properties.borrow_mut().replace(key, value)?;
        let Some(change) = change else {
            return Ok(false);
        };
        debug!(control = %self.id, property = key.name(), "property changed");

        let reaction = self.react_to_change(&change);
        let handlers = self.properties.borrow().handlers(key);
        let notified = dispatch_change(&handlers, &change);
        reaction.and(notified)?;
        Ok(true)
    }

    fn react_to_change(&self, change: &PropertyChange) -> ChartResult<()> {
        let key = change.key;
        let classification = classify_property_change(key, &change.new_value);
        match key {
            PropertyKey::Series => {
                self.bind_series(change.new_value.as_series().cloned());
            }
            PropertyKey::AxisX => {
                self.bind_axes(CollectionTarget::AxisX, change.new_value.as_axes().cloned());
            }
            PropertyKey::AxisY => {
                self.bind_axes(CollectionTarget::AxisY, change.new_value.as_axes().cloned());
            }
            PropertyKey::UpdaterState => {
                let paused = change.new_value.as_updater_state() == Some(UpdaterState::Paused);
                self.scheduler.borrow_mut().set_paused(paused);
            }
            _ => {}
        }
        if classification.recompute_cadence {
            self.sync_animation();
        }
        trace!(
            control = %self.id,
            property = key.name(),
            class = ?classification.class,
            kind = ?classification.kind,
            "property change classified"
        );
        self.dispatch(classification.class, UpdateReason::Property(key))
    }

    /// Forces a fresh bind of the current series collection.
    pub(super) fn rebind_series(&self) -> ChartResult<()> {
        let collection = self
            .properties
            .borrow()
            .get(PropertyKey::Series)
            .as_series()
            .cloned();
        let classification = self.bind_series(collection);
        self.dispatch(classification, UpdateReason::SeriesRebind)
    }

    fn bind_series(&self, collection: Option<SeriesCollection>) -> ChangeClass {
        let observer = self.observer_for(CollectionTarget::Series);
        let classification = self.series.borrow_mut().bind(collection, observer);
        classification.class
    }

    fn bind_axes(&self, target: CollectionTarget, collection: Option<AxesCollection>) {
        let observer = self.observer_for(target);
        if let Some(tracker) = self.axis_tracker(target) {
            tracker.borrow_mut().bind(collection, observer);
        }
    }

    fn axis_tracker(&self, target: CollectionTarget) -> Option<&RefCell<CollectionTracker<Axis>>> {
        match target {
            CollectionTarget::AxisX => Some(&self.axis_x),
            CollectionTarget::AxisY => Some(&self.axis_y),
            CollectionTarget::Series => None,
        }
    }

    /// Observer for the next bind of `target`. It holds the control weakly,
    /// so a detached collection never keeps the control alive.
    fn observer_for(&self, target: CollectionTarget) -> impl FnOnce(u64) -> CollectionObserver {
        let weak_self = self.weak_self.clone();
        move |generation| -> CollectionObserver {
            Rc::new(move |delta: &CollectionDelta| {
                if let Some(core) = weak_self.upgrade() {
                    core.on_collection_delta(target, generation, *delta);
                }
            })
        }
    }

    fn on_collection_delta(
        &self,
        target: CollectionTarget,
        generation: u64,
        delta: CollectionDelta,
    ) {
        let classification = match target {
            CollectionTarget::Series => self.series.borrow_mut().on_delta(generation, delta),
            CollectionTarget::AxisX | CollectionTarget::AxisY => self
                .axis_tracker(target)
                .filter(|tracker| tracker.borrow().accepts(generation))
                .map(|_| classify_collection_delta(target, delta)),
        };
        let Some(classification) = classification else {
            trace!(control = %self.id, ?target, generation, "delta from detached collection");
            return;
        };

        trace!(
            control = %self.id,
            ?target,
            ?delta,
            class = ?classification.class,
            "collection delta classified"
        );
        let reason = UpdateReason::Collection { target, delta };
        if let Err(err) = self.dispatch(classification.class, reason) {
            warn!(
                control = %self.id,
                ?target,
                error = %err,
                "update after collection change failed"
            );
        }
    }

    fn sync_animation(&self) {
        let (speed, disabled) = {
            let properties = self.properties.borrow();
            (
                properties.get(PropertyKey::AnimationsSpeed).as_duration(),
                properties
                    .get(PropertyKey::DisableAnimations)
                    .as_flag()
                    .unwrap_or(false),
            )
        };
        let changed = self.animation.borrow_mut().sync(speed, disabled);
        if changed {
            debug!(
                control = %self.id,
                cadence_ms = self.animation.borrow().effective_cadence().num_milliseconds(),
                "animation cadence changed"
            );
        }
    }

    fn dispatch(&self, class: ChangeClass, reason: UpdateReason) -> ChartResult<()> {
        match class {
            ChangeClass::Ignore => Ok(()),
            ChangeClass::RedrawOnly => self.request_redraw(reason),
            ChangeClass::ModelUpdate | ChangeClass::ModelUpdateWithReindex => {
                self.request_model_update(reason)
            }
        }
    }

    pub(super) fn request_model_update(&self, reason: UpdateReason) -> ChartResult<()> {
        let load = self.lifecycle.borrow().load_state();
        let admission = self.scheduler.borrow_mut().request_model_update(reason, load);
        trace!(control = %self.id, ?reason, ?admission, "model update requested");
        match admission {
            Admission::Forward => self.run_engine(EngineCall::Update, reason),
            Admission::Deferred | Admission::Coalesced | Admission::Dropped => Ok(()),
        }
    }

    pub(super) fn request_redraw(&self, reason: UpdateReason) -> ChartResult<()> {
        let load = self.lifecycle.borrow().load_state();
        let admission = self.scheduler.borrow_mut().request_redraw(reason, load);
        match admission {
            Admission::Forward => self.run_engine(EngineCall::Redraw, reason),
            Admission::Deferred | Admission::Coalesced | Admission::Dropped => Ok(()),
        }
    }

    /// Redraw for changes that have no caller to report a failure to.
    pub(super) fn request_redraw_logged(&self, cause: &'static str) {
        if let Err(err) = self.request_redraw(UpdateReason::Manual) {
            warn!(control = %self.id, cause, error = %err, "redraw failed");
        }
    }

    /// Forwards the pending update or redraw when loaded, running and idle.
    pub(super) fn flush_deferred(&self) -> ChartResult<bool> {
        let load = self.lifecycle.borrow().load_state();
        let deferred = self.scheduler.borrow_mut().take_deferred(load);
        let Some(deferred) = deferred else {
            return Ok(false);
        };
        match deferred {
            DeferredCall::Update(pending) => debug!(
                control = %self.id,
                requests = pending.requests,
                first = ?pending.first_reason,
                last = ?pending.last_reason,
                "flushing deferred update"
            ),
            DeferredCall::Redraw(reason) => {
                debug!(control = %self.id, ?reason, "flushing deferred redraw");
            }
        }
        self.run_engine(deferred.call(), deferred.reason())?;
        Ok(true)
    }

    /// Calls the engine for a call the scheduler admitted and reports back.
    fn run_engine(&self, call: EngineCall, reason: UpdateReason) -> ChartResult<()> {
        let snapshot = self.build_snapshot(reason);
        let outcome = match self.engine.try_borrow_mut() {
            Ok(mut engine) => match call {
                EngineCall::Update => engine.update(&snapshot),
                EngineCall::Redraw => engine.redraw(&snapshot),
            },
            Err(_) => {
                self.scheduler.borrow_mut().requeue(call, reason);
                return Ok(());
            }
        };

        self.scheduler.borrow_mut().finish(&outcome);
        match &outcome {
            Ok(()) => trace!(control = %self.id, ?call, ?reason, "engine call completed"),
            Err(err) => {
                warn!(control = %self.id, ?call, ?reason, error = %err, "engine call failed");
            }
        }
        outcome
    }

    pub(super) fn build_snapshot(&self, reason: UpdateReason) -> PropertySnapshot {
        let series_style_indices = self.series.borrow().style_indices().to_vec();
        let series_colors = self.resolve_series_colors(&series_style_indices);
        let animation_cadence = self.animation.borrow().effective_cadence();
        let has_data_click_handler = !self.data_click.borrow().is_empty();

        let properties = self.properties.borrow();
        PropertySnapshot {
            reason,
            axis_x: properties.get(PropertyKey::AxisX).as_axes().cloned(),
            axis_y: properties.get(PropertyKey::AxisY).as_axes().cloned(),
            series: properties.get(PropertyKey::Series).as_series().cloned(),
            series_style_indices,
            series_colors,
            zoom: properties.get(PropertyKey::Zoom).as_zoom().unwrap_or_default(),
            zooming_speed: properties
                .get(PropertyKey::ZoomingSpeed)
                .as_ratio()
                .unwrap_or(DEFAULT_ZOOMING_SPEED),
            legend_location: properties
                .get(PropertyKey::LegendLocation)
                .as_legend_location()
                .unwrap_or_default(),
            legend: properties.get(PropertyKey::ChartLegend).as_legend().cloned(),
            tooltip: properties.get(PropertyKey::DataTooltip).as_tooltip().cloned(),
            hoverable: properties
                .get(PropertyKey::Hoverable)
                .as_flag()
                .unwrap_or(true),
            animation_cadence,
            has_data_click_handler,
        }
    }

    pub(super) fn resolve_series_colors(&self, style_indices: &[usize]) -> Vec<Color> {
        let palette = self.lifecycle.borrow().palette().clone();
        let series = self.series.borrow().collection().cloned();
        let fills: Vec<Option<Color>> = series.map_or_else(Vec::new, |series| {
            series.with_items(|items| items.iter().map(|item| item.fill).collect())
        });
        style_indices
            .iter()
            .enumerate()
            .map(|(slot, &style_index)| {
                fills
                    .get(slot)
                    .copied()
                    .flatten()
                    .unwrap_or_else(|| palette.color_for(style_index))
            })
            .collect()
    }
}

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::TimeDelta;
use tracing::debug;

use crate::core::{Axis, Color, ControlId, SharedPalette, UpdaterState};
use crate::engine::{CalculationEngine, PropertySnapshot};
use crate::error::{ChartError, ChartResult};

use super::data_click::DataClickHandlers;
use super::{
    AnimationFrequencyController, ChartControlConfig, CollectionTarget, CollectionTracker,
    Lifecycle, LoadState, PropertyKey, PropertyStore, SchedulerStats, SeriesCollectionTracker,
    UpdateReason, UpdateScheduler,
};

/// Host-facing chart control.
///
/// `ChartControl` is a cheap handle: clones share one control instance. All
/// setters take `&self` so they can be called from property-changed handlers,
/// collection observers and engine callbacks running on the same thread.
pub struct ChartControl<E: CalculationEngine + 'static> {
    pub(super) core: Rc<ControlCore<E>>,
}

/// Shared state behind every handle of one control.
pub(super) struct ControlCore<E: CalculationEngine + 'static> {
    pub(super) id: ControlId,
    pub(super) weak_self: Weak<ControlCore<E>>,
    pub(super) properties: RefCell<PropertyStore>,
    pub(super) scheduler: RefCell<UpdateScheduler>,
    pub(super) lifecycle: RefCell<Lifecycle>,
    pub(super) animation: RefCell<AnimationFrequencyController>,
    pub(super) series: RefCell<SeriesCollectionTracker>,
    pub(super) axis_x: RefCell<CollectionTracker<Axis>>,
    pub(super) axis_y: RefCell<CollectionTracker<Axis>>,
    pub(super) data_click: RefCell<DataClickHandlers>,
    pub(super) engine: RefCell<E>,
}

impl<E: CalculationEngine + 'static> Clone for ChartControl<E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<E: CalculationEngine + 'static> fmt::Debug for ChartControl<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartControl")
            .field("id", &self.core.id)
            .field("load_state", &self.load_state())
            .field("pending_update", &self.has_pending_update())
            .finish_non_exhaustive()
    }
}

impl<E: CalculationEngine + 'static> ChartControl<E> {
    /// Creates a control drawing default series colors from the process-wide palette.
    pub fn new(engine: E, config: ChartControlConfig) -> ChartResult<Self> {
        Self::with_palette(engine, config, SharedPalette::global())
    }

    pub fn with_palette(
        engine: E,
        config: ChartControlConfig,
        palette: SharedPalette,
    ) -> ChartResult<Self> {
        config.validate()?;

        let mut properties = PropertyStore::new();
        for (key, value) in config.property_values() {
            properties.replace(key, value)?;
        }

        let mut animation = AnimationFrequencyController::new(engine.default_animation_speed());
        animation.sync(
            properties.get(PropertyKey::AnimationsSpeed).as_duration(),
            config.disable_animations,
        );

        let lifecycle = Lifecycle::new(palette, config.randomize_starting_color);
        let starting_color_index = lifecycle.starting_color_index();
        let paused = config.updater_state == UpdaterState::Paused;

        let core = Rc::new_cyclic(|weak_self| ControlCore {
            id: ControlId::next(),
            weak_self: weak_self.clone(),
            properties: RefCell::new(properties),
            scheduler: RefCell::new(UpdateScheduler::new(paused)),
            lifecycle: RefCell::new(lifecycle),
            animation: RefCell::new(animation),
            series: RefCell::new(SeriesCollectionTracker::new(starting_color_index)),
            axis_x: RefCell::new(CollectionTracker::new(CollectionTarget::AxisX)),
            axis_y: RefCell::new(CollectionTracker::new(CollectionTarget::AxisY)),
            data_click: RefCell::new(DataClickHandlers::default()),
            engine: RefCell::new(engine),
        });

        debug!(
            control = %core.id,
            starting_color_index,
            randomized = config.randomize_starting_color,
            paused,
            "chart control created"
        );
        Ok(Self { core })
    }

    #[must_use]
    pub fn id(&self) -> ControlId {
        self.core.id
    }

    /// Marks the control as attached to a live surface.
    ///
    /// The first call flushes the pending update, if any, with exactly one
    /// engine update. Later calls do nothing.
    pub fn on_attached_to_surface(&self) -> ChartResult<()> {
        let newly_loaded = self.core.lifecycle.borrow_mut().mark_loaded();
        if !newly_loaded {
            debug!(control = %self.core.id, "already attached; ignoring");
            return Ok(());
        }
        debug!(control = %self.core.id, "attached to surface");
        self.core.flush_deferred().map(|_| ())
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.core.lifecycle.borrow().is_loaded()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.core.lifecycle.borrow().load_state()
    }

    /// Requests a model update without changing any property.
    pub fn request_update(&self) -> ChartResult<()> {
        self.core.request_model_update(UpdateReason::Manual)
    }

    /// Runs the next dispatch tick: forwards the pending update, or else the
    /// pending redraw, when the engine may be called. Returns whether the
    /// engine ran.
    pub fn dispatch_deferred(&self) -> ChartResult<bool> {
        self.core.flush_deferred()
    }

    #[must_use]
    pub fn has_pending_update(&self) -> bool {
        self.core.scheduler.borrow().has_pending()
    }

    /// Whether a redraw requested during an engine call waits for the next tick.
    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.core.scheduler.borrow().pending_redraw().is_some()
    }

    #[must_use]
    pub fn is_update_in_flight(&self) -> bool {
        self.core.scheduler.borrow().in_flight().is_some()
    }

    #[must_use]
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.core.scheduler.borrow().stats()
    }

    /// Message of the last failed engine call, cleared by the next successful one.
    #[must_use]
    pub fn last_engine_error(&self) -> Option<String> {
        self.core.scheduler.borrow().last_error().map(str::to_owned)
    }

    #[must_use]
    pub fn effective_animation_cadence(&self) -> TimeDelta {
        self.core.animation.borrow().effective_cadence()
    }

    #[must_use]
    pub fn starting_color_index(&self) -> usize {
        self.core.lifecycle.borrow().starting_color_index()
    }

    #[must_use]
    pub fn palette(&self) -> SharedPalette {
        self.core.lifecycle.borrow().palette().clone()
    }

    #[must_use]
    pub fn series_style_indices(&self) -> Vec<usize> {
        self.core.series.borrow().style_indices().to_vec()
    }

    /// Resolved color per series: explicit fill, else the palette color of
    /// the series' style index.
    #[must_use]
    pub fn series_colors(&self) -> Vec<Color> {
        let indices = self.series_style_indices();
        self.core.resolve_series_colors(&indices)
    }

    /// Snapshot the engine would receive for a manual update right now.
    #[must_use]
    pub fn snapshot(&self) -> PropertySnapshot {
        self.core.build_snapshot(UpdateReason::Manual)
    }

    /// Shared access to the engine. Fails while the engine is running a call.
    pub fn with_engine<T>(&self, f: impl FnOnce(&E) -> T) -> ChartResult<T> {
        let engine = self
            .core
            .engine
            .try_borrow()
            .map_err(|_| ChartError::Reentrancy {
                operation: "with_engine",
            })?;
        Ok(f(&*engine))
    }

    /// Exclusive access to the engine. Fails while the engine is running a call.
    pub fn with_engine_mut<T>(&self, f: impl FnOnce(&mut E) -> T) -> ChartResult<T> {
        let mut engine = self
            .core
            .engine
            .try_borrow_mut()
            .map_err(|_| ChartError::Reentrancy {
                operation: "with_engine_mut",
            })?;
        Ok(f(&mut *engine))
    }

    /// Returns the engine when this is the last handle, otherwise the handle itself.
    pub fn into_engine(self) -> Result<E, Self> {
        match Rc::try_unwrap(self.core) {
            Ok(core) => Ok(core.engine.into_inner()),
            Err(core) => Err(Self { core }),
        }
    }
}

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::CollectionDelta;
use crate::error::ChartResult;

use super::{CollectionTarget, LoadState, PropertyKey};

/// Why an engine call was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateReason {
    Property(PropertyKey),
    Collection {
        target: CollectionTarget,
        delta: CollectionDelta,
    },
    SeriesRebind,
    Manual,
}

/// The single deferred update kept while the engine cannot be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUpdate {
    pub first_reason: UpdateReason,
    pub last_reason: UpdateReason,
    /// Number of requests folded into this pending update.
    pub requests: usize,
}

impl PendingUpdate {
    fn new(reason: UpdateReason) -> Self {
        Self {
            first_reason: reason,
            last_reason: reason,
            requests: 1,
        }
    }

    fn absorb(&mut self, reason: UpdateReason) {
        self.last_reason = reason;
        self.requests += 1;
    }
}

/// Scheduler decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Admission {
    /// Call the engine now; the caller must report back through `finish`.
    Forward,
    /// Recorded in the pending flag until the control is loaded and running.
    Deferred,
    /// An engine call is in progress; folded into the pending flag.
    Coalesced,
    /// Redraw with no live surface; nothing to do.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineCall {
    Update,
    Redraw,
}

/// Deferred engine call handed out by [`UpdateScheduler::take_deferred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredCall {
    Update(PendingUpdate),
    /// Redraw requested while another call was running.
    Redraw(UpdateReason),
}

impl DeferredCall {
    #[must_use]
    pub fn call(&self) -> EngineCall {
        match self {
            Self::Update(_) => EngineCall::Update,
            Self::Redraw(_) => EngineCall::Redraw,
        }
    }

    /// Reason reported to the engine for this call.
    #[must_use]
    pub fn reason(&self) -> UpdateReason {
        match self {
            Self::Update(pending) => pending.last_reason,
            Self::Redraw(reason) => *reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub model_requests: u64,
    pub updates_forwarded: u64,
    pub updates_deferred: u64,
    pub reentrant_deferrals: u64,
    pub deferred_flushes: u64,
    pub redraws_forwarded: u64,
    pub redraws_dropped: u64,
    pub redraws_deferred: u64,
    pub engine_failures: u64,
}

/// Decides when model updates and redraws reach the calculation engine.
///
/// The scheduler owns no engine; it hands out [`Admission::Forward`] and
/// expects a matching [`UpdateScheduler::finish`] once the call returned.
/// While a call is in flight every further request is folded into the
/// pending flag (or the pending redraw), so the engine is never entered
/// recursively. A pending update also covers a pending redraw.
#[derive(Debug, Clone, Default)]
pub struct UpdateScheduler {
    paused: bool,
    in_flight: Option<EngineCall>,
    pending: Option<PendingUpdate>,
    pending_redraw: Option<UpdateReason>,
    last_error: Option<String>,
    stats: SchedulerStats,
}

impl UpdateScheduler {
    #[must_use]
    pub fn new(paused: bool) -> Self {
        Self {
            paused,
            ..Self::default()
        }
    }

    pub fn request_model_update(&mut self, reason: UpdateReason, load: LoadState) -> Admission {
        self.stats.model_requests += 1;

        if let Some(call) = self.in_flight {
            self.record_pending(reason);
            self.stats.reentrant_deferrals += 1;
            debug!(
                ?reason,
                ?call,
                "model update requested during engine call; deferred to next tick"
            );
            return Admission::Coalesced;
        }

        if load == LoadState::NotLoaded || self.paused {
            self.record_pending(reason);
            self.stats.updates_deferred += 1;
            trace!(?reason, ?load, paused = self.paused, "model update deferred");
            return Admission::Deferred;
        }

        if let Some(pending) = self.pending.take() {
            trace!(
                absorbed = pending.requests,
                "pending update absorbed by forwarded update"
            );
        }
        self.pending_redraw = None;
        self.begin(EngineCall::Update);
        Admission::Forward
    }

    pub fn request_redraw(&mut self, reason: UpdateReason, load: LoadState) -> Admission {
        if let Some(call) = self.in_flight {
            self.pending_redraw = Some(reason);
            self.stats.redraws_deferred += 1;
            debug!(
                ?reason,
                ?call,
                "redraw requested during engine call; deferred to next tick"
            );
            return Admission::Coalesced;
        }
        if load == LoadState::NotLoaded || self.paused {
            self.stats.redraws_dropped += 1;
            trace!(?reason, "redraw dropped without live surface");
            return Admission::Dropped;
        }
        self.pending_redraw = None;
        self.begin(EngineCall::Redraw);
        Admission::Forward
    }

    /// Hands out the deferred call when the engine may be called. A pending
    /// update wins over a pending redraw and clears it.
    ///
    /// On `Some`, the caller owns an in-flight call and must call `finish`.
    pub fn take_deferred(&mut self, load: LoadState) -> Option<DeferredCall> {
        if load == LoadState::NotLoaded || self.paused || self.in_flight.is_some() {
            return None;
        }
        let deferred = match self.pending.take() {
            Some(pending) => {
                self.pending_redraw = None;
                DeferredCall::Update(pending)
            }
            None => DeferredCall::Redraw(self.pending_redraw.take()?),
        };
        self.stats.deferred_flushes += 1;
        self.begin(deferred.call());
        Some(deferred)
    }

    /// Closes the in-flight call. Failures are counted and remembered but
    /// leave the scheduler ready for the next request.
    pub fn finish(&mut self, outcome: &ChartResult<()>) {
        self.in_flight = None;
        match outcome {
            Ok(()) => self.last_error = None,
            Err(err) => {
                self.stats.engine_failures += 1;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Closes an in-flight call that could not reach the engine and keeps
    /// it for the next tick, as an update or a redraw like the original call.
    pub fn requeue(&mut self, call: EngineCall, reason: UpdateReason) {
        self.in_flight = None;
        match call {
            EngineCall::Update => {
                self.record_pending(reason);
                self.stats.reentrant_deferrals += 1;
            }
            EngineCall::Redraw => {
                self.pending_redraw = Some(reason);
                self.stats.redraws_deferred += 1;
            }
        }
        debug!(?reason, ?call, "engine busy; call kept for the next tick");
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingUpdate> {
        self.pending
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending_redraw(&self) -> Option<UpdateReason> {
        self.pending_redraw
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<EngineCall> {
        self.in_flight
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    fn begin(&mut self, call: EngineCall) {
        self.in_flight = Some(call);
        match call {
            EngineCall::Update => self.stats.updates_forwarded += 1,
            EngineCall::Redraw => self.stats.redraws_forwarded += 1,
        }
    }

    fn record_pending(&mut self, reason: UpdateReason) {
        match &mut self.pending {
            Some(pending) => pending.absorb(reason),
            None => self.pending = Some(PendingUpdate::new(reason)),
        }
    }
}

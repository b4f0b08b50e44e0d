use serde::{Deserialize, Serialize};

use crate::core::{ControlId, UpdaterState};
use crate::engine::CalculationEngine;
use crate::error::{ChartError, ChartResult};

use super::{ChartControl, LoadState, PendingUpdate, SchedulerStats, UpdateReason};

/// Serializable view of a control's invalidation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDiagnostics {
    pub control_id: ControlId,
    pub load_state: LoadState,
    pub updater_state: UpdaterState,
    pub pending_update: Option<PendingUpdate>,
    pub pending_redraw: Option<UpdateReason>,
    pub update_in_flight: bool,
    pub scheduler: SchedulerStats,
    pub series_len: usize,
    pub series_style_indices: Vec<usize>,
    pub starting_color_index: usize,
    pub effective_animation_cadence_ms: i64,
    pub data_click_handlers: usize,
    pub last_engine_error: Option<String>,
}

impl<E: CalculationEngine + 'static> ChartControl<E> {
    #[must_use]
    pub fn diagnostics(&self) -> ControlDiagnostics {
        let scheduler = self.core.scheduler.borrow();
        ControlDiagnostics {
            control_id: self.core.id,
            load_state: self.load_state(),
            updater_state: self.updater_state(),
            pending_update: scheduler.pending(),
            pending_redraw: scheduler.pending_redraw(),
            update_in_flight: scheduler.in_flight().is_some(),
            scheduler: scheduler.stats(),
            series_len: self.series().map_or(0, |series| series.len()),
            series_style_indices: self.series_style_indices(),
            starting_color_index: self.starting_color_index(),
            effective_animation_cadence_ms: self.effective_animation_cadence().num_milliseconds(),
            data_click_handlers: self.data_click_handler_count(),
            last_engine_error: scheduler.last_error().map(str::to_owned),
        }
    }

    pub fn diagnostics_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.diagnostics()).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize control diagnostics: {e}"))
        })
    }
}

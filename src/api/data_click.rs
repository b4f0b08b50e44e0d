use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{ChartPoint, ControlId};
use crate::engine::CalculationEngine;

use super::ChartControl;

/// Raised when a data point of the chart is activated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataClickEvent {
    pub source: ControlId,
    pub point: ChartPoint,
}

pub type DataClickHandler = Rc<dyn Fn(&DataClickEvent)>;

/// Handle returned by [`ChartControl::connect_data_click`].
///
/// Distinct from property handler ids, so a handle from one registry can
/// never disconnect an entry of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataClickHandlerId(u64);

impl DataClickHandlerId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

type DataClickHandlerList = SmallVec<[DataClickHandler; 1]>;

#[derive(Default)]
pub(super) struct DataClickHandlers {
    handlers: SmallVec<[(DataClickHandlerId, DataClickHandler); 1]>,
    next_id: u64,
}

impl DataClickHandlers {
    pub(super) fn connect(&mut self, handler: DataClickHandler) -> DataClickHandlerId {
        self.next_id += 1;
        let id = DataClickHandlerId(self.next_id);
        self.handlers.push((id, handler));
        id
    }

    pub(super) fn disconnect(&mut self, id: DataClickHandlerId) -> bool {
        match self.handlers.iter().position(|(entry, _)| *entry == id) {
            Some(position) => {
                self.handlers.remove(position);
                true
            }
            None => false,
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(super) fn len(&self) -> usize {
        self.handlers.len()
    }

    fn snapshot(&self) -> DataClickHandlerList {
        self.handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect()
    }
}

impl<E: CalculationEngine + 'static> ChartControl<E> {
    /// Registers a data click handler. Connecting or disconnecting handlers
    /// changes [`ChartControl::has_data_click_handler`] and requests a redraw.
    pub fn connect_data_click(
        &self,
        handler: impl Fn(&DataClickEvent) + 'static,
    ) -> DataClickHandlerId {
        let (id, was_empty) = {
            let mut handlers = self.core.data_click.borrow_mut();
            let was_empty = handlers.is_empty();
            (handlers.connect(Rc::new(handler)), was_empty)
        };
        debug!(control = %self.core.id, handler = id.raw(), "data click handler connected");
        if was_empty {
            self.core.request_redraw_logged("data click consumer attached");
        }
        id
    }

    /// Returns `true` when `id` was connected and is now removed.
    pub fn disconnect_data_click(&self, id: DataClickHandlerId) -> bool {
        let (removed, now_empty) = {
            let mut handlers = self.core.data_click.borrow_mut();
            let removed = handlers.disconnect(id);
            (removed, handlers.is_empty())
        };
        if removed && now_empty {
            self.core.request_redraw_logged("last data click consumer detached");
        }
        removed
    }

    #[must_use]
    pub fn data_click_handler_count(&self) -> usize {
        self.core.data_click.borrow().len()
    }

    /// Delivers a data click to every connected handler, in connection order.
    ///
    /// Returns the number of handlers invoked. Handlers may connect or
    /// disconnect handlers; changes apply from the next click.
    pub fn emit_data_click(&self, point: ChartPoint) -> usize {
        let handlers = self.core.data_click.borrow().snapshot();
        let event = DataClickEvent {
            source: self.core.id,
            point,
        };
        trace!(control = %self.core.id, ?point, handlers = handlers.len(), "data click");
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }
}

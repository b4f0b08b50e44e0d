use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::ChartResult;

use super::validation::validate_property_value;
use super::{PropertyKey, PropertyValue};

/// Callback attached to one property, invoked after every effective change.
pub type PropertyChangedHandler = Rc<dyn Fn(&PropertyChange) -> ChartResult<()>>;

/// Handle returned when a handler is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId(u64);

impl HandlerId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One effective property change, as seen by handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub key: PropertyKey,
    pub old_value: PropertyValue,
    pub new_value: PropertyValue,
}

pub(super) type HandlerList = SmallVec<[PropertyChangedHandler; 2]>;

struct PropertyEntry {
    value: PropertyValue,
    handlers: SmallVec<[(HandlerId, PropertyChangedHandler); 2]>,
}

/// Typed key/value store of a control's configuration properties.
///
/// Every key in [`PropertyKey::ALL`] is present from construction with its
/// default value. Writes that do not change the value are ignored; writes
/// that fail validation leave the stored value untouched.
pub struct PropertyStore {
    entries: IndexMap<PropertyKey, PropertyEntry>,
    next_handler_id: u64,
}

impl Default for PropertyStore {
    fn default() -> Self {
        let entries = PropertyKey::ALL
            .into_iter()
            .map(|key| {
                (
                    key,
                    PropertyEntry {
                        value: key.default_value(),
                        handlers: SmallVec::new(),
                    },
                )
            })
            .collect();
        Self {
            entries,
            next_handler_id: 1,
        }
    }
}

impl PropertyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: PropertyKey) -> &PropertyValue {
        &self.entries[&key].value
    }

    /// Stores `value` and runs the handlers registered for `key`.
    ///
    /// Returns `Ok(false)` for no-op writes. Handlers run in registration
    /// order; the first failing handler stops the dispatch and its error is
    /// returned, while the new value stays stored.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> ChartResult<bool> {
        let Some(change) = self.replace(key, value)? else {
            return Ok(false);
        };
        let handlers = self.handlers(key);
        dispatch_change(&handlers, &change)?;
        Ok(true)
    }

    /// Validates and stores `value` without running handlers.
    pub fn replace(
        &mut self,
        key: PropertyKey,
        value: PropertyValue,
    ) -> ChartResult<Option<PropertyChange>> {
        validate_property_value(key, &value)?;
        let entry = &mut self.entries[&key];
        if entry.value == value {
            trace!(property = key.name(), "ignoring no-op property write");
            return Ok(None);
        }
        let old_value = std::mem::replace(&mut entry.value, value.clone());
        Ok(Some(PropertyChange {
            key,
            old_value,
            new_value: value,
        }))
    }

    pub fn add_handler(&mut self, key: PropertyKey, handler: PropertyChangedHandler) -> HandlerId {
        let id = HandlerId(self.next_handler_id);
        self.next_handler_id += 1;
        self.entries[&key].handlers.push((id, handler));
        id
    }

    /// Returns `true` when the handler was registered for `key` and is now removed.
    pub fn remove_handler(&mut self, key: PropertyKey, id: HandlerId) -> bool {
        let handlers = &mut self.entries[&key].handlers;
        match handlers.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(position) => {
                handlers.remove(position);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn handler_count(&self, key: PropertyKey) -> usize {
        self.entries[&key].handlers.len()
    }

    /// Snapshot of the handlers for `key`, so they can run without the store borrowed.
    pub(super) fn handlers(&self, key: PropertyKey) -> HandlerList {
        self.entries[&key]
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect()
    }
}

pub(super) fn dispatch_change(
    handlers: &[PropertyChangedHandler],
    change: &PropertyChange,
) -> ChartResult<()> {
    for handler in handlers {
        handler(change)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeDelta;

    use super::{PropertyChange, PropertyStore};
    use crate::api::{PropertyKey, PropertyValue};
    use crate::core::LegendLocation;
    use crate::error::ChartError;

    fn record(
        store: &mut PropertyStore,
        key: PropertyKey,
        label: &'static str,
        log: &Rc<RefCell<Vec<(&'static str, PropertyChange)>>>,
    ) {
        let log = Rc::clone(log);
        store.add_handler(
            key,
            Rc::new(move |change: &PropertyChange| {
                log.borrow_mut().push((label, change.clone()));
                Ok(())
            }),
        );
    }

    #[test]
    fn handlers_run_in_registration_order_with_old_and_new_values() {
        let mut store = PropertyStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut store, PropertyKey::LegendLocation, "first", &log);
        record(&mut store, PropertyKey::LegendLocation, "second", &log);

        let changed = store
            .set(
                PropertyKey::LegendLocation,
                PropertyValue::LegendLocation(LegendLocation::Top),
            )
            .expect("set legend location");

        assert!(changed);
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].0, "first");
        assert_eq!(log[1].0, "second");
        assert_eq!(
            log[0].1.old_value,
            PropertyValue::LegendLocation(LegendLocation::None)
        );
        assert_eq!(
            log[0].1.new_value,
            PropertyValue::LegendLocation(LegendLocation::Top)
        );
    }

    #[test]
    fn identical_writes_do_not_fire_handlers() {
        let mut store = PropertyStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut store, PropertyKey::Hoverable, "hover", &log);

        let changed = store
            .set(PropertyKey::Hoverable, PropertyValue::Flag(true))
            .expect("set default value");

        assert!(!changed);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn invalid_values_keep_previous_value_and_skip_handlers() {
        let mut store = PropertyStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut store, PropertyKey::AnimationsSpeed, "speed", &log);
        store
            .set(
                PropertyKey::AnimationsSpeed,
                PropertyValue::Duration(Some(TimeDelta::milliseconds(250))),
            )
            .expect("valid speed");

        let err = store
            .set(
                PropertyKey::AnimationsSpeed,
                PropertyValue::Duration(Some(TimeDelta::milliseconds(-5))),
            )
            .expect_err("negative speed");

        assert!(matches!(err, ChartError::InvalidConfiguration { .. }));
        assert_eq!(
            store.get(PropertyKey::AnimationsSpeed),
            &PropertyValue::Duration(Some(TimeDelta::milliseconds(250)))
        );
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn failing_handler_stops_dispatch_but_keeps_the_new_value() {
        let mut store = PropertyStore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        store.add_handler(
            PropertyKey::DisableAnimations,
            Rc::new(|_: &PropertyChange| Err(ChartError::Engine("handler failed".to_owned()))),
        );
        record(&mut store, PropertyKey::DisableAnimations, "after", &log);

        let err = store
            .set(PropertyKey::DisableAnimations, PropertyValue::Flag(true))
            .expect_err("first handler fails");

        assert_eq!(err, ChartError::Engine("handler failed".to_owned()));
        assert!(log.borrow().is_empty());
        assert_eq!(
            store.get(PropertyKey::DisableAnimations),
            &PropertyValue::Flag(true)
        );
    }

    #[test]
    fn removed_handlers_no_longer_fire() {
        let mut store = PropertyStore::new();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.add_handler(
            PropertyKey::Zoom,
            Rc::new(move |_: &PropertyChange| {
                *counter.borrow_mut() += 1;
                Ok(())
            }),
        );

        assert!(store.remove_handler(PropertyKey::Zoom, id));
        assert!(!store.remove_handler(PropertyKey::Zoom, id));
        assert!(!store.remove_handler(PropertyKey::Hoverable, id));
        store
            .set(
                PropertyKey::Zoom,
                PropertyValue::Zoom(crate::core::ZoomingOptions::X),
            )
            .expect("set zoom");

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(store.handler_count(PropertyKey::Zoom), 0);
    }
}

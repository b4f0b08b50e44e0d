use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Membership change reported by an [`ObservableCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionDelta {
    Added { index: usize, count: usize },
    Removed { index: usize, count: usize },
    Replaced { index: usize },
    Reset,
}

impl CollectionDelta {
    /// `true` when the set of members changed, as opposed to one slot being swapped.
    #[must_use]
    pub const fn changes_membership(self) -> bool {
        !matches!(self, Self::Replaced { .. })
    }
}

/// Handle returned by [`ObservableCollection::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

pub type CollectionObserver = Rc<dyn Fn(&CollectionDelta)>;

struct CollectionInner<T> {
    items: RefCell<Vec<T>>,
    observers: RefCell<IndexMap<SubscriptionId, CollectionObserver>>,
    next_subscription: Cell<u64>,
}

/// Shared, single-threaded list that reports membership changes to its observers.
///
/// Cloning yields another handle to the same list; identity is reference
/// identity (see [`ObservableCollection::ptr_eq`]). Observers run synchronously
/// after the mutation is applied and in subscription order. They may read or
/// mutate the collection again.
pub struct ObservableCollection<T> {
    inner: Rc<CollectionInner<T>>,
}

impl<T> Clone for ObservableCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

impl<T> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> FromIterator<T> for ObservableCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

impl<T> ObservableCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                items: RefCell::new(items),
                observers: RefCell::new(IndexMap::new()),
                next_subscription: Cell::new(1),
            }),
        }
    }

    /// Reference identity, not element equality.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` against the current members. `f` must not mutate this collection.
    pub fn with_items<U>(&self, f: impl FnOnce(&[T]) -> U) -> U {
        f(&self.inner.items.borrow())
    }

    pub fn push(&self, item: T) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            items.push(item);
            items.len() - 1
        };
        self.notify(CollectionDelta::Added { index, count: 1 });
    }

    pub fn insert(&self, index: usize, item: T) -> ChartResult<()> {
        {
            let mut items = self.inner.items.borrow_mut();
            if index > items.len() {
                return Err(ChartError::InvalidData(format!(
                    "insert index {index} is out of bounds for collection of length {}",
                    items.len()
                )));
            }
            items.insert(index, item);
        }
        self.notify(CollectionDelta::Added { index, count: 1 });
        Ok(())
    }

    pub fn extend(&self, new_items: impl IntoIterator<Item = T>) {
        let (index, count) = {
            let mut items = self.inner.items.borrow_mut();
            let index = items.len();
            items.extend(new_items);
            (index, items.len() - index)
        };
        if count > 0 {
            self.notify(CollectionDelta::Added { index, count });
        }
    }

    /// Removes the member at `index`. Out-of-range indices are a silent no-op.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.notify(CollectionDelta::Removed { index, count: 1 });
        Some(removed)
    }

    /// Swaps the member at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: T) -> Option<T> {
        let previous = {
            let mut items = self.inner.items.borrow_mut();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item)
        };
        self.notify(CollectionDelta::Replaced { index });
        Some(previous)
    }

    pub fn clear(&self) {
        self.inner.items.borrow_mut().clear();
        self.notify(CollectionDelta::Reset);
    }

    /// Replaces every member in one step and reports a single `Reset`.
    pub fn reset(&self, items: Vec<T>) {
        *self.inner.items.borrow_mut() = items;
        self.notify(CollectionDelta::Reset);
    }

    pub fn subscribe(&self, observer: CollectionObserver) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.observers.borrow_mut().insert(id, observer);
        trace!(subscription = id.0, "collection observer subscribed");
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> ChartResult<()> {
        match self.inner.observers.borrow_mut().shift_remove(&id) {
            Some(_) => {
                trace!(subscription = id.0, "collection observer unsubscribed");
                Ok(())
            }
            None => Err(ChartError::NotSubscribed { subscription: id.0 }),
        }
    }

    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.observers.borrow().contains_key(&id)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn notify(&self, delta: CollectionDelta) {
        let observers: SmallVec<[CollectionObserver; 4]> =
            self.inner.observers.borrow().values().cloned().collect();
        for observer in observers {
            observer(&delta);
        }
    }
}

impl<T: Clone> ObservableCollection<T> {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }
}

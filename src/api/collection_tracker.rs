use tracing::debug;

use crate::core::{CollectionObserver, ObservableCollection, SubscriptionId};
use crate::error::ChartError;

use super::CollectionTarget;

struct BoundCollection<T> {
    collection: ObservableCollection<T>,
    subscription: SubscriptionId,
}

/// Keeps exactly one observed collection per target.
///
/// Every bind bumps a generation counter that the observer is built with;
/// deltas carrying an older generation come from a detached collection and
/// are rejected by [`CollectionTracker::accepts`].
pub struct CollectionTracker<T> {
    target: CollectionTarget,
    bound: Option<BoundCollection<T>>,
    generation: u64,
}

impl<T> CollectionTracker<T> {
    #[must_use]
    pub fn new(target: CollectionTarget) -> Self {
        Self {
            target,
            bound: None,
            generation: 0,
        }
    }

    /// Unsubscribes from the current collection, then subscribes to `collection`
    /// with the observer built by `make_observer` for the new generation.
    pub fn bind(
        &mut self,
        collection: Option<ObservableCollection<T>>,
        make_observer: impl FnOnce(u64) -> CollectionObserver,
    ) -> u64 {
        self.unbind();
        self.generation += 1;
        if let Some(collection) = collection {
            let subscription = collection.subscribe(make_observer(self.generation));
            debug!(
                target_collection = ?self.target,
                generation = self.generation,
                subscription = subscription.raw(),
                len = collection.len(),
                "collection bound"
            );
            self.bound = Some(BoundCollection {
                collection,
                subscription,
            });
        }
        self.generation
    }

    /// Drops the current subscription, if any, and returns the detached collection.
    pub fn unbind(&mut self) -> Option<ObservableCollection<T>> {
        let bound = self.bound.take()?;
        match bound.collection.unsubscribe(bound.subscription) {
            Ok(()) => {}
            Err(ChartError::NotSubscribed { subscription }) => {
                debug!(
                    target_collection = ?self.target,
                    subscription, "collection subscription already gone; ignoring"
                );
            }
            Err(err) => {
                debug!(target_collection = ?self.target, error = %err, "unsubscribe failed");
            }
        }
        Some(bound.collection)
    }

    #[must_use]
    pub fn accepts(&self, generation: u64) -> bool {
        self.bound.is_some() && self.generation == generation
    }

    #[must_use]
    pub fn collection(&self) -> Option<&ObservableCollection<T>> {
        self.bound.as_ref().map(|bound| &bound.collection)
    }

    #[must_use]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.bound.as_ref().map(|bound| bound.subscription)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn target(&self) -> CollectionTarget {
        self.target
    }
}

impl<T> Drop for CollectionTracker<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}

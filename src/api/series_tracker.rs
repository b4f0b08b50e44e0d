use tracing::trace;

use crate::core::{CollectionDelta, CollectionObserver, Series, SeriesCollection};

use super::{
    Classification, CollectionTarget, CollectionTracker, PropertyKey, classify_collection_delta,
    classify_property,
};

/// Observes the bound series collection and keeps per-series style indices.
///
/// Style indices are assigned sequentially from the control's starting
/// palette index; the palette wraps them when resolving colors.
pub struct SeriesCollectionTracker {
    tracker: CollectionTracker<Series>,
    starting_index: usize,
    style_indices: Vec<usize>,
}

impl SeriesCollectionTracker {
    #[must_use]
    pub fn new(starting_index: usize) -> Self {
        Self {
            tracker: CollectionTracker::new(CollectionTarget::Series),
            starting_index,
            style_indices: Vec::new(),
        }
    }

    /// Moves the subscription to `collection` and reindexes, even when it is
    /// the collection already bound.
    pub fn bind(
        &mut self,
        collection: Option<SeriesCollection>,
        make_observer: impl FnOnce(u64) -> CollectionObserver,
    ) -> Classification {
        self.tracker.bind(collection, make_observer);
        self.reindex();
        classify_property(PropertyKey::Series)
    }

    /// Classifies a delta from the observer of `generation`. Returns `None`
    /// for deltas from a collection that is no longer bound.
    pub fn on_delta(&mut self, generation: u64, delta: CollectionDelta) -> Option<Classification> {
        if !self.tracker.accepts(generation) {
            trace!(generation, ?delta, "ignoring delta from detached series collection");
            return None;
        }
        let classification = classify_collection_delta(CollectionTarget::Series, delta);
        if classification.class.requires_reindex() {
            self.reindex();
        }
        Some(classification)
    }

    pub fn reindex(&mut self) {
        let len = self.tracker.collection().map_or(0, SeriesCollection::len);
        self.style_indices = (self.starting_index..self.starting_index + len).collect();
        trace!(series = len, start = self.starting_index, "series reindexed");
    }

    #[must_use]
    pub fn style_indices(&self) -> &[usize] {
        &self.style_indices
    }

    #[must_use]
    pub fn collection(&self) -> Option<&SeriesCollection> {
        self.tracker.collection()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.tracker.generation()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::SeriesCollectionTracker;
    use crate::api::ChangeClass;
    use crate::core::{CollectionDelta, CollectionObserver, Series, SeriesCollection};

    fn silent(_: u64) -> CollectionObserver {
        Rc::new(|_: &CollectionDelta| {})
    }

    fn series(count: usize) -> SeriesCollection {
        (0..count)
            .map(|index| Series::new(format!("s{index}"), vec![index as f64]))
            .collect()
    }

    #[test]
    fn bind_reindexes_from_the_starting_index() {
        let mut tracker = SeriesCollectionTracker::new(2);
        let classification = tracker.bind(Some(series(4)), silent);

        assert_eq!(classification.class, ChangeClass::ModelUpdateWithReindex);
        assert_eq!(tracker.style_indices(), &[2, 3, 4, 5]);
    }

    #[test]
    fn membership_deltas_reindex_and_swaps_keep_indices() {
        let collection = series(2);
        let mut tracker = SeriesCollectionTracker::new(0);
        tracker.bind(Some(collection.clone()), silent);
        let generation = tracker.generation();

        collection.push(Series::new("late", Vec::new()));
        let added = tracker
            .on_delta(generation, CollectionDelta::Added { index: 2, count: 1 })
            .expect("current generation");
        assert_eq!(added.class, ChangeClass::ModelUpdateWithReindex);
        assert_eq!(tracker.style_indices(), &[0, 1, 2]);

        let replaced = tracker
            .on_delta(generation, CollectionDelta::Replaced { index: 0 })
            .expect("current generation");
        assert_eq!(replaced.class, ChangeClass::ModelUpdate);
        assert_eq!(tracker.style_indices(), &[0, 1, 2]);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let mut tracker = SeriesCollectionTracker::new(0);
        tracker.bind(Some(series(1)), silent);
        let stale = tracker.generation();
        tracker.bind(Some(series(1)), silent);

        assert!(tracker.on_delta(stale, CollectionDelta::Reset).is_none());
    }

    #[test]
    fn unbinding_clears_indices() {
        let mut tracker = SeriesCollectionTracker::new(0);
        tracker.bind(Some(series(3)), silent);
        tracker.bind(None, silent);

        assert!(tracker.style_indices().is_empty());
        assert!(tracker.collection().is_none());
    }
}

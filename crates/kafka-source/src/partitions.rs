//! Partition-assignment bookkeeping.
//!
//! The rebalance callbacks replace the whole snapshot on every event; readers
//! load whichever snapshot is current without taking a lock. A reader either
//! sees the pre-rebalance set or the post-rebalance set, never a mix.

use arc_swap::ArcSwap;
use std::sync::Arc;

/// One partition of one topic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicPartition {
    /// Kafka topic name
    pub topic: String,
    /// Kafka partition number
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

/// The worker's current view of its assigned partitions.
///
/// Single writer (the rebalance callback path), many readers. Starts empty.
#[derive(Debug, Default)]
pub struct PartitionTracker {
    assigned: ArcSwap<Vec<TopicPartition>>,
}

impl PartitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with a sorted copy of the new assignment.
    pub fn on_assigned(&self, mut partitions: Vec<TopicPartition>) {
        partitions.sort();
        self.assigned.store(Arc::new(partitions));
    }

    /// Replace the snapshot with the empty set.
    pub fn on_revoked(&self) {
        self.assigned.store(Arc::new(Vec::new()));
    }

    /// Current snapshot. The returned list never changes; a later rebalance
    /// swaps in a fresh one.
    pub fn snapshot(&self) -> Arc<Vec<TopicPartition>> {
        self.assigned.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Vec<TopicPartition> {
        vec![
            TopicPartition::new("spans", 1),
            TopicPartition::new("spans", 0),
        ]
    }

    #[test]
    fn starts_empty() {
        assert!(PartitionTracker::new().snapshot().is_empty());
    }

    #[test]
    fn assignment_is_sorted() {
        let tracker = PartitionTracker::new();
        tracker.on_assigned(pair());
        let snapshot = tracker.snapshot();
        assert_eq!(
            *snapshot,
            vec![
                TopicPartition::new("spans", 0),
                TopicPartition::new("spans", 1),
            ]
        );
    }

    #[test]
    fn revocation_leaves_the_empty_set() {
        let tracker = PartitionTracker::new();
        tracker.on_assigned(pair());
        tracker.on_revoked();
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn held_snapshots_are_unaffected_by_later_swaps() {
        let tracker = PartitionTracker::new();
        tracker.on_assigned(pair());
        let before = tracker.snapshot();
        tracker.on_revoked();
        assert_eq!(before.len(), 2);
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn readers_only_ever_see_whole_snapshots() {
        let tracker = Arc::new(PartitionTracker::new());
        let writer = {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    tracker.on_assigned(pair());
                    tracker.on_revoked();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let snapshot = tracker.snapshot();
                        // Whole-value swap: the set is the full pair or empty,
                        // never a partially applied assignment.
                        assert!(snapshot.len() == 0 || snapshot.len() == 2);
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}

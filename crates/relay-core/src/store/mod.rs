//! In-memory result store keyed by job identifier.
//!
//! The store is sharded ([`DashMap`]): every operation locks a single shard for O(1) work,
//! and a sweep locks shards one at a time, so reads and writes on other shards proceed
//! while expired entries are removed.
mod entry;
pub use entry::Entry;

use std::time::Duration;

use dashmap::DashMap;
use relay_model::{JobId, Outcome};
use tokio::time::Instant;
use tracing::trace;

/// Sole owner of job results.
///
/// Holds at most one [`Entry`] per [`JobId`]. Entries are inserted on job completion,
/// removed atomically by [`EntryStore::take_if_present`], or evicted by
/// [`EntryStore::sweep_expired`].
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: DashMap<JobId, Entry>,
}

impl EntryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `id`, stamped with the current time.
    ///
    /// Last write wins on identifier collision.
    pub fn put(&self, id: JobId, outcome: Outcome) {
        self.put_at(id, outcome, Instant::now());
    }

    pub(crate) fn put_at(&self, id: JobId, outcome: Outcome, created_at: Instant) {
        trace!(job = %id, outcome = outcome.as_label(), "storing entry");
        self.entries.insert(id, Entry::new(outcome, created_at));
    }

    /// Atomically remove and return the entry for `id`.
    ///
    /// Concurrent callers racing on the same identifier observe the entry at most once.
    pub fn take_if_present(&self, id: &str) -> Option<Entry> {
        self.entries.remove(id).map(|(_, entry)| entry)
    }

    /// Remove every entry whose age at `now` exceeds `lifetime`.
    ///
    /// Returns the number of evicted entries.
    pub fn sweep_expired(&self, now: Instant, lifetime: Duration) -> usize {
        let mut evicted = 0usize;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now, lifetime);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Number of live entries (snapshot).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use relay_model::{JobId, Outcome};
    use tokio::time::Instant;

    use super::EntryStore;

    fn id(s: &str) -> JobId {
        JobId::new(s).unwrap()
    }

    #[test]
    fn take_consumes_entry() {
        let store = EntryStore::new();
        store.put(id("r1"), Outcome::Success("Hi there".into()));

        let entry = store.take_if_present("r1").expect("entry must be present");
        assert_eq!(entry.outcome(), &Outcome::Success("Hi there".into()));
        assert!(store.take_if_present("r1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn take_of_unknown_id_is_none() {
        let store = EntryStore::new();
        assert!(store.take_if_present("missing").is_none());
    }

    #[test]
    fn last_write_wins() {
        let store = EntryStore::new();
        store.put(id("dup"), Outcome::Success("first".into()));
        store.put(id("dup"), Outcome::Failure("second".into()));
        store.put(id("dup"), Outcome::Success("third".into()));

        assert_eq!(store.len(), 1);
        let entry = store.take_if_present("dup").unwrap();
        assert_eq!(entry.into_outcome(), Outcome::Success("third".into()));
    }

    #[test]
    fn overwrite_refreshes_timestamp() {
        let store = EntryStore::new();
        let t0 = Instant::now();
        let lifetime = Duration::from_secs(10);

        store.put_at(id("a"), Outcome::Success("old".into()), t0);
        store.put_at(id("a"), Outcome::Success("new".into()), t0 + Duration::from_secs(8));

        assert_eq!(store.sweep_expired(t0 + Duration::from_secs(15), lifetime), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let store = EntryStore::new();
        let t0 = Instant::now();
        let lifetime = Duration::from_secs(60);

        store.put_at(id("old"), Outcome::Success("x".into()), t0);
        store.put_at(id("edge"), Outcome::Success("y".into()), t0 + Duration::from_secs(40));
        store.put_at(id("fresh"), Outcome::Failure("z".into()), t0 + Duration::from_secs(90));

        let evicted = store.sweep_expired(t0 + Duration::from_secs(100), lifetime);

        assert_eq!(evicted, 1);
        assert!(store.take_if_present("old").is_none());
        assert!(store.take_if_present("edge").is_some());
        assert!(store.take_if_present("fresh").is_some());
    }

    #[test]
    fn entry_present_before_lifetime_and_gone_after() {
        let store = EntryStore::new();
        let t0 = Instant::now();
        let lifetime = Duration::from_secs(30);
        let eps = Duration::from_millis(1);

        store.put_at(id("r3"), Outcome::Success("done".into()), t0);

        assert_eq!(store.sweep_expired(t0 + lifetime - eps, lifetime), 0);
        assert_eq!(store.len(), 1);

        assert_eq!(store.sweep_expired(t0 + lifetime + eps, lifetime), 1);
        assert!(store.take_if_present("r3").is_none());
    }

    #[test]
    fn concurrent_takes_observe_entry_once() {
        let store = Arc::new(EntryStore::new());
        store.put(id("contended"), Outcome::Success("once".into()));

        let hits: usize = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let store = Arc::clone(&store);
                    s.spawn(move || store.take_if_present("contended").is_some() as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(hits, 1);
    }

    #[test]
    fn concurrent_puts_and_takes_keep_ids_separate() {
        const N: usize = 256;
        let store = Arc::new(EntryStore::new());

        thread::scope(|s| {
            for i in 0..N {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    store.put(id(&format!("job-{i}")), Outcome::Success(format!("out-{i}")));
                });
            }
        });
        assert_eq!(store.len(), N);

        let results: Vec<(usize, Option<Outcome>)> = thread::scope(|s| {
            let handles: Vec<_> = (0..N)
                .map(|i| {
                    let store = Arc::clone(&store);
                    s.spawn(move || {
                        let entry = store.take_if_present(&format!("job-{i}"));
                        (i, entry.map(|e| e.into_outcome()))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, outcome) in results {
            assert_eq!(outcome, Some(Outcome::Success(format!("out-{i}"))));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_runs_alongside_writers() {
        let store = Arc::new(EntryStore::new());
        let t0 = Instant::now();
        let lifetime = Duration::from_secs(5);

        for i in 0..100 {
            store.put_at(id(&format!("stale-{i}")), Outcome::Success("s".into()), t0);
        }

        thread::scope(|s| {
            let sweeper = Arc::clone(&store);
            s.spawn(move || sweeper.sweep_expired(t0 + Duration::from_secs(10), lifetime));

            for i in 0..100 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    store.put_at(
                        id(&format!("live-{i}")),
                        Outcome::Success("l".into()),
                        t0 + Duration::from_secs(9),
                    );
                });
            }
        });

        assert_eq!(store.len(), 100);
        for i in 0..100 {
            assert!(store.take_if_present(&format!("live-{i}")).is_some());
        }
    }
}

//! fanboard-store — in-memory realtime document store
//!
//! Collections of JSON documents with store-assigned identity and
//! timestamps, ordered queries, atomic field transforms, one level of
//! nested (per-parent) collections, and push watchers that receive the
//! entire current ordered result set on every change.

mod document;
mod error;
mod path;
mod query;
mod transform;

pub use document::{DocId, Document, Timestamp};
pub use error::StoreError;
pub use path::CollectionPath;
pub use query::{QuerySnapshot, QuerySpec, SortDirection};
pub use transform::FieldTransform;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Callback invoked with the full ordered result set of a watched query.
/// Runs outside the store's data lock, so it may query the store or
/// register further watchers. It must not write back into the store.
pub type WatchFn = Box<dyn Fn(&QuerySnapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherId(u64);

struct Watcher {
    spec: QuerySpec,
    callback: WatchFn,
}

/// Source of wall-clock milliseconds. Swappable so tests can script time.
type TimeSource = Box<dyn Fn() -> u64 + Send + Sync>;

/// Issues strictly increasing timestamps: the wall clock advanced past the
/// last issued millisecond starts a fresh stamp, anything else reuses the
/// last millisecond with a bumped sequence number. Ordering by these
/// stamps is therefore stable across all writers regardless of caller
/// clock skew — the store, never the client, assigns them.
struct MonotonicClock {
    now: TimeSource,
    last: Timestamp,
}

impl MonotonicClock {
    fn next(&mut self) -> Timestamp {
        let millis = (self.now)();
        let stamp = if millis > self.last.millis {
            Timestamp { millis, seq: 0 }
        } else {
            Timestamp {
                millis: self.last.millis,
                seq: self.last.seq + 1,
            }
        };
        self.last = stamp;
        stamp
    }
}

fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct Inner {
    /// Collection path → documents by id.
    collections: HashMap<CollectionPath, HashMap<DocId, Document>>,
    clock: MonotonicClock,
}

/// The shared document store. Constructed once at startup and passed
/// around behind `Arc`; all mutation goes through `add` and `update`.
pub struct Store {
    inner: Mutex<Inner>,
    watchers: Mutex<Vec<Arc<Watcher>>>,
    /// Serializes watcher notification rounds so each watcher sees
    /// snapshots in commit order.
    notify_gate: Mutex<()>,
    next_watcher: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::with_time_source(Box::new(wall_clock_millis))
    }

    /// Build a store with a scripted clock. Timestamps stay strictly
    /// increasing even if the source stalls or runs backwards.
    pub fn with_time_source(now: TimeSource) -> Self {
        Store {
            inner: Mutex::new(Inner {
                collections: HashMap::new(),
                clock: MonotonicClock {
                    now,
                    last: Timestamp { millis: 0, seq: 0 },
                },
            }),
            watchers: Mutex::new(Vec::new()),
            notify_gate: Mutex::new(()),
            next_watcher: AtomicU64::new(1),
        }
    }

    /// Create a document. The store assigns the id and the creation
    /// timestamp in the same commit that makes the document visible, so no
    /// reader can ever observe a document without a resolved stamp.
    pub fn add(
        &self,
        path: &CollectionPath,
        fields: serde_json::Map<String, Value>,
    ) -> Result<Document> {
        let doc = {
            let mut inner = self.inner.lock().unwrap();
            check_parent(&inner, path)?;
            let doc = Document {
                id: DocId::generate(),
                created_at: inner.clock.next(),
                fields,
            };
            inner
                .collections
                .entry(path.clone())
                .or_default()
                .insert(doc.id.clone(), doc.clone());
            doc
        };
        self.notify(path);
        Ok(doc)
    }

    /// Current field snapshot of one document, or None if it was never
    /// created.
    pub fn get(&self, path: &CollectionPath, id: &DocId) -> Result<Option<Document>> {
        let inner = self.inner.lock().unwrap();
        check_parent(&inner, path)?;
        Ok(inner
            .collections
            .get(path)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    /// Apply field transforms to one document. All transforms land
    /// atomically: concurrent updates never interleave within a document,
    /// which is what makes signed increments and set membership updates
    /// safe to issue from racing writers.
    pub fn update(
        &self,
        path: &CollectionPath,
        id: &DocId,
        transforms: &[FieldTransform],
    ) -> Result<()> {
        {
            let mut inner = self.inner.lock().unwrap();
            check_parent(&inner, path)?;
            let doc = inner
                .collections
                .get_mut(path)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(format!("{}/{}", path, id)))?;
            // Stage on a copy so a failing transform leaves the document
            // untouched.
            let mut staged = doc.fields.clone();
            for t in transforms {
                t.apply(&mut staged)?;
            }
            doc.fields = staged;
        }
        self.notify(path);
        Ok(())
    }

    /// Full ordered result set for a query, as of now.
    pub fn query(&self, spec: &QuerySpec) -> QuerySnapshot {
        let mut docs: Vec<Document> = {
            let inner = self.inner.lock().unwrap();
            inner
                .collections
                .get(&spec.path)
                .map(|docs| docs.values().cloned().collect())
                .unwrap_or_default()
        };
        query::order_docs(&mut docs, spec.direction);
        QuerySnapshot {
            query: spec.clone(),
            docs,
        }
    }

    /// Register a push watcher for a query. The callback fires once with
    /// the current result set immediately, then again after every commit
    /// that touches the watched collection. Watchers live for the rest of
    /// the process: there is no unwatch.
    pub fn watch(&self, spec: QuerySpec, callback: WatchFn) -> WatcherId {
        let id = WatcherId(self.next_watcher.fetch_add(1, Ordering::Relaxed));
        let watcher = Arc::new(Watcher {
            spec: spec.clone(),
            callback,
        });
        self.watchers.lock().unwrap().push(Arc::clone(&watcher));
        let initial = self.query(&spec);
        (watcher.callback)(&initial);
        id
    }

    /// Number of registered watchers. Watchers are never removed, so this
    /// only grows.
    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().unwrap().len()
    }

    fn notify(&self, path: &CollectionPath) {
        // Snapshot the watcher list first; callbacks may register new
        // watchers re-entrantly and must not hold the list lock.
        let interested: Vec<Arc<Watcher>> = {
            let watchers = self.watchers.lock().unwrap();
            watchers
                .iter()
                .filter(|w| w.spec.path == *path)
                .cloned()
                .collect()
        };
        if interested.is_empty() {
            return;
        }
        let _gate = self.notify_gate.lock().unwrap();
        for watcher in interested {
            let snapshot = self.query(&watcher.spec);
            (watcher.callback)(&snapshot);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn check_parent(inner: &Inner, path: &CollectionPath) -> Result<()> {
    if let Some((parent_collection, parent_id)) = path.parent() {
        let parent_path = CollectionPath::root(parent_collection);
        let exists = inner
            .collections
            .get(&parent_path)
            .map(|docs| docs.contains_key(parent_id))
            .unwrap_or(false);
        if !exists {
            return Err(StoreError::ParentNotFound(format!(
                "{}/{}",
                parent_collection, parent_id
            )));
        }
    }
    Ok(())
}

//! Bounded, persistent cache of enumeration results.
//!
//! Entries are keyed by the ordered pair `ORIGIN->DEST` and remember the
//! [`RouteEnvelope`] they were computed under. A request whose envelope is
//! dominated by a stored one is answered by filtering and truncating the
//! stored routes. The reversed pair is consulted as well, since land borders
//! are symmetric and a reversed route is still a valid simple route.
//!
//! The durable store is a single JSON object mapping keys to
//! `{maxDepth, maxRoutes, routes}`, written least recently used first so a
//! reopened cache keeps the same recency order. Load and save failures never reach the
//! caller of [`RouteCache::get_or_compute`]; they are logged and the cache
//! carries on in memory.

use std::fmt;
use std::fs;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lru::LruCache;
use parking_lot::Mutex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{CountryCode, GraphProvider, Route};
use crate::path::RouteEnvelope;
use crate::routing::RouteEnumerator;

/// Default maximum number of cached pairs.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// File name used for the durable store inside the cache directory.
pub const CACHE_FILENAME: &str = "all-routes-cache.json";

const KEY_SEPARATOR: &str = "->";

/// Ordered origin/destination pair identifying a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub origin: CountryCode,
    pub destination: CountryCode,
}

impl CacheKey {
    pub fn new(origin: impl Into<CountryCode>, destination: impl Into<CountryCode>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// The key for the same pair travelled in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.origin, KEY_SEPARATOR, self.destination)
    }
}

impl FromStr for CacheKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidCacheKey {
            key: value.to_string(),
        };
        let (origin, destination) = value.split_once(KEY_SEPARATOR).ok_or_else(invalid)?;
        let (origin, destination) = (origin.trim(), destination.trim());
        if origin.is_empty() || destination.is_empty() || destination.contains(KEY_SEPARATOR) {
            return Err(invalid());
        }
        Ok(Self::new(origin, destination))
    }
}

/// Routes computed for one pair together with the envelope they are complete for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub max_depth: usize,
    pub max_routes: usize,
    pub routes: Vec<Route>,
}

impl CacheEntry {
    pub fn new(envelope: RouteEnvelope, routes: Vec<Route>) -> Self {
        Self {
            max_depth: envelope.max_depth,
            max_routes: envelope.max_routes,
            routes,
        }
    }

    pub fn envelope(&self) -> RouteEnvelope {
        RouteEnvelope::new(self.max_depth, self.max_routes)
    }

    /// Whether this entry can answer `request` without recomputation.
    pub fn covers(&self, request: &RouteEnvelope) -> bool {
        self.envelope().dominates(request)
    }

    /// Same envelope, every route flipped end to end.
    pub fn reversed(&self) -> Self {
        Self {
            max_depth: self.max_depth,
            max_routes: self.max_routes,
            routes: self
                .routes
                .iter()
                .map(|route| route.iter().rev().cloned().collect())
                .collect(),
        }
    }
}

/// Store contents in file order, serialized as one JSON object.
struct OrderedDocument<'a>(&'a [(CacheKey, CacheEntry)]);

impl Serialize for OrderedDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, entry) in self.0 {
            map.serialize_entry(&key.to_string(), entry)?;
        }
        map.end()
    }
}

/// Raw store contents with keys unparsed, in file order.
struct LoadedDocument(Vec<(String, CacheEntry)>);

impl<'de> Deserialize<'de> for LoadedDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = LoadedDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of route cache entries")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry::<String, CacheEntry>()? {
                    entries.push(pair);
                }
                Ok(LoadedDocument(entries))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// JSON file backing a [`RouteCache`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry from disk, in file order.
    ///
    /// A missing file is an empty store. Malformed keys are skipped with a
    /// warning; a malformed document is an error.
    pub fn load(&self) -> Result<Vec<(CacheKey, CacheEntry)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let LoadedDocument(raw) = serde_json::from_str(&contents)?;

        let mut entries = Vec::with_capacity(raw.len());
        for (key, entry) in raw {
            match key.parse::<CacheKey>() {
                Ok(key) => entries.push((key, entry)),
                Err(err) => warn!(error = %err, path = %self.path.display(), "skipping cache entry"),
            }
        }
        Ok(entries)
    }

    /// Replace the file contents with `entries`, atomically, keeping their order.
    pub fn save(&self, entries: &[(CacheKey, CacheEntry)]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, &OrderedDocument(entries))?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

/// Thread-safe LRU cache of enumeration results with optional durable storage.
///
/// The internal lock is only held for map operations; graph builds,
/// enumeration and file I/O all happen outside it. Two concurrent misses for
/// the same pair may both compute, and the later write wins.
pub struct RouteCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    store: Option<CacheStore>,
    persist_lock: Mutex<()>,
}

impl fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("store", &self.store)
            .finish()
    }
}

impl RouteCache {
    /// Create an in-memory cache holding at most `capacity` pairs.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(non_zero(capacity))),
            store: None,
            persist_lock: Mutex::new(()),
        }
    }

    /// Create a cache backed by `store`, preloading whatever it holds.
    ///
    /// Entries are replayed in file order, oldest first. When the file holds
    /// more than `capacity` entries only the most recently used survive. An
    /// unreadable or corrupt store starts the cache empty.
    pub fn open(store: CacheStore, capacity: usize) -> Self {
        let mut entries = LruCache::new(non_zero(capacity));
        match store.load() {
            Ok(loaded) => {
                let count = loaded.len();
                for (key, entry) in loaded {
                    entries.put(key, entry);
                }
                info!(
                    path = %store.path().display(),
                    entries = count,
                    "loaded route cache"
                );
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %store.path().display(),
                    "failed to load route cache; starting empty"
                );
            }
        }

        Self {
            entries: Mutex::new(entries),
            store: Some(store),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> Option<&CacheStore> {
        self.store.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Look up an entry, marking it as recently used.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    /// Store an entry without touching the durable store.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.lock().put(key, entry);
    }

    /// Copy of the current contents, most recently used first.
    pub fn snapshot(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.entries
            .lock()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    /// Answer an enumeration request from the cache, computing it on a miss.
    ///
    /// 1. A forward entry covering `envelope` is filtered and returned.
    /// 2. Otherwise a covering reverse entry is flipped, stored under the
    ///    forward key, filtered and returned.
    /// 3. Otherwise the graph is built, `enumerator` runs with exactly
    ///    `envelope`, the result is stored and the cache persisted.
    ///
    /// Only step 3 touches `graphs`. Persistence failures are logged.
    ///
    /// An entry cut short by its own `max_routes` answers a covered request
    /// only from the routes it kept. A shallower request can therefore get
    /// fewer routes than a fresh search under that envelope would return.
    pub fn get_or_compute<P>(
        &self,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
        graphs: &P,
        enumerator: &dyn RouteEnumerator,
    ) -> Result<Vec<Route>>
    where
        P: GraphProvider + ?Sized,
    {
        let key = CacheKey::new(origin, destination);

        if let Some(routes) = self.lookup(&key, envelope) {
            return Ok(routes);
        }

        debug!(%key, max_depth = envelope.max_depth, max_routes = envelope.max_routes, "route cache miss");
        let graph = graphs.build_graph()?;
        let routes = enumerator.enumerate(&graph, origin, destination, envelope)?;

        self.insert(key, CacheEntry::new(envelope, routes.clone()));
        if let Err(err) = self.persist() {
            warn!(error = %err, "failed to persist route cache");
        }

        Ok(routes)
    }

    fn lookup(&self, key: &CacheKey, envelope: RouteEnvelope) -> Option<Vec<Route>> {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get(key) {
            if entry.covers(&envelope) {
                debug!(%key, "route cache hit");
                return Some(envelope.apply(&entry.routes));
            }
        }

        let reverse = key.reversed();
        let flipped = match entries.get(&reverse) {
            Some(entry) if entry.covers(&envelope) => entry.reversed(),
            _ => return None,
        };
        debug!(%key, %reverse, "route cache hit on reversed pair");
        let routes = envelope.apply(&flipped.routes);
        entries.put(key.clone(), flipped);
        Some(routes)
    }

    /// Write the current contents to the durable store, if there is one.
    ///
    /// Evicted entries are not kept on disk; the file always mirrors memory.
    pub fn persist(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let _writer = self.persist_lock.lock();
        let mut snapshot = self.snapshot();
        snapshot.reverse();
        store.save(&snapshot)?;
        debug!(
            path = %store.path().display(),
            entries = snapshot.len(),
            "persisted route cache"
        );
        Ok(())
    }

    /// Final save on shutdown. Failures are logged, not returned.
    pub fn close(&self) {
        match self.persist() {
            Ok(()) => {
                if let Some(store) = &self.store {
                    info!(path = %store.path().display(), entries = self.len(), "closed route cache");
                }
            }
            Err(err) => warn!(error = %err, "failed to persist route cache on close"),
        }
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

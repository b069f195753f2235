use super::lfu::LfuCore;
use super::lru::LruCore;
use super::{CacheCore, Policy, PolicyType};
use crate::stats::PolicyStats;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Adapts a single-threaded [`CacheCore`] engine into the thread-safe
/// [`Policy`] contract.
///
/// The engine sits behind a mutex; hit/miss counters are atomics bumped by
/// `get` only, so `peek` and `contains` never skew the per-epoch report.
pub struct TrackedPolicy<C> {
  core: Mutex<C>,
  kind: PolicyType,
  hits: CachePadded<AtomicU64>,
  misses: CachePadded<AtomicU64>,
}

impl<C> TrackedPolicy<C> {
  /// Wraps an engine under the given policy tag.
  pub fn new(kind: PolicyType, core: C) -> Self {
    Self {
      core: Mutex::new(core),
      kind,
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
    }
  }
}

impl<K, V> TrackedPolicy<LruCore<K, V>>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// A tracked LRU policy holding at most `cap` entries.
  pub fn lru(cap: usize) -> Self {
    Self::new(PolicyType::Lru, LruCore::new(cap))
  }
}

impl<K, V> TrackedPolicy<LfuCore<K, V>>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// A tracked LFU policy holding at most `cap` entries.
  pub fn lfu(cap: usize) -> Self {
    Self::new(PolicyType::Lfu, LfuCore::new(cap))
  }
}

impl<K, V, C> Policy<K, V> for TrackedPolicy<C>
where
  K: Send + Sync,
  V: Send + Sync,
  C: CacheCore<K, V> + Send,
{
  fn add(&self, key: K, value: V) -> bool {
    self.core.lock().add(key, value)
  }

  fn get(&self, key: &K) -> Option<V> {
    let value = self.core.lock().get(key);
    match value {
      Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
      None => self.misses.fetch_add(1, Ordering::Relaxed),
    };
    value
  }

  fn peek(&self, key: &K) -> Option<V> {
    self.core.lock().peek(key)
  }

  fn contains(&self, key: &K) -> bool {
    self.core.lock().contains(key)
  }

  fn remove(&self, key: &K) -> bool {
    self.core.lock().remove(key)
  }

  fn keys(&self) -> Vec<K> {
    self.core.lock().keys()
  }

  fn values(&self) -> Vec<V> {
    self.core.lock().values()
  }

  fn len(&self) -> usize {
    self.core.lock().len()
  }

  fn cap(&self) -> usize {
    self.core.lock().cap()
  }

  fn purge(&self) {
    self.core.lock().purge()
  }

  fn resize(&self, cap: usize) -> usize {
    self.core.lock().resize(cap)
  }

  fn stats(&self) -> PolicyStats {
    PolicyStats {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
    }
  }

  fn reset_stats(&self) {
    self.hits.store(0, Ordering::Relaxed);
    self.misses.store(0, Ordering::Relaxed);
  }

  fn kind(&self) -> PolicyType {
    self.kind
  }
}

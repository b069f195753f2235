use crate::builder::AdaptiveCacheBuilder;
use crate::policy::PolicyType;
use crate::shared::CacheShared;
use crate::stats::GlobalStats;

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A keyed in-memory cache whose replacement policy is selected online by a
/// multi-armed bandit.
///
/// One registered policy is *active* and serves every caller-visible result;
/// the rest run in lockstep as *shadows*, seeing the same lookups and
/// zero-valued writes so their hit/miss counters stay comparable. A
/// background driver hands the shadows' per-epoch stats to the bandit and
/// switches the active policy when the bandit nominates a different one,
/// migrating live data cold, warm, or gradually.
///
/// ```
/// use shiftcache::{AdaptiveCache, MigrationStrategy, TrackedPolicy};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let cache: AdaptiveCache<String, u64> = AdaptiveCache::builder()
///   .policy(Arc::new(TrackedPolicy::lru(128)))
///   .policy(Arc::new(TrackedPolicy::lfu(128)))
///   .epoch_duration(Duration::from_secs(30))
///   .migration_strategy(MigrationStrategy::Gradual)
///   .build()
///   .unwrap();
///
/// cache.add("a".into(), 1);
/// assert_eq!(cache.get(&"a".into()), Some(1));
/// ```
pub struct AdaptiveCache<K, V> {
  pub(crate) shared: Arc<CacheShared<K, V>>,
}

impl<K, V> AdaptiveCache<K, V>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Clone + Default + Send + Sync + 'static,
{
  /// Starts building a cache.
  pub fn builder() -> AdaptiveCacheBuilder<K, V> {
    AdaptiveCacheBuilder::new()
  }

  /// Looks up a key in the active policy, mirroring the lookup into every
  /// shadow. During a gradual migration window a miss may instead promote
  /// the key from the outgoing policy.
  pub fn get(&self, key: &K) -> Option<V> {
    self.shared.get(key)
  }

  /// Inserts a key-value pair into the active policy (and a zero-valued slot
  /// into every shadow). Returns whether the active policy evicted an entry.
  pub fn add(&self, key: K, value: V) -> bool {
    self.shared.add(key, value)
  }

  /// Looks up a key in the active policy without touching recency,
  /// frequency, or hit/miss counters anywhere.
  pub fn peek(&self, key: &K) -> Option<V> {
    self.shared.peek(key)
  }

  /// Whether the active policy holds the key. No side effects.
  pub fn contains(&self, key: &K) -> bool {
    self.shared.contains(key)
  }

  /// Removes a key from every policy. Returns whether the active policy
  /// held it.
  pub fn remove(&self, key: &K) -> bool {
    self.shared.remove(key)
  }

  /// The active policy's keys, in unspecified order.
  pub fn keys(&self) -> Vec<K> {
    self.shared.keys()
  }

  /// The active policy's values, in unspecified order.
  pub fn values(&self) -> Vec<V> {
    self.shared.values()
  }

  /// Number of entries in the active policy.
  pub fn len(&self) -> usize {
    self.shared.len()
  }

  /// Whether the active policy is empty.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Clears every policy and abandons any migration in progress.
  pub fn purge(&self) {
    self.shared.purge()
  }

  /// Forwards a capacity change to every policy. Returns the total number
  /// of entries evicted across policies.
  pub fn resize(&self, cap: usize) -> usize {
    self.shared.resize(cap)
  }

  /// Hit/miss counters of the active policy. Counters survive switches and
  /// are never reset by the core, so a switch changes whose history this
  /// reports.
  pub fn stats(&self) -> GlobalStats {
    self.shared.stats()
  }

  /// The tag of the currently active policy.
  pub fn active_policy(&self) -> PolicyType {
    self.shared.active_policy()
  }

  /// Number of epoch boundaries that actually switched the active policy.
  pub fn epoch(&self) -> u64 {
    self.shared.epoch()
  }

  /// Whether a gradual migration window is currently open.
  pub fn is_migrating(&self) -> bool {
    self.shared.is_migrating()
  }

  /// Stops the epoch driver. Idempotent. Operations keep serving from the
  /// policies; only epoch-driven switching ends.
  pub fn close(&self) {
    self.shared.close()
  }

  /// Runs one epoch boundary synchronously, exactly as the driver would.
  #[doc(hidden)]
  pub fn epoch_tick(&self) -> PolicyType {
    self.shared.epoch_tick()
  }
}

impl<K, V> fmt::Debug for AdaptiveCache<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AdaptiveCache")
      .field("shared", &self.shared)
      .finish()
  }
}

#![allow(dead_code)]

use parking_lot::Mutex;
use shiftcache::{
  AdaptiveCache, Bandit, MigrationStrategy, Policy, PolicyStats, PolicyType, ShadowStats,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A map-backed policy that never evicts, with inspectable contents. Keeps
/// the orchestration tests independent of any real engine's eviction order.
pub struct MockPolicy {
  kind: PolicyType,
  cap: Mutex<usize>,
  data: Mutex<HashMap<String, i32>>,
  stats: Mutex<PolicyStats>,
}

impl MockPolicy {
  pub fn new(kind: PolicyType, cap: usize) -> Arc<Self> {
    Arc::new(Self {
      kind,
      cap: Mutex::new(cap),
      data: Mutex::new(HashMap::new()),
      stats: Mutex::new(PolicyStats::default()),
    })
  }

  /// Direct look at the stored entries, bypassing the policy surface.
  pub fn snapshot(&self) -> HashMap<String, i32> {
    self.data.lock().clone()
  }

  /// Direct look at the counters, bypassing the policy surface.
  pub fn stats_snapshot(&self) -> PolicyStats {
    *self.stats.lock()
  }

  pub fn capacity(&self) -> usize {
    *self.cap.lock()
  }
}

impl Policy<String, i32> for MockPolicy {
  fn add(&self, key: String, value: i32) -> bool {
    self.data.lock().insert(key, value);
    false
  }

  fn get(&self, key: &String) -> Option<i32> {
    let hit = self.data.lock().get(key).copied();
    let mut stats = self.stats.lock();
    match hit {
      Some(_) => stats.hits += 1,
      None => stats.misses += 1,
    }
    hit
  }

  fn peek(&self, key: &String) -> Option<i32> {
    self.data.lock().get(key).copied()
  }

  fn contains(&self, key: &String) -> bool {
    self.data.lock().contains_key(key)
  }

  fn remove(&self, key: &String) -> bool {
    self.data.lock().remove(key).is_some()
  }

  fn keys(&self) -> Vec<String> {
    self.data.lock().keys().cloned().collect()
  }

  fn values(&self) -> Vec<i32> {
    self.data.lock().values().copied().collect()
  }

  fn len(&self) -> usize {
    self.data.lock().len()
  }

  fn cap(&self) -> usize {
    *self.cap.lock()
  }

  fn purge(&self) {
    self.data.lock().clear();
  }

  fn resize(&self, cap: usize) -> usize {
    *self.cap.lock() = cap;
    0
  }

  fn stats(&self) -> PolicyStats {
    *self.stats.lock()
  }

  fn reset_stats(&self) {
    *self.stats.lock() = PolicyStats::default();
  }

  fn kind(&self) -> PolicyType {
    self.kind
  }
}

/// A bandit that returns whatever the test scripted and records every report
/// it receives.
pub struct ScriptedBandit {
  next: Mutex<PolicyType>,
  records: Mutex<Vec<ShadowStats>>,
}

impl ScriptedBandit {
  pub fn returning(next: PolicyType) -> Arc<Self> {
    Arc::new(Self {
      next: Mutex::new(next),
      records: Mutex::new(Vec::new()),
    })
  }

  pub fn set_next(&self, next: PolicyType) {
    *self.next.lock() = next;
  }

  pub fn records(&self) -> Vec<ShadowStats> {
    self.records.lock().clone()
  }
}

impl Bandit for ScriptedBandit {
  fn record_stats(&self, stats: ShadowStats) {
    self.records.lock().push(stats);
  }

  fn select_policy(&self) -> PolicyType {
    *self.next.lock()
  }
}

/// Local handle so an `Arc<T>` can stand in for its `Bandit` impl: the
/// trait and `Arc` are both foreign here, so the impl needs a local type
/// to anchor on.
pub struct ArcBandit<T>(pub Arc<T>);

impl<T: Bandit> Bandit for ArcBandit<T> {
  fn record_stats(&self, stats: ShadowStats) {
    self.0.record_stats(stats)
  }

  fn select_policy(&self) -> PolicyType {
    self.0.select_policy()
  }
}

/// An adaptive cache over two mock policies (LRU active, LFU shadow) and a
/// scripted bandit. The epoch duration is a day so the driver never
/// interferes; tests tick epochs by hand.
pub fn build_cache(
  strategy: MigrationStrategy,
) -> (
  AdaptiveCache<String, i32>,
  Arc<MockPolicy>,
  Arc<MockPolicy>,
  Arc<ScriptedBandit>,
) {
  let lru = MockPolicy::new(PolicyType::Lru, 10);
  let lfu = MockPolicy::new(PolicyType::Lfu, 10);
  let bandit = ScriptedBandit::returning(PolicyType::Lru);

  let cache = AdaptiveCache::builder()
    .policy(lru.clone())
    .policy(lfu.clone())
    .bandit(ArcBandit(bandit.clone()))
    .epoch_duration(Duration::from_secs(24 * 60 * 60))
    .allow_partial_fill_switch(true)
    .migration_strategy(strategy)
    .build()
    .expect("cache should build");

  (cache, lru, lfu, bandit)
}

/// Scripts the bandit to pick `to` and runs one epoch boundary.
pub fn trigger_switch(
  cache: &AdaptiveCache<String, i32>,
  bandit: &ScriptedBandit,
  to: PolicyType,
) {
  bandit.set_next(to);
  cache.epoch_tick();
}

//! Demonstrates the three migration strategies.
//!
//! Run with: `cargo run --example migration`
//!
//! For each strategy the demo fills the cache under LRU, lets the epoch
//! driver switch to LFU, and shows what a reader sees afterwards:
//! cold loses the keys, warm keeps them, gradual promotes them on first
//! access.

use parking_lot::Mutex;
use shiftcache::{
  AdaptiveCache, Bandit, MigrationStrategy, PolicyType, ShadowStats, TrackedPolicy,
};

use std::sync::Arc;
use std::time::Duration;

/// A bandit that returns whatever the demo scripted; stand-in for a real
/// learner so the switches happen on cue.
struct ToggleBandit {
  next: Mutex<PolicyType>,
}

impl ToggleBandit {
  fn starting_with(kind: PolicyType) -> Arc<Self> {
    Arc::new(Self {
      next: Mutex::new(kind),
    })
  }

  fn switch_to(&self, kind: PolicyType) {
    *self.next.lock() = kind;
  }
}

impl Bandit for ToggleBandit {
  fn record_stats(&self, _stats: ShadowStats) {}

  fn select_policy(&self) -> PolicyType {
    *self.next.lock()
  }
}

/// Thin local handle so the `Bandit` impl above can be shared with the
/// builder while the demo keeps its own `Arc` for scripting switches.
struct SharedToggleBandit(Arc<ToggleBandit>);

impl Bandit for SharedToggleBandit {
  fn record_stats(&self, stats: ShadowStats) {
    self.0.record_stats(stats);
  }

  fn select_policy(&self) -> PolicyType {
    self.0.select_policy()
  }
}

const EPOCH: Duration = Duration::from_millis(100);

fn run(strategy: MigrationStrategy) {
  let bandit = ToggleBandit::starting_with(PolicyType::Lru);

  let cache: AdaptiveCache<String, i64> = AdaptiveCache::builder()
    .policy(Arc::new(TrackedPolicy::lru(100)))
    .policy(Arc::new(TrackedPolicy::lfu(100)))
    .bandit(SharedToggleBandit(bandit.clone()))
    .epoch_duration(EPOCH)
    .allow_partial_fill_switch(true)
    .migration_strategy(strategy)
    .build()
    .expect("failed to build cache");

  for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
    cache.add(key.to_string(), value);
  }
  println!("[{strategy:?}] filled {} keys under {}", cache.len(), cache.active_policy());

  // Let the driver pick up the scripted switch at its next tick.
  bandit.switch_to(PolicyType::Lfu);
  while cache.active_policy() != PolicyType::Lfu {
    std::thread::sleep(EPOCH / 4);
  }
  println!(
    "[{strategy:?}] switched to {} (len={}, migrating={})",
    cache.active_policy(),
    cache.len(),
    cache.is_migrating(),
  );

  for key in ["a", "b", "c"] {
    match cache.get(&key.to_string()) {
      Some(value) => println!("[{strategy:?}]   get {key:?} -> {value}"),
      None => println!("[{strategy:?}]   get {key:?} -> miss"),
    }
  }
  println!("[{strategy:?}] migrating after reads: {}", cache.is_migrating());

  cache.close();
}

fn main() {
  env_logger::init();

  for strategy in [
    MigrationStrategy::Cold,
    MigrationStrategy::Warm,
    MigrationStrategy::Gradual,
  ] {
    run(strategy);
    println!();
  }
}

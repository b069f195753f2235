//! A minimal walk-through: two policies, the bundled Thompson bandit, and a
//! little traffic.
//!
//! Run with: `cargo run --example basic`

use shiftcache::{AdaptiveCache, MigrationStrategy, TrackedPolicy};

use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct UserProfile {
  name: String,
  email: String,
}

fn main() {
  env_logger::init();

  let cache: AdaptiveCache<String, UserProfile> = AdaptiveCache::builder()
    .policy(Arc::new(TrackedPolicy::lru(100)))
    .policy(Arc::new(TrackedPolicy::lfu(100)))
    .epoch_duration(Duration::from_secs(300))
    .migration_strategy(MigrationStrategy::Warm)
    .build()
    .expect("failed to build cache");

  for i in 0..10 {
    cache.add(
      format!("user:{i}"),
      UserProfile {
        name: format!("user-{i}"),
        email: format!("user-{i}@example.com"),
      },
    );
  }

  // A skewed read pattern: the first few users are hot.
  for round in 0..50 {
    let id = if round % 5 == 0 { round % 10 } else { round % 3 };
    let _ = cache.get(&format!("user:{id}"));
  }
  let _ = cache.get(&"user:unknown".to_string());

  let stats = cache.stats();
  println!(
    "active={} entries={} hits={} misses={} hit_ratio={:.2}",
    cache.active_policy(),
    cache.len(),
    stats.hits,
    stats.misses,
    stats.hit_ratio(),
  );

  if let Some(profile) = cache.get(&"user:1".to_string()) {
    println!("user:1 -> {} <{}>", profile.name, profile.email);
  }

  cache.close();
}

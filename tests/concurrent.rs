mod common;

use common::{build_cache, trigger_switch};
use shiftcache::{MigrationStrategy, PolicyType};

use std::sync::Arc;
use std::thread;

// Exercises gets and adds racing a gradual migration window. Run with
// `--test-threads` defaults and the race detector of choice; the assertions
// only check that nothing is lost or duplicated structurally.
#[test]
fn racing_gets_and_adds_during_a_gradual_window() {
  let (cache, _, _, bandit) = build_cache(MigrationStrategy::Gradual);

  for i in 0..20 {
    cache.add(format!("seed{}", i % 26), i);
  }
  trigger_switch(&cache, &bandit, PolicyType::Lfu);

  let cache = Arc::new(cache);
  let threads = 8;
  let mut handles = Vec::with_capacity(threads * 2);

  for t in 0..threads {
    let reader = Arc::clone(&cache);
    handles.push(thread::spawn(move || {
      for i in 0..50 {
        let _ = reader.get(&format!("seed{}", (t + i) % 26));
      }
    }));

    let writer = Arc::clone(&cache);
    handles.push(thread::spawn(move || {
      for i in 0..50 {
        writer.add(format!("w{t}-{i}"), (t * i) as i32);
      }
    }));
  }

  for handle in handles {
    handle.join().expect("worker panicked");
  }

  // The window must have closed: 8 * 50 adds far exceed the 20 source keys.
  assert!(!cache.is_migrating(), "window left open after the drain");
}

#[test]
fn racing_delegated_reads_are_safe() {
  let (cache, _, _, _) = build_cache(MigrationStrategy::Cold);

  for i in 0..10 {
    cache.add(format!("k{i}"), i);
  }

  let cache = Arc::new(cache);
  let mut handles = Vec::new();

  for t in 0..8 {
    let reader = Arc::clone(&cache);
    handles.push(thread::spawn(move || {
      for i in 0..50 {
        let key = format!("k{}", (t + i) % 10);
        assert!(reader.contains(&key));
        let _ = reader.keys();
        let _ = reader.values();
        let _ = reader.len();
        let _ = reader.peek(&key);
        let _ = reader.stats();
        let _ = reader.active_policy();
      }
    }));
  }

  for handle in handles {
    handle.join().expect("reader panicked");
  }
}

#[test]
fn a_switch_during_traffic_never_serves_shadow_zeros() {
  let (cache, _, _, bandit) = build_cache(MigrationStrategy::Warm);

  for i in 0..10 {
    cache.add(format!("k{i}"), i + 1);
  }

  let cache = Arc::new(cache);
  let reader = {
    let cache = Arc::clone(&cache);
    thread::spawn(move || {
      for round in 0..200 {
        let key = format!("k{}", round % 10);
        if let Some(value) = cache.get(&key) {
          assert_ne!(value, 0, "a shadow zero leaked for {key:?}");
        }
      }
    })
  };

  trigger_switch(&cache, &bandit, PolicyType::Lfu);
  trigger_switch(&cache, &bandit, PolicyType::Lru);

  reader.join().expect("reader panicked");
}

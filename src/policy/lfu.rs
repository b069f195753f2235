use super::CacheCore;

use ahash::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;

#[derive(Debug)]
struct Slot<V> {
  value: V,
  freq: u64,
}

/// A least-frequently-used replacement engine.
///
/// Entries carry an access frequency and live in per-frequency queues; a
/// `min_freq` cursor points at the lowest populated frequency. Eviction pops
/// the oldest key from the minimum-frequency queue, so ties break toward the
/// entry that reached that frequency first.
#[derive(Debug)]
pub struct LfuCore<K, V> {
  items: HashMap<K, Slot<V>>,
  // Front is the newest arrival at that frequency.
  buckets: HashMap<u64, VecDeque<K>>,
  min_freq: u64,
  cap: usize,
}

impl<K, V> LfuCore<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// Creates an engine holding at most `cap` entries (at least one).
  pub fn new(cap: usize) -> Self {
    Self {
      items: HashMap::default(),
      buckets: HashMap::default(),
      min_freq: 0,
      cap: cap.max(1),
    }
  }

  /// The current access frequency of a key, if present.
  pub fn freq(&self, key: &K) -> Option<u64> {
    self.items.get(key).map(|slot| slot.freq)
  }

  fn unlink(&mut self, key: &K, freq: u64) {
    if let Some(bucket) = self.buckets.get_mut(&freq) {
      if let Some(pos) = bucket.iter().position(|k| k == key) {
        bucket.remove(pos);
      }
      if bucket.is_empty() {
        self.buckets.remove(&freq);
      }
    }
  }

  /// Moves a key from its current frequency queue to the next one up.
  fn bump(&mut self, key: &K) {
    let Some(slot) = self.items.get_mut(key) else {
      return;
    };
    let old = slot.freq;
    slot.freq = old + 1;

    self.unlink(key, old);
    if self.min_freq == old && !self.buckets.contains_key(&old) {
      self.min_freq = old + 1;
    }
    self
      .buckets
      .entry(old + 1)
      .or_default()
      .push_front(key.clone());
  }

  /// Evicts the oldest entry at the minimum frequency, if any.
  fn evict_one(&mut self) -> bool {
    let Some(bucket) = self.buckets.get_mut(&self.min_freq) else {
      return false;
    };
    let Some(victim) = bucket.pop_back() else {
      return false;
    };
    if bucket.is_empty() {
      self.buckets.remove(&self.min_freq);
    }
    self.items.remove(&victim);
    self.refresh_min_freq();
    true
  }

  fn refresh_min_freq(&mut self) {
    self.min_freq = self.buckets.keys().copied().min().unwrap_or(0);
  }
}

impl<K, V> CacheCore<K, V> for LfuCore<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  fn add(&mut self, key: K, value: V) -> bool {
    if let Some(slot) = self.items.get_mut(&key) {
      slot.value = value;
      self.bump(&key);
      return false;
    }

    let evicted = self.items.len() >= self.cap && self.evict_one();
    self.items.insert(key.clone(), Slot { value, freq: 1 });
    self.buckets.entry(1).or_default().push_front(key);
    self.min_freq = 1;
    evicted
  }

  fn get(&mut self, key: &K) -> Option<V> {
    let value = self.items.get(key).map(|slot| slot.value.clone())?;
    self.bump(key);
    Some(value)
  }

  fn peek(&self, key: &K) -> Option<V> {
    self.items.get(key).map(|slot| slot.value.clone())
  }

  fn contains(&self, key: &K) -> bool {
    self.items.contains_key(key)
  }

  fn remove(&mut self, key: &K) -> bool {
    let Some(slot) = self.items.remove(key) else {
      return false;
    };
    self.unlink(key, slot.freq);
    if slot.freq == self.min_freq {
      self.refresh_min_freq();
    }
    true
  }

  fn keys(&self) -> Vec<K> {
    self.items.keys().cloned().collect()
  }

  fn values(&self) -> Vec<V> {
    self.items.values().map(|slot| slot.value.clone()).collect()
  }

  fn len(&self) -> usize {
    self.items.len()
  }

  fn cap(&self) -> usize {
    self.cap
  }

  fn purge(&mut self) {
    self.items.clear();
    self.buckets.clear();
    self.min_freq = 0;
  }

  fn resize(&mut self, cap: usize) -> usize {
    self.cap = cap.max(1);
    let mut evicted = 0;
    while self.items.len() > self.cap {
      if !self.evict_one() {
        break;
      }
      evicted += 1;
    }
    evicted
  }
}

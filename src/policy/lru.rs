use super::CacheCore;

use ahash::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;

/// A least-recently-used replacement engine.
///
/// Storage is a `HashMap`; recency is a queue of keys with the most recently
/// used key at the front. When the engine is full, the key at the back of
/// the queue is evicted.
#[derive(Debug)]
pub struct LruCore<K, V> {
  items: HashMap<K, V>,
  // Front is the most recently used key.
  order: VecDeque<K>,
  cap: usize,
}

impl<K, V> LruCore<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  /// Creates an engine holding at most `cap` entries (at least one).
  pub fn new(cap: usize) -> Self {
    let cap = cap.max(1);
    Self {
      items: HashMap::default(),
      order: VecDeque::with_capacity(cap),
      cap,
    }
  }

  /// Moves an existing key to the front of the recency queue.
  fn touch(&mut self, key: &K) {
    if let Some(pos) = self.order.iter().position(|k| k == key) {
      if let Some(k) = self.order.remove(pos) {
        self.order.push_front(k);
      }
    }
  }

  /// Evicts the least recently used entry, if any.
  fn evict_one(&mut self) -> bool {
    if let Some(victim) = self.order.pop_back() {
      self.items.remove(&victim);
      true
    } else {
      false
    }
  }
}

impl<K, V> CacheCore<K, V> for LruCore<K, V>
where
  K: Eq + Hash + Clone,
  V: Clone,
{
  fn add(&mut self, key: K, value: V) -> bool {
    if self.items.contains_key(&key) {
      self.items.insert(key.clone(), value);
      self.touch(&key);
      return false;
    }

    let evicted = self.items.len() >= self.cap && self.evict_one();
    self.order.push_front(key.clone());
    self.items.insert(key, value);
    evicted
  }

  fn get(&mut self, key: &K) -> Option<V> {
    let value = self.items.get(key).cloned()?;
    self.touch(key);
    Some(value)
  }

  fn peek(&self, key: &K) -> Option<V> {
    self.items.get(key).cloned()
  }

  fn contains(&self, key: &K) -> bool {
    self.items.contains_key(key)
  }

  fn remove(&mut self, key: &K) -> bool {
    if self.items.remove(key).is_some() {
      self.order.retain(|k| k != key);
      true
    } else {
      false
    }
  }

  fn keys(&self) -> Vec<K> {
    self.items.keys().cloned().collect()
  }

  fn values(&self) -> Vec<V> {
    self.items.values().cloned().collect()
  }

  fn len(&self) -> usize {
    self.items.len()
  }

  fn cap(&self) -> usize {
    self.cap
  }

  fn purge(&mut self) {
    self.items.clear();
    self.order.clear();
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

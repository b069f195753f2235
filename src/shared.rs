use crate::bandit::Bandit;
use crate::builder::Settings;
use crate::migration::{MigrationState, MigrationStrategy};
use crate::policy::{Policy, PolicyType};
use crate::stats::{GlobalStats, ShadowStats};
use crate::task::driver::EpochDriver;

use ahash::HashMap;
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The fields that transition together: which policy is active, the gradual
/// migration window (if one is open), and the switch counter. Everything in
/// here is guarded by the single readers-writer lock in [`CacheShared`].
pub(crate) struct CacheState<K> {
  pub(crate) active: PolicyType,
  pub(crate) migration: Option<MigrationState<K>>,
  pub(crate) epoch: u64,
}

/// The internal, thread-safe core of the adaptive cache.
///
/// The policy map is fixed at construction and read-only afterwards, so it
/// lives outside the guard; calls into the policies themselves are still
/// serialized by the guard to protect composite invariants like "every
/// shadow saw this write".
pub(crate) struct CacheShared<K, V> {
  pub(crate) policies: HashMap<PolicyType, Arc<dyn Policy<K, V>>>,
  pub(crate) bandit: Box<dyn Bandit>,
  pub(crate) settings: Settings,
  pub(crate) state: RwLock<CacheState<K>>,
  pub(crate) driver: Mutex<Option<EpochDriver>>,
  pub(crate) closed: AtomicBool,
}

impl<K, V> fmt::Debug for CacheShared<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.read();
    f.debug_struct("CacheShared")
      .field("active", &state.active)
      .field("epoch", &state.epoch)
      .field("migrating", &state.migration.is_some())
      .field("policies", &self.policies.len())
      .field("settings", &self.settings)
      .finish_non_exhaustive()
  }
}

impl<K, V> Drop for CacheShared<K, V> {
  fn drop(&mut self) {
    if let Some(driver) = self.driver.lock().take() {
      driver.stop();
    }
  }
}

impl<K, V> CacheShared<K, V>
where
  K: Eq + Hash + Clone + Send + Sync,
  V: Clone + Default + Send + Sync,
{
  // --- Data plane ---

  pub(crate) fn get(&self, key: &K) -> Option<V> {
    let state = self.state.read();

    // Mirror the lookup into every shadow so their hit/miss counters see
    // the same traffic as the active policy.
    for (kind, policy) in &self.policies {
      if *kind != state.active {
        let _ = policy.get(key);
      }
    }

    let hit = self.policies[&state.active].get(key);
    let in_window = hit.is_none() && state.migration.is_some();
    drop(state);

    if hit.is_some() {
      return hit;
    }
    if !in_window {
      return None;
    }
    self.promote(key)
  }

  /// Second phase of a miss during a gradual window: reacquire in exclusive
  /// mode and re-check both the window and the key's eligibility, since
  /// either may have changed while the shared guard was released.
  fn promote(&self, key: &K) -> Option<V> {
    let mut state = self.state.write();
    let active = state.active;
    let mig = state.migration.as_mut()?;
    if !mig.take_eligible(key) {
      return None;
    }
    let source = mig.source;
    if mig.is_drained() {
      state.migration = None;
    }

    // A source miss costs the key its eligibility (already taken above) and
    // nothing else.
    let value = self.policies[&source].peek(key)?;
    self.policies[&active].add(key.clone(), value.clone());
    Some(value)
  }

  pub(crate) fn add(&self, key: K, value: V) -> bool {
    let mut state = self.state.write();
    let active = state.active;

    // Shadows reserve a slot under the zero value so their working sets
    // track real traffic without ever holding real values.
    for (kind, policy) in &self.policies {
      if *kind != active {
        policy.add(key.clone(), V::default());
      }
    }

    let drained = match state.migration.as_mut() {
      Some(mig) => {
        // The shadow add just overwrote whatever the source still held for
        // this key, so it must not be promoted later.
        mig.take_eligible(&key);

        // Opportunistically drain one still-eligible key from the source.
        if let Some(pending) = mig.pop_candidate() {
          if let Some(v) = self.policies[&mig.source].peek(&pending) {
            self.policies[&active].add(pending, v);
          }
        }
        mig.is_drained()
      }
      None => false,
    };
    if drained {
      state.migration = None;
    }

    self.policies[&active].add(key, value)
  }

  pub(crate) fn remove(&self, key: &K) -> bool {
    let mut state = self.state.write();
    let active = state.active;

    let mut present = false;
    for (kind, policy) in &self.policies {
      let removed = policy.remove(key);
      if *kind == active {
        present = removed;
      }
    }

    let drained = match state.migration.as_mut() {
      Some(mig) => {
        mig.take_eligible(key);
        mig.is_drained()
      }
      None => false,
    };
    if drained {
      state.migration = None;
    }
    present
  }

  pub(crate) fn purge(&self) {
    let mut state = self.state.write();
    for policy in self.policies.values() {
      policy.purge();
    }
    state.migration = None;
  }

  pub(crate) fn resize(&self, cap: usize) -> usize {
    let _state = self.state.write();
    self
      .policies
      .values()
      .map(|policy| policy.resize(cap))
      .sum()
  }

  // --- Read-only delegates (active policy only, no shadow side effects) ---

  pub(crate) fn peek(&self, key: &K) -> Option<V> {
    let state = self.state.read();
    self.policies[&state.active].peek(key)
  }

  pub(crate) fn contains(&self, key: &K) -> bool {
    let state = self.state.read();
    self.policies[&state.active].contains(key)
  }

  pub(crate) fn keys(&self) -> Vec<K> {
    let state = self.state.read();
    self.policies[&state.active].keys()
  }

  pub(crate) fn values(&self) -> Vec<V> {
    let state = self.state.read();
    self.policies[&state.active].values()
  }

  pub(crate) fn len(&self) -> usize {
    let state = self.state.read();
    self.policies[&state.active].len()
  }

  pub(crate) fn stats(&self) -> GlobalStats {
    let state = self.state.read();
    self.policies[&state.active].stats().into()
  }

  pub(crate) fn active_policy(&self) -> PolicyType {
    self.state.read().active
  }

  pub(crate) fn epoch(&self) -> u64 {
    self.state.read().epoch
  }

  pub(crate) fn is_migrating(&self) -> bool {
    self.state.read().migration.is_some()
  }

  // --- Control plane ---

  /// Runs one epoch boundary: flush shadow stats to the bandit, ask it for
  /// the next active policy, and migrate if the answer differs. Returns the
  /// policy that is active afterwards.
  pub(crate) fn epoch_tick(&self) -> PolicyType {
    let mut state = self.state.write();

    // A gradual window never survives an epoch boundary.
    state.migration = None;

    let active = state.active;
    let active_policy = &self.policies[&active];
    if !self.settings.allow_partial_fill_switch && active_policy.len() < active_policy.cap() {
      return active;
    }

    for (kind, policy) in &self.policies {
      if *kind == active {
        continue;
      }
      let stats = policy.stats();
      policy.reset_stats();
      self.bandit.record_stats(ShadowStats {
        policy: *kind,
        hits: stats.hits,
        misses: stats.misses,
      });
    }

    let winner = self.bandit.select_policy();
    if winner == active {
      return active;
    }
    if !self.policies.contains_key(&winner) {
      warn!("bandit selected unregistered policy {winner}, keeping {active}");
      return active;
    }

    self.migrate(&mut state, active, winner);
    state.active = winner;
    state.epoch += 1;
    debug!(
      "switched active policy {active} -> {winner} ({:?} migration)",
      self.settings.migration_strategy
    );
    winner
  }

  fn migrate(&self, state: &mut CacheState<K>, from: PolicyType, to: PolicyType) {
    let source = &self.policies[&from];
    let target = &self.policies[&to];

    // As a shadow, the incoming policy accumulated zero-valued entries;
    // those must never surface as real values.
    target.purge();

    match self.settings.migration_strategy {
      MigrationStrategy::Cold => {}
      MigrationStrategy::Warm => {
        for key in source.keys() {
          if let Some(value) = source.peek(&key) {
            target.add(key, value);
          }
        }
      }
      MigrationStrategy::Gradual => {
        let keys = source.keys();
        if !keys.is_empty() {
          state.migration = Some(MigrationState::new(from, keys));
        }
      }
    }
  }

  /// Signals the epoch driver to stop. Idempotent; the data plane keeps
  /// serving, only epoch-driven switching ends.
  pub(crate) fn close(&self) {
    if self.closed.swap(true, Ordering::SeqCst) {
      return;
    }
    if let Some(driver) = self.driver.lock().take() {
      driver.stop();
    }
  }
}

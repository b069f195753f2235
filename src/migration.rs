use crate::policy::PolicyType;

use ahash::HashSet;
use std::hash::Hash;

/// How live data moves from the outgoing active policy to the incoming one
/// on a switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationStrategy {
  /// The incoming policy starts empty.
  #[default]
  Cold,
  /// The source's entries are bulk-copied into the incoming policy at switch
  /// time.
  Warm,
  /// The incoming policy starts empty and is populated lazily: misses
  /// promote individual keys from the source, and every add drains one
  /// additional key.
  Gradual,
}

/// Bookkeeping for an in-progress gradual migration.
///
/// `pending` is a stack of source keys snapshotted at switch time; `eligible`
/// is the subset that may still be promoted. Keys leave `eligible` on
/// promotion, removal, overwrite, or a source miss; the window is over once
/// the set is empty. `pending` may retain keys that are no longer eligible,
/// and the drain skips them.
#[derive(Debug)]
pub(crate) struct MigrationState<K> {
  pub(crate) source: PolicyType,
  pending: Vec<K>,
  eligible: HashSet<K>,
}

impl<K> MigrationState<K>
where
  K: Eq + Hash + Clone,
{
  pub(crate) fn new(source: PolicyType, keys: Vec<K>) -> Self {
    Self {
      source,
      eligible: keys.iter().cloned().collect(),
      pending: keys,
    }
  }

  /// Removes a key from the eligible set. Returns whether it was eligible.
  pub(crate) fn take_eligible(&mut self, key: &K) -> bool {
    self.eligible.remove(key)
  }

  /// Pops pending keys until one that is still eligible turns up, consuming
  /// its eligibility. Returns `None` once the stack is exhausted.
  pub(crate) fn pop_candidate(&mut self) -> Option<K> {
    while let Some(key) = self.pending.pop() {
      if self.eligible.remove(&key) {
        return Some(key);
      }
    }
    None
  }

  /// Whether every source key has been handled and the window can close.
  pub(crate) fn is_drained(&self) -> bool {
    self.eligible.is_empty()
  }
}

use crate::policy::PolicyType;

/// Per-policy hit/miss counters for the current epoch.
///
/// Owned by each policy; the core reads and resets shadow counters at every
/// epoch boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyStats {
  pub hits: u64,
  pub misses: u64,
}

impl PolicyStats {
  /// The fraction of lookups that hit, or `0.0` before any lookup.
  pub fn hit_ratio(&self) -> f64 {
    let total = self.hits + self.misses;
    if total == 0 {
      0.0
    } else {
      self.hits as f64 / total as f64
    }
  }
}

/// A per-epoch performance report for one shadow policy, handed to the
/// bandit at the epoch boundary and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowStats {
  pub policy: PolicyType,
  pub hits: u64,
  pub misses: u64,
}

/// Externally visible cumulative counters, snapshotted from the active
/// policy. Shadow policies keep independent counters that are not surfaced
/// here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalStats {
  pub hits: u64,
  pub misses: u64,
}

impl GlobalStats {
  /// The fraction of lookups that hit, or `0.0` before any lookup.
  pub fn hit_ratio(&self) -> f64 {
    let total = self.hits + self.misses;
    if total == 0 {
      0.0
    } else {
      self.hits as f64 / total as f64
    }
  }
}

impl From<PolicyStats> for GlobalStats {
  fn from(stats: PolicyStats) -> Self {
    GlobalStats {
      hits: stats.hits,
      misses: stats.misses,
    }
  }
}

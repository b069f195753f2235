mod thompson;

pub use thompson::ThompsonBandit;

use crate::policy::PolicyType;
use crate::stats::ShadowStats;

/// An online learner that nominates the next active policy.
///
/// Both operations are invoked only while the core holds its exclusive
/// guard, and a bandit never calls back into the cache. Implementations
/// therefore need interior mutability but no locking discipline of their
/// own beyond `Send + Sync`.
pub trait Bandit: Send + Sync {
  /// Accepts a per-epoch performance report for a non-active policy.
  fn record_stats(&self, stats: ShadowStats);

  /// Returns the policy that should be active next epoch.
  ///
  /// Returning the current active policy, or a tag that was never
  /// registered, leaves the epoch without a switch.
  fn select_policy(&self) -> PolicyType;
}

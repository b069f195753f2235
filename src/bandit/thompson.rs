use super::Bandit;
use crate::policy::PolicyType;
use crate::stats::ShadowStats;

use ahash::HashMap;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};

#[derive(Debug, Clone, Copy, Default)]
struct Arm {
  hits: f64,
  misses: f64,
}

struct State {
  arms: HashMap<PolicyType, Arm>,
  rng: SmallRng,
}

/// A Thompson-sampling bandit over per-policy hit rates.
///
/// Each arm keeps cumulative hit/miss totals; selection samples a
/// Beta(hits + 1, misses + 1) posterior per arm and returns the arm with the
/// largest sample. Arms the cache has registered but never reported on sit
/// at the uniform prior, so they still get explored.
pub struct ThompsonBandit {
  state: Mutex<State>,
}

impl ThompsonBandit {
  /// A bandit with the given arms, seeded from entropy.
  pub fn new(arms: impl IntoIterator<Item = PolicyType>) -> Self {
    Self::with_rng(arms, SmallRng::from_entropy())
  }

  /// A deterministically seeded bandit, for tests and reproducible runs.
  pub fn with_seed(arms: impl IntoIterator<Item = PolicyType>, seed: u64) -> Self {
    Self::with_rng(arms, SmallRng::seed_from_u64(seed))
  }

  fn with_rng(arms: impl IntoIterator<Item = PolicyType>, rng: SmallRng) -> Self {
    let arms = arms.into_iter().map(|kind| (kind, Arm::default())).collect();
    Self {
      state: Mutex::new(State { arms, rng }),
    }
  }
}

impl Bandit for ThompsonBandit {
  fn record_stats(&self, stats: ShadowStats) {
    let mut state = self.state.lock();
    let arm = state.arms.entry(stats.policy).or_default();
    arm.hits += stats.hits as f64;
    arm.misses += stats.misses as f64;
  }

  fn select_policy(&self) -> PolicyType {
    let state = &mut *self.state.lock();

    let mut best = PolicyType::Undefined;
    let mut best_sample = f64::NEG_INFINITY;
    for (kind, arm) in &state.arms {
      let sample = match Beta::new(arm.hits + 1.0, arm.misses + 1.0) {
        Ok(dist) => dist.sample(&mut state.rng),
        // Degenerate parameters cannot occur with the +1 prior, but a
        // uniform draw keeps selection total if they ever do.
        Err(_) => state.rng.gen::<f64>(),
      };
      if sample > best_sample {
        best_sample = sample;
        best = *kind;
      }
    }
    best
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn report(policy: PolicyType, hits: u64, misses: u64) -> ShadowStats {
    ShadowStats {
      policy,
      hits,
      misses,
    }
  }

  #[test]
  fn prefers_the_arm_with_the_better_hit_rate() {
    let bandit = ThompsonBandit::with_seed([PolicyType::Lru, PolicyType::Lfu], 7);
    for _ in 0..20 {
      bandit.record_stats(report(PolicyType::Lfu, 90, 10));
      bandit.record_stats(report(PolicyType::Lru, 10, 90));
    }

    let wins = (0..100)
      .filter(|_| bandit.select_policy() == PolicyType::Lfu)
      .count();
    assert!(wins > 90, "expected LFU to dominate, won {wins}/100");
  }

  #[test]
  fn unreported_arms_are_still_selectable() {
    let bandit = ThompsonBandit::with_seed([PolicyType::Lru, PolicyType::Lfu], 42);
    // Only LRU ever reports, and poorly; the untouched LFU prior should win
    // at least occasionally.
    bandit.record_stats(report(PolicyType::Lru, 0, 50));

    let lfu_seen = (0..100).any(|_| bandit.select_policy() == PolicyType::Lfu);
    assert!(lfu_seen, "expected the prior arm to be explored");
  }

  #[test]
  fn no_arms_yields_undefined() {
    let bandit = ThompsonBandit::with_seed(std::iter::empty(), 1);
    assert_eq!(bandit.select_policy(), PolicyType::Undefined);
  }
}

use crate::bandit::{Bandit, ThompsonBandit};
use crate::cache::AdaptiveCache;
use crate::error::BuildError;
use crate::migration::MigrationStrategy;
use crate::policy::Policy;
use crate::shared::{CacheShared, CacheState};
use crate::task::driver::EpochDriver;

use ahash::HashMap;
use parking_lot::{Mutex, RwLock};
use std::hash::Hash;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the adaptive core. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
  /// Period of the epoch driver. Must be positive.
  pub epoch_duration: Duration,
  /// If false, switches are skipped until the active policy is at capacity.
  pub allow_partial_fill_switch: bool,
  /// How data moves to the incoming policy on a switch.
  pub migration_strategy: MigrationStrategy,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      epoch_duration: Duration::from_secs(60),
      allow_partial_fill_switch: false,
      migration_strategy: MigrationStrategy::Cold,
    }
  }
}

/// A builder for [`AdaptiveCache`] instances.
///
/// Policies register in order; the first one becomes the initial active
/// policy. Without an explicit bandit, a [`ThompsonBandit`] over the
/// registered policy tags is used.
pub struct AdaptiveCacheBuilder<K, V> {
  policies: Vec<Arc<dyn Policy<K, V>>>,
  bandit: Option<Box<dyn Bandit>>,
  settings: Settings,
}

impl<K, V> Default for AdaptiveCacheBuilder<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> AdaptiveCacheBuilder<K, V> {
  /// Creates a builder with default settings.
  pub fn new() -> Self {
    Self {
      policies: Vec::new(),
      bandit: None,
      settings: Settings::default(),
    }
  }

  /// Registers a policy. The first registered policy starts active.
  pub fn policy(mut self, policy: Arc<dyn Policy<K, V>>) -> Self {
    self.policies.push(policy);
    self
  }

  /// Sets the bandit that nominates the active policy each epoch.
  pub fn bandit(mut self, bandit: impl Bandit + 'static) -> Self {
    self.bandit = Some(Box::new(bandit));
    self
  }

  /// Replaces the whole settings block at once.
  pub fn settings(mut self, settings: Settings) -> Self {
    self.settings = settings;
    self
  }

  /// Sets the period of the epoch driver. Defaults to 60 seconds.
  pub fn epoch_duration(mut self, duration: Duration) -> Self {
    self.settings.epoch_duration = duration;
    self
  }

  /// Allows switches while the active policy is below capacity.
  /// Defaults to false.
  pub fn allow_partial_fill_switch(mut self, allow: bool) -> Self {
    self.settings.allow_partial_fill_switch = allow;
    self
  }

  /// Sets the migration strategy. Defaults to [`MigrationStrategy::Cold`].
  pub fn migration_strategy(mut self, strategy: MigrationStrategy) -> Self {
    self.settings.migration_strategy = strategy;
    self
  }
}

impl<K, V> AdaptiveCacheBuilder<K, V>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Clone + Default + Send + Sync + 'static,
{
  /// Builds the cache and spawns its epoch driver.
  pub fn build(mut self) -> Result<AdaptiveCache<K, V>, BuildError> {
    self.validate()?;

    let initial = self.policies[0].kind();
    let kinds: Vec<_> = self.policies.iter().map(|p| p.kind()).collect();
    let policies: HashMap<_, _> = self
      .policies
      .drain(..)
      .map(|policy| (policy.kind(), policy))
      .collect();

    let bandit = self
      .bandit
      .take()
      .unwrap_or_else(|| Box::new(ThompsonBandit::new(kinds)));

    let shared = Arc::new(CacheShared {
      policies,
      bandit,
      settings: self.settings,
      state: RwLock::new(CacheState {
        active: initial,
        migration: None,
        epoch: 0,
      }),
      driver: Mutex::new(None),
      closed: AtomicBool::new(false),
    });

    let driver = EpochDriver::spawn(Arc::downgrade(&shared), self.settings.epoch_duration);
    *shared.driver.lock() = Some(driver);

    Ok(AdaptiveCache { shared })
  }

  fn validate(&self) -> Result<(), BuildError> {
    if self.policies.is_empty() {
      return Err(BuildError::EmptyPolicies);
    }
    if self.settings.epoch_duration.is_zero() {
      return Err(BuildError::ZeroEpochDuration);
    }
    Ok(())
  }
}

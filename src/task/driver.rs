use crate::shared::CacheShared;

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

/// The background task that triggers the bandit handshake once per epoch.
///
/// The thread holds only a weak reference to the shared core: dropping the
/// cache tears the driver down on its next wake-up even if `close` was never
/// called. `stop` sets the flag and detaches; in-flight ticks run to
/// completion.
pub(crate) struct EpochDriver {
  stop_flag: Arc<AtomicBool>,
}

impl EpochDriver {
  /// Spawns the driver thread, ticking every `epoch_duration`.
  pub(crate) fn spawn<K, V>(core: Weak<CacheShared<K, V>>, epoch_duration: Duration) -> Self
  where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Default + Send + Sync + 'static,
  {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop = stop_flag.clone();

    // Detached on purpose: the thread exits via the stop flag or once the
    // shared core is gone and the upgrade fails.
    let _ = thread::spawn(move || loop {
      thread::sleep(epoch_duration);
      if stop.load(Ordering::Relaxed) {
        return;
      }
      match core.upgrade() {
        Some(core) => {
          core.epoch_tick();
        }
        None => return,
      }
    });

    Self { stop_flag }
  }

  /// Signals the driver thread to exit at its next wake-up.
  pub(crate) fn stop(self) {
    self.stop_flag.store(true, Ordering::Relaxed);
  }
}

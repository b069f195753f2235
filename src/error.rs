use std::fmt;

/// Errors that can occur when building an adaptive cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// No policies were supplied. The cache needs at least one registered
  /// policy to serve as the initial active policy.
  EmptyPolicies,
  /// The epoch duration was configured as zero. The epoch driver needs a
  /// positive tick period.
  ZeroEpochDuration,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::EmptyPolicies => write!(f, "adaptive cache requires at least one policy"),
      BuildError::ZeroEpochDuration => write!(f, "epoch duration must be positive"),
    }
  }
}

impl std::error::Error for BuildError {}

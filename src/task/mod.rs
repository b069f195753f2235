//! Background tasks for the cache. The only one is the epoch driver, which
//! periodically runs the bandit handshake and policy switch.

pub(crate) mod driver;

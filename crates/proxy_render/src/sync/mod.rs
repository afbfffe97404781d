//! # Synchronization Primitives
//!
//! Building blocks the proxy renderer uses to decide *when* to rebuild and to
//! avoid re-creating renderables on every rebuild:
//!
//! - [`ChangeMonitor`] - snapshot-based change detection over watched values
//! - [`ObjectPool`] - stack-ordered reuse cache with a soft capacity

pub mod monitor;
pub mod pool;

pub use monitor::{ChangeMonitor, array_eq, same_instance};
pub use pool::{ObjectPool, PoolStats};

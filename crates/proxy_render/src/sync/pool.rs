//! Bounded object pool
//!
//! Keeps idle objects around for reuse instead of recreating them every rebuild.
//! Creation and disposal are pluggable closures supplied at construction time;
//! the pool itself never knows what it is holding.
//!
//! # Reuse order
//!
//! Idle objects are kept on a stack: the most recently released object is the
//! first one handed out again.
//!
//! # Capacity
//!
//! The capacity check happens *before* the released object is pushed and uses
//! a strict greater-than comparison, so a pool with capacity `C` settles at
//! `C + 1` idle objects. Anything released past that point is disposed
//! immediately.
//!
//! # Usage
//!
//! ```rust
//! use proxy_render::sync::ObjectPool;
//!
//! let mut pool: ObjectPool<Vec<u8>, std::convert::Infallible> =
//!     ObjectPool::new(|| Ok(Vec::with_capacity(64)));
//!
//! let buffer = pool.acquire().unwrap();
//! pool.release(buffer);
//! assert_eq!(pool.idle_len(), 1);
//! ```

use std::fmt;

/// Creates a new pooled object on demand
pub type InstantiationAgent<T, E> = Box<dyn FnMut() -> Result<T, E>>;

/// Tears down an object the pool will not keep
pub type DisposalAgent<T> = Box<dyn FnMut(T)>;

/// Lifetime counters for a pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects produced by the instantiation agent
    pub created: u64,
    /// Acquisitions served from the idle stack
    pub reused: u64,
    /// Objects handed back through `release`
    pub released: u64,
    /// Objects passed to the disposal agent
    pub disposed: u64,
}

/// Stack-based pool of reusable objects with a soft capacity
pub struct ObjectPool<T, E> {
    idle: Vec<T>,
    instantiation_agent: InstantiationAgent<T, E>,
    disposal_agent: Option<DisposalAgent<T>>,
    capacity: Option<usize>,
    stats: PoolStats,
}

impl<T, E> ObjectPool<T, E> {
    /// Create an unbounded pool without a disposal agent
    ///
    /// Cleared objects are simply dropped, so this mode must not be used for
    /// objects that own external resources.
    pub fn new(instantiation_agent: impl FnMut() -> Result<T, E> + 'static) -> Self {
        Self {
            idle: Vec::new(),
            instantiation_agent: Box::new(instantiation_agent),
            disposal_agent: None,
            capacity: None,
            stats: PoolStats::default(),
        }
    }

    /// Create a pool that disposes objects it will not retain
    ///
    /// `capacity` of `None` keeps every released object.
    pub fn with_disposal(
        instantiation_agent: impl FnMut() -> Result<T, E> + 'static,
        disposal_agent: impl FnMut(T) + 'static,
        capacity: Option<usize>,
    ) -> Self {
        Self {
            idle: Vec::new(),
            instantiation_agent: Box::new(instantiation_agent),
            disposal_agent: Some(Box::new(disposal_agent)),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Take an idle object, or create one if none is idle
    ///
    /// Instantiation failures are returned to the caller untouched.
    pub fn acquire(&mut self) -> Result<T, E> {
        if let Some(obj) = self.idle.pop() {
            self.stats.reused += 1;
            return Ok(obj);
        }

        let obj = (self.instantiation_agent)()?;
        self.stats.created += 1;
        Ok(obj)
    }

    /// Hand an object back to the pool
    pub fn release(&mut self, obj: T) {
        self.stats.released += 1;

        let over_capacity = self
            .capacity
            .map_or(false, |capacity| self.idle.len() > capacity);

        if over_capacity {
            self.dispose(obj);
        } else {
            self.idle.push(obj);
        }
    }

    /// Dispose an object immediately, bypassing the idle stack
    pub fn dispose(&mut self, obj: T) {
        if let Some(dispose) = self.disposal_agent.as_mut() {
            dispose(obj);
            self.stats.disposed += 1;
        }
    }

    /// Dispose every idle object (or drop them when no disposal agent is set)
    pub fn clear(&mut self) {
        if self.disposal_agent.is_some() {
            while let Some(obj) = self.idle.pop() {
                self.dispose(obj);
            }
        } else {
            self.idle.clear();
        }
    }

    /// Number of idle objects
    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    /// Iterate idle objects, most recently released first
    pub fn idle(&self) -> impl Iterator<Item = &T> {
        self.idle.iter().rev()
    }

    /// Configured soft capacity (`None` = unbounded)
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Whether a disposal agent was configured
    pub fn has_disposal(&self) -> bool {
        self.disposal_agent.is_some()
    }

    /// Lifetime counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl<T, E> fmt::Debug for ObjectPool<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle.len())
            .field("capacity", &self.capacity)
            .field("has_disposal", &self.disposal_agent.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Pool of numbered objects that records every disposal
    fn counting_pool(capacity: Option<usize>) -> (ObjectPool<u32, String>, Rc<RefCell<Vec<u32>>>) {
        let next = Rc::new(Cell::new(0u32));
        let disposed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&disposed);
        let pool = ObjectPool::with_disposal(
            move || {
                let id = next.get();
                next.set(id + 1);
                Ok(id)
            },
            move |obj| sink.borrow_mut().push(obj),
            capacity,
        );
        (pool, disposed)
    }

    #[test]
    fn test_acquire_creates_lazily() {
        let (mut pool, _) = counting_pool(Some(4));
        assert_eq!(pool.stats().created, 0);

        assert_eq!(pool.acquire().unwrap(), 0);
        assert_eq!(pool.acquire().unwrap(), 1);
        assert_eq!(pool.stats().created, 2);
        assert_eq!(pool.idle_len(), 0);
    }

    #[test]
    fn test_reuse_is_last_in_first_out() {
        let (mut pool, _) = counting_pool(Some(4));
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();

        pool.release(a);
        pool.release(b);
        pool.release(c);

        assert_eq!(pool.idle().copied().collect::<Vec<_>>(), vec![c, b, a]);
        assert_eq!(pool.acquire().unwrap(), c);
        assert_eq!(pool.acquire().unwrap(), b);
        assert_eq!(pool.acquire().unwrap(), a);
        assert_eq!(pool.stats().reused, 3);
        assert_eq!(pool.stats().created, 3);
    }

    #[test]
    fn test_release_beyond_capacity_disposes() {
        let capacity = 2;
        let released = 6u32;
        let (mut pool, disposed) = counting_pool(Some(capacity));

        let objects: Vec<u32> = (0..released).map(|_| pool.acquire().unwrap()).collect();
        for obj in objects {
            pool.release(obj);
        }

        // Strict greater-than check before insertion keeps capacity + 1
        assert_eq!(pool.idle_len(), capacity + 1);
        assert_eq!(*disposed.borrow(), vec![3, 4, 5]);
        assert_eq!(pool.stats().disposed, 3);

        // Disposed objects never come back
        let mut reacquired: Vec<u32> = (0..3).map(|_| pool.acquire().unwrap()).collect();
        reacquired.sort_unstable();
        assert_eq!(reacquired, vec![0, 1, 2]);
        assert_eq!(pool.acquire().unwrap(), 6);
    }

    #[test]
    fn test_unbounded_pool_retains_everything() {
        let (mut pool, disposed) = counting_pool(None);
        let objects: Vec<u32> = (0..50).map(|_| pool.acquire().unwrap()).collect();
        for obj in objects {
            pool.release(obj);
        }
        assert_eq!(pool.idle_len(), 50);
        assert!(disposed.borrow().is_empty());
    }

    #[test]
    fn test_clear_disposes_idle_objects() {
        let (mut pool, disposed) = counting_pool(Some(8));
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(a);
        pool.release(b);

        pool.clear();

        assert_eq!(pool.idle_len(), 0);
        assert_eq!(*disposed.borrow(), vec![b, a]);
    }

    #[test]
    fn test_clear_without_disposal_forgets_objects() {
        let mut pool: ObjectPool<Vec<u8>, String> = ObjectPool::new(|| Ok(Vec::new()));
        let buffer = pool.acquire().unwrap();
        pool.release(buffer);

        pool.clear();

        assert_eq!(pool.idle_len(), 0);
        assert!(!pool.has_disposal());
        assert_eq!(pool.capacity(), None);
        assert_eq!(pool.stats().disposed, 0);
    }

    #[test]
    fn test_dispose_bypasses_capacity() {
        let (mut pool, disposed) = counting_pool(None);
        let obj = pool.acquire().unwrap();
        pool.dispose(obj);
        assert_eq!(pool.idle_len(), 0);
        assert_eq!(*disposed.borrow(), vec![obj]);
    }

    #[test]
    fn test_instantiation_failure_propagates() {
        let mut pool: ObjectPool<u32, String> =
            ObjectPool::new(|| Err("factory offline".to_string()));
        assert_eq!(pool.acquire(), Err("factory offline".to_string()));
        assert_eq!(pool.stats().created, 0);
    }
}

//! Submesh renderable manager
//!
//! Maps submesh indices to pooled flat renderables. After a successful
//! [`sync_to(n)`](SubmeshRenderables::sync_to) the map holds exactly the keys
//! `0..n`; handles for indices that survive keep their identity across calls so
//! any backend resources they own are preserved between rebuilds.

use crate::render::renderable::{FlatRenderable, RenderableError, RenderableFactory};
use crate::sync::ObjectPool;
use std::collections::BTreeMap;

/// Pool of flat renderables owned by one manager
pub type RenderablePool<H> = ObjectPool<H, RenderableError>;

/// What a call to [`SubmeshRenderables::sync_to`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Handles acquired for indices that had none
    pub acquired: usize,
    /// Handles retired because their index no longer exists
    pub retired: usize,
}

impl SyncReport {
    /// Whether the call changed the map at all
    pub fn is_noop(&self) -> bool {
        self.acquired == 0 && self.retired == 0
    }
}

/// Submesh index -> renderable map backed by an object pool
pub struct SubmeshRenderables<H> {
    active: BTreeMap<usize, H>,
    pool: RenderablePool<H>,
}

impl<H: FlatRenderable + 'static> SubmeshRenderables<H> {
    /// Create a manager over an existing pool
    pub fn new(pool: RenderablePool<H>) -> Self {
        Self {
            active: BTreeMap::new(),
            pool,
        }
    }

    /// Create a manager whose pool creates and disposes through `factory`
    pub fn from_factory<F>(factory: F, capacity: Option<usize>) -> Self
    where
        F: RenderableFactory<Handle = H>,
    {
        let disposer = factory.clone();
        let pool = ObjectPool::with_disposal(
            move || factory.create(),
            move |handle| disposer.dispose(handle),
            capacity,
        );
        log::info!("Created renderable pool with capacity {:?}", capacity);
        Self::new(pool)
    }

    /// Make the map cover exactly `0..count`
    ///
    /// Missing indices are filled from the pool first; afterwards every handle
    /// at an index `>= count` is deactivated and released back to the pool.
    /// Newly mapped handles are left inactive until the caller has filled them.
    /// A creation failure aborts the call and is returned; handles acquired
    /// before the failure stay mapped.
    pub fn sync_to(&mut self, count: usize) -> Result<SyncReport, RenderableError> {
        let mut report = SyncReport::default();

        for index in 0..count {
            if self.active.contains_key(&index) {
                continue;
            }
            let handle = self.pool.acquire()?;
            self.active.insert(index, handle);
            report.acquired += 1;
        }

        let stale = self.active.split_off(&count);
        for (index, mut handle) in stale {
            log::debug!("Retiring renderable for submesh {}", index);
            handle.set_active(false);
            self.pool.release(handle);
            report.retired += 1;
        }

        Ok(report)
    }

    /// Dispose every mapped handle directly and empty the map
    ///
    /// Bypasses the pool's idle stack and capacity check entirely.
    pub fn teardown_all(&mut self) -> usize {
        let active = std::mem::take(&mut self.active);
        let count = active.len();
        for (_, handle) in active {
            self.pool.dispose(handle);
        }
        count
    }

    /// Dispose active handles and every idle pooled handle
    pub fn shutdown(&mut self) {
        self.teardown_all();
        self.pool.clear();
    }

    /// Handle for a submesh
    pub fn get(&self, index: usize) -> Option<&H> {
        self.active.get(&index)
    }

    /// Mutable handle for a submesh
    pub fn get_mut(&mut self, index: usize) -> Option<&mut H> {
        self.active.get_mut(&index)
    }

    /// Mapped submesh indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.keys().copied()
    }

    /// Mapped handles in ascending submesh order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut H)> {
        self.active.iter_mut().map(|(index, handle)| (*index, handle))
    }

    /// Number of mapped submeshes
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// The backing pool
    pub fn pool(&self) -> &RenderablePool<H> {
        &self.pool
    }
}

impl<H> std::fmt::Debug for SubmeshRenderables<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmeshRenderables")
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .field("pool", &self.pool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::SharedMaterial;
    use crate::render::vertex::{Color32, CornerVertex};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug)]
    struct TestHandle {
        id: u32,
        active: bool,
    }

    impl FlatRenderable for TestHandle {
        fn set_material(&mut self, _material: SharedMaterial) {}
        fn set_vertices(&mut self, _vertices: Vec<CornerVertex>) {}
        fn set_color(&mut self, _color: Color32) {}
        fn set_alpha(&mut self, _alpha: f32) {}
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }
        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[derive(Clone, Default)]
    struct TestFactory {
        next: Rc<Cell<u32>>,
        disposed: Rc<RefCell<Vec<u32>>>,
        fail: Rc<Cell<bool>>,
    }

    impl RenderableFactory for TestFactory {
        type Handle = TestHandle;

        fn create(&self) -> Result<TestHandle, RenderableError> {
            if self.fail.get() {
                return Err(RenderableError::Creation { reason: "offline".to_string() });
            }
            let id = self.next.get();
            self.next.set(id + 1);
            Ok(TestHandle { id, active: false })
        }

        fn dispose(&self, handle: TestHandle) {
            self.disposed.borrow_mut().push(handle.id);
        }
    }

    fn keys(manager: &SubmeshRenderables<TestHandle>) -> Vec<usize> {
        manager.indices().collect()
    }

    #[test]
    fn test_sync_covers_exact_range() {
        let factory = TestFactory::default();
        let mut manager = SubmeshRenderables::from_factory(factory, Some(8));

        for count in [3, 5, 1, 0, 4, 4, 2] {
            manager.sync_to(count).unwrap();
            assert_eq!(keys(&manager), (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_reacquired_handles_start_inactive() {
        let mut manager = SubmeshRenderables::from_factory(TestFactory::default(), Some(8));
        manager.sync_to(2).unwrap();
        assert!(manager.iter_mut().all(|(_, handle)| !handle.is_active()));

        for (_, handle) in manager.iter_mut() {
            handle.set_active(true);
        }
        manager.sync_to(1).unwrap();
        manager.sync_to(2).unwrap();

        assert_eq!(manager.pool().stats().created, 2);
        assert!(manager.get(0).is_some_and(FlatRenderable::is_active));
        assert!(manager.get(1).is_some_and(|handle| !handle.is_active()));
    }

    #[test]
    fn test_surviving_handles_keep_identity() {
        let mut manager = SubmeshRenderables::from_factory(TestFactory::default(), Some(8));
        manager.sync_to(2).unwrap();
        let first = manager.get(0).map(|h| h.id);
        let second = manager.get(1).map(|h| h.id);

        manager.sync_to(3).unwrap();
        assert_eq!(manager.get(0).map(|h| h.id), first);
        assert_eq!(manager.get(1).map(|h| h.id), second);
    }

    #[test]
    fn test_repeated_sync_is_noop() {
        let mut manager = SubmeshRenderables::from_factory(TestFactory::default(), Some(8));
        manager.sync_to(3).unwrap();
        let stats = manager.pool().stats();

        let report = manager.sync_to(3).unwrap();
        assert!(report.is_noop());
        assert_eq!(manager.pool().stats(), stats);
    }

    #[test]
    fn test_shrink_releases_to_pool() {
        let factory = TestFactory::default();
        let disposed = Rc::clone(&factory.disposed);
        let mut manager = SubmeshRenderables::from_factory(factory, Some(8));

        manager.sync_to(3).unwrap();
        let report = manager.sync_to(1).unwrap();

        assert_eq!(report, SyncReport { acquired: 0, retired: 2 });
        assert_eq!(manager.pool().idle_len(), 2);
        assert!(manager.pool().idle().all(|handle| !handle.is_active()));
        assert!(disposed.borrow().is_empty());
    }

    #[test]
    fn test_regrow_reuses_most_recently_released() {
        let mut manager = SubmeshRenderables::from_factory(TestFactory::default(), Some(8));
        manager.sync_to(3).unwrap();
        let id_of_2 = manager.get(2).map(|h| h.id);

        // Indices 1 and 2 released in ascending order; 2 ends up on top
        manager.sync_to(1).unwrap();
        manager.sync_to(2).unwrap();

        assert_eq!(manager.get(1).map(|h| h.id), id_of_2);
        assert_eq!(manager.pool().stats().created, 3);
    }

    #[test]
    fn test_teardown_disposes_directly() {
        let factory = TestFactory::default();
        let disposed = Rc::clone(&factory.disposed);
        let mut manager = SubmeshRenderables::from_factory(factory, Some(0));

        manager.sync_to(3).unwrap();
        assert_eq!(manager.teardown_all(), 3);

        assert!(manager.is_empty());
        assert_eq!(manager.pool().idle_len(), 0);
        assert_eq!(*disposed.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_shutdown_disposes_idle_and_active() {
        let factory = TestFactory::default();
        let disposed = Rc::clone(&factory.disposed);
        let mut manager = SubmeshRenderables::from_factory(factory, Some(8));

        manager.sync_to(4).unwrap();
        manager.sync_to(2).unwrap();
        manager.shutdown();

        let mut ids = disposed.borrow().clone();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(manager.is_empty());
        assert_eq!(manager.pool().idle_len(), 0);
    }

    #[test]
    fn test_creation_failure_propagates() {
        let factory = TestFactory::default();
        let fail = Rc::clone(&factory.fail);
        let mut manager = SubmeshRenderables::from_factory(factory, Some(8));

        manager.sync_to(1).unwrap();
        fail.set(true);

        let result = manager.sync_to(3);
        assert!(matches!(result, Err(RenderableError::Creation { .. })));
        assert_eq!(keys(&manager), vec![0]);
    }
}

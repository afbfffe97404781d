//! Snapshot-based change detection
//!
//! A [`ChangeMonitor`] holds an ordered list of watched values. Each slot pairs
//! an accessor that reads the current value out of a context with the snapshot
//! seen on the previous evaluation and an equality predicate. Evaluating the
//! monitor refreshes every slot and reports whether any of them moved.
//!
//! A slot's first evaluation only seeds its snapshot and never counts as a
//! change; construct the monitor with `assume_changed_on_first_evaluation` to
//! force an initial rebuild.

use std::sync::Arc;

/// Element-wise equality for slices: same length and equal elements in order
pub fn array_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Identity equality for optional shared references
///
/// Two snapshots are equal when both are absent or both point at the same
/// allocation, regardless of contents.
pub fn same_instance<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Reads a watched value out of the evaluation context
pub type Accessor<C, V> = Box<dyn Fn(&C) -> V>;

/// Decides whether two snapshots are the same
pub type Equality<V> = Box<dyn Fn(&V, &V) -> bool>;

/// Type-erased slot so values of different types can share one monitor
trait WatchSlot<C> {
    /// Take a fresh snapshot, returning whether it differs from the last one
    fn refresh(&mut self, context: &C) -> bool;
}

struct Slot<C, V> {
    accessor: Accessor<C, V>,
    equality: Equality<V>,
    snapshot: Option<V>,
}

impl<C, V> WatchSlot<C> for Slot<C, V> {
    fn refresh(&mut self, context: &C) -> bool {
        let current = (self.accessor)(context);
        let changed = match &self.snapshot {
            Some(previous) => !(self.equality)(previous, &current),
            None => false,
        };
        self.snapshot = Some(current);
        changed
    }
}

/// Slot over a borrowed slice; the owned snapshot is only rebuilt on change
struct SliceSlot<C, T> {
    accessor: Box<dyn for<'c> Fn(&'c C) -> &'c [T]>,
    snapshot: Option<Vec<T>>,
}

impl<C, T: PartialEq + Clone> WatchSlot<C> for SliceSlot<C, T> {
    fn refresh(&mut self, context: &C) -> bool {
        let current = (self.accessor)(context);
        let changed = match &self.snapshot {
            Some(previous) => !array_eq(previous, current),
            None => false,
        };
        if changed || self.snapshot.is_none() {
            self.snapshot = Some(current.to_vec());
        }
        changed
    }
}

/// Ordered set of watched values with per-slot equality
pub struct ChangeMonitor<C> {
    slots: Vec<Box<dyn WatchSlot<C>>>,
    forced_change_pending: bool,
    evaluations: u64,
}

impl<C: 'static> ChangeMonitor<C> {
    /// Create an empty monitor
    ///
    /// When `assume_changed_on_first_evaluation` is set, the first call to
    /// [`evaluate`](Self::evaluate) reports a change no matter what the slots say.
    pub fn new(assume_changed_on_first_evaluation: bool) -> Self {
        Self {
            slots: Vec::new(),
            forced_change_pending: assume_changed_on_first_evaluation,
            evaluations: 0,
        }
    }

    /// Watch a value compared with its own `PartialEq`
    pub fn watch<V>(&mut self, accessor: impl Fn(&C) -> V + 'static)
    where
        V: PartialEq + 'static,
    {
        self.watch_with(accessor, |a: &V, b: &V| a == b);
    }

    /// Watch a value compared with a custom predicate
    pub fn watch_with<V>(
        &mut self,
        accessor: impl Fn(&C) -> V + 'static,
        equality: impl Fn(&V, &V) -> bool + 'static,
    ) where
        V: 'static,
    {
        self.slots.push(Box::new(Slot {
            accessor: Box::new(accessor),
            equality: Box::new(equality),
            snapshot: None,
        }));
    }

    /// Watch a sequence compared element-wise
    ///
    /// The accessor borrows the sequence out of the context; it is only copied
    /// into the snapshot when it differs, so unchanged evaluations do not
    /// allocate.
    pub fn watch_array<T>(&mut self, accessor: impl for<'c> Fn(&'c C) -> &'c [T] + 'static)
    where
        T: PartialEq + Clone + 'static,
    {
        self.slots.push(Box::new(SliceSlot {
            accessor: Box::new(accessor),
            snapshot: None,
        }));
    }

    /// Refresh every slot and report whether any value changed
    ///
    /// All slots are visited on every call so each snapshot stays current.
    pub fn evaluate(&mut self, context: &C) -> bool {
        let mut changed = false;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.refresh(context) {
                log::trace!("Watched slot {} changed", index);
                changed = true;
            }
        }

        self.evaluations += 1;

        if self.forced_change_pending {
            self.forced_change_pending = false;
            return true;
        }

        changed
    }

    /// Make the next evaluation report a change
    ///
    /// Slots are still refreshed as usual on that evaluation.
    pub fn invalidate(&mut self) {
        self.forced_change_pending = true;
    }

    /// Number of watched slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is being watched
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of completed evaluations
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

impl<C> std::fmt::Debug for ChangeMonitor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMonitor")
            .field("slots", &self.slots.len())
            .field("forced_change_pending", &self.forced_change_pending)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}

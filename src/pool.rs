//! Bounded scratch-buffer pool for hot-path work.
//!
//! Buffers are acquired through [`ScratchPool::acquire`] and returned when the
//! [`Pooled`] guard drops, cleared but with their capacity kept. The pool is a
//! lock-free bounded queue, so concurrent lookups never contend on a mutex; a
//! buffer is owned exclusively by the call that borrowed it. When the pool is
//! empty a fresh buffer is allocated, and when it is full a returned buffer is
//! simply dropped.

use crossbeam::queue::ArrayQueue;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A buffer that can be reset for reuse.
pub trait Recycle: Default {
    /// Drop contents, keep allocation.
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for String {
    fn recycle(&mut self) {
        self.clear();
    }
}

/// Lock-free pool of reusable buffers.
pub struct ScratchPool<T> {
    slots: ArrayQueue<T>,
}

impl<T: Recycle> ScratchPool<T> {
    /// Create a pool holding at most `capacity` idle buffers (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: ArrayQueue::new(capacity.max(1)),
        }
    }

    /// Borrow a cleared buffer for the lifetime of the guard.
    #[inline]
    pub fn acquire(&self) -> Pooled<'_, T> {
        Pooled {
            pool: self,
            item: self.slots.pop().unwrap_or_default(),
        }
    }

    /// Number of idle buffers waiting for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

impl<T> fmt::Debug for ScratchPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchPool")
            .field("idle", &self.slots.len())
            .field("capacity", &self.slots.capacity())
            .finish()
    }
}

/// Scoped handle to a pooled buffer; releases it on drop.
pub struct Pooled<'p, T: Recycle> {
    pool: &'p ScratchPool<T>,
    item: T,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        let mut item = std::mem::take(&mut self.item);
        item.recycle();
        // Full pool: let the buffer go.
        self.pool.slots.push(item).ok();
    }
}

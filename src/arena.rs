//! Bump allocator for per-frame scratch data.
//!
//! Allocations are slices into one growing `Vec` and are only ever freed in
//! bulk, either by rolling back to a [`ArenaMark`] or by [`Arena::reset`].

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("arena exhausted: requested {requested} items with {used} of {limit} in use")]
pub struct ArenaError {
    pub requested: usize,
    pub used: usize,
    pub limit: usize,
}

/// Location of one allocation. Only valid until the arena is rolled back past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaHandle {
    start: usize,
    len: usize,
}

impl ArenaHandle {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaMark(usize);

#[derive(Debug)]
pub struct Arena<T> {
    storage: Vec<T>,
    limit: usize,
    // Start of the innermost carved region; rollbacks never go below it.
    base: usize,
}

impl<T> Arena<T> {
    pub fn with_capacity(limit: usize) -> Arena<T> {
        Arena {
            storage: Vec::with_capacity(limit),
            limit,
            base: 0,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn used(&self) -> usize {
        self.storage.len()
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.storage.len()
    }

    fn reserve(&self, requested: usize) -> Result<(), ArenaError> {
        if requested > self.remaining() {
            Err(ArenaError {
                requested,
                used: self.used(),
                limit: self.limit,
            })
        } else {
            Ok(())
        }
    }

    /// Appends one item. On failure the arena is left untouched.
    pub fn push(&mut self, item: T) -> Result<ArenaHandle, ArenaError> {
        self.reserve(1)?;
        let start = self.storage.len();
        self.storage.push(item);
        Ok(ArenaHandle { start, len: 1 })
    }

    pub fn get(&self, handle: ArenaHandle) -> Option<&[T]> {
        self.storage.get(handle.start..handle.start + handle.len)
    }

    pub fn get_mut(&mut self, handle: ArenaHandle) -> Option<&mut [T]> {
        self.storage.get_mut(handle.start..handle.start + handle.len)
    }

    pub fn mark(&self) -> ArenaMark {
        ArenaMark(self.storage.len())
    }

    /// Frees everything allocated after `mark`. Inside [`Arena::carve`] this
    /// stops at the start of the carved region.
    pub fn release(&mut self, mark: ArenaMark) {
        self.storage.truncate(mark.0.max(self.base));
    }

    pub fn reset(&mut self) {
        self.storage.truncate(self.base);
    }

    /// Everything allocated after `mark`, in allocation order.
    pub fn since(&self, mark: ArenaMark) -> &[T] {
        self.storage.get(mark.0..).unwrap_or(&[])
    }

    pub fn scope<R>(&mut self, f: impl FnOnce(&mut Arena<T>) -> R) -> R {
        let mark = self.mark();
        let result = f(self);
        self.release(mark);
        result
    }

    /// Runs `f` against a sub-arena limited to `capacity` more items.
    ///
    /// Fails without calling `f` when the parent cannot spare that much.
    /// The sub-arena can only roll back its own allocations, and all of them
    /// are freed when `f` returns.
    pub fn carve<R>(
        &mut self,
        capacity: usize,
        f: impl FnOnce(&mut Arena<T>) -> R,
    ) -> Result<R, ArenaError> {
        self.reserve(capacity)?;
        let (saved_limit, saved_base) = (self.limit, self.base);
        self.base = self.storage.len();
        self.limit = self.base + capacity;
        let result = f(self);
        self.storage.truncate(self.base);
        self.limit = saved_limit;
        self.base = saved_base;
        Ok(result)
    }
}

impl<T: Clone + Default> Arena<T> {
    pub fn allocate(&mut self, count: usize) -> Result<ArenaHandle, ArenaError> {
        self.reserve(count)?;
        let start = self.storage.len();
        self.storage.resize(start + count, T::default());
        Ok(ArenaHandle { start, len: count })
    }
}

//! Lock-guarded values shared between threads.

use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value readable from many threads and replaced or mutated in place.
///
/// Guards must not be held across calls that lock the same value.
#[derive(Default)]
pub struct Shared<T> {
    inner: RwLock<T>,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    /// Replaces the value, returning the previous one.
    pub fn set(&self, value: T) -> T {
        std::mem::replace(&mut *self.inner.write(), value)
    }

    /// Mutates the value under the write lock and returns the closure's result.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Clone> Shared<T> {
    pub fn get(&self) -> T {
        self.inner.read().clone()
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(value) => f.debug_tuple("Shared").field(&*value).finish(),
            None => f.write_str("Shared(<locked>)"),
        }
    }
}

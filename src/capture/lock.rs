// SPDX-License-Identifier: MPL-2.0
//! Exclusive access to the media element.
//!
//! Captures, exports and user playback controls all go through the same
//! mutex. Acquisition never waits: a second caller gets
//! [`Error::CaptureBusy`] while the first one holds the guard.

use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Shared handle to a media element.
#[derive(Debug)]
pub struct ElementLock<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for ElementLock<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> ElementLock<M> {
    #[must_use]
    pub fn new(element: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(element)),
        }
    }

    /// Takes the element if nobody else holds it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] when the element is already held.
    pub fn try_acquire(&self) -> Result<OwnedMutexGuard<M>> {
        Arc::clone(&self.inner)
            .try_lock_owned()
            .map_err(|_| Error::CaptureBusy)
    }

    /// True while some guard is alive.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// Swaps in a new element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureBusy`] when the element is held.
    pub fn replace(&self, element: M) -> Result<M> {
        let mut guard = self.try_acquire()?;
        Ok(std::mem::replace(&mut *guard, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let lock = ElementLock::new(5_u32);
        let guard = lock.try_acquire().expect("first");
        assert!(lock.is_busy());
        assert!(matches!(lock.clone().try_acquire(), Err(Error::CaptureBusy)));
        drop(guard);
        assert!(!lock.is_busy());
        assert_eq!(*lock.try_acquire().expect("again"), 5);
    }

    #[test]
    fn replace_returns_previous_element() {
        let lock = ElementLock::new("old");
        assert_eq!(lock.replace("new").expect("replace"), "old");
        assert_eq!(*lock.try_acquire().expect("guard"), "new");
    }

    #[test]
    fn replace_fails_while_held() {
        let lock = ElementLock::new(1);
        let _guard = lock.try_acquire().expect("guard");
        assert!(matches!(lock.replace(2), Err(Error::CaptureBusy)));
    }
}

//! Interrupt-safe cells shared by the application and the CS edge handler.

use core::cell::RefCell;
#[cfg(feature = "async")]
use core::task::Waker;
use critical_section::Mutex;

/// The transport's single exclusion domain.
///
/// A `critical_section::Mutex<RefCell<T>>`: holding it withholds the edge
/// interrupt, so application calls and frame re-arm never interleave.
pub struct ExclusionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> ExclusionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access. Interrupts are withheld meanwhile.
    ///
    /// # Panics
    ///
    /// Panics on re-entrant use from inside `f`.
    #[inline]
    pub fn lock<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Like [`lock`](Self::lock), but `None` if the cell is already borrowed.
    #[inline]
    pub fn try_lock<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }

    /// Run `f` with shared access.
    #[inline]
    pub fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        critical_section::with(|cs| {
            let value = self.inner.borrow_ref(cs);
            f(&value)
        })
    }
}

// SAFETY: every access goes through a critical section.
unsafe impl<T: Send> Sync for ExclusionCell<T> {}

/// Waker slot filled by `receive_async`, emptied by the edge handler.
#[cfg(feature = "async")]
pub struct AtomicWaker {
    waker: ExclusionCell<Option<Waker>>,
}

#[cfg(feature = "async")]
impl AtomicWaker {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            waker: ExclusionCell::new(None),
        }
    }

    /// Store `waker`, replacing a previous one unless it wakes the same task.
    pub fn register(&self, waker: &Waker) {
        self.waker.lock(|slot| match slot {
            Some(existing) if existing.will_wake(waker) => {}
            _ => *slot = Some(waker.clone()),
        });
    }

    /// Wake and clear the stored waker, if any.
    #[inline]
    pub fn wake(&self) {
        if let Some(w) = self.waker.lock(Option::take) {
            w.wake();
        }
    }

    /// Check if a waker is registered.
    pub fn is_registered(&self) -> bool {
        self.waker.read(Option::is_some)
    }
}

#[cfg(feature = "async")]
impl Default for AtomicWaker {
    fn default() -> Self {
        Self::new()
    }
}

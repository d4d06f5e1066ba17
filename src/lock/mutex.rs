//! An emulated mutex.

use core::cell::Cell;
use core::ffi::c_int;
use core::fmt;

const FREE: c_int = 0;
const HELD: c_int = 1;

/// A mutex that can never be contended.
///
/// With one thread there is nobody to wait for, so this is just a flag that records
/// whether the mutex is held. Locking never blocks, not even when the mutex is already
/// held, and unlocking always succeeds.
///
/// The layout is that of a C `int` holding `0` when free, so a zeroed
/// `pthread_mutex_t` is a valid, free `Mutex`.
#[repr(transparent)]
pub struct Mutex {
    /// Either `FREE` or `HELD`.
    state: Cell<c_int>,
}

impl Mutex {
    /// Create a new, free mutex.
    pub const fn new() -> Mutex {
        Mutex {
            state: Cell::new(FREE),
        }
    }

    /// Create a new, free mutex from a set of attributes.
    ///
    /// The attributes make no difference: recursive and non-recursive mutexes cannot be
    /// told apart without a second thread.
    pub fn with_attr(attr: &MutexAttr) -> Mutex {
        trace!(kind = ?attr.kind(), "ignoring mutex attributes");
        let _ = attr;
        Mutex::new()
    }

    /// Lock the mutex. This never blocks.
    pub fn lock(&self) {
        self.state.set(HELD);
    }

    /// Try to lock the mutex. This always succeeds.
    pub fn try_lock(&self) -> bool {
        self.lock();
        true
    }

    /// Lock the mutex and get a guard that unlocks it when dropped.
    pub fn lock_guard(&self) -> MutexGuard<'_> {
        self.lock();
        MutexGuard { mutex: self }
    }

    /// Unlock the mutex.
    pub fn unlock(&self) {
        self.state.set(FREE);
    }

    /// Is the mutex held?
    pub fn is_locked(&self) -> bool {
        self.state.get() == HELD
    }

    /// Destroy the mutex. Nothing needs releasing, so this is the same as dropping it.
    pub fn destroy(self) {}
}

impl Default for Mutex {
    fn default() -> Mutex {
        Mutex::new()
    }
}

impl fmt::Debug for Mutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex")
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// A guard that unlocks the mutex when dropped.
#[must_use = "if unused the mutex will immediately unlock"]
pub struct MutexGuard<'a> {
    /// The origin mutex.
    mutex: &'a Mutex,
}

impl<'a> MutexGuard<'a> {
    /// The mutex this guard holds.
    pub fn mutex(&self) -> &'a Mutex {
        self.mutex
    }
}

impl Drop for MutexGuard<'_> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}

/// The behaviour a mutex was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MutexKind {
    /// The platform default.
    #[default]
    Default,

    /// Relocking from the owning thread deadlocks.
    Normal,

    /// Relocking from the owning thread succeeds.
    Recursive,

    /// Relocking from the owning thread reports an error.
    ErrorCheck,
}

/// Attributes for a new mutex.
///
/// The requested kind is kept so that it can be read back, but every kind behaves the
/// same way here.
#[derive(Debug, Clone, Default)]
pub struct MutexAttr {
    kind: MutexKind,
}

impl MutexAttr {
    /// Create the default attributes.
    pub fn new() -> MutexAttr {
        MutexAttr::default()
    }

    /// Ask for a kind of mutex.
    pub fn set_kind(&mut self, kind: MutexKind) {
        self.kind = kind;
    }

    /// The kind of mutex that was asked for.
    pub fn kind(&self) -> MutexKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_unlock() {
        let mutex = Mutex::new();
        assert!(!mutex.is_locked());

        mutex.lock();
        assert!(mutex.is_locked());

        mutex.unlock();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_relock_does_not_block() {
        let mutex = Mutex::new();
        for _ in 0..1000 {
            mutex.lock();
        }
        assert!(mutex.try_lock());
        assert!(mutex.is_locked());

        // Extra unlocks are harmless too.
        mutex.unlock();
        mutex.unlock();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_guard() {
        let mutex = Mutex::new();
        {
            let guard = mutex.lock_guard();
            assert!(guard.mutex().is_locked());
        }
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_attr_ignored() {
        let mut attr = MutexAttr::new();
        assert_eq!(attr.kind(), MutexKind::Default);
        attr.set_kind(MutexKind::Recursive);
        assert_eq!(attr.kind(), MutexKind::Recursive);

        let mutex = Mutex::with_attr(&attr);
        mutex.lock();
        mutex.lock();
        mutex.unlock();
        assert!(!mutex.is_locked());
        mutex.destroy();
    }
}

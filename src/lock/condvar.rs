// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `unthread`.
//
// `unthread` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `unthread` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `unthread`. If not, see <https://www.gnu.org/licenses/>.

//! An emulated condition variable.

use super::{Mutex, MutexGuard};
use crate::Status;

use core::cell::Cell;
use core::ffi::c_int;
use core::fmt;
use core::time::Duration;

/// A condition variable that nobody else can signal.
///
/// # Spurious wakeups
///
/// A wait can only end when another thread signals, and there is no other thread. So
/// instead of hanging forever, [`wait`] returns immediately, exactly as if it had woken
/// up spuriously. Callers that follow the usual rule of re-checking their predicate in
/// a loop stay correct *as long as the predicate is already true*, or is made true by
/// the loop itself.
///
/// Code that relies on `wait` actually sleeping until another thread changes something
/// will see it return early, every time. A predicate loop around such a `wait` never
/// terminates. That is a limit of running a concurrent algorithm without concurrency,
/// and this type makes no attempt to paper over it by polling.
///
/// [`wait_timeout`] never sleeps either. It reports a timeout, so callers can tell "the
/// condition held" apart from "time ran out".
///
/// [`wait`]: Condvar::wait
/// [`wait_timeout`]: Condvar::wait_timeout
#[repr(transparent)]
pub struct Condvar {
    /// Keeps the layout of a C `int`; never read.
    _reserved: Cell<c_int>,
}

impl Condvar {
    /// Create a new condition variable.
    pub const fn new() -> Condvar {
        Condvar {
            _reserved: Cell::new(0),
        }
    }

    /// Create a new condition variable from a set of attributes, which are ignored.
    pub fn with_attr(attr: &CondvarAttr) -> Condvar {
        let _ = attr;
        Condvar::new()
    }

    /// Wake up one waiter. There are none.
    pub fn notify_one(&self) {}

    /// Wake up every waiter. There are none.
    pub fn notify_all(&self) {}

    /// Wait on this condition variable.
    ///
    /// Returns immediately, as a spurious wakeup. The mutex is held when this returns,
    /// as it would be after a real wait.
    pub fn wait(&self, mutex: &Mutex) {
        trace!("condvar wait woke up spuriously");

        // A real wait releases the mutex and takes it back before returning.
        mutex.unlock();
        mutex.lock();
    }

    /// Wait on this condition variable with a guard.
    ///
    /// See [`wait`](Condvar::wait).
    pub fn wait_guard<'a>(&self, guard: MutexGuard<'a>) -> MutexGuard<'a> {
        self.wait(guard.mutex());
        guard
    }

    /// Wait on this condition variable for at most `timeout`.
    ///
    /// This never sleeps and always reports that it timed out.
    pub fn wait_timeout(&self, mutex: &Mutex, timeout: Duration) -> WaitTimeoutResult {
        trace!(?timeout, "condvar wait timed out immediately");
        let _ = timeout;

        mutex.unlock();
        mutex.lock();

        WaitTimeoutResult(true)
    }

    /// Wait on this condition variable until `deadline`.
    ///
    /// Like [`wait_timeout`](Condvar::wait_timeout), this reports a timeout right away.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn wait_deadline(&self, mutex: &Mutex, deadline: std::time::Instant) -> WaitTimeoutResult {
        let timeout = deadline.saturating_duration_since(std::time::Instant::now());
        self.wait_timeout(mutex, timeout)
    }

    /// Destroy the condition variable. This is the same as dropping it.
    pub fn destroy(self) {}
}

impl Default for Condvar {
    fn default() -> Condvar {
        Condvar::new()
    }
}

impl fmt::Debug for Condvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condvar { .. }")
    }
}

/// Attributes for a new condition variable. There is nothing to set.
#[derive(Debug, Clone, Default)]
pub struct CondvarAttr {
    _private: (),
}

impl CondvarAttr {
    /// Create the default attributes.
    pub fn new() -> CondvarAttr {
        CondvarAttr::default()
    }
}

/// Why a timed wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeoutResult(bool);

impl WaitTimeoutResult {
    /// Did the wait run out of time?
    pub fn timed_out(&self) -> bool {
        self.0
    }

    /// The outcome as a [`Status`].
    pub fn status(&self) -> Status {
        if self.0 {
            Status::TimedOut
        } else {
            Status::Success
        }
    }
}

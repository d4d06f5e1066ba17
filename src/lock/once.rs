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

//! Run a routine exactly once.

use core::cell::Cell;
use core::ffi::c_int;
use core::fmt;
use core::mem;

const NOT_RUN: c_int = 0;
const RUNNING: c_int = 1;
const DONE: c_int = 2;

/// Where a [`Once`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnceState {
    /// The routine has not been run.
    NotRun,

    /// The routine is running right now.
    Running,

    /// The routine has run.
    Done,
}

/// A token that runs a routine exactly once.
///
/// Unlike the other primitives in this crate, nothing is lost here: every call happens
/// on the same thread, so no two callers can both see the token as not run.
///
/// The layout is that of a C `int` holding `0` before the first run, so a
/// `pthread_once_t` set to `PTHREAD_ONCE_INIT` is a valid `Once`.
#[repr(transparent)]
pub struct Once {
    /// One of `NOT_RUN`, `RUNNING` or `DONE`.
    state: Cell<c_int>,
}

impl Once {
    /// Create a token that has not run yet.
    pub const fn new() -> Once {
        Once {
            state: Cell::new(NOT_RUN),
        }
    }

    /// Run `f` if this is the first call on this token.
    ///
    /// Later calls do nothing. If `f` panics, the token goes back to not run and the
    /// next call tries again. If `f` calls back into this same token, that inner call
    /// returns without doing anything.
    pub fn call_once<F: FnOnce()>(&self, f: F) {
        // Fast path: already done.
        if self.state.get() == DONE {
            return;
        }

        self.call_once_slow(f);
    }

    #[cold]
    fn call_once_slow<F: FnOnce()>(&self, f: F) {
        struct ResetOnUnwind<'a> {
            once: &'a Once,
        }

        impl Drop for ResetOnUnwind<'_> {
            fn drop(&mut self) {
                self.once.state.set(NOT_RUN);
            }
        }

        if self.state.replace(RUNNING) == RUNNING {
            // We are inside our own routine. Waiting for it would never end.
            trace!("once token re-entered while running");
            return;
        }

        let guard = ResetOnUnwind { once: self };
        f();
        mem::forget(guard);

        self.state.set(DONE);
    }

    /// Where this token is in its life.
    pub fn state(&self) -> OnceState {
        match self.state.get() {
            NOT_RUN => OnceState::NotRun,
            RUNNING => OnceState::Running,
            _ => OnceState::Done,
        }
    }

    /// Has the routine run?
    pub fn is_completed(&self) -> bool {
        self.state.get() == DONE
    }
}

impl Default for Once {
    fn default() -> Once {
        Once::new()
    }
}

impl fmt::Debug for Once {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Once")
            .field("state", &self.state())
            .finish()
    }
}

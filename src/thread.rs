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

//! Emulated threads.
//!
//! There is only ever one thread: the caller's. [`spawn`] runs its routine right there,
//! before returning, so "spawn a worker, do something else, then join" turns into "do
//! the worker's job, do something else, then join". That ordering is still correct for
//! any program that does not rely on the two overlapping.
//!
//! A routine that waits for something only a *different* thread would do is not
//! supported. With no other thread to make progress, that wait never ends the way the
//! routine expects.

use core::future::{self, IntoFuture, Ready};
use core::num::NonZeroUsize;

/// The identifier of the only thread there is.
const CURRENT_ID: u64 = 0;

/// An opaque handle to a thread of execution.
///
/// Every handle denotes the calling thread. It owns nothing and needs no cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadHandle {
    id: u64,
}

impl ThreadHandle {
    /// The numeric identifier of this thread.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Get a handle to the calling thread.
pub fn current() -> ThreadHandle {
    ThreadHandle { id: CURRENT_ID }
}

/// Attributes for a new thread.
///
/// These are accepted so callers that configure their threads keep working, but they
/// have nothing to configure: the routine runs on the caller's stack.
#[derive(Debug, Clone, Default)]
pub struct ThreadAttr {
    /// The requested stack size.
    stack_size: Option<usize>,
}

impl ThreadAttr {
    /// Create a default set of attributes.
    pub fn new() -> ThreadAttr {
        ThreadAttr::default()
    }

    /// Request a stack size. It is recorded and otherwise ignored.
    pub fn stack_size(mut self, size: usize) -> ThreadAttr {
        self.stack_size = Some(size);
        self
    }

    /// The stack size that was requested, if any.
    pub fn requested_stack_size(&self) -> Option<usize> {
        self.stack_size
    }

    /// Spawn a routine with these attributes.
    ///
    /// See [`spawn`].
    pub fn spawn<F, T>(self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T,
    {
        trace!(stack_size = ?self.stack_size, "ignoring thread attributes");
        spawn(f)
    }
}

/// Spawn a new "thread".
///
/// The routine runs to completion on the caller's stack before this function returns;
/// the handle that comes back is already finished. If the routine panics, the panic
/// unwinds straight through this call.
///
/// # Unsupported
///
/// The routine must not wait for work that some other thread is supposed to do. That
/// other thread either has not been spawned yet or has already finished.
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T,
{
    trace!("running spawned routine inline");
    let value = f();

    JoinHandle {
        thread: current(),
        value,
    }
}

/// A handle to a routine that has already run.
#[derive(Debug)]
#[must_use = "dropping a `JoinHandle` discards the routine's result"]
pub struct JoinHandle<T> {
    /// The thread that ran the routine.
    thread: ThreadHandle,

    /// What the routine returned.
    value: T,
}

impl<T> JoinHandle<T> {
    /// The thread that ran the routine.
    pub fn thread(&self) -> &ThreadHandle {
        &self.thread
    }

    /// Has the routine finished? Always `true`.
    pub fn is_finished(&self) -> bool {
        true
    }

    /// Wait for the routine to finish and get its result.
    ///
    /// This never waits; the routine finished inside [`spawn`].
    pub fn join(self) -> T {
        self.value
    }
}

impl<T> IntoFuture for JoinHandle<T> {
    type Output = T;
    type IntoFuture = Ready<T>;

    fn into_future(self) -> Ready<T> {
        future::ready(self.join())
    }
}

/// The number of threads that can make progress at once. Always one.
pub fn available_parallelism() -> NonZeroUsize {
    // SAFETY: 1 is not zero.
    unsafe { NonZeroUsize::new_unchecked(1) }
}

/// Give other threads a chance to run. There are none, so this returns immediately.
pub fn yield_now() {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use futures_lite::future;

    #[test]
    fn test_spawn_runs_before_returning() {
        let runs = Cell::new(0);
        let handle = spawn(|| runs.set(runs.get() + 1));

        assert_eq!(runs.get(), 1);
        assert!(handle.is_finished());

        handle.join();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_spawn_with_argument() {
        fn square(x: u32) -> u32 {
            x * x
        }

        let arg = 12;
        let handle = spawn(move || square(arg));
        assert_eq!(handle.join(), 144);
    }

    #[test]
    fn test_handle_is_current_thread() {
        let handle = spawn(current);
        assert_eq!(*handle.thread(), current());
        assert_eq!(handle.join(), current());
        assert_eq!(current().id(), 0);
    }

    #[test]
    fn test_spawn_then_work_is_sequential() {
        let log = RefCell::new(Vec::new());

        let worker = spawn(|| log.borrow_mut().push("worker"));
        log.borrow_mut().push("main");
        worker.join();
        log.borrow_mut().push("joined");

        assert_eq!(*log.borrow(), ["worker", "main", "joined"]);
    }

    #[test]
    fn test_nested_spawn() {
        let log = RefCell::new(Vec::new());

        let outer = spawn(|| {
            log.borrow_mut().push(1);
            let inner = spawn(|| log.borrow_mut().push(2));
            log.borrow_mut().push(3);
            inner.join();
            4
        });

        log.borrow_mut().push(outer.join());
        assert_eq!(*log.borrow(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_attr_is_ignored() {
        let attr = ThreadAttr::new().stack_size(1 << 20);
        assert_eq!(attr.requested_stack_size(), Some(1 << 20));

        let handle = attr.spawn(|| "done");
        assert_eq!(handle.join(), "done");
    }

    #[test]
    fn test_await_handle() {
        let handle = spawn(|| 7);
        assert_eq!(future::block_on(async { handle.await }), 7);

        let handle = spawn(|| 8);
        assert_eq!(
            future::block_on(future::poll_once(handle.into_future())),
            Some(8)
        );
    }

    #[test]
    fn test_parallelism() {
        assert_eq!(available_parallelism().get(), 1);
        yield_now();
    }
}

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

//! The C interface.
//!
//! These functions have the names, signatures and return codes of `<pthread.h>` and
//! C23 `<stdbit.h>`, so C code written against them builds unchanged. They forward to
//! the Rust primitives in [`thread`](crate::thread), [`lock`](crate::lock) and
//! [`bits`](crate::bits); the C objects are laid out so that a `pthread_mutex_t` *is* a
//! [`Mutex`], a `pthread_once_t` *is* a [`Once`], and so on.
//!
//! Null object pointers are tolerated and treated as a successful no-op. A null routine
//! cannot be called, so `pthread_create` and `pthread_once` return `EINVAL` for one.
//!
//! With the `export-symbols` feature, on wasm targets, the functions are exported
//! unmangled so that they satisfy the C linker in place of a real pthread library. On
//! any other target that would replace the host's own threads, so the feature does
//! nothing there.

#![allow(non_camel_case_types)]

use crate::bits;
use crate::lock::{Condvar, Mutex, Once};
use crate::status::{EINVAL, ETIMEDOUT};
use crate::thread;

use core::ffi::{c_int, c_uint, c_ulong, c_ulonglong, c_void};
use core::ptr;
use core::time::Duration;

/// A thread handle. Always `0`, the calling thread.
pub type pthread_t = c_ulong;

/// A mutex; `0` is free.
pub type pthread_mutex_t = c_int;

/// A condition variable.
pub type pthread_cond_t = c_int;

/// A once token; `0` has not run.
pub type pthread_once_t = c_int;

/// Thread attributes, ignored.
pub type pthread_attr_t = *mut c_void;

/// Mutex attributes, ignored.
pub type pthread_mutexattr_t = *mut c_void;

/// Condition variable attributes, ignored.
pub type pthread_condattr_t = *mut c_void;

pub const PTHREAD_MUTEX_INITIALIZER: pthread_mutex_t = 0;
pub const PTHREAD_COND_INITIALIZER: pthread_cond_t = 0;
pub const PTHREAD_ONCE_INIT: pthread_once_t = 0;

pub const PTHREAD_MUTEX_NORMAL: c_int = 0;
pub const PTHREAD_MUTEX_RECURSIVE: c_int = 1;
pub const PTHREAD_MUTEX_ERRORCHECK: c_int = 2;
pub const PTHREAD_MUTEX_DEFAULT: c_int = PTHREAD_MUTEX_NORMAL;

/// The entry point of a thread.
pub type StartRoutine = unsafe extern "C" fn(*mut c_void) -> *mut c_void;

/// The routine guarded by a once token.
pub type InitRoutine = unsafe extern "C" fn();

// Layout checks for the casts below.
const _: () = assert!(core::mem::size_of::<Mutex>() == core::mem::size_of::<pthread_mutex_t>());
const _: () = assert!(core::mem::size_of::<Condvar>() == core::mem::size_of::<pthread_cond_t>());
const _: () = assert!(core::mem::size_of::<Once>() == core::mem::size_of::<pthread_once_t>());

unsafe fn mutex<'a>(ptr: *mut pthread_mutex_t) -> Option<&'a Mutex> {
    ptr.cast::<Mutex>().as_ref()
}

unsafe fn condvar<'a>(ptr: *mut pthread_cond_t) -> Option<&'a Condvar> {
    ptr.cast::<Condvar>().as_ref()
}

// -- Threads

/// Run `start_routine(arg)` to completion and store the calling thread's handle.
///
/// # Safety
///
/// `thread` must be null or valid for writes, and `start_routine` must be safe to call
/// with `arg`.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_create(
    thread: *mut pthread_t,
    attr: *const pthread_attr_t,
    start_routine: Option<StartRoutine>,
    arg: *mut c_void,
) -> c_int {
    let _ = attr;
    let start_routine = match start_routine {
        Some(start_routine) => start_routine,
        None => return EINVAL,
    };

    let handle = thread::spawn(|| start_routine(arg));
    if let Some(thread) = thread.as_mut() {
        *thread = handle.thread().id() as pthread_t;
    }

    // There is nowhere to keep the result for `pthread_join`.
    let _ = handle.join();
    0
}

/// Join a thread. It has already finished; `*retval` is set to null.
///
/// # Safety
///
/// `retval` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_join(thread: pthread_t, retval: *mut *mut c_void) -> c_int {
    let _ = thread;
    if let Some(retval) = retval.as_mut() {
        *retval = ptr::null_mut();
    }
    0
}

/// Detach a thread. It has already finished.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_detach(thread: pthread_t) -> c_int {
    let _ = thread;
    0
}

/// The calling thread's handle.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_self() -> pthread_t {
    thread::current().id() as pthread_t
}

/// Nonzero if both handles are the same thread.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_equal(a: pthread_t, b: pthread_t) -> c_int {
    (a == b) as c_int
}

/// # Safety
///
/// `attr` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_attr_init(attr: *mut pthread_attr_t) -> c_int {
    if let Some(attr) = attr.as_mut() {
        *attr = ptr::null_mut();
    }
    0
}

#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_attr_destroy(attr: *mut pthread_attr_t) -> c_int {
    let _ = attr;
    0
}

// -- Mutexes

/// Initialize a mutex to free. The attributes are ignored.
///
/// # Safety
///
/// `m` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_mutex_init(
    m: *mut pthread_mutex_t,
    attr: *const pthread_mutexattr_t,
) -> c_int {
    let _ = attr;
    if !m.is_null() {
        m.cast::<Mutex>().write(Mutex::new());
    }
    0
}

#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_mutex_destroy(m: *mut pthread_mutex_t) -> c_int {
    let _ = m;
    0
}

/// Lock a mutex. Never blocks.
///
/// # Safety
///
/// `m` must be null or point to an initialized mutex.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_mutex_lock(m: *mut pthread_mutex_t) -> c_int {
    if let Some(m) = mutex(m) {
        m.lock();
    }
    0
}

/// Try to lock a mutex. Always succeeds.
///
/// # Safety
///
/// `m` must be null or point to an initialized mutex.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_mutex_trylock(m: *mut pthread_mutex_t) -> c_int {
    if let Some(m) = mutex(m) {
        m.try_lock();
    }
    0
}

/// Unlock a mutex.
///
/// # Safety
///
/// `m` must be null or point to an initialized mutex.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_mutex_unlock(m: *mut pthread_mutex_t) -> c_int {
    if let Some(m) = mutex(m) {
        m.unlock();
    }
    0
}

/// # Safety
///
/// `attr` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_mutexattr_init(attr: *mut pthread_mutexattr_t) -> c_int {
    if let Some(attr) = attr.as_mut() {
        *attr = ptr::null_mut();
    }
    0
}

#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_mutexattr_destroy(attr: *mut pthread_mutexattr_t) -> c_int {
    let _ = attr;
    0
}

/// Accept any mutex type. Recursive and normal mutexes behave the same here.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_mutexattr_settype(attr: *mut pthread_mutexattr_t, kind: c_int) -> c_int {
    let _ = (attr, kind);
    0
}

// -- Condition variables

/// # Safety
///
/// `c` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_cond_init(
    c: *mut pthread_cond_t,
    attr: *const pthread_condattr_t,
) -> c_int {
    let _ = attr;
    if !c.is_null() {
        c.cast::<Condvar>().write(Condvar::new());
    }
    0
}

#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_cond_destroy(c: *mut pthread_cond_t) -> c_int {
    let _ = c;
    0
}

/// # Safety
///
/// `c` must be null or point to an initialized condition variable.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_cond_signal(c: *mut pthread_cond_t) -> c_int {
    if let Some(c) = condvar(c) {
        c.notify_one();
    }
    0
}

/// # Safety
///
/// `c` must be null or point to an initialized condition variable.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_cond_broadcast(c: *mut pthread_cond_t) -> c_int {
    if let Some(c) = condvar(c) {
        c.notify_all();
    }
    0
}

/// Wait on a condition variable. Returns `0` immediately, as a spurious wakeup.
///
/// # Safety
///
/// `c` and `m` must each be null or point to an initialized object.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_cond_wait(c: *mut pthread_cond_t, m: *mut pthread_mutex_t) -> c_int {
    if let (Some(c), Some(m)) = (condvar(c), mutex(m)) {
        c.wait(m);
    }
    0
}

/// Wait on a condition variable until `abstime`. Returns `ETIMEDOUT` immediately.
///
/// # Safety
///
/// `c` and `m` must each be null or point to an initialized object. `abstime` is never
/// read.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_cond_timedwait(
    c: *mut pthread_cond_t,
    m: *mut pthread_mutex_t,
    abstime: *const c_void,
) -> c_int {
    let _ = abstime;
    match (condvar(c), mutex(m)) {
        (Some(c), Some(m)) => c.wait_timeout(m, Duration::ZERO).status().as_errno(),
        _ => ETIMEDOUT,
    }
}

/// # Safety
///
/// `attr` must be null or valid for writes.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_condattr_init(attr: *mut pthread_condattr_t) -> c_int {
    if let Some(attr) = attr.as_mut() {
        *attr = ptr::null_mut();
    }
    0
}

#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub extern "C" fn pthread_condattr_destroy(attr: *mut pthread_condattr_t) -> c_int {
    let _ = attr;
    0
}

// -- Once

/// Run `routine` if `once` has not run it yet.
///
/// # Safety
///
/// `once` must be null or point to a token initialized with `PTHREAD_ONCE_INIT`, and
/// `routine` must be safe to call.
#[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
pub unsafe extern "C" fn pthread_once(
    once: *mut pthread_once_t,
    routine: Option<InitRoutine>,
) -> c_int {
    let routine = match routine {
        Some(routine) => routine,
        None => return EINVAL,
    };

    if let Some(once) = once.cast::<Once>().as_ref() {
        once.call_once(|| routine());
    }
    0
}

// -- stdbit.h

macro_rules! stdbit {
    ($($name:ident => $op:ident($ty:ty);)*) => {$(
        #[cfg_attr(all(feature = "export-symbols", target_family = "wasm"), no_mangle)]
        pub extern "C" fn $name(x: $ty) -> c_uint {
            bits::$op(x) as c_uint
        }
    )*};
}

stdbit! {
    stdc_count_ones_ui => count_ones(c_uint);
    stdc_count_ones_ul => count_ones(c_ulong);
    stdc_count_ones_ull => count_ones(c_ulonglong);
    stdc_trailing_zeros_ui => trailing_zeros(c_uint);
    stdc_trailing_zeros_ul => trailing_zeros(c_ulong);
    stdc_trailing_zeros_ull => trailing_zeros(c_ulonglong);
    stdc_leading_zeros_ui => leading_zeros(c_uint);
    stdc_leading_zeros_ul => leading_zeros(c_ulong);
    stdc_leading_zeros_ull => leading_zeros(c_ulonglong);
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::Cell;

    unsafe extern "C" fn add_one(arg: *mut c_void) -> *mut c_void {
        let counter = &*(arg as *const Cell<u32>);
        counter.set(counter.get() + 1);
        arg
    }

    #[test]
    fn test_create_runs_inline() {
        let counter = Cell::new(0u32);
        let mut handle: pthread_t = 99;

        let rc = unsafe {
            pthread_create(
                &mut handle,
                ptr::null(),
                Some(add_one),
                &counter as *const Cell<u32> as *mut c_void,
            )
        };
        assert_eq!(rc, 0);
        assert_eq!(counter.get(), 1);
        assert_eq!(handle, pthread_self());

        let mut retval = 1usize as *mut c_void;
        assert_eq!(unsafe { pthread_join(handle, &mut retval) }, 0);
        assert!(retval.is_null());
        assert_eq!(counter.get(), 1);

        assert_eq!(pthread_detach(handle), 0);
        assert_ne!(pthread_equal(handle, pthread_self()), 0);
    }

    #[test]
    fn test_create_null_routine() {
        let rc = unsafe { pthread_create(ptr::null_mut(), ptr::null(), None, ptr::null_mut()) };
        assert_eq!(rc, EINVAL);
    }

    #[test]
    fn test_mutex() {
        let mut attr: pthread_mutexattr_t = 1usize as *mut c_void;
        let mut m: pthread_mutex_t = 7;

        unsafe {
            assert_eq!(pthread_mutexattr_init(&mut attr), 0);
            assert_eq!(pthread_mutexattr_settype(&mut attr, PTHREAD_MUTEX_RECURSIVE), 0);
            assert_eq!(pthread_mutex_init(&mut m, &attr), 0);
            assert_eq!(m, PTHREAD_MUTEX_INITIALIZER);
            assert_eq!(pthread_mutexattr_destroy(&mut attr), 0);

            assert_eq!(pthread_mutex_lock(&mut m), 0);
            assert!(mutex(&mut m).unwrap().is_locked());
            assert_eq!(pthread_mutex_lock(&mut m), 0);
            assert_eq!(pthread_mutex_trylock(&mut m), 0);
            assert_eq!(pthread_mutex_unlock(&mut m), 0);
            assert!(!mutex(&mut m).unwrap().is_locked());
            assert_eq!(pthread_mutex_destroy(&mut m), 0);

            assert_eq!(pthread_mutex_lock(ptr::null_mut()), 0);
        }
    }

    #[test]
    fn test_static_mutex_initializer() {
        let mut m = PTHREAD_MUTEX_INITIALIZER;
        unsafe {
            assert!(!mutex(&mut m).unwrap().is_locked());
            assert_eq!(pthread_mutex_lock(&mut m), 0);
            assert_eq!(pthread_mutex_unlock(&mut m), 0);
        }
    }

    #[test]
    fn test_condvar() {
        let mut c = PTHREAD_COND_INITIALIZER;
        let mut m = PTHREAD_MUTEX_INITIALIZER;
        let mut attr: pthread_condattr_t = ptr::null_mut();

        unsafe {
            assert_eq!(pthread_condattr_init(&mut attr), 0);
            assert_eq!(pthread_cond_init(&mut c, &attr), 0);
            assert_eq!(pthread_condattr_destroy(&mut attr), 0);

            assert_eq!(pthread_mutex_lock(&mut m), 0);
            assert_eq!(pthread_cond_signal(&mut c), 0);
            assert_eq!(pthread_cond_broadcast(&mut c), 0);
            assert_eq!(pthread_cond_wait(&mut c, &mut m), 0);
            assert!(mutex(&mut m).unwrap().is_locked());

            assert_eq!(pthread_cond_timedwait(&mut c, &mut m, ptr::null()), ETIMEDOUT);
            assert_eq!(
                pthread_cond_timedwait(ptr::null_mut(), ptr::null_mut(), ptr::null()),
                ETIMEDOUT
            );
            assert_eq!(pthread_mutex_unlock(&mut m), 0);
            assert_eq!(pthread_cond_destroy(&mut c), 0);
        }
    }

    #[test]
    fn test_once() {
        thread_local! {
            static RUNS: Cell<u32> = Cell::new(0);
        }

        unsafe extern "C" fn init() {
            RUNS.with(|runs| runs.set(runs.get() + 1));
        }

        let mut once = PTHREAD_ONCE_INIT;
        for _ in 0..5 {
            assert_eq!(unsafe { pthread_once(&mut once, Some(init)) }, 0);
        }

        assert_eq!(RUNS.with(Cell::get), 1);
        assert_eq!(unsafe { pthread_once(&mut once, None) }, EINVAL);
    }

    #[test]
    fn test_attr() {
        let mut attr: pthread_attr_t = 1usize as *mut c_void;
        unsafe {
            assert_eq!(pthread_attr_init(&mut attr), 0);
        }
        assert!(attr.is_null());
        assert_eq!(pthread_attr_destroy(&mut attr), 0);
    }

    #[test]
    fn test_stdbit() {
        assert_eq!(stdc_count_ones_ui(0), 0);
        assert_eq!(stdc_count_ones_ui(c_uint::MAX), c_uint::BITS);
        assert_eq!(stdc_count_ones_ul(c_ulong::MAX), c_ulong::BITS);
        assert_eq!(stdc_count_ones_ull(c_ulonglong::MAX), 64);

        assert_eq!(stdc_trailing_zeros_ui(1), 0);
        assert_eq!(stdc_trailing_zeros_ul(8), 3);
        assert_eq!(stdc_trailing_zeros_ull(1 << 40), 40);

        assert_eq!(stdc_leading_zeros_ui(1 << (c_uint::BITS - 1)), 0);
        assert_eq!(stdc_leading_zeros_ul(1 << (c_ulong::BITS - 1)), 0);
        assert_eq!(stdc_leading_zeros_ull(1 << 63), 0);
    }
}

//! Threads for hosts without threads.
//!
//! This crate provides the thread, mutex, condition variable and once vocabulary on
//! platforms that only offer a single logical thread of control, such as
//! `wasm32-unknown-emscripten` built without `USE_PTHREADS`. Every operation runs on the
//! caller's own stack and none of them ever block:
//!
//! - [`thread::spawn`] runs the routine inline, before it returns. Joining is free.
//! - [`lock::Mutex`] is a flag. Locking it never blocks, even when it is already held.
//! - [`lock::Condvar`] has no waiters. [`wait`] returns at once, as a spurious wakeup,
//!   and [`wait_timeout`] always reports a timeout.
//! - [`lock::Once`] runs its routine exactly once, just like the real thing.
//!
//! With the `ffi` feature, the `ffi` module exposes the same layer as `pthread_*`
//! functions with the conventional signatures and return codes.
//!
//! # Unsupported patterns
//!
//! Code that needs two threads to actually overlap cannot work here. A spawned routine
//! that waits for a signal only another thread could send will never see it: `wait`
//! wakes up spuriously and, if the caller loops on its predicate, that loop spins
//! forever. Pipelines where each stage runs to completion before the next one starts
//! are fine.
//!
//! [`wait`]: lock::Condvar::wait
//! [`wait_timeout`]: lock::Condvar::wait_timeout

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Emit a trace event when the `tracing` feature is enabled.
macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "unthread", $($arg)*);
    }};
}

pub mod bits;
pub mod lock;
pub mod thread;

#[cfg(feature = "ffi")]
#[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
pub mod ffi;

mod status;

pub use status::Status;

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

//! Outcome codes shared by every primitive.

use core::ffi::c_int;

#[cfg(any(unix, target_os = "wasi"))]
pub(crate) use libc::ETIMEDOUT;
#[cfg(all(feature = "ffi", any(unix, target_os = "wasi")))]
pub(crate) use libc::EINVAL;

// Bare wasm has no libc to take these from. Use the musl values, like emscripten does.
#[cfg(all(feature = "ffi", not(any(unix, target_os = "wasi"))))]
pub(crate) const EINVAL: c_int = 22;
#[cfg(not(any(unix, target_os = "wasi")))]
pub(crate) const ETIMEDOUT: c_int = 110;

/// The outcome of an emulated operation.
///
/// Almost everything succeeds. The only other outcome is a timed wait, which can never
/// be satisfied by another thread and so always runs out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation completed.
    Success,

    /// The operation gave up waiting.
    TimedOut,
}

impl Status {
    /// Did the operation complete?
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// The errno-style code for this outcome: `0`, or the target's `ETIMEDOUT`.
    pub fn as_errno(self) -> c_int {
        match self {
            Status::Success => 0,
            Status::TimedOut => ETIMEDOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno() {
        assert_eq!(Status::Success.as_errno(), 0);
        assert_eq!(Status::TimedOut.as_errno(), ETIMEDOUT);
        assert_ne!(ETIMEDOUT, 0);
    }

    #[test]
    fn test_is_success() {
        assert!(Status::Success.is_success());
        assert!(!Status::TimedOut.is_success());
    }
}

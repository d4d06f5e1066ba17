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

//! Locking primitives that never block.
//!
//! All of these keep their state in a `Cell`, so none of them are `Sync`. They cannot
//! be shared across real threads, even on a host that has them.

mod condvar;
mod mutex;
mod once;
mod once_cell;

pub use condvar::{Condvar, CondvarAttr, WaitTimeoutResult};
pub use mutex::{Mutex, MutexAttr, MutexGuard, MutexKind};
pub use once::{Once, OnceState};
pub use once_cell::OnceCell;

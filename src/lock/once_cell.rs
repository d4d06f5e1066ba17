//! Value that can only be written once.

use core::cell::{Cell, UnsafeCell};
use core::convert::Infallible;
use core::fmt;

/// A value that can only be written once.
pub struct OnceCell<T> {
    /// There is a routine that is writing to the cell.
    writing: Cell<bool>,

    /// The underlying data.
    data: UnsafeCell<Option<T>>,
}

impl<T> OnceCell<T> {
    /// Creates a new `OnceCell`.
    pub const fn new() -> OnceCell<T> {
        OnceCell {
            writing: Cell::new(false),
            data: UnsafeCell::new(None),
        }
    }

    /// Gets the value of the cell mutably.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.data.get_mut().as_mut()
    }

    /// Take the value out of the cell.
    pub fn take(&mut self) -> Option<T> {
        self.data.get_mut().take()
    }

    /// Unwraps the underlying data.
    pub fn into_inner(self) -> Option<T> {
        self.data.into_inner()
    }

    /// Get the value of the cell.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: The data is only written while it is `None`, and no reference into it
        // can exist then.
        unsafe { &*self.data.get() }.as_ref()
    }

    /// Set the value of the cell.
    pub fn set(&self, value: T) -> Result<(), T> {
        let mut value = Some(value);
        self.get_or_init(|| match value.take() {
            Some(value) => value,
            None => unreachable!(),
        });

        match value {
            Some(value) => Err(value),
            None => Ok(()),
        }
    }

    /// Get the value of the cell or try to initialize it.
    ///
    /// If `setter` fails, the cell stays empty and the error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `setter` tries to initialize this same cell. Waiting for ourselves would
    /// never finish.
    pub fn get_or_try_init<E>(&self, setter: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        struct UnwriteOnDrop<'a, T> {
            cell: &'a OnceCell<T>,
        }

        impl<T> Drop for UnwriteOnDrop<'_, T> {
            fn drop(&mut self) {
                self.cell.writing.set(false);
            }
        }

        if let Some(value) = self.get() {
            return Ok(value);
        }

        if self.writing.replace(true) {
            panic!("reentrant initialization of a `OnceCell`");
        }

        let _guard = UnwriteOnDrop { cell: self };
        let data = setter()?;

        // SAFETY: The cell is empty, so nobody holds a reference into it.
        let slot = unsafe { &mut *self.data.get() };
        Ok(slot.insert(data))
    }

    /// Get the value of the cell or initialize it.
    pub fn get_or_init(&self, setter: impl FnOnce() -> T) -> &T {
        match self.get_or_try_init(|| Ok::<T, Infallible>(setter())) {
            Ok(value) => value,
            Err(e) => match e {},
        }
    }
}

impl<T> Default for OnceCell<T> {
    fn default() -> OnceCell<T> {
        OnceCell::new()
    }
}

impl<T> From<T> for OnceCell<T> {
    fn from(value: T) -> OnceCell<T> {
        OnceCell {
            writing: Cell::new(false),
            data: UnsafeCell::new(Some(value)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OnceCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OnceCell").field(&self.get()).finish()
    }
}

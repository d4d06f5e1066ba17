//! Bit counting for unsigned integers.
//!
//! These mirror the C23 `<stdbit.h>` helpers. The width is picked at compile time from
//! the argument's type and each function lowers to the matching compiler intrinsic.
//! Unlike the raw C builtins, a zero argument is fine: it has as many trailing and
//! leading zeros as the type has bits.

use __private::Sealed;

/// An unsigned integer whose bits can be counted.
pub trait StdBit: Copy + Sealed {
    /// The width of the type, in bits.
    const BITS: u32;

    /// The number of one bits.
    fn count_ones(self) -> u32;

    /// The number of zero bits below the lowest one bit.
    fn trailing_zeros(self) -> u32;

    /// The number of zero bits above the highest one bit.
    fn leading_zeros(self) -> u32;
}

macro_rules! impl_std_bit {
    ($($ty:ty),*) => {$(
        impl Sealed for $ty {}

        impl StdBit for $ty {
            const BITS: u32 = <$ty>::BITS;

            #[inline]
            fn count_ones(self) -> u32 {
                <$ty>::count_ones(self)
            }

            #[inline]
            fn trailing_zeros(self) -> u32 {
                <$ty>::trailing_zeros(self)
            }

            #[inline]
            fn leading_zeros(self) -> u32 {
                <$ty>::leading_zeros(self)
            }
        }
    )*};
}

impl_std_bit!(u8, u16, u32, u64, u128, usize);

/// Count the one bits in `x` (population count).
#[inline]
pub fn count_ones<T: StdBit>(x: T) -> u32 {
    x.count_ones()
}

/// Count the zero bits below the lowest one bit of `x`.
#[inline]
pub fn trailing_zeros<T: StdBit>(x: T) -> u32 {
    x.trailing_zeros()
}

/// Count the zero bits above the highest one bit of `x`.
#[inline]
pub fn leading_zeros<T: StdBit>(x: T) -> u32 {
    x.leading_zeros()
}

mod __private {
    #[doc(hidden)]
    pub trait Sealed {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check<T: StdBit + core::ops::Not<Output = T> + core::ops::Shl<u32, Output = T>>(
        zero: T,
        one: T,
    ) {
        assert_eq!(count_ones(zero), 0);
        assert_eq!(count_ones(!zero), T::BITS);
        assert_eq!(trailing_zeros(one), 0);
        assert_eq!(leading_zeros(one << (T::BITS - 1)), 0);
        assert_eq!(trailing_zeros(zero), T::BITS);
        assert_eq!(leading_zeros(zero), T::BITS);
    }

    #[test]
    fn test_widths() {
        check(0u8, 1u8);
        check(0u16, 1u16);
        check(0u32, 1u32);
        check(0u64, 1u64);
        check(0u128, 1u128);
        check(0usize, 1usize);
    }

    #[test]
    fn test_values() {
        assert_eq!(count_ones(0b1011_0000u32), 3);
        assert_eq!(trailing_zeros(0b1011_0000u32), 4);
        assert_eq!(leading_zeros(0b1011_0000u32), 24);
        assert_eq!(leading_zeros(1u64), 63);
        assert_eq!(count_ones(u64::MAX >> 1), 63);
    }
}

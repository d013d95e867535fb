use zerocopy::{FromBytes, Immutable, IntoBytes};

/// Byte order used to encode a multi-byte scalar.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endian {
    /// The byte order of the target. The unsuffixed `read_*` and `write_*` methods use this.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;

    /// The byte order of the target. The unsuffixed `read_*` and `write_*` methods use this.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;

    /// Returns `true` if values in this order can be copied without swapping bytes.
    #[inline(always)]
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Endian::Little, Endian::Little) | (Endian::Big, Endian::Big)
        )
    }
}

/// A fixed-width value that can be moved between memory and a byte buffer.
///
/// The encoded form is the in-memory representation of the value, byte-swapped when the
/// requested order differs from `Endian::NATIVE`. There is no alignment requirement.
///
/// This trait is sealed; it is implemented for the primitive integer and float types.
pub trait Scalar: FromBytes + IntoBytes + Immutable + Copy + private::Sealed {
    /// Number of bytes in the encoded form.
    const WIDTH: usize = core::mem::size_of::<Self>();

    /// Reverses the byte order of the value.
    fn swap_bytes(self) -> Self;

    /// Converts between native order and `order`. The conversion is its own inverse.
    #[inline(always)]
    fn to_order(self, order: Endian) -> Self {
        if order.is_native() {
            self
        } else {
            self.swap_bytes()
        }
    }
}

mod private {
    pub trait Sealed {}
}

macro_rules! int_scalars {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Scalar for $t {
                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::swap_bytes(self)
                }
            }
        )*
    };
}

int_scalars!(u8, i8, u16, i16, u32, i32, u64, i64);

macro_rules! float_scalars {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Scalar for $t {
                // Swapping through the bit pattern keeps NaN payloads intact.
                #[inline(always)]
                fn swap_bytes(self) -> Self {
                    <$t>::from_bits(self.to_bits().swap_bytes())
                }
            }
        )*
    };
}

float_scalars!(f32, f64);

use tracing::debug;
use zerocopy::FromBytes;

use crate::error::{Error, Result};
use crate::scalar::{Endian, Scalar};

/// Reads fixed-width values from a slice of bytes.
///
/// Multi-byte values are decoded from their raw in-memory representation, in little-endian
/// (`_le`), big-endian (`_be`), or the target's native byte order (no suffix). There are no
/// alignment requirements on the input.
///
/// The reader keeps a cursor into `data`. Reads and skips advance the cursor; `seek` moves it
/// to an absolute offset. The cursor never moves past the end of the data.
///
/// The reader latches the first error it reports. After a failure, every operation that moves
/// the cursor returns the same error without doing anything, so a caller can decode a long
/// sequence of fields and check for failure only once at the end:
///
/// ```
/// # use scalar_io::{BinaryReader, Error};
/// let mut r = BinaryReader::new(&[0x01, 0x00, 0x02]);
/// let a = r.read_u16_le();
/// let b = r.read_u32_le();
/// let c = r.read_u8();
/// assert_eq!(a, Ok(1));
/// assert_eq!(b, Err(Error::OutOfBounds));
/// assert_eq!(c, Err(Error::OutOfBounds));
/// assert_eq!(r.position(), 2);
/// ```
///
/// Use `discard_error()` to resume after a failed lookahead, or `reset()` to start over.
#[derive(Clone, Debug, Default)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    error: Option<Error>,
}

macro_rules! read_scalars {
    ($($t:ty => $host:ident, $le:ident, $be:ident;)*) => {
        $(
            #[doc = concat!("Reads a `", stringify!($t), "` in the target's native byte order.")]
            #[inline(always)]
            pub fn $host(&mut self) -> Result<$t> {
                if cfg!(target_endian = "little") {
                    self.$le()
                } else {
                    self.$be()
                }
            }

            #[doc = concat!("Reads a `", stringify!($t), "` in little-endian byte order.")]
            #[inline(always)]
            pub fn $le(&mut self) -> Result<$t> {
                self.read_scalar(Endian::Little)
            }

            #[doc = concat!("Reads a `", stringify!($t), "` in big-endian byte order.")]
            #[inline(always)]
            pub fn $be(&mut self) -> Result<$t> {
                self.read_scalar(Endian::Big)
            }
        )*
    };
}

impl<'a> BinaryReader<'a> {
    /// Constructor. The cursor starts at offset 0.
    ///
    /// To model an absent buffer, pass an empty slice; every read from it will fail with
    /// `Error::OutOfBounds`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            error: None,
        }
    }

    /// Rewinds the cursor to offset 0 and clears any latched error.
    pub fn reset(&mut self) {
        self.position = 0;
        self.error = None;
    }

    /// Clears any latched error without moving the cursor.
    pub fn discard_error(&mut self) {
        self.error = None;
    }

    /// The data being read. This is the entire slice, not just the unread part.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// The offset of the cursor within `buffer()`.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The total length of `buffer()`.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Number of bytes between the cursor and the end of the data.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The bytes between the cursor and the end of the data.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    #[inline(always)]
    fn check(&self) -> Result<()> {
        match self.error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    #[cold]
    fn fail(&mut self, op: &'static str, error: Error) -> Error {
        debug!(op, position = self.position, size = self.data.len(), %error, "reader failed");
        self.error = Some(error);
        error
    }

    /// Computes the end of a `len`-byte range starting at the cursor, if it is in bounds.
    #[inline(always)]
    fn end_of(&self, len: usize) -> Option<usize> {
        self.position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
    }

    /// Advances the cursor by `count` bytes without reading them.
    ///
    /// Fails with `Error::OutOfBounds` if fewer than `count` bytes remain. The cursor does not
    /// move on failure.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.check()?;
        let Some(end) = self.end_of(count) else {
            return Err(self.fail("skip", Error::OutOfBounds));
        };
        self.position = end;
        Ok(())
    }

    /// Skips over one value of type `T` without decoding it.
    #[inline(always)]
    pub fn skip_scalar<T: Scalar>(&mut self) -> Result<()> {
        self.skip(T::WIDTH)
    }

    /// Moves the cursor to the absolute offset `position`.
    ///
    /// Seeking to the end of the data is allowed. Seeking past it fails with
    /// `Error::OutOfBounds`.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.check()?;
        if position > self.data.len() {
            return Err(self.fail("seek", Error::OutOfBounds));
        }
        self.position = position;
        Ok(())
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.check()?;
        let Some(end) = self.end_of(len) else {
            return Err(self.fail("read_bytes", Error::OutOfBounds));
        };
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Fills `dst` with the next `dst.len()` bytes.
    ///
    /// If not enough bytes remain, this fails with `Error::OutOfBounds` and leaves both the
    /// cursor and `dst` unchanged.
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let src = self.read_bytes(dst.len())?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.read_raw("read_cbytes")
    }

    #[inline(always)]
    fn read_raw<T: FromBytes>(&mut self, op: &'static str) -> Result<T> {
        self.check()?;
        match T::read_from_prefix(self.remaining_bytes()) {
            Ok((value, _)) => {
                self.position += core::mem::size_of::<T>();
                Ok(value)
            }
            Err(_) => Err(self.fail(op, Error::OutOfBounds)),
        }
    }

    /// Reads a value of type `T` encoded in the given byte order.
    ///
    /// The unsuffixed and `_le`/`_be` methods all delegate to this.
    #[inline(always)]
    pub fn read_scalar<T: Scalar>(&mut self, order: Endian) -> Result<T> {
        let raw: T = self.read_raw("read_scalar")?;
        Ok(raw.to_order(order))
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_scalar(Endian::NATIVE)
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_scalar(Endian::NATIVE)
    }

    /// Reads a `bool`, encoded as a single byte. Zero is `false`; any other value is `true`.
    #[inline(always)]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    read_scalars! {
        u16 => read_u16, read_u16_le, read_u16_be;
        i16 => read_i16, read_i16_le, read_i16_be;
        u32 => read_u32, read_u32_le, read_u32_be;
        i32 => read_i32, read_i32_le, read_i32_be;
        u64 => read_u64, read_u64_le, read_u64_be;
        i64 => read_i64, read_i64_le, read_i64_be;
        f32 => read_f32, read_f32_le, read_f32_be;
        f64 => read_f64, read_f64_le, read_f64_be;
    }

    /// Searches for `byte`, starting at the cursor, and returns the absolute offset of the
    /// first match.
    ///
    /// The cursor does not move. Returns `Error::Failed` if the byte does not occur in the
    /// remaining data. This function ignores the latched error and never sets it.
    pub fn find(&self, byte: u8) -> Result<usize> {
        self.remaining_bytes()
            .iter()
            .position(|&b| b == byte)
            .map(|i| self.position + i)
            .ok_or(Error::Failed)
    }

    /// Reads `len` bytes and returns them as a `bstr::BStr`, without copying.
    #[cfg(feature = "bstr")]
    pub fn read_bstr(&mut self, len: usize) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.read_bytes(len)?))
    }
}

/// Reads up to `buf.len()` bytes. A latched error is reported as an `std::io::Error`;
/// reaching the end of the data is not an error and returns `Ok(0)`.
#[cfg(feature = "std")]
impl std::io::Read for BinaryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.remaining());
        let src = self.read_bytes(n)?;
        buf[..n].copy_from_slice(src);
        Ok(n)
    }
}

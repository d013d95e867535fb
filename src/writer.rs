extern crate alloc;
use alloc::vec::Vec;

use tracing::debug;
use zerocopy::IntoBytes;

use crate::error::{Error, Result};
use crate::scalar::{Endian, Scalar};
use crate::storage::{Fixed, Growable, GrowthPolicy, Storage};

/// Encodes fixed-width values into a byte buffer.
///
/// The buffer is either borrowed from the caller with a fixed capacity (`BinaryWriter::fixed`)
/// or owned by the writer and grown as needed (`BinaryWriter::new`). Multi-byte values are
/// written using their raw in-memory representation, in little-endian (`_le`), big-endian
/// (`_be`), or the target's native byte order (no suffix).
///
/// The writer keeps two offsets: `position`, where the next write goes, and `written`, the
/// furthest offset ever written. `seek` can move `position` back to overwrite earlier bytes,
/// but never past `written`, so the writer cannot leave a gap of bytes that were never written.
///
/// Like `BinaryReader`, the writer latches the first error it reports. Every later operation
/// returns the same error and does nothing until `discard_error()` or `reset()` is called.
#[derive(Debug)]
pub struct BinaryWriter<S = Growable> {
    storage: S,
    position: usize,
    written: usize,
    error: Option<Error>,
}

macro_rules! write_scalars {
    ($($t:ty => $host:ident, $le:ident, $be:ident;)*) => {
        $(
            #[doc = concat!("Writes a `", stringify!($t), "` in the target's native byte order.")]
            #[inline(always)]
            pub fn $host(&mut self, value: $t) -> Result<()> {
                if cfg!(target_endian = "little") {
                    self.$le(value)
                } else {
                    self.$be(value)
                }
            }

            #[doc = concat!("Writes a `", stringify!($t), "` in little-endian byte order.")]
            #[inline(always)]
            pub fn $le(&mut self, value: $t) -> Result<()> {
                self.write_scalar(value, Endian::Little)
            }

            #[doc = concat!("Writes a `", stringify!($t), "` in big-endian byte order.")]
            #[inline(always)]
            pub fn $be(&mut self, value: $t) -> Result<()> {
                self.write_scalar(value, Endian::Big)
            }
        )*
    };
}

impl<'a> BinaryWriter<Fixed<'a>> {
    /// Creates a writer over a caller-owned buffer. The writer never grows or releases it;
    /// writes that do not fit fail with `Error::OutOfMemory`.
    pub fn fixed(buf: &'a mut [u8]) -> Self {
        Self::wrap(Fixed(buf))
    }
}

impl BinaryWriter<Growable> {
    /// Creates a writer over an owned, empty buffer. Nothing is allocated until the first write.
    pub fn new() -> Self {
        Self::wrap(Growable::new(GrowthPolicy::default()))
    }

    /// Creates a writer over an owned buffer with `capacity` bytes allocated up front.
    ///
    /// Fails with `Error::OutOfMemory` if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Self::with_policy(capacity, GrowthPolicy::default())
    }

    /// Creates a writer over an owned buffer with `capacity` bytes allocated up front, which
    /// grows according to `policy`.
    pub fn with_policy(capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        match Growable::try_with_capacity(capacity, policy) {
            Ok(storage) => Ok(Self::wrap(storage)),
            Err(e) => {
                debug!(capacity, "initial allocation failed");
                Err(e)
            }
        }
    }

    /// Extracts the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        let mut v = self.storage.into_vec();
        v.truncate(self.written);
        v
    }
}

impl Default for BinaryWriter<Growable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> BinaryWriter<S> {
    /// Creates a writer over `storage`, starting at offset 0.
    pub fn wrap(storage: S) -> Self {
        Self {
            storage,
            position: 0,
            written: 0,
            error: None,
        }
    }

    /// Extracts the storage. Only the first `written()` bytes of it hold data.
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Releases the buffer if the writer owns one. The writer is left empty and can be
    /// written to again.
    ///
    /// This does nothing for a writer over a caller-owned buffer, and it is safe to call more
    /// than once. Dropping the writer also releases the buffer.
    pub fn destroy(&mut self) {
        if S::OWNS_BUFFER && self.storage.capacity() != 0 {
            self.storage.release();
            self.position = 0;
            self.written = 0;
        }
    }

    /// Sets `position` and `written` to 0 and clears any latched error.
    ///
    /// The capacity and the bytes in the buffer are unchanged.
    pub fn reset(&mut self) {
        self.position = 0;
        self.written = 0;
        self.error = None;
    }

    /// Clears any latched error without moving the cursor.
    pub fn discard_error(&mut self) {
        self.error = None;
    }

    /// The entire buffer, including bytes past `written()`.
    pub fn buffer(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// The bytes written so far, up to the high-water mark.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.written]
    }

    /// The written bytes as a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn as_bstr(&self) -> &bstr::BStr {
        bstr::BStr::new(self.as_bytes())
    }

    /// The offset where the next write goes.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The high-water mark: the furthest offset ever written.
    pub fn written(&self) -> usize {
        self.written
    }

    /// The size of the buffer.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Whether the writer owns its buffer.
    pub fn owns_buffer(&self) -> bool {
        S::OWNS_BUFFER
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
        debug!(
            op,
            position = self.position,
            written = self.written,
            capacity = self.storage.capacity(),
            %error,
            "writer failed"
        );
        self.error = Some(error);
        error
    }

    /// Moves the cursor to the absolute offset `position`.
    ///
    /// Fails with `Error::OutOfBounds` if `position` is past `written()`.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.check()?;
        if position > self.written {
            return Err(self.fail("seek", Error::OutOfBounds));
        }
        self.position = position;
        Ok(())
    }

    /// Reserves `count` bytes at the cursor and returns them for the caller to fill in.
    ///
    /// The cursor advances by `count`, and `written` is raised if the cursor passes it. An owned
    /// buffer grows if needed. If the space cannot be provided, this fails with
    /// `Error::OutOfMemory` and nothing changes: the buffer, its contents, `position` and
    /// `written` are all as they were.
    ///
    /// The returned bytes may hold stale data from an earlier write.
    pub fn reserve(&mut self, count: usize) -> Result<&mut [u8]> {
        self.check()?;
        let Some(end) = self.position.checked_add(count) else {
            return Err(self.fail("reserve", Error::OutOfMemory));
        };
        if end > self.storage.capacity() {
            if let Err(e) = self.storage.grow(end, count) {
                return Err(self.fail("reserve", e));
            }
            if end > self.storage.capacity() {
                return Err(self.fail("reserve", Error::OutOfMemory));
            }
        }
        let start = self.position;
        self.position = end;
        if end > self.written {
            self.written = end;
        }
        Ok(&mut self.storage.bytes_mut()[start..end])
    }

    /// Writes `count` copies of `value`.
    pub fn fill(&mut self, value: u8, count: usize) -> Result<()> {
        self.reserve(count)?.fill(value);
        Ok(())
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Writes a small, fixed-size array of bytes.
    #[inline(always)]
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes `value` encoded in the given byte order.
    ///
    /// The unsuffixed and `_le`/`_be` methods all delegate to this.
    #[inline(always)]
    pub fn write_scalar<T: Scalar>(&mut self, value: T, order: Endian) -> Result<()> {
        let value = value.to_order(order);
        self.write_bytes(value.as_bytes())
    }

    /// Writes a single `u8` value
    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_scalar(value, Endian::NATIVE)
    }

    /// Writes a single `i8` value
    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_scalar(value, Endian::NATIVE)
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    write_scalars! {
        u16 => write_u16, write_u16_le, write_u16_be;
        i16 => write_i16, write_i16_le, write_i16_be;
        u32 => write_u32, write_u32_le, write_u32_be;
        i32 => write_i32, write_i32_le, write_i32_be;
        u64 => write_u64, write_u64_le, write_u64_be;
        i64 => write_i64, write_i64_le, write_i64_be;
        f32 => write_f32, write_f32_le, write_f32_be;
        f64 => write_f64, write_f64_le, write_f64_be;
    }
}

/// Writes are all-or-nothing: a write that does not fit fails with an `std::io::Error` and
/// writes nothing.
#[cfg(feature = "std")]
impl<S: Storage> std::io::Write for BinaryWriter<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

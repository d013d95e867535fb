//! Backing storage for `BinaryWriter`.
//!
//! A writer either borrows a fixed-size region from its caller (`Fixed`) or owns a heap buffer
//! that it grows on demand (`Growable`). Both implement `Storage`, so the encoding methods of
//! `BinaryWriter` do not care which one is in use; only the handling of a full buffer differs.

extern crate alloc;
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// The smallest capacity a `Growable` buffer grows from when it is empty.
pub const MIN_GROWTH_BASE: usize = 8;

/// A region of bytes that a `BinaryWriter` writes into.
///
/// The whole of `bytes()` is addressable; the writer tracks separately how much of it has been
/// written.
pub trait Storage {
    /// Whether this storage owns its buffer, and therefore can grow and release it.
    const OWNS_BUFFER: bool;

    /// The entire addressable region.
    fn bytes(&self) -> &[u8];

    /// The entire addressable region.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// The size of the addressable region.
    fn capacity(&self) -> usize {
        self.bytes().len()
    }

    /// Makes at least `required` bytes addressable. `requested` is the size of the write that
    /// triggered the growth.
    ///
    /// Implementations must either succeed completely or leave the storage unchanged, including
    /// the contents of the existing region.
    fn grow(&mut self, required: usize, requested: usize) -> Result<()>;

    /// Releases the buffer, if it is owned. The capacity becomes zero.
    fn release(&mut self) {}
}

/// A caller-owned buffer with a fixed capacity. Writes that do not fit fail with
/// `Error::OutOfMemory`.
#[derive(Debug)]
pub struct Fixed<'a>(pub &'a mut [u8]);

impl<'a> Fixed<'a> {
    /// Extracts the borrowed buffer.
    pub fn into_inner(self) -> &'a mut [u8] {
        self.0
    }
}

impl Storage for Fixed<'_> {
    const OWNS_BUFFER: bool = false;

    fn bytes(&self) -> &[u8] {
        &*self.0
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.0
    }

    fn grow(&mut self, _required: usize, _requested: usize) -> Result<()> {
        Err(Error::OutOfMemory)
    }
}

/// How a `Growable` buffer picks its new capacity when a write does not fit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum GrowthPolicy {
    /// Adds the size of the write, rounded up to a multiple of the pointer width, to the current
    /// capacity (or to `MIN_GROWTH_BASE` if the buffer is empty), then doubles the sum.
    ///
    /// Repeated small writes cost amortized O(1) per byte.
    #[default]
    Doubling,

    /// Grows to exactly the size needed by the write. This minimizes memory use, but each
    /// growth may copy the whole buffer.
    Exact,
}

impl GrowthPolicy {
    /// Computes the capacity to grow to, or `None` if it would overflow `usize`.
    ///
    /// `capacity` is the current capacity, `required` the capacity the write needs, and
    /// `requested` the size of the write.
    pub fn next_capacity(self, capacity: usize, required: usize, requested: usize) -> Option<usize> {
        match self {
            Self::Doubling => {
                let base = if capacity == 0 {
                    MIN_GROWTH_BASE
                } else {
                    capacity
                };
                let align = core::mem::size_of::<usize>();
                let aligned = requested.checked_add(align - 1)? & !(align - 1);
                base.checked_add(aligned)?.checked_mul(2)
            }
            Self::Exact => Some(required),
        }
    }
}

/// A writer-owned heap buffer that grows on demand.
///
/// The whole capacity is initialized (to zero when first allocated), so it can be exposed
/// as a slice.
#[derive(Clone, Debug, Default)]
pub struct Growable {
    buf: Vec<u8>,
    policy: GrowthPolicy,
}

impl Growable {
    /// Creates an empty buffer. Nothing is allocated until the first write.
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            buf: Vec::new(),
            policy,
        }
    }

    /// Creates a buffer with `capacity` bytes allocated up front.
    ///
    /// Fails with `Error::OutOfMemory` if the allocation fails.
    pub fn try_with_capacity(capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        let mut storage = Self::new(policy);
        storage.resize_to(capacity)?;
        Ok(storage)
    }

    /// The growth policy of this buffer.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Extracts the buffer. Its length is the capacity, not the number of bytes written.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    fn resize_to(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity.saturating_sub(self.buf.len());
        self.buf
            .try_reserve_exact(additional)
            .map_err(|_| Error::OutOfMemory)?;
        self.buf.resize(capacity, 0);
        Ok(())
    }
}

impl Storage for Growable {
    const OWNS_BUFFER: bool = true;

    fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn grow(&mut self, required: usize, requested: usize) -> Result<()> {
        let old_capacity = self.buf.len();
        let new_capacity = self
            .policy
            .next_capacity(old_capacity, required, requested)
            .filter(|&c| c >= required)
            .ok_or(Error::OutOfMemory)?;
        trace!(old_capacity, new_capacity, "growing buffer");
        self.resize_to(new_capacity)
    }

    fn release(&mut self) {
        debug!(capacity = self.buf.len(), "releasing buffer");
        self.buf = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = core::mem::size_of::<usize>();

    #[test]
    fn doubling_from_empty() {
        let p = GrowthPolicy::Doubling;
        assert_eq!(p.next_capacity(0, 1, 1), Some((MIN_GROWTH_BASE + W) * 2));
        assert_eq!(p.next_capacity(0, W, W), Some((MIN_GROWTH_BASE + W) * 2));
        assert_eq!(
            p.next_capacity(0, W + 1, W + 1),
            Some((MIN_GROWTH_BASE + 2 * W) * 2)
        );
    }

    #[test]
    fn doubling_from_nonempty() {
        let p = GrowthPolicy::Doubling;
        assert_eq!(p.next_capacity(100, 101, 1), Some((100 + W) * 2));
        assert_eq!(p.next_capacity(100, 100, 0), Some(200));
    }

    #[test]
    fn doubling_overflow() {
        let p = GrowthPolicy::Doubling;
        assert_eq!(p.next_capacity(usize::MAX / 2, usize::MAX, 16), None);
        assert_eq!(p.next_capacity(0, 0, usize::MAX), None);
    }

    #[test]
    fn exact() {
        assert_eq!(GrowthPolicy::Exact.next_capacity(10, 13, 5), Some(13));
    }

    #[test]
    fn fixed_never_grows() {
        let mut buf = [0u8; 4];
        let mut s = Fixed(&mut buf);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.grow(5, 1), Err(Error::OutOfMemory));
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn growable_keeps_contents() {
        let mut s = Growable::try_with_capacity(3, GrowthPolicy::Doubling).unwrap();
        s.bytes_mut().copy_from_slice(&[1, 2, 3]);
        s.grow(4, 1).unwrap();
        assert_eq!(s.capacity(), (3 + W) * 2);
        assert_eq!(&s.bytes()[..3], &[1, 2, 3]);
        assert!(s.bytes()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn growable_overflow_leaves_buffer() {
        let mut s = Growable::try_with_capacity(16, GrowthPolicy::Doubling).unwrap();
        s.bytes_mut()[0] = 0xaa;
        assert_eq!(s.grow(usize::MAX, usize::MAX - 8), Err(Error::OutOfMemory));
        assert_eq!(s.capacity(), 16);
        assert_eq!(s.bytes()[0], 0xaa);
    }

    #[test]
    fn growable_allocation_failure() {
        assert_eq!(
            Growable::try_with_capacity(usize::MAX, GrowthPolicy::Exact).err(),
            Some(Error::OutOfMemory)
        );
    }

    #[test]
    fn release() {
        let mut s = Growable::try_with_capacity(64, GrowthPolicy::Doubling).unwrap();
        s.release();
        assert_eq!(s.capacity(), 0);
        s.release();
        assert_eq!(s.capacity(), 0);
    }
}

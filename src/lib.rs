//! Reads and writes fixed-width scalar values in byte buffers, with explicit control over byte
//! order.
//!
//! `BinaryReader` decodes values from a borrowed slice. `BinaryWriter` encodes values into
//! either a borrowed, fixed-size buffer or an owned buffer that grows on demand. Both keep a
//! cursor, check bounds on every operation, and latch the first error they report so that a
//! caller can run a sequence of operations and check for failure once at the end.
//!
//! Every multi-byte type has three methods on each side: `_le` (little-endian), `_be`
//! (big-endian), and an unsuffixed method that uses the target's native byte order. The
//! encoding is the raw in-memory representation of the value; there are no tags, length
//! prefixes, or variable-length integers. A `bool` is one byte: `0x00` or `0x01` when written,
//! and any non-zero byte reads as `true`.
//!
//! ```
//! use scalar_io::{BinaryReader, BinaryWriter};
//!
//! let mut w = BinaryWriter::new();
//! w.write_u16_be(0x0102).unwrap();
//! w.write_f32_le(1.5).unwrap();
//! w.write_bool(true).unwrap();
//! assert_eq!(w.as_bytes(), [0x01, 0x02, 0x00, 0x00, 0xc0, 0x3f, 0x01]);
//!
//! let mut r = BinaryReader::new(w.as_bytes());
//! assert_eq!(r.read_u16_be(), Ok(0x0102));
//! assert_eq!(r.read_f32_le(), Ok(1.5));
//! assert_eq!(r.read_bool(), Ok(true));
//! assert_eq!(r.remaining(), 0);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod error;
mod reader;
mod scalar;
pub mod storage;
mod writer;


pub use error::{Error, ErrorCode, Result};
pub use reader::BinaryReader;
pub use scalar::{Endian, Scalar};
pub use storage::{Fixed, Growable, GrowthPolicy, Storage};
pub use writer::BinaryWriter;

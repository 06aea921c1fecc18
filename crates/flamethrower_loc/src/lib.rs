//! This library handles reading from and creating the **localization chunks** used by *Frostbite* games.
//!
//! # Localization Chunk Format Documentation
//!
//! In-game text is split over two chunks. The **histogram** is a table of characters, and the
//! **strings binary** holds every string keyed by a hash and encoded as indices into that table. A
//! strings binary can only be decoded with the histogram it was written against.
//!
//! ## Histogram
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x00039001                                        |
//! | 0x0004         | File Size              | 4 bytes: Length of the chunk after this field              |
//! | 0x0008         | Data Offset Size       | 4 bytes: Slot at which the appended tail begins            |
//! | 0x000C         | Slots                  | (File Size - 4) bytes: UTF16 code units, one per slot      |
//!
//! - **Slots `0x00..0x80`**: Mirror ASCII. Bytes in this range are never looked up.
//! - **Slots `0x80..0x100`**: Reached with a single byte. A slot holding a value below `0x80` is a
//!   **shift**: its value moved left by 7 bits is the base of a window of 128 slots.
//! - **Slots from `0x100`**: Reached with a shift byte followed by `0x80` plus the offset into the
//!   shift's window.
//!
//! ## Strings Binary
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x00039000                                        |
//! | 0x0004         | File Size              | 4 bytes: Length of the chunk after this field              |
//! | 0x0008         | List Size              | 4 bytes: Number of hash pairs                              |
//! | 0x000C         | Data Offset            | 4 bytes: Offset of the hash pairs, always 0x8C when written|
//! | 0x0010         | Strings Offset         | 4 bytes: Offset of the encoded strings                     |
//! | 0x0014         | Header                 | Null terminated string, padded up to the hash pairs        |
//!
//! Offsets are counted from the end of the file size field, 8 bytes into the chunk.
//!
//! ### Hash Pairs
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Hash                   | 4 bytes: Key of the string, see [`hash::hash`]          |
//! | 0x0004         | Offset                 | 4 bytes: Offset of the string from the strings offset   |
//!
//! ### Strings
//!
//! Null terminated byte strings, encoded as described in [`codec`].
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Order of operations**: Characters have to be added to the histogram before any string using
//!   them is encoded, as adding characters can move the shifts.
//!

pub mod codec;
pub mod error;
pub mod hash;
pub mod histogram;
#[cfg(feature = "serde")]
mod serde;
pub mod strings;
pub mod table;
pub mod types;

pub use histogram::Histogram;
pub use strings::StringsBinary;
pub use types::StringTable;

//! Base types for the structure of localization chunks.

use binrw::{BinRead, BinWrite};
use derive_more::derive::{Constructor, Deref, DerefMut, IntoIterator};
use indexmap::IndexMap;

/// Magic number opening every histogram chunk
pub const HISTOGRAM_MAGIC: u32 = 0x39001;

/// Magic number opening every strings binary chunk
pub const STRINGS_MAGIC: u32 = 0x39000;

/// Size of the magic number and file size which are not counted by the file size field
pub const CHUNK_PREFIX_SIZE: u32 = 8;

/// Histogram chunk header
///
/// The file size counts every byte after itself, including the data offset size.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little, magic = 0x39001u32)]
pub struct HistogramHeader {
    /// Length of the chunk after the magic number and this field
    pub file_size: u32,

    /// Slot at which the appended tail of the table begins
    pub data_off_size: u32,
}

/// Strings binary chunk header
///
/// Offsets are relative to the end of the file size field.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little, magic = 0x39000u32)]
pub struct StringsHeader {
    /// Length of the chunk after the magic number and this field
    pub file_size: u32,

    /// Number of hash pairs
    pub list_size: u32,

    /// Offset of the first hash pair
    pub data_offset: u32,

    /// Offset of the encoded string region
    pub strings_offset: u32,
}

/// Entry of the hash pair list
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct HashPair {
    /// Key of the string
    pub hash: u32,

    /// Offset of the encoded string from the start of the string region
    pub offset: u32,
}

/// Decoded strings keyed by their hash, kept in file order
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut, IntoIterator)]
pub struct StringTable(IndexMap<u32, String>);

impl FromIterator<(u32, String)> for StringTable {
    fn from_iter<T: IntoIterator<Item = (u32, String)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

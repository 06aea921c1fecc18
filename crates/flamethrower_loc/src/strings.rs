//! Types for reading and rebuilding strings binary chunks
//!

use binrw::{BinRead, BinWrite, NullString};
use std::{
    io::{Cursor, Read, Seek, SeekFrom, Write},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::{
    codec,
    error::{Error, Result},
    hash::{hash, StringKey},
    histogram::Histogram,
    types::{HashPair, StringTable, StringsHeader, CHUNK_PREFIX_SIZE},
};

/// Offset of the hash pairs written by [`StringsBinary::update`]
pub const DATA_OFFSET: u32 = 0x8C;

/// Size of the magic number and the four header fields
const HEADER_FIELDS_LEN: usize = 20;

/// Size of a single hash pair
const HASH_PAIR_LEN: u32 = 8;

/// Strings binary chunk
///
/// Strings are held decoded and only encoded against a histogram by [`StringsBinary::update`], which
/// also lays out every offset and serializes the chunk. [`StringsBinary::save`] writes the result of
/// the last update.
///
/// ```no_run
/// use flamethrower_loc::{Histogram, StringsBinary};
///
/// fn translate(histogram_path: &str, strings_path: &str) -> flamethrower_loc::error::Result<()> {
///     let mut histogram = Histogram::load(histogram_path)?;
///     let mut strings = StringsBinary::load(strings_path, &histogram)?;
///
///     let entries = [("ID_M_MP_MAP_NAME_SUEZ", "苏伊士")];
///
///     histogram.add_chars_from_strings(entries.iter().map(|(_, value)| value), [])?;
///     histogram.save(histogram_path)?;
///
///     strings.import_strings(entries);
///     strings.update(&histogram)?;
///     strings.save(strings_path)?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringsBinary {
    header: StringsHeader,
    section: String,
    hash_pairs: Vec<HashPair>,
    strings: StringTable,
    buffer: Option<Vec<u8>>,
}

impl Default for StringsBinary {
    fn default() -> Self {
        Self::new("")
    }
}

impl StringsBinary {
    /// Create an empty strings binary with the given header string
    ///
    /// Nothing can be saved before the first [`StringsBinary::update`].
    pub fn new(section: impl Into<String>) -> Self {
        StringsBinary {
            header: StringsHeader {
                file_size: DATA_OFFSET,
                list_size: 0,
                data_offset: DATA_OFFSET,
                strings_offset: DATA_OFFSET,
            },
            section: section.into(),
            hash_pairs: Vec::new(),
            strings: StringTable::default(),
            buffer: None,
        }
    }

    /// Read a strings binary chunk, decoding every string with `histogram`
    #[instrument(skip_all, err)]
    pub fn read<R: Read>(mut reader: R, histogram: &Histogram) -> Result<StringsBinary> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut cursor = Cursor::new(data.as_slice());
        let header = StringsHeader::read(&mut cursor).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => Error::InvalidStringsBinary,
            e => Error::BinRWError(e),
        })?;

        let section = String::from_utf8(NullString::read_le(&mut cursor)?.0)?;

        let pairs =
            u64::from(header.strings_offset.saturating_sub(header.data_offset) / HASH_PAIR_LEN);
        if pairs != u64::from(header.list_size) {
            warn!(
                list_size = header.list_size,
                pairs, "hash pair region does not match the list size"
            );
        }

        let pairs_start = u64::from(header.data_offset) + u64::from(CHUNK_PREFIX_SIZE);
        let pairs_end = pairs_start + pairs * u64::from(HASH_PAIR_LEN);
        if pairs_end > data.len() as u64 {
            return Err(Error::TruncatedChunk {
                expected: pairs_end,
                available: data.len() as u64,
            });
        }

        cursor.seek(SeekFrom::Start(pairs_start))?;
        let mut hash_pairs = Vec::with_capacity(pairs as usize);
        for _ in 0..pairs {
            hash_pairs.push(HashPair::read(&mut cursor)?);
        }

        let strings_start = u64::from(header.strings_offset) + u64::from(CHUNK_PREFIX_SIZE);
        let mut strings = StringTable::default();
        for pair in &hash_pairs {
            cursor.seek(SeekFrom::Start(strings_start + u64::from(pair.offset)))?;
            let encoded = NullString::read_le(&mut cursor)?;
            strings.insert(pair.hash, codec::decode(&encoded.0, histogram)?);
        }

        debug!(strings = strings.len(), "read strings binary");

        Ok(StringsBinary {
            header,
            section,
            hash_pairs,
            strings,
            buffer: Some(data),
        })
    }

    /// Load a strings binary chunk from a file
    pub fn load(path: impl AsRef<Path>, histogram: &Histogram) -> Result<StringsBinary> {
        let file = std::fs::File::open(path)?;
        Self::read(file, histogram)
    }

    /// Insert or replace strings
    ///
    /// Keys may be labels, which are hashed, or raw hashes. Strings are encoded on the next
    /// [`StringsBinary::update`]. Returns the number of entries imported.
    pub fn import_strings<I, K, V>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<StringKey>,
        V: Into<String>,
    {
        let mut count = 0;
        for (key, value) in entries {
            self.strings.insert(key.into().hashed(), value.into());
            count += 1;
        }

        if count > 0 {
            self.buffer = None;
        }
        count
    }

    /// Prefix every string with its key as eight hexadecimal digits
    pub fn prefix_keys(&mut self) {
        for (key, value) in self.strings.iter_mut() {
            *value = format!("{:08X} {}", key, value);
        }
        self.buffer = None;
    }

    /// Lay out and serialize the chunk, encoding strings against `histogram`
    ///
    /// The histogram must already contain every character used. On failure the chunk is left as it
    /// was.
    #[instrument(skip_all, err)]
    pub fn update(&mut self, histogram: &Histogram) -> Result<()> {
        let pairs_start = (DATA_OFFSET + CHUNK_PREFIX_SIZE) as usize;
        if HEADER_FIELDS_LEN + self.section.len() >= pairs_start {
            return Err(Error::HeaderTooLong(self.section.len()));
        }

        let shifts = histogram.shifts();

        let list_size = self.strings.len() as u32;
        let mut header = StringsHeader {
            file_size: 0,
            list_size,
            data_offset: DATA_OFFSET,
            strings_offset: DATA_OFFSET + list_size * HASH_PAIR_LEN,
        };

        let mut buffer = Cursor::new(Vec::new());
        header.write(&mut buffer)?;
        buffer.write_all(self.section.as_bytes())?;
        let padding = pairs_start - buffer.get_ref().len();
        buffer.write_all(&vec![0u8; padding])?;

        let mut encoded = Vec::new();
        let mut hash_pairs = Vec::with_capacity(self.strings.len());
        for (&key, value) in self.strings.iter() {
            let pair = HashPair {
                hash: key,
                offset: encoded.len() as u32,
            };
            pair.write(&mut buffer)?;
            hash_pairs.push(pair);

            encoded.extend(codec::encode(value, histogram, &shifts)?);
        }
        buffer.write_all(&encoded)?;

        header.file_size = buffer.get_ref().len() as u32 - CHUNK_PREFIX_SIZE;
        buffer.rewind()?;
        header.write(&mut buffer)?;

        debug!(
            strings = list_size,
            file_size = header.file_size,
            "updated strings binary"
        );

        self.header = header;
        self.hash_pairs = hash_pairs;
        self.buffer = Some(buffer.into_inner());

        Ok(())
    }

    /// Write the chunk produced by the last update
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let buffer = self.buffer.as_ref().ok_or(Error::NotUpdated)?;
        writer.write_all(buffer)?;
        Ok(())
    }

    /// Save the chunk produced by the last update to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let buffer = self.buffer.as_ref().ok_or(Error::NotUpdated)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }

    /// Size of the chunk including its magic number and file size
    pub fn chunk_size(&self) -> u32 {
        self.header.file_size + CHUNK_PREFIX_SIZE
    }

    /// Length of the chunk after the magic number and file size
    pub fn file_size(&self) -> u32 {
        self.header.file_size
    }

    /// Number of hash pairs
    pub fn list_size(&self) -> u32 {
        self.header.list_size
    }

    /// Offset of the hash pairs
    pub fn data_offset(&self) -> u32 {
        self.header.data_offset
    }

    /// Offset of the encoded strings
    pub fn strings_offset(&self) -> u32 {
        self.header.strings_offset
    }

    /// The header string
    pub fn header(&self) -> &str {
        &self.section
    }

    /// Hash pairs in file order, as of the last read or update
    pub fn hash_pairs(&self) -> &[HashPair] {
        &self.hash_pairs
    }

    /// Decoded strings by key
    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    /// Whether the chunk has changes which have not been serialized
    pub fn is_dirty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Number of strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the chunk holds no strings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a string by its key
    pub fn get(&self, key: u32) -> Option<&str> {
        self.strings.get(&key).map(String::as_str)
    }

    /// Get a string by the label its key was derived from
    pub fn get_by_label(&self, label: impl AsRef<str>) -> Option<&str> {
        self.get(hash(label.as_ref().as_bytes()))
    }
}

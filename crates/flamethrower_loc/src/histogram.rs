//! Types for reading and extending histogram chunks
//!

use binrw::{BinRead, BinWrite};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{
    collections::BTreeSet,
    io::{Cursor, Read, Seek, Write},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::{
    error::{Error, Result},
    table::{CharTable, DIRECT_START, NULL_SLOT, SHIFT_BITS},
    types::{HistogramHeader, CHUNK_PREFIX_SIZE},
};

/// Number of slots in a freshly created table
pub const BASE_TABLE_LEN: usize = 0x100;

/// Slot at which the search for the end of the shift numbers starts
const SHIFT_SEARCH_START: usize = 0x40;

/// Slot at which the search for the end of the shift numbers gives up
const SHIFT_SEARCH_END: usize = 0xFF;

/// Highest slot inspected when collecting shifts
const SHIFT_SCAN_START: usize = 0x1FE;

/// Lowest slot inspected when collecting shifts
const SHIFT_SCAN_END: usize = 0x81;

/// Lowest value written into a shift number slot
const FIRST_SHIFT_NUMBER: usize = 2;

/// Upper bound on recomputing the shift numbers before giving up
pub const MAX_SHIFT_ITERATIONS: usize = 0x100;

/// Size of the data offset size field, counted by the file size
const DATA_OFF_SIZE_LEN: u32 = 4;

/// Histogram chunk
///
/// Maps single bytes and shifted byte pairs to characters. Slots below `0x80` mirror ASCII, slots from
/// `0x80` on hold shift numbers followed by characters, and slots from the data offset size on form the
/// tail where new characters are inserted.
///
/// ```no_run
/// fn extend(path: &str) -> flamethrower_loc::error::Result<()> {
///     let mut histogram = flamethrower_loc::Histogram::load(path)?;
///
///     let added = histogram.add_chars_from_strings(["你好"], [])?;
///     println!("added {} characters", added);
///
///     histogram.save(path)?;
///     println!("chunk size is now {}", histogram.chunk_size());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    header: HistogramHeader,
    table: CharTable,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a histogram with a table of empty slots
    pub fn new() -> Self {
        Self::from_slots(BASE_TABLE_LEN as u32, vec![NULL_SLOT; BASE_TABLE_LEN])
    }

    /// Create a histogram from raw slots
    pub fn from_slots(data_off_size: u32, slots: Vec<u32>) -> Self {
        let mut histogram = Histogram {
            header: HistogramHeader {
                file_size: 0,
                data_off_size,
            },
            table: CharTable::from(slots),
        };
        histogram.header.file_size = histogram.encoded_file_size();
        histogram
    }

    /// Read a histogram chunk
    #[instrument(skip_all, err)]
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<Histogram> {
        let header = HistogramHeader::read(&mut reader).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => Error::InvalidHistogram,
            e => Error::BinRWError(e),
        })?;

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        let units = u64::from(header.file_size.saturating_sub(DATA_OFF_SIZE_LEN) / 2);
        if units * 2 > body.len() as u64 {
            return Err(Error::TruncatedChunk {
                expected: units * 2,
                available: body.len() as u64,
            });
        }

        let mut body = Cursor::new(body);
        let mut slots = Vec::with_capacity(units as usize);
        for _ in 0..units {
            slots.push(u32::from(body.read_u16::<LittleEndian>()?));
        }

        debug!(
            slots = slots.len(),
            data_off_size = header.data_off_size,
            "read histogram"
        );

        Ok(Histogram {
            header,
            table: CharTable::from(slots),
        })
    }

    /// Load a histogram chunk from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Histogram> {
        let data = std::fs::read(path)?;
        Self::read(Cursor::new(data))
    }

    /// Write the chunk, updating the file size
    ///
    /// Characters outside of the basic multilingual plane can't be stored in a 16 bit slot and are
    /// skipped with a warning.
    #[instrument(skip_all, err)]
    pub fn write<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let mut buffer = Cursor::new(Vec::with_capacity(
            CHUNK_PREFIX_SIZE as usize + self.table.len() * 2,
        ));
        self.header.write(&mut buffer)?;

        for &code in self.table.iter() {
            match u16::try_from(code) {
                Ok(unit) => buffer.write_u16::<LittleEndian>(unit)?,
                Err(_) => warn!("skipping character {:#X}, it does not fit in a slot", code),
            }
        }

        self.header.file_size = buffer.get_ref().len() as u32 - CHUNK_PREFIX_SIZE;
        buffer.rewind()?;
        self.header.write(&mut buffer)?;

        writer.write_all(buffer.get_ref())?;
        Ok(())
    }

    /// Save the histogram to a file
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut data = Vec::new();
        self.write(&mut data)?;
        std::fs::write(path, data)?;
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

    /// Slot at which the appended tail begins
    pub fn data_off_size(&self) -> u32 {
        self.header.data_off_size
    }

    /// The addressable table
    pub fn table(&self) -> &CharTable {
        &self.table
    }

    /// Iterate the table as characters
    pub fn section(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.table.len()).filter_map(|index| self.table.char_at(index))
    }

    /// Slots holding shift numbers, highest slot first
    ///
    /// Encoding tries shifts in this order.
    pub fn shifts(&self) -> Vec<usize> {
        let top = SHIFT_SCAN_START.min(self.table.len().saturating_sub(1));
        (SHIFT_SCAN_END..=top)
            .rev()
            .filter(|&index| self.table.is_shift(index))
            .collect()
    }

    /// Add every character used by `strings` and `extra_chars` that the table is missing
    ///
    /// Shift numbers needed to reach the new slots are recomputed and written at the start of the
    /// addressable range. ASCII characters are always encoded literally and never added.
    ///
    /// Returns the number of characters added.
    #[instrument(skip_all, err)]
    pub fn add_chars_from_strings<I, S, C>(&mut self, strings: I, extra_chars: C) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        C: IntoIterator<Item = char>,
    {
        let mut candidates = BTreeSet::new();
        for value in strings {
            candidates.extend(value.as_ref().chars());
        }
        candidates.extend(extra_chars);

        let chars = candidates
            .into_iter()
            .filter(|&c| u32::from(c) as usize >= DIRECT_START && !self.table.contains(c))
            .collect::<Vec<_>>();

        if chars.is_empty() {
            return Ok(0);
        }

        if self.table.len() < BASE_TABLE_LEN {
            return Err(Error::TableTooSmall(self.table.len()));
        }

        let shift_nums_index = (SHIFT_SEARCH_START..SHIFT_SEARCH_END)
            .find(|&index| self.table[index] != NULL_SLOT)
            .unwrap_or(SHIFT_SEARCH_END);

        let inserted_start = (self.header.data_off_size as usize)
            .saturating_sub(1)
            .min(self.table.len());

        let shift_nums = converge_shift_numbers(
            inserted_start + shift_nums_index,
            (self.table[shift_nums_index] as usize).saturating_sub(FIRST_SHIFT_NUMBER - 1),
            chars.len(),
        )?;

        debug!(
            added = chars.len(),
            shift_nums_index,
            inserted_start,
            shifts = shift_nums.len(),
            "extending histogram"
        );

        let mut slots =
            Vec::with_capacity(self.table.len() + shift_nums.len() + chars.len());
        slots.extend_from_slice(&self.table[..DIRECT_START]);
        slots.extend(shift_nums);
        slots.extend_from_slice(&self.table[shift_nums_index..inserted_start.max(shift_nums_index)]);
        slots.extend(chars.iter().map(|&c| u32::from(c)));
        slots.extend_from_slice(&self.table[inserted_start..]);

        self.table.replace(slots);
        self.header.data_off_size += chars.len() as u32;
        self.header.file_size = self.encoded_file_size();

        Ok(chars.len())
    }

    fn encoded_file_size(&self) -> u32 {
        let stored = self
            .table
            .iter()
            .filter(|&&code| code <= u32::from(u16::MAX))
            .count() as u32;
        DATA_OFF_SIZE_LEN + stored * 2
    }
}

/// Shift numbers needed to address `count` consecutive slots starting at `start - 0x80 + shifts`,
/// where `shifts` is the number of shift numbers itself.
///
/// The slot positions depend on how many shift numbers are inserted before them, so the count is
/// recomputed until it stops changing.
fn converge_shift_numbers(start: usize, seed: usize, count: usize) -> Result<Vec<u32>> {
    let mut shifts = seed;
    for iteration in 0..MAX_SHIFT_ITERATIONS {
        let first = (start + shifts).saturating_sub(DIRECT_START);
        let numbers = shift_numbers(first, count)?;

        if numbers.len() == shifts {
            return Ok(numbers);
        }

        debug!(iteration, from = shifts, to = numbers.len(), "shift count changed");
        shifts = numbers.len();
    }

    Err(Error::ShiftsDidNotConverge {
        iterations: MAX_SHIFT_ITERATIONS,
    })
}

/// Distinct shift numbers of `count` consecutive slots starting at `first`, in ascending order
fn shift_numbers(first: usize, count: usize) -> Result<Vec<u32>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let low = first >> SHIFT_BITS;
    let high = (first + count - 1) >> SHIFT_BITS;
    if high >= DIRECT_START {
        return Err(Error::TooManyCharacters {
            shift: low.max(DIRECT_START),
        });
    }

    Ok((low..=high).map(|shift| shift as u32).collect())
}

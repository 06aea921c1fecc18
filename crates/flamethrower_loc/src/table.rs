//! Addressable character table backing the histogram.

use derive_more::derive::Deref;
use std::collections::HashMap;

/// First slot that can hold a character addressed through the table. Lower slots map to ASCII.
pub const DIRECT_START: usize = 0x80;

/// Last slot reachable with a single byte.
pub const DIRECT_END: usize = 0xFF;

/// Number of bits a shift number is moved left to form a base index.
pub const SHIFT_BITS: u32 = 7;

/// Code point stored in unused slots.
pub const NULL_SLOT: u32 = 0;

/// An ordered table of code points with a reverse lookup from code point to slot.
///
/// Slots store raw code points rather than [`char`] so that every 16 bit unit in a chunk, including
/// lone surrogates, survives a load and save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct CharTable {
    #[deref]
    slots: Vec<u32>,
    positions: HashMap<u32, usize>,
}

impl CharTable {
    /// Create a table of `len` empty slots
    pub fn with_len(len: usize) -> Self {
        Self::from(vec![NULL_SLOT; len])
    }

    /// Get the code point at `index` as a character
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.slots
            .get(index)
            .map(|&code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Find the first addressable slot holding `c`
    pub fn position(&self, c: char) -> Option<usize> {
        self.positions.get(&u32::from(c)).copied()
    }

    /// Whether the table stores `c` in any slot
    pub fn contains(&self, c: char) -> bool {
        let code = u32::from(c);
        self.positions.contains_key(&code)
            || self.slots.iter().take(DIRECT_START).any(|&slot| slot == code)
    }

    /// Whether the slot at `index` holds a shift number instead of a character
    pub fn is_shift(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .map_or(false, |&code| (code as usize) < DIRECT_START)
    }

    /// Base index addressed by the shift stored at `index`
    pub fn shift_base(&self, index: usize) -> Option<usize> {
        self.slots
            .get(index)
            .map(|&code| (code as usize) << SHIFT_BITS)
    }

    /// Replace every slot, rebuilding the reverse lookup
    pub fn replace(&mut self, slots: Vec<u32>) {
        *self = Self::from(slots);
    }

    /// Consume the table returning its slots
    pub fn into_inner(self) -> Vec<u32> {
        self.slots
    }
}

impl From<Vec<u32>> for CharTable {
    fn from(slots: Vec<u32>) -> Self {
        let mut positions = HashMap::with_capacity(slots.len().saturating_sub(DIRECT_START));
        for (index, &code) in slots.iter().enumerate().skip(DIRECT_START) {
            positions.entry(code).or_insert(index);
        }

        CharTable { slots, positions }
    }
}

impl FromIterator<u32> for CharTable {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

//! Conversion between text and the byte form stored in strings binaries.
//!
//! ASCII is stored as is. Any other character is either the single byte index of its slot, or when
//! the slot lies beyond `0xFF`, a shift slot followed by the offset from that shift's base plus
//! `0x80`.

use tracing::warn;

use crate::{
    error::{Error, Result},
    histogram::Histogram,
    table::{DIRECT_END, DIRECT_START},
};

/// Decode a string without its terminating zero
pub fn decode(bytes: &[u8], histogram: &Histogram) -> Result<String> {
    let table = histogram.table();

    let mut result = String::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied();
    while let Some(byte) = iter.next() {
        if usize::from(byte) < DIRECT_START {
            result.push(char::from(byte));
            continue;
        }

        let index = usize::from(byte);
        if !table.is_shift(index) {
            result.push(
                table
                    .char_at(index)
                    .ok_or(Error::InvalidCharacterIndex(index))?,
            );
            continue;
        }

        let low = iter.next().ok_or(Error::TruncatedString)?;
        if usize::from(low) < DIRECT_START {
            warn!("dropping byte {:#04X} following shift {:#04X}", low, byte);
            continue;
        }

        let base = table
            .shift_base(index)
            .ok_or(Error::InvalidCharacterIndex(index))?;
        let resolved = base + usize::from(low) - DIRECT_START;
        result.push(
            table
                .char_at(resolved)
                .ok_or(Error::InvalidCharacterIndex(resolved))?,
        );
    }

    Ok(result)
}

/// Encode a string, appending the terminating zero
///
/// `shifts` should come from [`Histogram::shifts`] and are tried in order. Shift slots above `0xFF`
/// can't be written as a single byte and are passed over.
pub fn encode(text: &str, histogram: &Histogram, shifts: &[usize]) -> Result<Vec<u8>> {
    let table = histogram.table();

    let mut result = Vec::with_capacity(text.len() + 1);
    for c in text.chars() {
        if c.is_ascii() {
            result.push(c as u8);
            continue;
        }

        let index = table.position(c).ok_or(Error::UnencodableCharacter(c))?;
        if index <= DIRECT_END {
            result.push(index as u8);
            continue;
        }

        let (shift, offset) = shifts
            .iter()
            .find_map(|&shift| {
                let shift_byte = u8::try_from(shift).ok()?;
                let offset = index.checked_sub(table.shift_base(shift)?)?;
                (offset < DIRECT_START).then_some((shift_byte, offset as u8))
            })
            .ok_or(Error::UnencodableCharacter(c))?;

        result.push(shift);
        result.push(offset + DIRECT_START as u8);
    }

    result.push(0);
    Ok(result)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{decode, encode};
    use crate::error::{Error, Result};
    use crate::histogram::Histogram;

    fn histogram() -> Histogram {
        let mut slots = vec![0u32; 0x180];
        slots[0x81] = 2;
        slots[0x82] = u32::from('é');
        slots[0x90] = u32::from('中');
        slots[0x100] = u32::from('文');
        slots[0x17F] = u32::from('字');
        Histogram::from_slots(0x180, slots)
    }

    #[test]
    fn ascii_is_literal() -> Result<()> {
        let histogram = histogram();

        assert_eq!(encode("Hi!", &histogram, &histogram.shifts())?, b"Hi!\0");
        assert_eq!(decode(b"Hi!", &histogram)?, "Hi!");

        Ok(())
    }

    #[test]
    fn single_byte_characters() -> Result<()> {
        let histogram = histogram();

        assert_eq!(
            encode("é中", &histogram, &histogram.shifts())?,
            vec![0x82, 0x90, 0x00]
        );
        assert_eq!(decode(&[0x82, 0x90], &histogram)?, "é中");

        Ok(())
    }

    #[test]
    fn shifted_characters() -> Result<()> {
        let histogram = histogram();

        assert_eq!(
            encode("文字", &histogram, &histogram.shifts())?,
            vec![0x81, 0x80, 0x81, 0xFF, 0x00]
        );
        assert_eq!(decode(&[0x81, 0x80, 0x81, 0xFF], &histogram)?, "文字");

        Ok(())
    }

    #[test]
    fn round_trip_mixed() -> Result<()> {
        let histogram = histogram();
        let text = "é: 文中字 ok";

        let encoded = encode(text, &histogram, &histogram.shifts())?;
        assert_eq!(encoded.last(), Some(&0));
        assert_eq!(decode(&encoded[..encoded.len() - 1], &histogram)?, text);

        Ok(())
    }

    #[test]
    fn missing_character() {
        let histogram = histogram();

        assert!(matches!(
            encode("日", &histogram, &histogram.shifts()),
            Err(Error::UnencodableCharacter('日'))
        ));
    }

    #[test]
    fn unreachable_without_shift() {
        let histogram = histogram();

        assert!(matches!(
            encode("文", &histogram, &[]),
            Err(Error::UnencodableCharacter('文'))
        ));
    }

    #[test]
    fn truncated_shift() {
        let histogram = histogram();

        assert!(matches!(
            decode(&[0x41, 0x81], &histogram),
            Err(Error::TruncatedString)
        ));
    }

    #[test]
    fn index_beyond_table() {
        let histogram = Histogram::from_slots(0x90, vec![0u32; 0x90]);

        assert!(matches!(
            decode(&[0xA0], &histogram),
            Err(Error::InvalidCharacterIndex(0xA0))
        ));
    }

    #[traced_test]
    #[test]
    fn low_byte_after_shift_is_dropped() -> Result<()> {
        let histogram = histogram();

        assert_eq!(decode(&[0x81, 0x41, 0x42], &histogram)?, "B");
        assert!(logs_contain("dropping byte"));

        Ok(())
    }
}

use std::path::PathBuf;

use flamethrower_loc::codec::{decode, encode};
use flamethrower_loc::error::{Error, Result};
use flamethrower_loc::Histogram;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name))
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flamethrower_loc-{}-{}", std::process::id(), name))
}

#[traced_test]
#[test]
fn parse_histogram() -> Result<()> {
    let histogram = Histogram::load(resource("base.histogram.chunk"))?;

    assert_eq!(histogram.chunk_size(), 0x20C);
    assert_eq!(histogram.data_off_size(), 0x100);
    assert_eq!(histogram.table().len(), 0x100);
    assert_eq!(histogram.shifts(), vec![0x81]);
    assert_eq!(histogram.table().position('一'), Some(0x82));

    Ok(())
}

#[test]
fn save_unchanged_is_identical() -> Result<()> {
    let original = std::fs::read(resource("base.histogram.chunk"))?;
    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;

    let mut actual = Vec::new();
    histogram.write(&mut actual)?;

    assert_eq!(actual, original);

    Ok(())
}

#[traced_test]
#[test]
fn add_five_characters() -> Result<()> {
    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;
    let chunk_size = histogram.chunk_size();

    let added = histogram.add_chars_from_strings(["あいう", "えお"], [])?;

    assert_eq!(added, 5);
    assert_eq!(histogram.data_off_size(), 0x105);
    assert_eq!(histogram.chunk_size(), chunk_size + 10);
    assert_eq!(histogram.table().len(), 0x105);
    assert_eq!(histogram.table().position('あ'), Some(0xFF));
    assert_eq!(histogram.table().position('お'), Some(0x103));
    assert_eq!(histogram.table().position('丁'), Some(0x83));

    Ok(())
}

#[test]
fn adding_again_changes_nothing() -> Result<()> {
    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;

    histogram.add_chars_from_strings(["あいうえお"], [])?;
    let extended = histogram.clone();

    assert_eq!(histogram.add_chars_from_strings(["おえういあ"], ['あ'])?, 0);
    assert_eq!(histogram, extended);

    Ok(())
}

#[test]
fn ascii_and_known_characters_are_not_added() -> Result<()> {
    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;
    let before = histogram.clone();

    assert_eq!(histogram.add_chars_from_strings(["Hello 一丁"], [])?, 0);
    assert_eq!(histogram, before);

    Ok(())
}

#[test]
fn added_characters_round_trip() -> Result<()> {
    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;
    let text = "あ, いうえお 一丁!";

    histogram.add_chars_from_strings([text], [])?;

    let encoded = encode(text, &histogram, &histogram.shifts())?;
    assert_eq!(&encoded[..3], &[0xFF, b',', b' ']);
    assert_eq!(&encoded[3..5], &[0x81, 0x80]);
    assert_eq!(decode(&encoded[..encoded.len() - 1], &histogram)?, text);

    Ok(())
}

#[test]
fn extended_histogram_survives_save() -> Result<()> {
    let path = scratch("extended.histogram.chunk");

    let mut histogram = Histogram::load(resource("base.histogram.chunk"))?;
    histogram.add_chars_from_strings(["あいうえお"], [])?;
    histogram.save(&path)?;

    let loaded = Histogram::load(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(loaded, histogram);
    assert_eq!(
        std::fs::metadata(resource("base.histogram.chunk"))?.len() + 10,
        u64::from(loaded.chunk_size())
    );

    Ok(())
}

#[test]
fn strings_chunk_is_not_a_histogram() {
    assert!(matches!(
        Histogram::load(resource("base.strings.chunk")),
        Err(Error::InvalidHistogram)
    ));
}

#[test]
fn small_table_cannot_grow() {
    let mut histogram = Histogram::from_slots(0x80, vec![0; 0x80]);

    assert!(matches!(
        histogram.add_chars_from_strings(["あ"], []),
        Err(Error::TableTooSmall(0x80))
    ));
}

#[test]
fn full_table_is_left_unchanged() {
    let mut slots: Vec<u32> = (0..0x3F80u32).map(|index| 0x1000 + index).collect();
    slots[..0x80].fill(0);
    slots[0x80] = 2;

    let mut histogram = Histogram::from_slots(0x3F80, slots);
    let before = histogram.clone();

    let chars = (0x9000..0x9100u32).filter_map(char::from_u32);

    assert!(matches!(
        histogram.add_chars_from_strings(Vec::<String>::new(), chars),
        Err(Error::TooManyCharacters { shift: 0x80 })
    ));
    assert_eq!(histogram, before);
}

use clap::Args;
use flamethrower_loc::{Histogram, StringTable, StringsBinary};
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};
use tracing::info;

use crate::commands::save_chunks;

#[derive(Args)]
pub struct ImportArgs {
    /// The histogram chunk the strings were written against
    #[arg(short = 'H', long, value_name = "FILE")]
    histogram: PathBuf,

    /// An input strings binary chunk
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// JSON strings keyed by hexadecimal hash or label
    #[arg(short, long, value_name = "FILE")]
    json: PathBuf,

    /// The extended histogram chunk
    #[arg(long, value_name = "FILE")]
    histogram_output: PathBuf,

    /// The rebuilt strings binary chunk
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Prefix every string with its key
    #[arg(long, default_value_t = false)]
    debug_keys: bool,

    /// Allow overwriting the targets
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let mut histogram = Histogram::load(&self.histogram)
            .context(format!("path: {}", &self.histogram.display()))?;
        let mut strings = StringsBinary::load(&self.file, &histogram)
            .context(format!("path: {}", &self.file.display()))?;

        let f = File::open(&self.json)
            .into_diagnostic()
            .context(format!("path: {}", &self.json.display()))?;
        let imported = StringTable::read_json(f)?;

        let imported_count = strings.import_strings(imported);
        if self.debug_keys {
            strings.prefix_keys();
        }
        info!("imported {} strings", imported_count);

        // Every string is encoded again, so the whole table has to be covered.
        let added = histogram.add_chars_from_strings(strings.strings().values(), [])?;
        info!("added {} characters to the histogram", added);

        save_chunks(
            &mut histogram,
            &self.histogram_output,
            &mut strings,
            &self.output,
            self.overwrite,
        )
    }
}

#[cfg(test)]
mod test {
    use flamethrower_loc::{Histogram, StringsBinary};
    use miette::IntoDiagnostic;
    use pretty_assertions::assert_eq;

    use super::ImportArgs;
    use crate::commands::test::{resource, scratch};

    fn args(name: &str, file: std::path::PathBuf, json: std::path::PathBuf) -> ImportArgs {
        ImportArgs {
            histogram: resource("base.histogram.chunk"),
            file,
            json,
            histogram_output: scratch(&format!("{name}.histogram.chunk")),
            output: scratch(&format!("{name}.strings.chunk")),
            debug_keys: false,
            overwrite: true,
        }
    }

    #[test]
    fn import_writes_matching_chunks() -> miette::Result<()> {
        let json = scratch("import.json");
        std::fs::write(&json, r#"{ "ID_NEW": "あいうえお" }"#).into_diagnostic()?;

        let args = args("import", resource("base.strings.chunk"), json.clone());
        args.handle()?;

        let histogram = Histogram::load(&args.histogram_output)?;
        let strings = StringsBinary::load(&args.output, &histogram)?;

        for path in [&json, &args.histogram_output, &args.output] {
            let _ = std::fs::remove_file(path);
        }

        assert_eq!(strings.len(), 4);
        assert_eq!(strings.get_by_label("ID_NEW"), Some("あいうえお"));
        assert_eq!(strings.get_by_label("ID_TAIL"), Some("\u{4E7D}"));

        Ok(())
    }

    #[test]
    fn failed_update_writes_nothing() -> miette::Result<()> {
        // Data offset 0xA0 leaves room for a header which can't be written back at 0x8C
        let mut chunk = Vec::new();
        for field in [0x39000u32, 0xA0, 0, 0xA0, 0xA0] {
            chunk.extend(field.to_le_bytes());
        }
        chunk.extend([b'x'; 0x90]);
        chunk.resize(0xA8, 0);

        let file = scratch("long_header.strings.chunk");
        let json = scratch("long_header.json");
        std::fs::write(&file, &chunk).into_diagnostic()?;
        std::fs::write(&json, r#"{ "ID_NEW": "あ" }"#).into_diagnostic()?;

        let args = args("long_header", file.clone(), json.clone());
        let result = args.handle();

        let histogram_written = args.histogram_output.exists();
        let strings_written = args.output.exists();
        for path in [&file, &json, &args.histogram_output, &args.output] {
            let _ = std::fs::remove_file(path);
        }

        assert!(result.is_err());
        assert!(!histogram_written);
        assert!(!strings_written);

        Ok(())
    }
}

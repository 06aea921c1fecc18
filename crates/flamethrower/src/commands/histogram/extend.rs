use clap::Args;
use flamethrower_loc::{Histogram, StringsBinary};
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use crate::commands::save_chunks;

#[derive(Args)]
pub struct ExtendArgs {
    /// An input histogram chunk
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A text file holding the characters to add
    #[arg(short, long, value_name = "FILE")]
    chars: PathBuf,

    /// The strings binary chunk written against the input histogram
    #[arg(short, long, value_name = "FILE")]
    strings: PathBuf,

    /// The extended histogram chunk
    #[arg(long, value_name = "FILE")]
    histogram_output: PathBuf,

    /// The re-encoded strings binary chunk
    #[arg(short = 'o', long, value_name = "FILE")]
    strings_output: PathBuf,

    /// Allow overwriting the targets
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtendArgs {
    pub fn handle(&self) -> Result<()> {
        let mut histogram =
            Histogram::load(&self.file).context(format!("path: {}", &self.file.display()))?;
        let mut strings = StringsBinary::load(&self.strings, &histogram)
            .context(format!("path: {}", &self.strings.display()))?;

        let text = std::fs::read_to_string(&self.chars)
            .into_diagnostic()
            .context(format!("path: {}", &self.chars.display()))?;

        let added = histogram.add_chars_from_strings(text.lines(), [])?;
        info!("added {} characters", added);

        // Adding characters moves the tail of the table, every string has to be encoded again.
        save_chunks(
            &mut histogram,
            &self.histogram_output,
            &mut strings,
            &self.strings_output,
            self.overwrite,
        )
    }
}

#[cfg(test)]
mod test {
    use flamethrower_loc::{Histogram, StringsBinary};
    use miette::IntoDiagnostic;
    use pretty_assertions::assert_eq;

    use super::ExtendArgs;
    use crate::commands::test::{resource, scratch};

    #[test]
    fn strings_follow_the_moved_tail() -> miette::Result<()> {
        let chars = scratch("extend.chars.txt");
        std::fs::write(&chars, "あいう\nえお\n").into_diagnostic()?;

        let args = ExtendArgs {
            file: resource("base.histogram.chunk"),
            chars: chars.clone(),
            strings: resource("base.strings.chunk"),
            histogram_output: scratch("extend.histogram.chunk"),
            strings_output: scratch("extend.strings.chunk"),
            overwrite: true,
        };
        args.handle()?;

        let histogram = Histogram::load(&args.histogram_output)?;
        let strings = StringsBinary::load(&args.strings_output, &histogram)?;

        for path in [&chars, &args.histogram_output, &args.strings_output] {
            let _ = std::fs::remove_file(path);
        }

        assert_eq!(histogram.data_off_size(), 0x105);
        assert_eq!(strings.get_by_label("ID_GREETING"), Some("一丁"));
        assert_eq!(strings.get_by_label("ID_PLAIN"), Some("Hello"));
        assert_eq!(strings.get_by_label("ID_TAIL"), Some("\u{4E7D}"));

        Ok(())
    }
}

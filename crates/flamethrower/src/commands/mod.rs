use flamethrower_loc::{Histogram, StringsBinary};
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::Path};

pub mod histogram;
pub mod strings;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle histogram chunks
    Histogram {
        #[command(subcommand)]
        command: histogram::HistogramCommands,
    },
    /// Handle strings binary chunks
    Strings {
        #[command(subcommand)]
        command: strings::StringsCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Histogram { command } => command.handle(),
            Commands::Strings { command } => command.handle(),
        }
    }
}

/// Open an output file, refusing to replace an existing one unless `overwrite` is set
pub(crate) fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}

/// Re-encode `strings` against `histogram` and write both chunks
///
/// Nothing is written when the strings can't be encoded, so a histogram never lands on disk
/// without a matching strings binary.
pub(crate) fn save_chunks(
    histogram: &mut Histogram,
    histogram_path: &Path,
    strings: &mut StringsBinary,
    strings_path: &Path,
    overwrite: bool,
) -> Result<()> {
    strings.update(histogram)?;

    let histogram_out = create_output(histogram_path, overwrite)?;
    let strings_out = create_output(strings_path, overwrite)?;

    histogram.write(histogram_out)?;
    strings.write(strings_out)?;

    println!("histogram chunk size: {}", histogram.chunk_size());
    println!("strings chunk size:   {}", strings.chunk_size());

    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use std::path::PathBuf;

    pub(crate) fn resource(name: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}/../flamethrower_loc/resources/{}",
            env!("CARGO_MANIFEST_DIR"),
            name
        ))
    }

    pub(crate) fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flamethrower-{}-{}", std::process::id(), name))
    }
}

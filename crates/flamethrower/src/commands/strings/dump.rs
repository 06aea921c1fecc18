use clap::Args;
use flamethrower_loc::{Histogram, StringsBinary};
use miette::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::commands::create_output;

#[derive(Args)]
pub struct DumpArgs {
    /// The histogram chunk the strings were written against
    #[arg(short = 'H', long, value_name = "FILE")]
    histogram: PathBuf,

    /// An input strings binary chunk
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target JSON file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let histogram = Histogram::load(&self.histogram)
            .context(format!("path: {}", &self.histogram.display()))?;
        let strings = StringsBinary::load(&self.file, &histogram)
            .context(format!("path: {}", &self.file.display()))?;

        info!("writing {} strings to {}", strings.len(), self.output.display());

        let out = create_output(&self.output, self.overwrite)?;
        strings.strings().write_json(out)?;

        Ok(())
    }
}

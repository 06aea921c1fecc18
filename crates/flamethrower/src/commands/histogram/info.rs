use clap::Args;
use flamethrower_loc::Histogram;
use itertools::Itertools;
use miette::{Context, Result};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// An input histogram chunk
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let histogram =
            Histogram::load(&self.file).context(format!("path: {}", &self.file.display()))?;

        let shifts = histogram.shifts();

        println!("chunk size:       {}", histogram.chunk_size());
        println!("data offset size: {:#X}", histogram.data_off_size());
        println!("slots:            {:#X}", histogram.table().len());
        println!(
            "shifts:           {}",
            shifts
                .iter()
                .map(|&slot| format!(
                    "{:#04X}->{:#X}",
                    slot,
                    histogram.table().shift_base(slot).unwrap_or_default()
                ))
                .join(" ")
        );

        Ok(())
    }
}

pub mod extend;
pub mod info;

#[derive(clap::Subcommand)]
pub enum HistogramCommands {
    /// Show the layout of a histogram chunk
    Info(info::InfoArgs),
    /// Add the characters of a text file to a histogram chunk
    Extend(extend::ExtendArgs),
}

impl HistogramCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            HistogramCommands::Info(info) => info.handle(),
            HistogramCommands::Extend(extend) => extend.handle(),
        }
    }
}

pub mod diff;
pub mod dump;
pub mod import;

#[derive(clap::Subcommand)]
pub enum StringsCommands {
    /// Compare two strings binary chunks
    Diff(diff::DiffArgs),
    /// Export a strings binary chunk as JSON
    Dump(dump::DumpArgs),
    /// Import JSON strings, extending the histogram as needed
    Import(import::ImportArgs),
}

impl StringsCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            StringsCommands::Diff(diff) => diff.handle(),
            StringsCommands::Dump(dump) => dump.handle(),
            StringsCommands::Import(import) => import.handle(),
        }
    }
}

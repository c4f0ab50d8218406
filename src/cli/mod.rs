pub mod ui;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON document
    #[default]
    Json,
    /// Human-readable table
    Table,
}

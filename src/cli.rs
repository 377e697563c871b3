use clap::Parser;
use std::path::PathBuf;

use crate::state::screen::OpenMode;

/// Record an artwork, or look at one already saved
#[derive(Parser, Debug)]
#[command(name = "art-book", version)]
pub struct Cli {
    /// "old" opens an existing record read-only; anything else starts a new one
    #[arg(long)]
    pub info: Option<String>,

    /// Record to show when --info old is given
    #[arg(long)]
    pub id: Option<i64>,

    /// Config file (defaults to <config_dir>/art-book/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long)]
    pub database: Option<PathBuf>,
}

impl Cli {
    pub fn open_mode(&self) -> OpenMode {
        match self.info.as_deref() {
            // A missing id reads as 0, which never matches a row
            Some("old") => OpenMode::Existing(self.id.unwrap_or(0)),
            _ => OpenMode::Create,
        }
    }
}

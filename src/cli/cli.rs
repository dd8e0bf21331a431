use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;

/// Builds an in-memory filesystem tree from a list of paths and prints
/// its directory summary and the files of one directory.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Manifest listing the paths to insert. Defaults to `paths.yaml` under --root,
    /// falling back to a built-in sample
    #[clap(long, short)]
    pub manifest: Option<PathBuf>,

    /// Directory searched for `paths.yaml`
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Name of the tree's root directory
    #[clap(long)]
    pub root_name: Option<String>,

    /// Directory whose files get listed, e.g. `root/dir1/subdir1`
    #[clap(long, short)]
    pub query: Option<String>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub manifest: Option<PathBuf>,
    pub root: PathBuf,
    pub root_name: Option<String>,
    pub query: Option<String>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            manifest: cli.manifest,
            root: cli.root,
            root_name: cli.root_name,
            query: cli.query,
        }
    }
}

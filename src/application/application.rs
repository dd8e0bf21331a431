use std::io::Write;

use colored::Colorize;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{ManifestError, PathManifest};
use crate::filesystem::{DEFAULT_ROOT_NAME, FilesystemTree, LookupError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let manifest = Self::load_manifest(&app_config).await?;
        debug!("Loaded manifest: {:?}", manifest);

        let root_name = app_config
            .root_name
            .or(manifest.root)
            .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string());
        let query = app_config.query.or(manifest.query);

        let tree = FilesystemTree::from_paths(root_name.as_str(), manifest.entries);
        info!("Built tree with {} nodes", tree.iter().count());

        let query = query.unwrap_or(root_name);
        let stdout = std::io::stdout();
        Self::report(&tree, &query, &mut stdout.lock())
    }

    async fn load_manifest(app_config: &RuntimeConfig) -> Result<PathManifest, ApplicationError> {
        if let Some(path) = &app_config.manifest {
            return PathManifest::from_path(path.clone())
                .await
                .context(ManifestSnafu);
        }

        let manifest = PathManifest::read(&app_config.root)
            .await
            .context(ManifestSnafu)?;
        Ok(manifest.unwrap_or_else(|| {
            debug!("No manifest found, using the built-in sample");
            PathManifest::sample()
        }))
    }

    /// Writes the directory summary followed by the files found at `query`
    pub fn report(
        tree: &FilesystemTree,
        query: &str,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        writeln!(out, "{}", "Directory structure:".green()).context(OutputSnafu)?;
        for summary in tree.summarize() {
            writeln!(out, "{summary},").context(OutputSnafu)?;
        }
        writeln!(out).context(OutputSnafu)?;

        let files = tree.files_at(query).context(QuerySnafu { query })?;
        writeln!(out, "{}", format!("Files at path: {query}").green()).context(OutputSnafu)?;
        for file in files {
            writeln!(out, "{}", file.path()).context(OutputSnafu)?;
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the manifest"))]
    ManifestError { source: ManifestError },
    #[snafu(display("Cannot list files at '{}'", query))]
    QueryError { query: String, source: LookupError },
    #[snafu(display("Failed to write the report"))]
    OutputError { source: std::io::Error },
}

use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, warn};

use super::{
    Node,
    path::{self, PathError},
};

pub const DEFAULT_ROOT_NAME: &str = "root_dir";

/// In-memory tree of files and directories, owned entirely by its root node.
#[derive(Debug, PartialEq, Eq)]
pub struct FilesystemTree {
    root: Node,
}

/// A file to insert, with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathEntry {
    pub path: String,
    pub size: u64,
    pub created_at: i64,
}

impl PathEntry {
    pub fn new(path: impl Into<String>, size: u64, created_at: i64) -> Self {
        Self {
            path: path.into(),
            size,
            created_at,
        }
    }
}

impl From<&str> for PathEntry {
    fn from(path: &str) -> Self {
        Self::new(path, 0, 0)
    }
}

impl From<String> for PathEntry {
    fn from(path: String) -> Self {
        Self::new(path, 0, 0)
    }
}

impl FilesystemTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        Self {
            root: Node::directory(root_name.clone(), root_name),
        }
    }

    /// Builds a tree from a list of entries, skipping the ones that cannot be inserted
    pub fn from_paths<I, E>(root_name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<PathEntry>,
    {
        entries
            .into_iter()
            .map(Into::<PathEntry>::into)
            .fold(Self::new(root_name), |mut tree, entry| {
                match tree.add(&entry.path, entry.size, entry.created_at) {
                    Ok(()) => tree,
                    Err(e) => {
                        warn!("Failed to insert path '{}': {}", entry.path, e);
                        tree
                    }
                }
            })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Inserts a file, creating every missing directory on the way.
    ///
    /// All segments but the last are directories. The last one names a file
    /// only if it contains a `.`; otherwise it is treated as one more
    /// directory. Inserting a name that already exists is a no-op.
    ///
    /// Fails with [`InsertError::NotADirectory`] when a segment before the
    /// last names an existing file.
    pub fn add(&mut self, path: &str, size: u64, created_at: i64) -> Result<(), InsertError> {
        let segments = path::insertion_segments(path).context(InvalidPathSnafu)?;
        let (last, directories) = segments
            .split_last()
            .ok_or(PathError::Empty)
            .context(InvalidPathSnafu)?;

        let mut current = &mut self.root;
        for name in directories {
            current = Self::descend(current, name)?;
        }

        if path::looks_like_file(last) {
            if !current.insert_file(last, size, created_at) {
                debug!("'{}' already present, skipping", path);
            }
        } else {
            Self::descend(current, last)?;
        }

        Ok(())
    }

    /// Same as [`add`](Self::add) with zero size and timestamp
    pub fn add_file(&mut self, path: &str) -> Result<(), InsertError> {
        self.add(path, 0, 0)
    }

    fn descend<'a>(current: &'a mut Node, name: &str) -> Result<&'a mut Node, InsertError> {
        let child = current.child_or_insert_directory(name);
        ensure!(
            child.is_directory(),
            NotADirectorySnafu {
                path: child.path()
            }
        );
        Ok(child)
    }

    /// Lists the files directly under the directory at `path`.
    ///
    /// The first segment always stands for the root, whatever it says.
    pub fn files_at(&self, path: &str) -> Result<Vec<&Node>, LookupError> {
        let (root_token, segments) =
            path::lookup_segments(path).context(lookup_error::InvalidPathSnafu)?;
        if root_token != self.root.name() {
            debug!(
                "Lookup root segment '{}' differs from root '{}'",
                root_token,
                self.root.name()
            );
        }

        if segments.is_empty() {
            return Ok(Self::files_of(&self.root));
        }

        let mut current = &self.root;
        let mut prefix = root_token.to_string();
        for segment in segments {
            prefix = path::join(&prefix, segment);
            current = current
                .child(segment)
                .filter(|node| node.is_directory())
                .context(lookup_error::PathNotFoundSnafu { prefix: &prefix })?;
        }
        debug!("Resolved '{}' to {}", path, current.path());

        Ok(Self::files_of(current))
    }

    fn files_of(directory: &Node) -> Vec<&Node> {
        directory.children().filter(|node| node.is_file()).collect()
    }
}

impl Default for FilesystemTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum InsertError {
    #[snafu(display("Cannot insert an invalid path"))]
    InvalidPath { source: PathError },
    #[snafu(display("Cannot insert a file into a file: {}", path))]
    NotADirectory { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(module)]
pub enum LookupError {
    #[snafu(display("Cannot look up an invalid path"))]
    InvalidPath { source: PathError },
    #[snafu(display("path does not exist: {}", prefix))]
    PathNotFound { prefix: String },
}

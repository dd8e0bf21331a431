//! In-memory filesystem tree.
//!
//! Paths are inserted one at a time, with missing directories created on the
//! way. The tree can list the files of a directory or be walked breadth-first
//! to summarize how many files and subdirectories each directory holds.

mod node;
mod path;
mod traversal;
mod tree;

pub use node::{Node, NodeKind};
pub use path::PathError;
pub use traversal::{BreadthFirst, DirectorySummary};
pub use tree::{DEFAULT_ROOT_NAME, FilesystemTree, InsertError, LookupError, PathEntry};

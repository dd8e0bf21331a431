use std::fmt;

use derive_more::Display;
use hashlink::{LinkedHashMap, linked_hash_map::Entry};
use tracing::debug;

use super::path::join;

/// Represents the type of a filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    File,
    Directory,
}

/// A single file or directory entry of a [`FilesystemTree`](super::FilesystemTree).
///
/// Children are keyed by name and iterate in insertion order. Only directories
/// ever gain children.
///
/// Paths can be arbitrarily deep, so dropping, comparing and formatting never
/// recurse into descendants.
pub struct Node {
    name: String,
    path: String,
    kind: NodeKind,
    size: u64,
    created_at: i64,
    children: LinkedHashMap<String, Node>,
    directory_count: usize,
    file_count: usize,
}

impl Node {
    pub(crate) fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name.into(), path.into(), NodeKind::Directory, 0, 0)
    }

    fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        size: u64,
        created_at: i64,
    ) -> Self {
        Self::new(name.into(), path.into(), NodeKind::File, size, created_at)
    }

    fn new(name: String, path: String, kind: NodeKind, size: u64, created_at: i64) -> Self {
        Self {
            name,
            path,
            kind,
            size,
            created_at,
            children: LinkedHashMap::new(),
            directory_count: 0,
            file_count: 0,
        }
    }

    /// The single path segment naming this node within its parent
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full `/`-separated path, starting with the root's name
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Size in bytes. Always 0 for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opaque creation timestamp, usually Unix seconds
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Immediate children in insertion order
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Number of immediate directory children
    pub fn directory_count(&self) -> usize {
        self.directory_count
    }

    /// Number of immediate file children
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Returns the child called `name`, creating it as a directory when absent.
    /// An existing child is returned as is, whatever its kind.
    pub(crate) fn child_or_insert_directory(&mut self, name: &str) -> &mut Node {
        match self.children.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = join(&self.path, name);
                debug!("Creating directory {path}");
                self.directory_count += 1;
                entry.insert(Node::directory(name, path))
            }
        }
    }

    fn has_same_entry(&self, other: &Node) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.kind == other.kind
            && self.size == other.size
            && self.created_at == other.created_at
            && self.directory_count == other.directory_count
            && self.file_count == other.file_count
            && self.children.len() == other.children.len()
    }

    /// Adds a file child unless a child with that name already exists.
    /// Returns whether a node was created.
    pub(crate) fn insert_file(&mut self, name: &str, size: u64, created_at: i64) -> bool {
        match self.children.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                let path = join(&self.path, name);
                debug!("Creating file {path} ({size} bytes)");
                self.file_count += 1;
                entry.insert(Node::file(name, path, size, created_at));
                true
            }
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children)
            .into_iter()
            .map(|(_, child)| child)
            .collect::<Vec<_>>();
        while let Some(mut node) = pending.pop() {
            pending.extend(
                std::mem::take(&mut node.children)
                    .into_iter()
                    .map(|(_, child)| child),
            );
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if !left.has_same_entry(right) {
                return false;
            }
            for ((left_name, left_child), (right_name, right_child)) in
                left.children.iter().zip(right.children.iter())
            {
                if left_name != right_name {
                    return false;
                }
                pending.push((left_child, right_child));
            }
        }
        true
    }
}

impl Eq for Node {}

/// Lists children by name only
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("created_at", &self.created_at)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("directory_count", &self.directory_count)
            .field("file_count", &self.file_count)
            .finish()
    }
}

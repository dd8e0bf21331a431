use std::collections::VecDeque;

use derive_more::Display;

use super::{FilesystemTree, Node};

/// Breadth-first walk over a node and all of its descendants.
///
/// Each node has a single owner, so a plain queue is enough: no node can be
/// reached twice.
#[derive(Debug, Clone)]
pub struct BreadthFirst<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> BreadthFirst<'a> {
    pub fn new(start: &'a Node) -> Self {
        Self {
            queue: VecDeque::from([start]),
        }
    }
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

/// Occupancy of a single directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{{ \"path\": \"{path}\", \"dirs\": {directory_count}, \"files\": {file_count} }}")]
pub struct DirectorySummary<'a> {
    pub path: &'a str,
    pub directory_count: usize,
    pub file_count: usize,
}

impl<'a> From<&'a Node> for DirectorySummary<'a> {
    fn from(node: &'a Node) -> Self {
        Self {
            path: node.path(),
            directory_count: node.directory_count(),
            file_count: node.file_count(),
        }
    }
}

impl FilesystemTree {
    /// Every node of the tree, root first, level by level
    pub fn iter(&self) -> BreadthFirst<'_> {
        BreadthFirst::new(self.root())
    }

    /// One summary per directory, in breadth-first order.
    ///
    /// The walk is lazy and starts over on every call.
    pub fn summarize(&self) -> impl Iterator<Item = DirectorySummary<'_>> {
        self.iter()
            .filter(|node| node.is_directory())
            .map(DirectorySummary::from)
    }
}

impl<'a> IntoIterator for &'a FilesystemTree {
    type Item = &'a Node;
    type IntoIter = BreadthFirst<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

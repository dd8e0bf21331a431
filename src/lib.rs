//! In-memory filesystem tree: incremental path insertion, file lookup by
//! directory path and breadth-first directory summaries.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
mod ext;
pub mod filesystem;

pub use filesystem::{
    BreadthFirst, DirectorySummary, FilesystemTree, InsertError, LookupError, Node, NodeKind,
    PathEntry,
};

//! Virtual Filesystem (VFS) for shellkata.
//!
//! A single owned tree of directories and presence-only files:
//!
//! ```text
//! /
//! └── home/
//!     └── student/          # seeded home
//!         ├── downloads/
//!         ├── projects/
//!         └── readme.txt
//! ```
//!
//! Queries (`exists`, `is_dir`, `is_file`) never fail: anything that can't be
//! walked is simply absent. Mutations fail with a [`VfsError`] and leave the
//! tree as it was.

mod memory;
mod node;

pub use memory::MemoryFs;
pub use node::{DirEntry, Node, NodeKind};

use thiserror::Error;

/// Errors from filesystem mutations and listings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("a path component is a file: {0}")]
    PathIsFile(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("is a directory: {0}")]
    TargetIsDirectory(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("no such file or directory: {0}")]
    NoSuchPath(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("tree root must be a directory")]
    RootNotDirectory,
}

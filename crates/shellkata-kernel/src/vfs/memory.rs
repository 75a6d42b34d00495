//! In-memory filesystem tree.
//!
//! Every lesson runs against one of these. Nothing is ever written to disk;
//! files are presence-only markers.

use std::collections::BTreeMap;

use super::node::{DirEntry, Node};
use super::VfsError;
use crate::path::{is_valid_name, segments};

/// Directories created by [`MemoryFs::seed_home`], relative to home.
const SEED_DIRS: &[&str] = &["projects", "downloads"];
/// Marker file created by [`MemoryFs::seed_home`], relative to home.
const SEED_FILE: &str = "readme.txt";

/// In-memory filesystem.
///
/// Paths passed in are expected to be absolute and normalized. Lookups are
/// lenient anyway: `.` and `..` segments are collapsed before walking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFs {
    root: Node,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a filesystem holding only `/`.
    pub fn new() -> Self {
        Self {
            root: Node::directory(),
        }
    }

    /// Create a filesystem pre-populated with the home skeleton.
    pub fn seeded(home: &str) -> Result<Self, VfsError> {
        let mut fs = Self::new();
        fs.seed_home(home)?;
        Ok(fs)
    }

    /// Rebuild a filesystem from a deserialized tree.
    ///
    /// The root must be a directory and every entry name must be valid.
    pub fn from_root(root: Node) -> Result<Self, VfsError> {
        if !root.is_dir() {
            return Err(VfsError::RootNotDirectory);
        }
        validate_names(&root, "")?;
        Ok(Self { root })
    }

    /// The root node, for serialization.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Create the fixed starting layout under `home`. Idempotent.
    pub fn seed_home(&mut self, home: &str) -> Result<(), VfsError> {
        self.ensure_dir("/home")?;
        self.ensure_dir(home)?;
        for dir in SEED_DIRS {
            self.ensure_dir(&format!("{}/{}", home, dir))?;
        }
        self.touch(&format!("{}/{}", home, SEED_FILE))
    }

    fn lookup(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for part in segments(path) {
            current = current.child(part)?;
        }
        Some(current)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(Node::is_dir)
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(Node::is_file)
    }

    /// Create a directory and all missing ancestors, like `mkdir -p`.
    ///
    /// Fails with [`VfsError::PathIsFile`] if any component is a file; in
    /// that case nothing is created.
    pub fn ensure_dir(&mut self, path: &str) -> Result<(), VfsError> {
        let parts = segments(path);
        self.dir_children_mut(&parts, path).map(|_| ())
    }

    /// Create a directory that must not exist yet.
    ///
    /// Missing ancestors are still created.
    pub fn mkdir(&mut self, path: &str) -> Result<(), VfsError> {
        if self.exists(path) {
            return Err(VfsError::AlreadyExists(path.to_string()));
        }
        self.ensure_dir(path)
    }

    /// Create a file if absent, creating parent directories as needed.
    pub fn touch(&mut self, path: &str) -> Result<(), VfsError> {
        let raw_last = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("");
        if raw_last == "." || raw_last == ".." {
            return Err(VfsError::InvalidName(path.to_string()));
        }

        let parts = segments(path);
        let Some((name, parent)) = parts.split_last() else {
            return Err(VfsError::InvalidName(path.to_string()));
        };
        if !is_valid_name(name) {
            return Err(VfsError::InvalidName(path.to_string()));
        }
        if self.is_dir(path) {
            return Err(VfsError::TargetIsDirectory(path.to_string()));
        }

        let children = self.dir_children_mut(parent, path)?;
        children.entry(name.to_string()).or_insert(Node::File);
        Ok(())
    }

    /// Sorted entry names of a directory.
    pub fn list_dir(&self, path: &str) -> Result<Vec<String>, VfsError> {
        Ok(self.list(path)?.into_iter().map(|e| e.name).collect())
    }

    /// Sorted entries of a directory, with their kinds.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let node = self
            .lookup(path)
            .ok_or_else(|| VfsError::NoSuchPath(path.to_string()))?;
        let children = node
            .children()
            .ok_or_else(|| VfsError::NotADirectory(path.to_string()))?;

        // BTreeMap iteration is already sorted by name
        Ok(children
            .iter()
            .map(|(name, child)| DirEntry {
                name: name.clone(),
                kind: child.kind(),
            })
            .collect())
    }

    /// Walk `parts` from the root creating directories, and return the
    /// children map of the last one.
    ///
    /// The whole path is checked before anything is created, so a file in
    /// the way leaves the tree untouched.
    fn dir_children_mut(
        &mut self,
        parts: &[&str],
        path: &str,
    ) -> Result<&mut BTreeMap<String, Node>, VfsError> {
        let mut cursor = Some(&self.root);
        for part in parts {
            match cursor {
                Some(Node::File) => return Err(VfsError::PathIsFile(path.to_string())),
                Some(node) => cursor = node.child(part),
                None => break,
            }
        }
        if let Some(Node::File) = cursor {
            return Err(VfsError::PathIsFile(path.to_string()));
        }

        let mut current = &mut self.root;
        for part in parts {
            current = current
                .children_mut()
                .ok_or_else(|| VfsError::PathIsFile(path.to_string()))?
                .entry(part.to_string())
                .or_insert_with(Node::directory);
        }
        current
            .children_mut()
            .ok_or_else(|| VfsError::PathIsFile(path.to_string()))
    }
}

fn validate_names(node: &Node, at: &str) -> Result<(), VfsError> {
    if let Some(children) = node.children() {
        for (name, child) in children {
            if !is_valid_name(name) {
                return Err(VfsError::InvalidName(format!("{}/{}", at, name)));
            }
            validate_names(child, &format!("{}/{}", at, name))?;
        }
    }
    Ok(())
}

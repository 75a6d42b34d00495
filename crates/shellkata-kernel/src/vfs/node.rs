//! Tree nodes and directory entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One node of the tree.
///
/// A directory exclusively owns its children, so the tree can't contain
/// shared nodes or cycles. Files carry no data, only their presence.
///
/// Serialized as `{"kind": "dir", "children": {...}}` or `{"kind": "file"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    #[serde(rename = "dir")]
    Directory {
        #[serde(default)]
        children: BTreeMap<String, Node>,
    },
    #[serde(rename = "file")]
    File,
}

impl Node {
    /// Create an empty directory node.
    pub fn directory() -> Self {
        Node::Directory {
            children: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory { .. } => NodeKind::Directory,
            Node::File => NodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File)
    }

    /// Children of a directory, `None` for a file.
    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File => None,
        }
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().and_then(|c| c.get(name))
    }
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Name of the entry (not full path).
    pub name: String,
    pub kind: NodeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_serializes_as_bare_tag() {
        let json = serde_json::to_value(Node::File).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "file"}));
    }

    #[test]
    fn directory_serializes_children_by_name() {
        let mut children = BTreeMap::new();
        children.insert("a.txt".to_string(), Node::File);
        children.insert("sub".to_string(), Node::directory());
        let dir = Node::Directory { children };

        let json = serde_json::to_value(&dir).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "dir",
                "children": {
                    "a.txt": {"kind": "file"},
                    "sub": {"kind": "dir", "children": {}}
                }
            })
        );
    }

    #[test]
    fn directory_without_children_key_is_empty() {
        let node: Node = serde_json::from_str(r#"{"kind": "dir"}"#).unwrap();
        assert_eq!(node, Node::directory());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Node, _> = serde_json::from_str(r#"{"kind": "symlink"}"#);
        assert!(result.is_err());
    }
}

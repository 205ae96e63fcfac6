//! Secret hierarchy model and its search projection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::search::{NameMatcher, SearchMode};

/// One entry in the password store hierarchy.
///
/// 密码库层级中的一个条目（目录或密码）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Leaf segment shown in the UI.
    pub name: String,
    /// Fully-qualified identifier, unique across the tree.
    pub path: String,
    pub is_dir: bool,
    /// Only populated for directories.
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// Immutable snapshot of the whole forest.
///
/// Reloads swap the `Arc` instead of patching nodes in place.
pub type Tree = Arc<Vec<TreeNode>>;

impl TreeNode {
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: false,
            children: Vec::new(),
        }
    }

    pub fn dir(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: true,
            children,
        }
    }

    /// Paths of every leaf in this subtree. Directories are never included.
    pub fn leaf_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_leaf_paths(&mut paths);
        paths
    }

    fn collect_leaf_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_dir {
            for child in &self.children {
                child.collect_leaf_paths(out);
            }
        } else {
            out.push(&self.path);
        }
    }
}

/// Project `tree` onto the entries whose leaf names match `query`.
///
/// Matching is leaf-oriented: a directory survives only if at least one
/// descendant leaf matches, and then only with its matching descendants.
/// An empty query returns the same snapshot.
pub fn filter_tree(tree: &Tree, query: &str, matcher: &NameMatcher) -> Tree {
    if query.is_empty() {
        return Arc::clone(tree);
    }
    let needle = query.to_lowercase();
    Arc::new(filter_nodes(tree, &needle, matcher))
}

fn filter_nodes(nodes: &[TreeNode], needle: &str, matcher: &NameMatcher) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter_map(|node| {
            if node.is_dir {
                let children = filter_nodes(&node.children, needle, matcher);
                (!children.is_empty()).then(|| TreeNode {
                    name: node.name.clone(),
                    path: node.path.clone(),
                    is_dir: true,
                    children,
                })
            } else {
                matcher.matches(&node.name, needle).then(|| node.clone())
            }
        })
        .collect()
}

/// Memo for [`filter_tree`].
///
/// Keyed on the identity of the tree snapshot, the query and the search mode.
/// The key is compared on every lookup, so a replaced tree or a new query
/// always recomputes.
#[derive(Debug, Default)]
pub struct FilterMemo {
    entry: Option<MemoEntry>,
}

#[derive(Debug)]
struct MemoEntry {
    // Holding the input Arc keeps its address from being reused by a later snapshot.
    tree: Tree,
    query: String,
    mode: SearchMode,
    result: Tree,
}

impl FilterMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, tree: &Tree, query: &str, matcher: &NameMatcher) -> Tree {
        if let Some(entry) = &self.entry {
            if Arc::ptr_eq(&entry.tree, tree) && entry.query == query && entry.mode == matcher.mode()
            {
                return Arc::clone(&entry.result);
            }
        }

        let result = filter_tree(tree, query, matcher);
        self.entry = Some(MemoEntry {
            tree: Arc::clone(tree),
            query: query.to_string(),
            mode: matcher.mode(),
            result: Arc::clone(&result),
        });
        result
    }
}

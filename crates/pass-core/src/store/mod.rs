//! Password store domain module.
//!
//! Models the secret hierarchy and the metadata of the store on disk.

mod info;
mod tree;

pub use info::StoreInfo;
pub use tree::{filter_tree, FilterMemo, Tree, TreeNode};

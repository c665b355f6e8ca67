//! Resource path tree for Portico.
//!
//! This crate turns a list of path strings into a tree with one node per
//! distinct path prefix. Nodes are stored in an arena and addressed by
//! [`NodeId`]; every node carries a payload of the caller's choosing.
//!
//! # Example
//!
//! ```rust
//! use portico_tree::{NodeId, PathTree, SegmentKind};
//!
//! let tree: PathTree<()> = PathTree::build(["/users", "/users/{id}", "/files/{proxy+}"]);
//!
//! let user = tree.resolve("/users/{id}").unwrap();
//! assert_eq!(tree.node(user).kind(), &SegmentKind::Param("id".to_string()));
//! assert_eq!(tree.path_of(user), "/users/{id}");
//! assert_eq!(tree.resolve(""), Some(NodeId::ROOT));
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!            "{id}"        "{proxy+}"
//! ```
//!
//! Segments are matched by exact, case-sensitive string, so `{id}` and
//! `{userId}` under one parent are two sibling nodes. Building never fails;
//! shapes a router could not serve (sibling captures, a greedy segment with
//! children, an empty parameter name) are logged as warnings.

#![doc(html_root_url = "https://docs.rs/portico-tree/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod segment;
mod tree;

pub use segment::{parse_path, path_params, split_path, SegmentKind};
pub use tree::{NodeId, PathNode, PathTree};

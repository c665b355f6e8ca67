//! Arena-backed path tree.
//!
//! Nodes live in a single `Vec` owned by the tree and refer to each other by
//! [`NodeId`]. Children are kept in insertion order, so two builds from the
//! same path list produce the same tree.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::segment::{parse_path, SegmentKind};

/// Index of a node in a [`PathTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node. Every tree has one.
    pub const ROOT: Self = Self(0);

    /// Returns the arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the path tree.
#[derive(Debug, Clone)]
pub struct PathNode<T> {
    segment: String,
    kind: SegmentKind,
    parent: Option<NodeId>,
    children: IndexMap<String, NodeId>,
    payload: T,
}

impl<T> PathNode<T> {
    /// The path segment this node represents (empty for the root).
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The kind of segment.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// The parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Looks up a direct child by its exact segment string.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<NodeId> {
        self.children.get(segment).copied()
    }

    /// Data attached to this node.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Mutable access to the data attached to this node.
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

/// A tree of path segments with a payload per node.
#[derive(Debug, Clone)]
pub struct PathTree<T> {
    nodes: Vec<PathNode<T>>,
}

impl<T: Default> Default for PathTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> PathTree<T> {
    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![PathNode {
                segment: String::new(),
                kind: SegmentKind::Static,
                parent: None,
                children: IndexMap::new(),
                payload: T::default(),
            }],
        }
    }

    /// Builds a tree from a list of paths, in order.
    ///
    /// Never fails: every path list yields one node per distinct prefix.
    pub fn build<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    /// Inserts a path below the root and returns its leaf.
    ///
    /// Existing nodes are reused; missing ones are created. An empty path
    /// returns the root.
    pub fn insert(&mut self, path: &str) -> NodeId {
        self.insert_at(NodeId::ROOT, path)
    }

    /// Inserts a path relative to `parent` and returns its leaf.
    ///
    /// Segments are matched by their literal text, so `{id}` and `{userId}`
    /// under the same parent become two sibling nodes. Shapes a router could
    /// not serve unambiguously are logged as warnings and kept.
    pub fn insert_at(&mut self, parent: NodeId, path: &str) -> NodeId {
        let segments = parse_path(path);
        Self::check_segments(&segments, path);

        let mut current = parent;
        for (segment, kind) in segments {
            current = match self.nodes[current.0].children.get(&segment) {
                Some(&child) => child,
                None => self.create_child(current, segment, kind),
            };
        }
        current
    }

    fn check_segments(segments: &[(String, SegmentKind)], path: &str) {
        for (segment, kind) in segments {
            if kind.capture_name().is_some_and(str::is_empty) {
                warn!(segment = %segment, path = %path, "path parameter has an empty name");
            }
        }
    }

    fn create_child(&mut self, parent: NodeId, segment: String, kind: SegmentKind) -> NodeId {
        let parent_node = &self.nodes[parent.0];

        if matches!(parent_node.kind, SegmentKind::Greedy(_)) {
            warn!(
                segment = %segment,
                parent = %self.path_of(parent),
                "path continues below a greedy segment"
            );
        }

        if kind.is_capture() {
            let existing = parent_node
                .children
                .iter()
                .find(|(_, id)| self.nodes[id.0].kind.is_capture());
            if let Some((existing, _)) = existing {
                warn!(
                    segment = %segment,
                    existing = %existing,
                    parent = %self.path_of(parent),
                    "sibling path captures"
                );
            }
        }

        let id = NodeId(self.nodes.len());
        debug!(parent = parent.0, node = id.0, segment = %segment, "created path node");

        self.nodes[parent.0].children.insert(segment.clone(), id);
        self.nodes.push(PathNode {
            segment,
            kind,
            parent: Some(parent),
            children: IndexMap::new(),
            payload: T::default(),
        });
        id
    }
}

impl<T> PathTree<T> {
    /// Looks up a path without modifying the tree.
    ///
    /// An empty path resolves to the root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        self.resolve_at(NodeId::ROOT, path)
    }

    /// Looks up a path relative to `from`.
    #[must_use]
    pub fn resolve_at(&self, from: NodeId, path: &str) -> Option<NodeId> {
        parse_path(path)
            .iter()
            .try_fold(from, |current, (segment, _)| {
                self.nodes.get(current.0)?.child(segment)
            })
    }

    /// Returns the node for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &PathNode<T> {
        &self.nodes[id.0]
    }

    /// Returns the node for an id, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&PathNode<T>> {
        self.nodes.get(id.0)
    }

    /// Returns a node's payload.
    #[must_use]
    pub fn payload(&self, id: NodeId) -> &T {
        &self.nodes[id.0].payload
    }

    /// Returns a node's payload mutably.
    pub fn payload_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].payload
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &PathNode<T> {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of a node (the root has depth 0).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Iterates over the strict ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.0].parent, |current| {
            self.nodes[current.0].parent
        })
    }

    /// The full path of a node, e.g. `/users/{id}`. The root is `/`.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments: Vec<&str> = std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| n != NodeId::ROOT)
            .map(|n| self.nodes[n.0].segment.as_str())
            .collect();
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PathNode<T>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Returns every node in depth-first pre-order, children in insertion
    /// order.
    #[must_use]
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children: Vec<NodeId> = self.nodes[id.0].children().collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceView<'a, T> {
    path_part: &'a str,
    path: String,
    #[serde(flatten)]
    payload: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ResourceView<'a, T>>,
}

impl<T> PathTree<T> {
    fn view(&self, id: NodeId) -> ResourceView<'_, T> {
        let node = &self.nodes[id.0];
        ResourceView {
            path_part: &node.segment,
            path: self.path_of(id),
            payload: &node.payload,
            children: node.children().map(|child| self.view(child)).collect(),
        }
    }
}

/// Serializes as a nested resource document rooted at `/`. The payload's
/// fields are inlined into each resource, so `T` must serialize as a map.
impl<T: Serialize> Serialize for PathTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view(NodeId::ROOT).serialize(serializer)
    }
}

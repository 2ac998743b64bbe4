//! Arena-allocated binary prefix tree.
//!
//! Nodes live in a flat `Vec` owned by the tree and refer to each other by
//! [`NodeId`]. Ownership flows strictly from the root to the leaves; the
//! `parent` index is only a relation used for upward walks and for telling a
//! left child from a right child.
//!
//! A [`PrefixTree`] is immutable once built. Construction goes through
//! [`TreeBuilder`], which is the only place nodes are created or linked.
//!
//! # Bit Convention
//!
//! Walking to the left child reads a `0`, walking to the right child reads a
//! `1`. A codeword is the sequence of sides taken from the root to a leaf.

use crate::error::{ConstructionError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Parse a code digit: `'0'` is left, `'1'` is right.
    pub fn from_bit(bit: char) -> Option<Self> {
        match bit {
            '0' => Some(Side::Left),
            '1' => Some(Side::Right),
            _ => None,
        }
    }

    /// The code digit for this side.
    pub fn bit(self) -> char {
        match self {
            Side::Left => '0',
            Side::Right => '1',
        }
    }
}

/// Symbol carried by a node.
///
/// Internal nodes are always `Unlabeled`. A leaf is `Unlabeled` only while a
/// codebook is being inserted; [`TreeBuilder::finish`] rejects any tree in
/// which that state survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Unlabeled,
    Labeled(String),
}

impl Label {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Label::Unlabeled => None,
            Label::Labeled(symbol) => Some(symbol),
        }
    }
}

// Unlabeled sorts before every symbol, matching an empty-string symbol.
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Unlabeled, Label::Unlabeled) => Ordering::Equal,
            (Label::Unlabeled, Label::Labeled(_)) => Ordering::Less,
            (Label::Labeled(_), Label::Unlabeled) => Ordering::Greater,
            (Label::Labeled(a), Label::Labeled(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
struct Node {
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    label: Label,
    /// Sum of descendant leaf frequencies (0 when unknown)
    frequency: u64,
}

impl Node {
    fn new(label: Label, frequency: u64) -> Self {
        Self {
            left: None,
            right: None,
            parent: None,
            label,
            frequency,
        }
    }

    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Total order over subtrees used to break merge ties.
///
/// Compares by frequency, then recursively by left subtree, then by right
/// subtree (an absent child sorts first), and finally by label.
fn compare_subtrees(nodes: &[Node], a: NodeId, b: NodeId) -> Ordering {
    let (na, nb) = (&nodes[a.0], &nodes[b.0]);
    na.frequency
        .cmp(&nb.frequency)
        .then_with(|| compare_optional(nodes, na.left, nb.left))
        .then_with(|| compare_optional(nodes, na.right, nb.right))
        .then_with(|| na.label.cmp(&nb.label))
}

fn compare_optional(nodes: &[Node], a: Option<NodeId>, b: Option<NodeId>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_subtrees(nodes, a, b),
    }
}

/// Mutable arena used while a tree is being constructed.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a labeled leaf.
    pub fn leaf(&mut self, symbol: &str, frequency: u64) -> NodeId {
        self.push(Node::new(Label::Labeled(symbol.to_string()), frequency))
    }

    /// Create an unlabeled node with no children and no frequency.
    pub fn placeholder(&mut self) -> NodeId {
        self.push(Node::new(Label::Unlabeled, 0))
    }

    /// Create an internal node over two existing roots.
    pub fn merge(&mut self, left: NodeId, right: NodeId) -> NodeId {
        // Saturates only for leaves not taken from a `FrequencyTable`
        let frequency = self.nodes[left.0]
            .frequency
            .saturating_add(self.nodes[right.0].frequency);
        let mut node = Node::new(Label::Unlabeled, frequency);
        node.left = Some(left);
        node.right = Some(right);
        let id = self.push(node);
        self.nodes[left.0].parent = Some(id);
        self.nodes[right.0].parent = Some(id);
        id
    }

    /// Return the child on `side`, creating a placeholder if it is missing.
    pub fn child_or_insert(&mut self, parent: NodeId, side: Side) -> NodeId {
        if let Some(child) = self.nodes[parent.0].child(side) {
            return child;
        }
        let child = self.placeholder();
        self.nodes[child.0].parent = Some(parent);
        match side {
            Side::Left => self.nodes[parent.0].left = Some(child),
            Side::Right => self.nodes[parent.0].right = Some(child),
        }
        child
    }

    /// Attach a symbol to an existing node.
    pub fn label(&mut self, id: NodeId, symbol: &str) {
        self.nodes[id.0].label = Label::Labeled(symbol.to_string());
    }

    /// Order two subtrees by the merge tie-break order.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        compare_subtrees(&self.nodes, a, b)
    }

    pub fn frequency(&self, id: NodeId) -> u64 {
        self.nodes[id.0].frequency
    }

    /// Freeze the arena into a tree rooted at `root`.
    ///
    /// # Errors
    /// - `ConstructionError::UnlabeledLeaf` if any leaf has no symbol
    pub fn finish(self, root: NodeId) -> Result<PrefixTree> {
        let tree = PrefixTree {
            nodes: self.nodes,
            root,
        };
        if let Some(leaf) = tree
            .root()
            .leaves()
            .into_iter()
            .find(|leaf| leaf.symbol().is_none())
        {
            return Err(ConstructionError::UnlabeledLeaf {
                path: leaf.codeword(),
            }
            .into());
        }
        Ok(tree)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

/// Immutable binary tree whose leaves carry symbols.
///
/// Frequency-built trees are full (every internal node has two children).
/// Codebook-built trees may leave a child out where the codebook does not
/// use that path.
#[derive(Debug, Clone)]
pub struct PrefixTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl PrefixTree {
    /// Handle to the root node.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Handle for an id, if it belongs to this tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Total number of nodes (leaves and internal).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow a path of code digits from the root.
    ///
    /// Returns `None` if the path leaves the tree or contains a non-binary
    /// digit. The empty path yields the root.
    pub fn walk(&self, path: &str) -> Option<NodeRef<'_>> {
        let mut node = self.root();
        for bit in path.chars() {
            node = node.child(Side::from_bit(bit)?)?;
        }
        Some(node)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// A position within a [`PrefixTree`].
///
/// Handles are cheap to copy and compare equal only when they point at the
/// same node of the same tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a PrefixTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.child(Side::Left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.child(Side::Right)
    }

    pub fn child(&self, side: Side) -> Option<NodeRef<'a>> {
        self.tree.node(self.id).child(side).map(|id| self.with(id))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.id).parent.map(|id| self.with(id))
    }

    pub fn label(&self) -> &'a Label {
        &self.tree.node(self.id).label
    }

    pub fn symbol(&self) -> Option<&'a str> {
        self.tree.node(self.id).label.symbol()
    }

    /// Sum of leaf frequencies below this node; 0 without frequency data.
    pub fn frequency(&self) -> u64 {
        self.tree.node(self.id).frequency
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.id).is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.id == self.tree.root
    }

    /// Which child of its parent this node is (`None` for the root).
    pub fn side(&self) -> Option<Side> {
        let parent = self.tree.node(self.tree.node(self.id).parent?);
        if parent.left == Some(self.id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Length of the longest path from this node down to a leaf.
    ///
    /// A leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.id, 0usize)];
        while let Some((id, below)) = stack.pop() {
            let node = self.tree.node(id);
            deepest = deepest.max(below);
            stack.extend(node.left.map(|c| (c, below + 1)));
            stack.extend(node.right.map(|c| (c, below + 1)));
        }
        deepest
    }

    /// Distance from the root (the root is at level 0).
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut walk = *self;
        while let Some(parent) = walk.parent() {
            level += 1;
            walk = parent;
        }
        level
    }

    /// Code digits on the path from the root to this node.
    pub fn codeword(&self) -> String {
        let mut bits = Vec::new();
        let mut walk = *self;
        while let (Some(side), Some(parent)) = (walk.side(), walk.parent()) {
            bits.push(side.bit());
            walk = parent;
        }
        bits.iter().rev().collect()
    }

    /// Leaves of this subtree in left-to-right order.
    pub fn leaves(&self) -> Vec<NodeRef<'a>> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let node = self.tree.node(id);
            if node.is_leaf() {
                leaves.push(self.with(id));
            }
            // Right pushed first so the left subtree is visited first
            stack.extend(node.right);
            stack.extend(node.left);
        }
        leaves
    }

    fn with(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.0)
            .field("label", self.label())
            .field("frequency", &self.frequency())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((a b) e) with frequencies 25, 76, 135.
    fn sample() -> PrefixTree {
        let mut builder = TreeBuilder::new();
        let a = builder.leaf("a", 25);
        let b = builder.leaf("b", 76);
        let e = builder.leaf("e", 135);
        let ab = builder.merge(b, a);
        let root = builder.merge(e, ab);
        builder.finish(root).unwrap()
    }

    #[test]
    fn test_navigation() {
        let tree = sample();
        let root = tree.root();

        assert!(root.is_root());
        assert!(root.parent().is_none());
        assert_eq!(root.frequency(), 236);
        assert_eq!(root.left().unwrap().symbol(), Some("e"));

        let inner = root.right().unwrap();
        assert_eq!(inner.frequency(), 101);
        assert_eq!(inner.parent().unwrap(), root);
        assert_eq!(inner.left().unwrap().symbol(), Some("b"));
        assert_eq!(inner.right().unwrap().symbol(), Some("a"));
    }

    #[test]
    fn test_depth_and_level() {
        let tree = sample();
        let root = tree.root();
        assert_eq!(root.depth(), 2);
        assert_eq!(root.level(), 0);

        let a = tree.walk("11").unwrap();
        assert_eq!(a.symbol(), Some("a"));
        assert_eq!(a.depth(), 0);
        assert_eq!(a.level(), 2);
        assert_eq!(a.codeword(), "11");
        assert_eq!(root.right().unwrap().depth(), 1);
    }

    #[test]
    fn test_walk_off_tree() {
        let tree = sample();
        assert!(tree.walk("00").is_none());
        assert!(tree.walk("1x").is_none());
        assert_eq!(tree.walk("").unwrap(), tree.root());
    }

    #[test]
    fn test_leaves_left_to_right() {
        let tree = sample();
        let symbols: Vec<_> = tree
            .root()
            .leaves()
            .iter()
            .map(|leaf| leaf.symbol().unwrap())
            .collect();
        assert_eq!(symbols, vec!["e", "b", "a"]);
    }

    #[test]
    fn test_compare_frequency_first() {
        let mut builder = TreeBuilder::new();
        let small = builder.leaf("z", 1);
        let large = builder.leaf("a", 2);
        assert_eq!(builder.compare(small, large), Ordering::Less);
    }

    #[test]
    fn test_compare_leaf_before_internal_on_tie() {
        let mut builder = TreeBuilder::new();
        let x = builder.leaf("x", 1);
        let y = builder.leaf("y", 1);
        let merged = builder.merge(x, y);
        let leaf = builder.leaf("a", 2);
        // Equal frequency: an absent left child sorts first
        assert_eq!(builder.compare(leaf, merged), Ordering::Less);
        assert_eq!(builder.compare(merged, leaf), Ordering::Greater);
    }

    #[test]
    fn test_compare_symbol_last() {
        let mut builder = TreeBuilder::new();
        let a = builder.leaf("a", 3);
        let b = builder.leaf("b", 3);
        assert_eq!(builder.compare(a, b), Ordering::Less);
        assert_eq!(builder.compare(a, a), Ordering::Equal);
    }

    #[test]
    fn test_unlabeled_leaf_rejected() {
        let mut builder = TreeBuilder::new();
        let root = builder.placeholder();
        let left = builder.child_or_insert(root, Side::Left);
        builder.label(left, "a");
        builder.child_or_insert(root, Side::Right);

        let result = builder.finish(root);
        assert!(matches!(
            result,
            Err(crate::error::Error::Construction(
                ConstructionError::UnlabeledLeaf { ref path }
            )) if path == "1"
        ));
    }

    #[test]
    fn test_handles_from_different_trees_differ() {
        let first = sample();
        let second = sample();
        assert_ne!(first.root(), second.root());
        assert_eq!(first.root(), first.root());
    }
}

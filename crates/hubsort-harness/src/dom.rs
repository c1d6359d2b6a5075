#![forbid(unsafe_code)]

//! Arena-backed document tree.
//!
//! [`DomTree`] is a handle to a shared arena of element nodes addressed by
//! [`NodeId`]. It answers the [`DomRenderer`] seam and the handful of
//! queries a simulated engine needs (children, sibling index, selector
//! matching).
//!
//! Selectors are single simple selectors: `tag`, `.class` or `#id`.
//!
//! # Invariants
//!
//! 1. A node has at most one parent, and appears exactly once in that
//!    parent's child list.
//! 2. Node ids are never reused.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hubsort_runtime::DomRenderer;

/// Handle to one element in a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Shared element arena. Clones are handles to the same tree.
#[derive(Clone, Default)]
pub struct DomTree {
    nodes: Rc<RefCell<Vec<NodeData>>>,
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomTree")
            .field("nodes", &self.nodes.borrow().len())
            .finish()
    }
}

impl DomTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        });
        NodeId(nodes.len() - 1)
    }

    pub fn set_id(&self, node: NodeId, id: &str) {
        self.nodes.borrow_mut()[node.0].id = Some(id.to_string());
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    /// Position of `node` among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node.0].parent?;
        nodes[parent.0].children.iter().position(|&c| c == node)
    }

    /// Text of every child of `node`, in order.
    #[must_use]
    pub fn child_texts(&self, node: NodeId) -> Vec<String> {
        let nodes = self.nodes.borrow();
        nodes[node.0]
            .children
            .iter()
            .map(|c| nodes[c.0].text.clone())
            .collect()
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.insert_at(parent, child, None);
    }

    /// Insert `child` under `parent` at `index` (clamped), or last.
    pub fn insert_at(&self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        let children = &mut nodes[parent.0].children;
        let at = index.map_or(children.len(), |i| i.min(children.len()));
        children.insert(at, child);
        nodes[child.0].parent = Some(parent);
    }

    /// Remove `node` from its parent, if any.
    pub fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Detached copy of `node` and its subtree.
    pub fn deep_clone(&self, node: NodeId) -> NodeId {
        let data = self.nodes.borrow()[node.0].clone();
        let copy = self.create_element(&data.tag);
        {
            let mut nodes = self.nodes.borrow_mut();
            let target = &mut nodes[copy.0];
            target.id = data.id;
            target.classes = data.classes;
            target.text = data.text;
        }
        for child in data.children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Whether `node` matches the simple selector.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let data = &nodes[node.0];
        if let Some(class) = selector.strip_prefix('.') {
            data.classes.iter().any(|c| c == class)
        } else if let Some(id) = selector.strip_prefix('#') {
            data.id.as_deref() == Some(id)
        } else {
            data.tag.eq_ignore_ascii_case(selector)
        }
    }

    /// Pre-order descendants of `root`, excluding `root`.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }
}

impl DomRenderer<NodeId> for DomTree {
    fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) {
        if self.parent(*child) == Some(*parent) {
            self.detach(*child);
        }
    }

    fn insert_before(&self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) {
        self.detach(*node);
        let index = reference.and_then(|r| {
            self.children(*parent).iter().position(|c| c == r)
        });
        self.insert_at(*parent, *node, index);
    }

    fn query_selector(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        self.descendants(*root)
            .into_iter()
            .find(|&node| self.matches(node, selector))
    }
}

//! In-memory document and scheduler
//!
//! A small element tree with just enough behavior for the presenter, plus a
//! manually advanced clock. Used to drive the presenter without a browser.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::{Document, DomError, Scheduler, Task};

/// Handle to a node in a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

#[derive(Debug)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    value: String,
    visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DomError::Host(format!("unknown node {:?}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DomError::Host(format!("unknown node {:?}", id)))
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ROOT {
                return true;
            }
            current = self.nodes.get(node_id.0).and_then(|n| n.parent);
        }
        false
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id.0).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Put `node` into `parent.children` at `index`
    fn attach_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), DomError> {
        if self.is_ancestor(node, parent) {
            return Err(DomError::Host(format!(
                "cannot insert {:?} inside itself",
                node
            )));
        }
        self.node(node)?;
        self.detach(node);
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Parent of `reference` and the position of `reference` within it
    fn position(&self, reference: NodeId) -> Result<(NodeId, usize), DomError> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or_else(|| DomError::Detached(format!("{:?}", reference)))?;
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|c| *c == reference)
            .ok_or_else(|| DomError::Detached(format!("{:?}", reference)))?;
        Ok((parent, index))
    }

    /// Attached nodes in document order
    fn walk(&self, from: NodeId, out: &mut Vec<NodeId>) {
        out.push(from);
        if let Some(node) = self.nodes.get(from.0) {
            for child in &node.children {
                self.walk(*child, out);
            }
        }
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.nodes.get(id.0) {
            out.push_str(&node.text);
            for child in &node.children {
                self.text_content(*child, out);
            }
        }
    }
}

/// In-memory document rooted at a `body` element
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    tree: Rc<RefCell<Tree>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree {
                nodes: vec![Node::new("body")],
            })),
        }
    }

    pub fn body(&self) -> NodeId {
        ROOT
    }

    /// Build helper: append a new element under `parent`
    pub fn add_element(&self, parent: NodeId, tag: &str, id: Option<&str>) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let node_id = NodeId(tree.nodes.len());
        let mut node = Node::new(tag);
        node.id = id.map(str::to_string);
        node.parent = Some(parent);
        tree.nodes.push(node);
        if let Some(parent) = tree.nodes.get_mut(parent.0) {
            parent.children.push(node_id);
        }
        node_id
    }

    /// Simulate the user typing into an input
    pub fn set_input_value(&self, input: NodeId, value: &str) {
        if let Ok(node) = self.tree.borrow_mut().node_mut(input) {
            node.value = value.to_string();
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).ok().map(|n| n.tag.clone())
    }

    pub fn id(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).ok().and_then(|n| n.id.clone())
    }

    /// Own text only
    pub fn text(&self, node: NodeId) -> String {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    /// Text of the node and all its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().text_content(node, &mut out);
        out
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.visible)
            .unwrap_or(false)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let (parent, index) = tree.position(node).ok()?;
        let next = tree.node(parent).ok()?.children.get(index + 1).copied();
        next
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let (parent, index) = tree.position(node).ok()?;
        let index = index.checked_sub(1)?;
        let previous = tree.node(parent).ok()?.children.get(index).copied();
        previous
    }

    fn attached_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.tree.borrow().walk(ROOT, &mut out);
        out
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.attached_nodes();
        let tree = self.tree.borrow();
        nodes
            .into_iter()
            .find(|n| tree.node(*n).map(|n| n.id.as_deref() == Some(id)).unwrap_or(false))
    }

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        let nodes = self.attached_nodes();
        let tree = self.tree.borrow();
        nodes
            .into_iter()
            .filter(|n| {
                tree.node(*n)
                    .map(|n| n.classes.iter().any(|c| c == class))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn input_value(&self, input: &NodeId) -> String {
        self.tree
            .borrow()
            .node(*input)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.nodes.push(Node::new(tag));
        Ok(NodeId(tree.nodes.len() - 1))
    }

    fn set_id(&self, element: &NodeId, id: &str) {
        if let Ok(node) = self.tree.borrow_mut().node_mut(*element) {
            node.id = Some(id.to_string());
        }
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let node = tree.node_mut(*element)?;
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, element: &NodeId, class: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(*element)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .node(*element)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn set_text(&self, element: &NodeId, text: &str) {
        if let Ok(node) = self.tree.borrow_mut().node_mut(*element) {
            node.text = text.to_string();
        }
    }

    fn set_visible(&self, element: &NodeId, visible: bool) -> Result<(), DomError> {
        self.tree.borrow_mut().node_mut(*element)?.visible = visible;
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let end = tree.node(*parent)?.children.len();
        tree.attach_at(*parent, end, *child)
    }

    fn insert_before(&self, reference: &NodeId, node: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.position(*reference)?;
        tree.detach(*node);
        let (parent, index) = tree.position(*reference)?;
        tree.attach_at(parent, index, *node)
    }

    fn insert_after(&self, reference: &NodeId, node: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.position(*reference)?;
        tree.detach(*node);
        let (parent, index) = tree.position(*reference)?;
        tree.attach_at(parent, index + 1, *node)
    }

    fn is_attached(&self, element: &NodeId) -> bool {
        self.tree.borrow().is_attached(*element)
    }

    fn remove(&self, element: &NodeId) {
        self.tree.borrow_mut().detach(*element);
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Scheduler whose clock only moves when [`ManualScheduler::advance`] is called
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of tasks not yet run
    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Move the clock forward and run every task that came due, earliest
    /// first. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.borrow().now + by;
        let mut ran = 0;

        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let index = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                index.map(|i| {
                    let pending = clock.pending.remove(i);
                    clock.now = pending.due;
                    pending.task
                })
            };

            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        self.clock.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Result<(), DomError> {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + delay;
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.pending.push(Pending { due, seq, task });
        Ok(())
    }
}

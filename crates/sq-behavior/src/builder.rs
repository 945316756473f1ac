//! `TreeBuilder` — bottom-up construction of a [`BehaviorTree`].

use sq_core::NodeId;

use crate::{BehaviorError, BehaviorResult, BehaviorTree, Node};

/// Builds a tree leaves-first.
///
/// Every `add_*` method pushes one node and returns its handle; composites
/// take the handles of nodes that already exist.  The same handle may be
/// passed to several composites to share a subtree.
///
/// ```rust,ignore
/// let mut b = TreeBuilder::new();
/// let seen   = b.condition(Cond::PlayerVisible);
/// let shoot  = b.action(Act::Attack);
/// let chase  = b.action(Act::Chase);
/// let attack = b.sequence("attack", vec![seen, shoot]);
/// let engage = b.selector("engage", vec![attack, chase]);
/// let tree   = b.build(engage)?;
/// ```
#[derive(Debug)]
pub struct TreeBuilder<C, A> {
    nodes: Vec<Node<C, A>>,
}

impl<C, A> Default for TreeBuilder<C, A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<C, A> TreeBuilder<C, A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node<C, A>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn condition(&mut self, condition: C) -> NodeId {
        self.push(Node::Condition(condition))
    }

    pub fn action(&mut self, action: A) -> NodeId {
        self.push(Node::Action(action))
    }

    pub fn sequence(&mut self, label: &'static str, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Sequence { label, children })
    }

    pub fn selector(&mut self, label: &'static str, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Selector { label, children })
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate the arena and freeze it with `root` as the entry point.
    ///
    /// # Errors
    ///
    /// - [`BehaviorError::UnknownNode`] if `root` or any child handle is out
    ///   of range.
    /// - [`BehaviorError::EmptyComposite`] for a sequence or selector with no
    ///   children.
    /// - [`BehaviorError::ForwardReference`] if a composite names a child
    ///   pushed after it (the only way to form a cycle).
    pub fn build(self, root: NodeId) -> BehaviorResult<BehaviorTree<C, A>> {
        if root.index() >= self.nodes.len() {
            return Err(BehaviorError::UnknownNode(root));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let parent = NodeId(i as u32);
            let children = node.children();
            if children.is_empty() {
                if let Node::Sequence { label, .. } | Node::Selector { label, .. } = node {
                    return Err(BehaviorError::EmptyComposite(parent, *label));
                }
                continue;
            }
            for &child in children {
                if child.index() >= self.nodes.len() {
                    return Err(BehaviorError::UnknownNode(child));
                }
                if child >= parent {
                    return Err(BehaviorError::ForwardReference { parent, child });
                }
            }
        }

        Ok(BehaviorTree { nodes: self.nodes, root })
    }
}

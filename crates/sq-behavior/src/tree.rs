//! The `BehaviorTree` arena and its tick walk.

use sq_core::NodeId;
use tracing::trace;

use crate::{Behaviors, Node, Status};

/// A validated behavior tree.
///
/// Created by [`TreeBuilder::build`][crate::TreeBuilder::build], which
/// guarantees every child handle points at an earlier arena slot.  Ticking
/// therefore always terminates, and a subtree may be shared by several
/// composites without being duplicated.
#[derive(Clone, Debug)]
pub struct BehaviorTree<C, A> {
    pub(crate) nodes: Vec<Node<C, A>>,
    pub(crate) root:  NodeId,
}

impl<C: Copy + std::fmt::Debug, A: Copy + std::fmt::Debug> BehaviorTree<C, A> {
    /// Tick the whole tree once, starting at the root.
    pub fn tick<B>(&self, ctx: &mut B) -> Status
    where
        B: Behaviors<Condition = C, Action = A>,
    {
        self.tick_node(self.root, ctx)
    }

    fn tick_node<B>(&self, id: NodeId, ctx: &mut B) -> Status
    where
        B: Behaviors<Condition = C, Action = A>,
    {
        let status = match &self.nodes[id.index()] {
            Node::Sequence { children, .. } => {
                let mut status = Status::Success;
                for &child in children {
                    status = self.tick_node(child, ctx);
                    if status != Status::Success {
                        break;
                    }
                }
                status
            }
            Node::Selector { children, .. } => {
                let mut status = Status::Failure;
                for &child in children {
                    status = self.tick_node(child, ctx);
                    if status != Status::Failure {
                        break;
                    }
                }
                status
            }
            Node::Condition(condition) => Status::from_bool(ctx.check(*condition)),
            Node::Action(action)       => ctx.act(*action),
        };
        trace!(node = id.0, kind = self.nodes[id.index()].kind(), %status, "tick");
        status
    }
}

impl<C, A> BehaviorTree<C, A> {
    /// Handle of the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node, if the handle is in range.
    pub fn node(&self, id: NodeId) -> Option<&Node<C, A>> {
        self.nodes.get(id.index())
    }

    /// Label of a composite node; `None` for leaves and unknown handles.
    pub fn node_label(&self, id: NodeId) -> Option<&'static str> {
        match self.nodes.get(id.index())? {
            Node::Sequence { label, .. } | Node::Selector { label, .. } => Some(*label),
            Node::Action(_) | Node::Condition(_) => None,
        }
    }
}

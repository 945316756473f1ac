//! Tick status and the closed node vocabulary.

use std::fmt;

use sq_core::NodeId;

/// Result of ticking a node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Status {
    Success,
    Failure,
    /// Still in progress; the tree is re-ticked from the root next frame.
    Running,
}

impl Status {
    /// Map a predicate result onto `Success` / `Failure`.
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Running => "running",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a [`BehaviorTree`][crate::BehaviorTree] arena.
///
/// `C` and `A` are the user's condition and action key types.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<C, A> {
    /// AND: ticks children in order, stops at the first non-`Success`.
    Sequence {
        label:    &'static str,
        children: Vec<NodeId>,
    },
    /// OR: ticks children in order, stops at the first non-`Failure`.
    Selector {
        label:    &'static str,
        children: Vec<NodeId>,
    },
    /// Leaf that does work and may report `Running`.
    Action(A),
    /// Leaf predicate, mapped to `Success` / `Failure`.
    Condition(C),
}

impl<C, A> Node<C, A> {
    /// Child handles of a composite; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Sequence { children, .. } | Node::Selector { children, .. } => children,
            Node::Action(_) | Node::Condition(_) => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Sequence { .. } => "sequence",
            Node::Selector { .. } => "selector",
            Node::Action(_)       => "action",
            Node::Condition(_)    => "condition",
        }
    }
}

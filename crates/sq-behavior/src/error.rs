use sq_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("{0} does not exist in the tree arena")]
    UnknownNode(NodeId),

    #[error("composite {parent} refers to {child}, which was not built before it")]
    ForwardReference {
        parent: NodeId,
        child:  NodeId,
    },

    #[error("composite {0} ({1:?}) has no children")]
    EmptyComposite(NodeId, &'static str),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

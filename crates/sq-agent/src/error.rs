use thiserror::Error;

use sq_behavior::BehaviorError;
use sq_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("behavior tree: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("spatial: {0}")]
    Spatial(#[from] SpatialError),
}

pub type AgentResult<T> = Result<T, AgentError>;

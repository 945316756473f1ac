use sq_agent::AgentError;
use sq_core::{AgentId, CoreError, Vec3};
use sq_policy::PolicyError;
use sq_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("grid error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("agent construction failed: {0}")]
    Agent(#[from] AgentError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("agent {agent} cannot spawn at {position}: {source}")]
    Spawn {
        agent:    AgentId,
        position: Vec3,
        source:   SpatialError,
    },

    #[error("agent {0} is not in the squad")]
    UnknownAgent(AgentId),
}

pub type SimResult<T> = Result<T, SimError>;

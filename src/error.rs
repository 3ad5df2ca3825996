//! Error taxonomy
//!
//! Collisions and deaths are ordinary state transitions and never show up
//! here. Only round setup can fail fatally; spawn exhaustion is recovered
//! inside the simulation by deferring the spawn.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected at round start
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No free cell for a food or power-up
    #[error("no free cell for {what} after {attempts} attempts")]
    SpawnExhausted { what: &'static str, attempts: u32 },

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }
}

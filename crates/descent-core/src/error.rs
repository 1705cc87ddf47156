use thiserror::Error;

use crate::ports::TransportError;

#[derive(Debug, Error)]
pub enum DescentError {
    #[error("message codec: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

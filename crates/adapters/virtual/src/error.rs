//! Errors of the simulated cloud.

use aarlo_domain::error::AarloError;

#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("unknown endpoint {0}")]
    UnknownEndpoint(String),

    #[error("no base station with id {0}")]
    UnknownBase(String),

    #[error("no image at {0}")]
    UnknownImage(String),

    #[error("not logged in")]
    NotConnected,
}

impl From<VirtualError> for AarloError {
    fn from(err: VirtualError) -> Self {
        Self::Backend(Box::new(err))
    }
}

use thiserror::Error;

use batchline_core::BatchError;

/// Invocation-level failure. Item-level problems never end up here.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

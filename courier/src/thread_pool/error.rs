use std::{result, time::Duration};

use thiserror::Error;
use tokio::task::JoinError;

use crate::AnyBoxedError;

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// The global `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build thread pool context for thread {1}/{2}")]
    BuildContextError(#[source] AnyBoxedError, usize, usize),
    #[error("cannot submit task: queue is full ({0} pending tasks)")]
    PoolSaturatedError(usize),
    #[error("cannot submit task: thread pool is closed")]
    PoolClosedError,
    #[error("task has been cancelled before completion")]
    TaskCancelledError,
    #[error("task panicked: {0}")]
    TaskPanickedError(String),
    #[error("task output has already been consumed")]
    TaskAlreadyResolvedError,
    #[error("cannot wait for task: timed out after {0:?}")]
    WaitTaskTimeoutError(Duration),

    #[error(transparent)]
    JoinError(#[from] JoinError),
}

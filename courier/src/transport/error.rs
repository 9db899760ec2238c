use std::{any::Any, io, result};

use thiserror::Error;

use crate::{AnyBoxedError, AnyError};

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// The global `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot send email without a sender")]
    SendEmailMissingSenderError,
    #[error("cannot send email without a recipient")]
    SendEmailMissingRecipientError,
    #[error("cannot send email: invalid custom header {0:?}")]
    SendEmailInvalidHeaderError(String),
    #[error("cannot build wire message")]
    BuildWireMessageError(#[source] io::Error),
    #[error("cannot send email: no sender configured")]
    UndefinedTransportError,
    #[error("cannot send email later: no delivery pool configured")]
    UndefinedPoolError,
}

impl AnyError for Error {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<Error> for AnyBoxedError {
    fn from(err: Error) -> Self {
        Box::new(err)
    }
}

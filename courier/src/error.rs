//! # Error
//!
//! Module dedicated to the library errors. It contains the global
//! [`Error`] enum based on [`thiserror::Error`], its [`Result`] alias
//! and the dynamic [`AnyError`] used at capability boundaries.

use std::{any::Any, error, io, result};

use thiserror::Error;

use crate::{thread_pool, transport};

/// The global `Result` alias of the library.
pub type Result<T> = result::Result<T, Error>;

/// The global `Error` enum of the library.
///
/// Template and delivery failures never end up here: they are
/// recorded into results. This enum only covers programming errors
/// and faults of external capabilities the library cannot recover
/// from.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot load templates: template id is empty")]
    EmptyTemplateIdError,
    #[error("cannot resolve template {1}-{2}")]
    ResolveTemplateError(#[source] io::Error, String, String),

    #[error(transparent)]
    ThreadPoolError(#[from] thread_pool::Error),
    #[error(transparent)]
    TransportError(#[from] transport::Error),
}

/// The global any `Result` alias of the library.
///
/// The difference with [`Result`] is that it takes a dynamic error
/// `Box<dyn AnyError>`.
pub type AnyResult<T> = result::Result<T, AnyBoxedError>;

/// The global, dowcastable any `Error` trait of the library.
///
/// This trait is used instead of [`Error`] when an error that is not
/// known at compilation time cannot be placed in a generic due to
/// object-safe trait constraint. The main use case is for custom
/// transports.
pub trait AnyError: error::Error + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl AnyError for io::Error {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The global any boxed `Error` alias of the module.
pub type AnyBoxedError = Box<dyn AnyError + Send + 'static>;

impl error::Error for AnyBoxedError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.as_ref().source()
    }
}

impl From<io::Error> for AnyBoxedError {
    fn from(err: io::Error) -> Self {
        Box::new(err)
    }
}

/// Flattens an error and its sources into one line.
///
/// Used wherever a failure crosses a boundary as a plain string.
pub(crate) fn error_chain(err: &dyn error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();

    while let Some(err) = source {
        chain.push_str(": ");
        chain.push_str(&err.to_string());
        source = err.source();
    }

    chain
}

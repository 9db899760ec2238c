//! # Transport
//!
//! Module dedicated to email delivery. A [`Transport`] delivers a
//! [`WireMessage`] built from a rendered [`Email`](crate::Email).
//! Available transports:
//!
//! - [`SmtpTransport`] (requires the `smtp` cargo feature)
//! - [`SendmailTransport`] (requires the `sendmail` cargo feature)
//! - [`UndefinedTransport`], used when no sender is configured
//!
//! Custom transports only need to implement the [`Transport`] trait.

mod error;
#[cfg(feature = "sendmail")]
pub mod sendmail;
#[cfg(feature = "smtp")]
pub mod smtp;
mod wire;

use async_trait::async_trait;
use tracing::debug;

#[cfg(feature = "sendmail")]
#[doc(inline)]
pub use self::sendmail::{SendmailConfig, SendmailTransport};
#[cfg(feature = "smtp")]
#[doc(inline)]
pub use self::smtp::{SmtpConfig, SmtpEncryptionKind, SmtpTransport};
#[doc(inline)]
pub use self::{
    error::{Error, Result},
    wire::{Envelope, WireMessage},
};
use crate::AnyResult;

/// The email delivery capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers the given wire message.
    async fn deliver(&self, msg: &WireMessage) -> AnyResult<()>;
}

/// The transport used when no sender is configured.
///
/// Every delivery fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UndefinedTransport;

#[async_trait]
impl Transport for UndefinedTransport {
    async fn deliver(&self, _msg: &WireMessage) -> AnyResult<()> {
        debug!("cannot deliver message: no sender configured");
        Err(Error::UndefinedTransportError.into())
    }
}

//! # SMTP transport
//!
//! Module dedicated to the SMTP transport, based on
//! [mail-send](https://github.com/stalwartlabs/mail-send). A new
//! connection is opened for every delivery, so the transport can be
//! shared between any number of concurrent deliveries.

mod config;

use std::{any::Any, result};

use async_trait::async_trait;
use mail_send::{
    smtp::message::{Address as SmtpAddress, Message as SmtpMessage},
    SmtpClientBuilder,
};
use thiserror::Error;
use tracing::{debug, info};

#[doc(inline)]
pub use self::config::{SmtpConfig, SmtpEncryptionKind};
use super::{Transport, WireMessage};
use crate::{AnyBoxedError, AnyError, AnyResult};

/// The `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// The `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot send message")]
    SendMessageError(#[source] mail_send::Error),
    #[error("cannot connect to smtp server using tcp")]
    ConnectTcpError(#[source] mail_send::Error),
    #[error("cannot connect to smtp server using tls")]
    ConnectTlsError(#[source] mail_send::Error),
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

/// The SMTP transport.
#[derive(Clone)]
pub struct SmtpTransport {
    config: SmtpConfig,
    client_builder: SmtpClientBuilder<String>,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> Self {
        let mut client_builder = SmtpClientBuilder::new(config.host.clone(), config.port)
            .implicit_tls(!config.is_start_tls_encryption_enabled());

        if let Some(credentials) = config.credentials() {
            client_builder = client_builder.credentials(credentials);
        }

        Self {
            config,
            client_builder,
        }
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    async fn send(&self, msg: SmtpMessage<'_>) -> Result<()> {
        if self.config.is_encryption_enabled() {
            let mut client = self
                .client_builder
                .connect()
                .await
                .map_err(Error::ConnectTlsError)?;
            client.send(msg).await.map_err(Error::SendMessageError)
        } else {
            let mut client = self
                .client_builder
                .connect_plain()
                .await
                .map_err(Error::ConnectTcpError)?;
            client.send(msg).await.map_err(Error::SendMessageError)
        }
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn deliver(&self, msg: &WireMessage) -> AnyResult<()> {
        info!(host = self.config.host, port = self.config.port, "sending message via smtp");

        let smtp_msg = SmtpMessage {
            mail_from: msg.envelope.from.as_str().into(),
            rcpt_to: msg
                .envelope
                .recipients
                .iter()
                .map(|email| SmtpAddress {
                    email: email.as_str().into(),
                    ..Default::default()
                })
                .collect(),
            body: msg.bytes.as_slice().into(),
        };

        self.send(smtp_msg).await?;
        debug!("message successfully sent via smtp");

        Ok(())
    }
}

//! # Sendmail transport
//!
//! Module dedicated to the sendmail transport. The wire message is
//! piped to a sendmail-compatible shell command, the envelope being
//! passed as arguments: `-f <from> -- <recipients…>`.

mod config;

use std::{any::Any, result};

use async_trait::async_trait;
use process::Command;
use thiserror::Error;
use tracing::{debug, info};

#[doc(inline)]
pub use self::config::{SendmailConfig, SENDMAIL_DEFAULT_COMMAND};
use super::{Transport, WireMessage};
use crate::{AnyBoxedError, AnyError, AnyResult};

/// The `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// The `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run sendmail command")]
    RunCommandError(#[source] process::Error),
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

/// The sendmail transport.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SendmailTransport {
    config: SendmailConfig,
}

impl SendmailTransport {
    pub fn new(config: SendmailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SendmailConfig {
        &self.config
    }

    /// Builds the shell command delivering the given message.
    ///
    /// Envelope addresses are quoted so they never get interpreted by
    /// the shell.
    pub fn command(&self, msg: &WireMessage) -> Command {
        let mut cmd = format!(
            "{} -f {} --",
            self.config.cmd(),
            shell_quote(&msg.envelope.from)
        );

        for rcpt in &msg.envelope.recipients {
            cmd.push(' ');
            cmd.push_str(&shell_quote(rcpt));
        }

        Command::new(cmd)
    }
}

#[async_trait]
impl Transport for SendmailTransport {
    async fn deliver(&self, msg: &WireMessage) -> AnyResult<()> {
        info!(cmd = self.config.cmd(), "sending message via sendmail");

        self.command(msg)
            .run_with(&msg.bytes)
            .await
            .map_err(Error::RunCommandError)?;

        debug!("message successfully sent via sendmail");
        Ok(())
    }
}

/// Quotes the given argument for POSIX shells.
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{SendmailConfig, SendmailTransport};
    use crate::{
        error::error_chain,
        transport::{Envelope, Transport, WireMessage},
    };

    fn msg() -> WireMessage {
        WireMessage {
            envelope: Envelope {
                from: "from@localhost".into(),
                recipients: vec!["to@localhost".into(), "it's me@localhost".into()],
            },
            bytes: b"Subject: test\r\n\r\nHello\r\n".to_vec(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn pipes_message_and_envelope() {
        let dir = tempdir().unwrap();
        let args = dir.path().join("args");
        let body = dir.path().join("body");

        let cmd = format!(
            "f() {{ printf '%s\\n' \"$@\" > '{}'; cat > '{}'; }}; f",
            args.display(),
            body.display(),
        );

        SendmailTransport::new(SendmailConfig::new(cmd))
            .deliver(&msg())
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(&args).unwrap(),
            "-f\nfrom@localhost\n--\nto@localhost\nit's me@localhost\n"
        );
        assert_eq!(fs::read(&body).unwrap(), msg().bytes);
    }

    #[test]
    fn command_quotes_envelope() {
        let transport = SendmailTransport::new(SendmailConfig::default());

        assert_eq!(
            transport.command(&msg()).as_str(),
            "/usr/sbin/sendmail -i -f 'from@localhost' -- 'to@localhost' 'it'\\''s me@localhost'"
        );
    }

    #[test_log::test(tokio::test)]
    async fn non_zero_exit_code() {
        let config = SendmailConfig::new("cat > /dev/null; echo 'no route' >&2; exit 75; true");

        let err = SendmailTransport::new(config)
            .deliver(&msg())
            .await
            .unwrap_err();

        let err = error_chain(&err);
        assert!(err.contains("75"), "{err}");
        assert!(err.contains("no route"), "{err}");
    }
}

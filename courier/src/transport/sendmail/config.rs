//! Module dedicated to the sendmail transport configuration.

/// The default sendmail command.
///
/// Envelope options are appended to it at delivery time.
pub const SENDMAIL_DEFAULT_COMMAND: &str = "/usr/sbin/sendmail -i";

/// The sendmail transport configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct SendmailConfig {
    /// The sendmail command.
    ///
    /// The command is run through the shell. Defaults to
    /// [`SENDMAIL_DEFAULT_COMMAND`].
    #[cfg_attr(feature = "derive", serde(default))]
    pub cmd: Option<String>,
}

impl SendmailConfig {
    pub fn new(cmd: impl ToString) -> Self {
        Self {
            cmd: Some(cmd.to_string()),
        }
    }

    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or(SENDMAIL_DEFAULT_COMMAND)
    }
}

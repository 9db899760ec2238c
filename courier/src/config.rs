//! # Config
//!
//! Module dedicated to the email service configuration. Every
//! structure can be (de)serialized with serde when the `derive`
//! cargo feature is enabled, using kebab-case field names.

use std::path::PathBuf;

#[cfg(feature = "sendmail")]
use crate::transport::SendmailConfig;
#[cfg(feature = "smtp")]
use crate::transport::SmtpConfig;

/// The email service configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct EmailConfig {
    /// The directory templates are read from.
    pub template_dir: PathBuf,

    /// The extension of template files.
    ///
    /// Defaults to
    /// [`DEFAULT_EXTENSION`](crate::template::source::DEFAULT_EXTENSION).
    #[cfg_attr(feature = "derive", serde(default))]
    pub template_extension: Option<String>,

    /// The locales templates are looked for when none is given.
    ///
    /// Locales are tried in order, an empty list means unlocalized
    /// templates only.
    #[cfg_attr(feature = "derive", serde(default))]
    pub default_locales: Vec<String>,

    /// The deferred delivery pool configuration.
    #[cfg_attr(feature = "derive", serde(default))]
    pub pool: PoolConfig,

    /// The sender configuration.
    #[cfg_attr(feature = "derive", serde(default))]
    pub sender: SenderConfig,
}

/// The deferred delivery pool configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct PoolConfig {
    /// The number of workers.
    ///
    /// Defaults to [`DEFAULT_SIZE`](crate::thread_pool::DEFAULT_SIZE).
    #[cfg_attr(feature = "derive", serde(default))]
    pub size: Option<usize>,

    /// The number of deliveries that can wait for a worker.
    ///
    /// Submitting a delivery to a full queue fails. Defaults to
    /// [`DEFAULT_QUEUE_SIZE`](crate::thread_pool::DEFAULT_QUEUE_SIZE).
    #[cfg_attr(feature = "derive", serde(default))]
    pub queue_size: Option<usize>,
}

/// The sender configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", tag = "type")
)]
pub enum SenderConfig {
    /// No sender: every delivery fails.
    #[default]
    None,

    /// The SMTP sender configuration.
    #[cfg(feature = "smtp")]
    Smtp(SmtpConfig),

    /// The sendmail sender configuration.
    #[cfg(feature = "sendmail")]
    Sendmail(SendmailConfig),
}

#[cfg(all(test, feature = "derive"))]
mod tests {
    use std::path::PathBuf;

    use super::{EmailConfig, PoolConfig, SenderConfig};

    #[test]
    fn minimal() {
        let config: EmailConfig = toml::from_str(r#"template-dir = "/tmp/templates""#).unwrap();

        assert_eq!(
            config,
            EmailConfig {
                template_dir: PathBuf::from("/tmp/templates"),
                ..Default::default()
            }
        );
    }

    #[cfg(all(feature = "smtp", feature = "sendmail"))]
    #[test]
    fn full() {
        use crate::transport::{SendmailConfig, SmtpConfig, SmtpEncryptionKind};

        let config: EmailConfig = toml::from_str(concat!(
            "template-dir = \"/tmp/templates\"\n",
            "template-extension = \"ftl\"\n",
            "default-locales = [\"fr_CA\", \"en\"]\n",
            "pool.size = 1\n",
            "pool.queue-size = 10\n",
            "sender.type = \"smtp\"\n",
            "sender.host = \"localhost\"\n",
            "sender.port = 587\n",
            "sender.encryption = \"start-tls\"\n",
            "sender.login = \"login\"\n",
        ))
        .unwrap();

        assert_eq!(config.template_extension.as_deref(), Some("ftl"));
        assert_eq!(config.default_locales, vec!["fr_CA", "en"]);
        assert_eq!(
            config.pool,
            PoolConfig {
                size: Some(1),
                queue_size: Some(10),
            }
        );
        assert_eq!(
            config.sender,
            SenderConfig::Smtp(SmtpConfig {
                host: "localhost".into(),
                port: 587,
                encryption: Some(SmtpEncryptionKind::StartTls),
                login: Some("login".into()),
                passwd: None,
            })
        );

        let config: EmailConfig = toml::from_str(concat!(
            "template-dir = \"/tmp/templates\"\n",
            "sender.type = \"sendmail\"\n",
            "sender.cmd = \"/usr/bin/msmtp\"\n",
        ))
        .unwrap();

        assert_eq!(
            config.sender,
            SenderConfig::Sendmail(SendmailConfig::new("/usr/bin/msmtp"))
        );
    }
}

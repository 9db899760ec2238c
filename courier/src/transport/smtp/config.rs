//! Module dedicated to the SMTP transport configuration.

use std::fmt;

use mail_send::Credentials;

/// The SMTP transport configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,

    /// The connection encryption.
    ///
    /// Either a kind (`tls`, `start-tls`, `none`) or a boolean.
    /// Defaults to implicit TLS.
    #[cfg_attr(
        feature = "derive",
        serde(default, deserialize_with = "some_bool_or_kind")
    )]
    pub encryption: Option<SmtpEncryptionKind>,

    /// The login used to authenticate, if the server requires it.
    #[cfg_attr(feature = "derive", serde(default))]
    pub login: Option<String>,

    /// The password matching the login.
    #[cfg_attr(feature = "derive", serde(default, alias = "password"))]
    pub passwd: Option<String>,
}

impl SmtpConfig {
    /// Returns `true` unless encryption is explicitly disabled.
    pub fn is_encryption_enabled(&self) -> bool {
        !self.is_encryption_disabled()
    }

    /// Returns `true` if the connection is upgraded with STARTTLS.
    pub fn is_start_tls_encryption_enabled(&self) -> bool {
        matches!(self.encryption, Some(SmtpEncryptionKind::StartTls))
    }

    pub fn is_encryption_disabled(&self) -> bool {
        matches!(self.encryption, Some(SmtpEncryptionKind::None))
    }

    /// Builds the SMTP credentials.
    ///
    /// Returns `None` when the login or the password is missing, in
    /// which case no authentication is performed.
    pub fn credentials(&self) -> Option<Credentials<String>> {
        let login = self.login.as_ref()?;
        let passwd = self.passwd.as_ref()?;
        Some(Credentials::new(login.clone(), passwd.clone()))
    }
}

/// The SMTP connection encryption.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SmtpEncryptionKind {
    #[default]
    #[cfg_attr(feature = "derive", serde(alias = "ssl"))]
    Tls,
    #[cfg_attr(feature = "derive", serde(alias = "starttls"))]
    StartTls,
    None,
}

impl fmt::Display for SmtpEncryptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tls => write!(f, "SSL/TLS"),
            Self::StartTls => write!(f, "StartTLS"),
            Self::None => write!(f, "None"),
        }
    }
}

impl From<bool> for SmtpEncryptionKind {
    fn from(value: bool) -> Self {
        if value {
            Self::Tls
        } else {
            Self::None
        }
    }
}

/// Deserializes the encryption either from a boolean or from a kind.
///
/// `true` means [`SmtpEncryptionKind::Tls`], `false` means
/// [`SmtpEncryptionKind::None`].
#[cfg(feature = "derive")]
fn some_bool_or_kind<'de, D>(deserializer: D) -> Result<Option<SmtpEncryptionKind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum BoolOrKind {
        Bool(bool),
        Kind(SmtpEncryptionKind),
    }

    let encryption: Option<BoolOrKind> = serde::Deserialize::deserialize(deserializer)?;

    Ok(encryption.map(|encryption| match encryption {
        BoolOrKind::Bool(enabled) => enabled.into(),
        BoolOrKind::Kind(kind) => kind,
    }))
}

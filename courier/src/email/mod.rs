//! Module dedicated to the email under composition.
//!
//! The [`Email`] is the mutable target of a builder: recipients,
//! sender, bodies, attachments and headers are accumulated into it,
//! then the renderer fills the fields left unset from templates.

mod address;
mod attachment;

#[doc(inline)]
pub use self::{address::Address, attachment::Attachment};

/// The email being composed.
///
/// An email is owned by the builder that creates it until it is
/// handed over to the renderer then to the transport. It is never
/// shared between concurrent builds.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Email {
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub from: Option<Address>,
    pub reply_to: Option<Address>,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<Attachment>,
    headers: Vec<(String, String)>,
}

impl Email {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if at least one of the to, cc or bcc lists is
    /// not empty.
    pub fn has_recipients(&self) -> bool {
        !(self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty())
    }

    /// Iterates over all recipients: to, cc then bcc.
    pub fn recipients(&self) -> impl Iterator<Item = &Address> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }

    /// Sets a custom header.
    ///
    /// Header names are case-insensitive: setting an existing header
    /// replaces its value in place, so the original insertion order
    /// is kept.
    pub fn set_header(&mut self, name: impl ToString, value: impl ToString) {
        let name = name.to_string();
        let value = value.to_string();

        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, prev)) => *prev = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Gets the value of a custom header.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over custom headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

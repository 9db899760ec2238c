//! Module dedicated to email addresses.
//!
//! This core concept of this module is the [Address] structure, which
//! represents a resolved mailbox with its optional display name.

use std::fmt;

/// The email address.
///
/// An address is composed of a mailbox and an optional display
/// name. The display name is either set explicitly by the caller or
/// rendered from a display template.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address {
    pub address: String,
    pub display: Option<String>,
}

impl Address {
    /// Builds a new address from a mailbox and an optional display
    /// name.
    pub fn new(address: impl ToString, display: Option<impl ToString>) -> Self {
        Self {
            address: address.to_string(),
            display: display.map(|display| display.to_string()),
        }
    }

    /// Builds a new address from a mailbox only.
    pub fn new_nameless(address: impl ToString) -> Self {
        Self::new(address, Option::<String>::None)
    }

    /// Returns `true` if the display name is defined.
    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "{display} <{}>", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new_nameless(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::new_nameless(address)
    }
}

impl From<&String> for Address {
    fn from(address: &String) -> Self {
        Self::new_nameless(address)
    }
}

impl<A: ToString, D: ToString> From<(A, D)> for Address {
    fn from((address, display): (A, D)) -> Self {
        Self::new(address, Some(display))
    }
}

#[cfg(test)]
mod tests {
    use super::Address;

    #[test]
    fn display() {
        assert_eq!(Address::from("bob@localhost").to_string(), "bob@localhost");
        assert_eq!(
            Address::from(("bob@localhost", "Bob")).to_string(),
            "Bob <bob@localhost>"
        );
    }
}

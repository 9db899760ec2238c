//! Module dedicated to email attachments.

/// The email attachment.
///
/// Represents a file joined to the message, carried in memory until
/// the wire message is built.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attachment {
    /// The attachment file name.
    pub name: String,

    /// The attachment MIME type.
    pub mime: String,

    /// The raw content of the attachment.
    pub body: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl ToString, mime: impl ToString, body: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            body: body.into(),
        }
    }
}

use mail_builder::{
    headers::{address::Address as BuilderAddress, raw::Raw},
    MessageBuilder,
};
use tracing::trace;

use super::{Error, Result};
use crate::{Address, Email};

/// Headers written from the email fields, which custom headers cannot
/// override.
const RESERVED_HEADERS: [&str; 12] = [
    "Bcc",
    "Cc",
    "Content-Disposition",
    "Content-Transfer-Encoding",
    "Content-Type",
    "Date",
    "From",
    "Message-ID",
    "MIME-Version",
    "Reply-To",
    "Subject",
    "To",
];

/// The SMTP envelope of a wire message.
///
/// The envelope is what the transport actually delivers to: bcc
/// recipients only live here, they never appear in the message
/// headers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Envelope {
    pub from: String,
    pub recipients: Vec<String>,
}

/// The message handed over to a transport.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WireMessage {
    pub envelope: Envelope,

    /// The RFC 5322 message.
    pub bytes: Vec<u8>,
}

impl WireMessage {
    /// Builds the wire message of the given email.
    ///
    /// The email is expected to be fully rendered. It fails if the
    /// sender is missing, if there is no recipient at all or if a
    /// custom header is invalid.
    pub fn from_email(email: &Email) -> Result<Self> {
        let from = email
            .from
            .as_ref()
            .ok_or(Error::SendEmailMissingSenderError)?;

        if !email.has_recipients() {
            return Err(Error::SendEmailMissingRecipientError);
        }

        for (key, val) in email.headers() {
            validate_header(key, val)?;
        }

        let mut recipients: Vec<String> = Vec::new();
        for addr in email.recipients() {
            if !recipients.contains(&addr.address) {
                recipients.push(addr.address.clone());
            }
        }

        let envelope = Envelope {
            from: from.address.clone(),
            recipients,
        };

        let mut builder = MessageBuilder::new().from(into_builder_address(from));

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(into_builder_address(reply_to));
        }

        if !email.to.is_empty() {
            builder = builder.to(into_builder_addresses(&email.to));
        }

        if !email.cc.is_empty() {
            builder = builder.cc(into_builder_addresses(&email.cc));
        }

        if let Some(subject) = &email.subject {
            builder = builder.subject(subject.as_str());
        }

        for (key, val) in email.headers() {
            builder = builder.header(key, Raw::new(val));
        }

        match (&email.text, &email.html) {
            (None, None) => builder = builder.text_body(""),
            (text, html) => {
                if let Some(text) = text {
                    builder = builder.text_body(text.as_str());
                }
                if let Some(html) = html {
                    builder = builder.html_body(html.as_str());
                }
            }
        }

        for attachment in &email.attachments {
            builder = builder.attachment(
                attachment.mime.as_str(),
                attachment.name.as_str(),
                attachment.body.as_slice(),
            );
        }

        let bytes = builder.write_to_vec().map_err(Error::BuildWireMessageError)?;
        trace!(size = bytes.len(), "wire message built");

        Ok(Self { envelope, bytes })
    }
}

/// Rejects custom headers that would alter the message structure.
///
/// Names must be printable ASCII without colon nor whitespace, values
/// must not contain line breaks.
fn validate_header(key: &str, val: &str) -> Result<()> {
    let valid_key = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_graphic() && b != b':')
        && !RESERVED_HEADERS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(key));
    let valid_val = !val.contains(['\r', '\n']);

    if valid_key && valid_val {
        Ok(())
    } else {
        Err(Error::SendEmailInvalidHeaderError(key.to_owned()))
    }
}

fn into_builder_address(addr: &Address) -> BuilderAddress<'_> {
    BuilderAddress::new_address(addr.display.as_deref(), addr.address.as_str())
}

fn into_builder_addresses(addrs: &[Address]) -> BuilderAddress<'_> {
    BuilderAddress::new_list(addrs.iter().map(into_builder_address).collect())
}

#[cfg(test)]
mod tests {
    use mail_parser::{Address as ParsedAddress, MessageParser, MimeHeaders};

    use super::WireMessage;
    use crate::{transport::Error, Address, Attachment, Email};

    fn email() -> Email {
        let mut email = Email::new();
        email.from = Some(Address::new("from@localhost", Some("From")));
        email.to.push("to@localhost".into());
        email.cc.push(("cc@localhost", "Cc").into());
        email.bcc.push("bcc@localhost".into());
        email.bcc.push("to@localhost".into());
        email.subject = Some("Subject".into());
        email.text = Some("Text".into());
        email.html = Some("<p>HTML</p>".into());
        email.set_header("X-Campaign", "spring");
        email
    }

    #[test]
    fn bcc_only_in_envelope() {
        let msg = WireMessage::from_email(&email()).unwrap();

        assert_eq!(msg.envelope.from, "from@localhost");
        assert_eq!(
            msg.envelope.recipients,
            vec!["to@localhost", "cc@localhost", "bcc@localhost"]
        );

        let parsed = MessageParser::new().parse(&msg.bytes).unwrap();
        assert_eq!(parsed.subject(), Some("Subject"));
        assert!(parsed.bcc().is_none());
        assert_eq!(parsed.header_raw("X-Campaign").map(str::trim), Some("spring"));
        assert_eq!(parsed.body_text(0).as_deref(), Some("Text"));
        assert_eq!(parsed.body_html(0).as_deref(), Some("<p>HTML</p>"));

        let Some(ParsedAddress::List(from)) = parsed.from() else {
            panic!("from should be a list of addresses");
        };
        assert_eq!(from[0].name.as_deref(), Some("From"));
        assert_eq!(from[0].address.as_deref(), Some("from@localhost"));
    }

    #[test]
    fn attachments() {
        let mut email = email();
        email
            .attachments
            .push(Attachment::new("report.txt", "text/plain", "report"));

        let msg = WireMessage::from_email(&email).unwrap();
        let parsed = MessageParser::new().parse(&msg.bytes).unwrap();

        assert_eq!(parsed.attachment_count(), 1);
        let attachment = parsed.attachment(0).unwrap();
        assert_eq!(attachment.attachment_name(), Some("report.txt"));
        assert_eq!(attachment.contents(), b"report");
    }

    #[test]
    fn header_injection() {
        let mut email = email();
        email.set_header(
            "X-Campaign",
            "spring\r\nTo: attacker@localhost\r\nX-Injected: yes",
        );

        let err = WireMessage::from_email(&email).unwrap_err();
        assert!(matches!(err, Error::SendEmailInvalidHeaderError(key) if key == "X-Campaign"));

        let mut email = self::email();
        email.set_header("X-Campaign\r\nX-Injected", "yes");
        let err = WireMessage::from_email(&email).unwrap_err();
        assert!(matches!(err, Error::SendEmailInvalidHeaderError(_)));
    }

    #[test]
    fn reserved_headers() {
        for key in ["subject", "To", "BCC", "content-type"] {
            let mut email = email();
            email.set_header(key, "value");

            let err = WireMessage::from_email(&email).unwrap_err();
            assert!(matches!(err, Error::SendEmailInvalidHeaderError(k) if k == key));
        }

        let mut email = email();
        email.set_header("X-Mailer", "courier");
        let msg = WireMessage::from_email(&email).unwrap();
        let parsed = MessageParser::new().parse(&msg.bytes).unwrap();
        assert_eq!(parsed.header_raw("X-Mailer").map(str::trim), Some("courier"));
    }

    #[test]
    fn validation() {
        let mut email = email();
        email.to.clear();
        email.cc.clear();
        email.bcc.clear();

        let err = WireMessage::from_email(&email).unwrap_err();
        assert!(matches!(err, Error::SendEmailMissingRecipientError));

        email.from = None;
        let err = WireMessage::from_email(&email).unwrap_err();
        assert!(matches!(err, Error::SendEmailMissingSenderError));
    }
}

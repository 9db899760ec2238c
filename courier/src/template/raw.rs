/// The raw email templates.
///
/// Holds one optional source per fragment, plus one display source
/// per address of the to, cc and bcc lists. Display sources are
/// matched with the email addresses by position.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct RawTemplates {
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub from_display: Option<String>,
    pub reply_to_display: Option<String>,
    pub to_displays: Vec<String>,
    pub cc_displays: Vec<String>,
    pub bcc_displays: Vec<String>,
}

impl RawTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, source: impl ToString) -> Self {
        self.subject = Some(source.to_string());
        self
    }

    pub fn with_text(mut self, source: impl ToString) -> Self {
        self.text = Some(source.to_string());
        self
    }

    pub fn with_html(mut self, source: impl ToString) -> Self {
        self.html = Some(source.to_string());
        self
    }

    pub fn with_from_display(mut self, source: impl ToString) -> Self {
        self.from_display = Some(source.to_string());
        self
    }

    pub fn with_reply_to_display(mut self, source: impl ToString) -> Self {
        self.reply_to_display = Some(source.to_string());
        self
    }

    pub fn with_to_display(mut self, source: impl ToString) -> Self {
        self.to_displays.push(source.to_string());
        self
    }

    pub fn with_cc_display(mut self, source: impl ToString) -> Self {
        self.cc_displays.push(source.to_string());
        self
    }

    pub fn with_bcc_display(mut self, source: impl ToString) -> Self {
        self.bcc_displays.push(source.to_string());
        self
    }

    /// Returns `true` if no source is defined at all.
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.text.is_none()
            && self.html.is_none()
            && self.from_display.is_none()
            && self.reply_to_display.is_none()
            && self.to_displays.is_empty()
            && self.cc_displays.is_empty()
            && self.bcc_displays.is_empty()
    }
}

use std::fmt;

use super::{CompiledTemplate, ParseFailure, Part};

/// The outcome of loading one template fragment.
#[derive(Default)]
pub enum Fragment {
    /// No source was found for the fragment.
    #[default]
    Absent,

    /// A source was found but could not be parsed. The failure is
    /// also recorded under the fragment part.
    Failed(ParseFailure),

    /// The source was found and compiled.
    Compiled(Box<dyn CompiledTemplate>),
}

impl Fragment {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }

    /// Returns the compiled template, if any.
    pub fn compiled(&self) -> Option<&dyn CompiledTemplate> {
        match self {
            Self::Compiled(tpl) => Some(tpl.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
            Self::Compiled(_) => write!(f, "Compiled"),
        }
    }
}

/// An address whose display name is still a template.
///
/// Distinct from [`Address`](crate::Address): the display is only
/// known once the template has been rendered.
#[derive(Debug, Default)]
pub struct ParsedAddress {
    pub display: Fragment,
}

impl From<Fragment> for ParsedAddress {
    fn from(display: Fragment) -> Self {
        Self { display }
    }
}

/// The parsed email templates.
///
/// Same shape as [`RawTemplates`](super::RawTemplates), each source
/// being replaced by its [`Fragment`] outcome.
#[derive(Debug, Default)]
pub struct ParsedTemplates {
    pub subject: Fragment,
    pub text: Fragment,
    pub html: Fragment,
    pub from: ParsedAddress,
    pub reply_to: ParsedAddress,
    pub to: Vec<ParsedAddress>,
    pub cc: Vec<ParsedAddress>,
    pub bcc: Vec<ParsedAddress>,
}

impl ParsedTemplates {
    /// Gets the fragment of a single-valued part.
    ///
    /// Returns `None` for address list parts.
    pub fn fragment(&self, part: Part) -> Option<&Fragment> {
        match part {
            Part::Subject => Some(&self.subject),
            Part::Text => Some(&self.text),
            Part::Html => Some(&self.html),
            Part::From => Some(&self.from.display),
            Part::ReplyTo => Some(&self.reply_to.display),
            Part::To | Part::Cc | Part::Bcc => None,
        }
    }

    pub(crate) fn fragment_mut(&mut self, part: Part) -> Option<&mut Fragment> {
        match part {
            Part::Subject => Some(&mut self.subject),
            Part::Text => Some(&mut self.text),
            Part::Html => Some(&mut self.html),
            Part::From => Some(&mut self.from.display),
            Part::ReplyTo => Some(&mut self.reply_to.display),
            Part::To | Part::Cc | Part::Bcc => None,
        }
    }

    /// Returns `true` if every fragment is absent.
    pub fn is_empty(&self) -> bool {
        Part::LOADABLE
            .iter()
            .filter_map(|part| self.fragment(*part))
            .all(Fragment::is_absent)
            && self.to.is_empty()
            && self.cc.is_empty()
            && self.bcc.is_empty()
    }
}

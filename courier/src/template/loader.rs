use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{
    Fragment, ParseFailure, ParsedAddress, ParsedTemplates, Part, PartErrors, RawTemplates,
    TemplateEngine, TemplateSource,
};
use crate::{Error, Result};

/// The template loader.
///
/// Resolves fragment sources with a [`TemplateSource`] then compiles
/// them with a [`TemplateEngine`]. Fragments are loaded
/// independently from each other: a fragment failing to parse never
/// prevents the others from being loaded.
#[derive(Clone)]
pub struct TemplateLoader {
    source: Arc<dyn TemplateSource>,
    engine: Arc<dyn TemplateEngine>,
}

impl TemplateLoader {
    pub fn new(
        source: impl TemplateSource + 'static,
        engine: impl TemplateEngine + 'static,
    ) -> Self {
        Self {
            source: Arc::new(source),
            engine: Arc::new(engine),
        }
    }

    pub fn from_shared(source: Arc<dyn TemplateSource>, engine: Arc<dyn TemplateEngine>) -> Self {
        Self { source, engine }
    }

    /// Loads the fragments of the given template.
    ///
    /// For each loadable part, locales are tried in order and the
    /// first one resolving a source wins. An empty locale list means
    /// one unlocalized attempt. Parse failures are recorded into
    /// `errors` and do not stop the loading.
    ///
    /// Only an empty template id or an I/O fault of the source fails
    /// the whole loading.
    pub fn load(
        &self,
        id: &str,
        locales: &[String],
        errors: &mut PartErrors<ParseFailure>,
    ) -> Result<ParsedTemplates> {
        if id.trim().is_empty() {
            return Err(Error::EmptyTemplateIdError);
        }

        let mut templates = ParsedTemplates::default();
        let mut found = false;

        for part in Part::LOADABLE {
            let Some(source) = self.resolve(id, part, locales)? else {
                trace!(id, %part, "template fragment not found, skipping it");
                continue;
            };

            found = true;
            let fragment = self.parse_fragment(part, &source, errors);

            if let Some(slot) = templates.fragment_mut(part) {
                *slot = fragment;
            }
        }

        if !found {
            warn!(id, ?locales, "no fragment found for template");
        }

        Ok(templates)
    }

    /// Parses raw template sources.
    ///
    /// Display sources of address lists are parsed one by one, their
    /// failures are all recorded under the list part.
    pub fn parse(&self, raw: &RawTemplates, errors: &mut PartErrors<ParseFailure>) -> ParsedTemplates {
        ParsedTemplates {
            subject: self.parse_some(Part::Subject, raw.subject.as_deref(), errors),
            text: self.parse_some(Part::Text, raw.text.as_deref(), errors),
            html: self.parse_some(Part::Html, raw.html.as_deref(), errors),
            from: self
                .parse_some(Part::From, raw.from_display.as_deref(), errors)
                .into(),
            reply_to: self
                .parse_some(Part::ReplyTo, raw.reply_to_display.as_deref(), errors)
                .into(),
            to: self.parse_displays(Part::To, &raw.to_displays, errors),
            cc: self.parse_displays(Part::Cc, &raw.cc_displays, errors),
            bcc: self.parse_displays(Part::Bcc, &raw.bcc_displays, errors),
        }
    }

    fn resolve(&self, id: &str, part: Part, locales: &[String]) -> Result<Option<String>> {
        let locales: Vec<Option<&str>> = if locales.is_empty() {
            vec![None]
        } else {
            locales.iter().map(|locale| Some(locale.as_str())).collect()
        };

        for locale in locales {
            let source = self
                .source
                .resolve(id, part, locale)
                .map_err(|err| Error::ResolveTemplateError(err, id.to_owned(), part.to_string()))?;

            if source.is_some() {
                debug!(id, %part, ?locale, "template fragment resolved");
                return Ok(source);
            }
        }

        Ok(None)
    }

    fn parse_some(
        &self,
        part: Part,
        source: Option<&str>,
        errors: &mut PartErrors<ParseFailure>,
    ) -> Fragment {
        match source {
            Some(source) => self.parse_fragment(part, source, errors),
            None => Fragment::Absent,
        }
    }

    fn parse_displays(
        &self,
        part: Part,
        sources: &[String],
        errors: &mut PartErrors<ParseFailure>,
    ) -> Vec<ParsedAddress> {
        sources
            .iter()
            .map(|source| self.parse_fragment(part, source, errors).into())
            .collect()
    }

    fn parse_fragment(
        &self,
        part: Part,
        source: &str,
        errors: &mut PartErrors<ParseFailure>,
    ) -> Fragment {
        match self.engine.parse(part, source) {
            Ok(tpl) => Fragment::Compiled(tpl),
            Err(err) => {
                debug!(%part, "cannot parse template fragment: {err}");
                errors.insert(part, err.clone());
                Fragment::Failed(err)
            }
        }
    }
}

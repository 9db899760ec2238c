//! # Result
//!
//! Module dedicated to the outcomes of the email pipeline. Results
//! never fail: they carry the email as far as it could be composed,
//! along with the failures that happened on the way. Partial success
//! is a first-class outcome.

use std::fmt;

use crate::{
    dispatch::SendHandle,
    template::{ParseFailure, PartErrors, RenderFailure},
    Email,
};

/// Template failures, grouped by pipeline stage then by part.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TemplateErrors {
    pub parse: PartErrors<ParseFailure>,
    pub render: PartErrors<RenderFailure>,
}

impl TemplateErrors {
    /// Returns `true` if no fragment failed to parse or to render.
    pub fn is_empty(&self) -> bool {
        self.parse.is_empty() && self.render.is_empty()
    }
}

/// The outcome of an email preview.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PreviewResult {
    pub email: Email,
    pub errors: TemplateErrors,
}

impl PreviewResult {
    pub fn new(email: Email, errors: TemplateErrors) -> Self {
        Self { email, errors }
    }

    pub fn was_successful(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn parse_errors(&self) -> &PartErrors<ParseFailure> {
        &self.errors.parse
    }

    pub fn render_errors(&self) -> &PartErrors<RenderFailure> {
        &self.errors.render
    }
}

/// The outcome of a template validation.
///
/// Templates are validated against an empty email, so the email only
/// holds what the templates produced.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidateResult {
    pub email: Email,
    pub errors: TemplateErrors,
}

impl ValidateResult {
    pub fn was_successful(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn parse_errors(&self) -> &PartErrors<ParseFailure> {
        &self.errors.parse
    }

    pub fn render_errors(&self) -> &PartErrors<RenderFailure> {
        &self.errors.render
    }
}

impl From<PreviewResult> for ValidateResult {
    fn from(result: PreviewResult) -> Self {
        Self {
            email: result.email,
            errors: result.errors,
        }
    }
}

/// The outcome of an email sending.
///
/// Deferred sendings carry a [`SendHandle`] resolving to the final
/// result once the delivery completed.
#[derive(Debug, Default)]
pub struct SendResult {
    pub email: Email,
    pub errors: TemplateErrors,

    /// The reason why the email could not be delivered, if any.
    pub transport_error: Option<String>,

    handle: Option<SendHandle>,
}

impl SendResult {
    pub fn new(email: Email, errors: TemplateErrors) -> Self {
        Self {
            email,
            errors,
            transport_error: None,
            handle: None,
        }
    }

    pub fn was_successful(&self) -> bool {
        self.errors.is_empty() && self.transport_error.is_none()
    }

    pub fn parse_errors(&self) -> &PartErrors<ParseFailure> {
        &self.errors.parse
    }

    pub fn render_errors(&self) -> &PartErrors<RenderFailure> {
        &self.errors.render
    }

    /// Returns `true` if the delivery has been deferred.
    pub fn is_deferred(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&SendHandle> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut SendHandle> {
        self.handle.as_mut()
    }

    /// Takes the completion handle out of the result.
    pub fn take_handle(&mut self) -> Option<SendHandle> {
        self.handle.take()
    }

    pub(crate) fn set_transport_error(&mut self, err: impl ToString) {
        self.transport_error = Some(err.to_string());
    }

    pub(crate) fn set_handle(&mut self, handle: SendHandle) {
        self.handle = Some(handle);
    }
}

impl From<PreviewResult> for SendResult {
    fn from(result: PreviewResult) -> Self {
        Self::new(result.email, result.errors)
    }
}

impl fmt::Display for TemplateErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";

        for (part, err) in self.parse.iter() {
            write!(f, "{sep}cannot parse {part}: {err}")?;
            sep = ", ";
        }

        for (part, err) in self.render.iter() {
            write!(f, "{sep}cannot render {part}: {err}")?;
            sep = ", ";
        }

        Ok(())
    }
}

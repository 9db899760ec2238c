//! # Template
//!
//! Module dedicated to email templates. An email template is a set
//! of independent fragments (subject, text, html, display names…)
//! going through the same pipeline:
//!
//! 1. sources are resolved by a [`TemplateSource`] or given raw as
//! [`RawTemplates`],
//!
//! 2. the [`TemplateLoader`] parses each fragment with a
//! [`TemplateEngine`] into [`ParsedTemplates`],
//!
//! 3. the [`render`] function executes each compiled fragment against
//! the [`TemplateParams`] and fills the [`Email`](crate::Email).
//!
//! A failure at any step is scoped to the fragment it happened in:
//! it is recorded under its [`Part`] and the other fragments keep
//! going.

mod loader;
mod parsed;
mod part;
mod raw;
mod renderer;
pub mod source;
#[cfg(feature = "tera")]
pub mod tera;

use std::{collections::HashMap, error, fmt};

#[doc(inline)]
pub use self::{
    loader::TemplateLoader,
    parsed::{Fragment, ParsedAddress, ParsedTemplates},
    part::{Part, PartErrors},
    raw::RawTemplates,
    renderer::render,
    source::TemplateSource,
};
#[cfg(feature = "tera")]
#[doc(inline)]
pub use self::tera::TeraEngine;

/// The parameters templates are executed against.
pub type TemplateParams = HashMap<String, serde_json::Value>;

/// The template engine capability.
///
/// The engine turns a source string into an executable template. The
/// template language is entirely up to the engine.
pub trait TemplateEngine: Send + Sync {
    /// Parses the given source of the given part.
    fn parse(&self, part: Part, source: &str) -> Result<Box<dyn CompiledTemplate>, ParseFailure>;
}

/// A template compiled by a [`TemplateEngine`].
pub trait CompiledTemplate: Send + Sync {
    /// Executes the template against the given parameters.
    fn execute(&self, params: &TemplateParams) -> Result<String, RenderFailure>;
}

/// A template fragment source is syntactically invalid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseFailure {
    pub message: String,
    pub cause: Option<String>,
}

impl ParseFailure {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for ParseFailure {}

/// A compiled template fragment failed against the given parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderFailure {
    pub message: String,
    pub cause: Option<String>,
}

impl RenderFailure {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for RenderFailure {}

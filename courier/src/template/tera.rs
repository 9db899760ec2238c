//! # Tera template engine
//!
//! Module dedicated to the [`TemplateEngine`] implementation based on
//! [Tera](https://keats.github.io/tera/), a template language inspired
//! by Jinja2 and Django templates:
//!
//! ```text
//! Hello {{ name }}, your order {{ order.id }} has been shipped!
//! ```

use std::error::Error as _;

use tera::{Context, Tera};
use tracing::trace;

use super::{CompiledTemplate, ParseFailure, Part, RenderFailure, TemplateEngine, TemplateParams};
use crate::error::error_chain;

/// The Tera template engine.
///
/// Each fragment is compiled into its own Tera instance, so
/// fragments never see each other. Autoescaping is disabled by
/// default, except for the html fragment when
/// [`TeraEngine::with_html_autoescape`] is enabled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TeraEngine {
    html_autoescape: bool,
}

impl TeraEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escapes HTML special characters of values printed in the html
    /// fragment.
    pub fn with_html_autoescape(mut self, autoescape: bool) -> Self {
        self.html_autoescape = autoescape;
        self
    }
}

impl TemplateEngine for TeraEngine {
    fn parse(&self, part: Part, source: &str) -> Result<Box<dyn CompiledTemplate>, ParseFailure> {
        let name = part.as_str();

        let mut tera = Tera::default();
        // autoescaping is driven by template name suffixes
        if self.html_autoescape {
            tera.autoescape_on(vec![Part::Html.as_str()]);
        } else {
            tera.autoescape_on(Vec::new());
        }

        tera.add_raw_template(name, source).map_err(|err| {
            let failure = ParseFailure::new(&err);
            match err.source() {
                Some(cause) => failure.with_cause(error_chain(cause)),
                None => failure,
            }
        })?;

        trace!(part = name, "tera template compiled");
        Ok(Box::new(TeraTemplate { name, tera }))
    }
}

/// A fragment compiled by the [`TeraEngine`].
struct TeraTemplate {
    name: &'static str,
    tera: Tera,
}

impl CompiledTemplate for TeraTemplate {
    fn execute(&self, params: &TemplateParams) -> Result<String, RenderFailure> {
        let mut ctx = Context::new();
        for (key, val) in params {
            ctx.insert(key.as_str(), val);
        }

        self.tera.render(self.name, &ctx).map_err(|err| {
            let failure = RenderFailure::new(&err);
            match err.source() {
                Some(cause) => failure.with_cause(error_chain(cause)),
                None => failure,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TeraEngine;
    use crate::template::{Part, TemplateEngine, TemplateParams};

    #[test]
    fn parse_then_execute() {
        let tpl = TeraEngine::new()
            .parse(Part::Text, "Text {{ key1 }}")
            .unwrap();

        let params = TemplateParams::from_iter([("key1".into(), json!("value1"))]);
        assert_eq!(tpl.execute(&params).unwrap(), "Text value1");
    }

    #[test]
    fn parse_failure() {
        let err = TeraEngine::new()
            .parse(Part::Html, "HTML {% for %}")
            .err()
            .unwrap();

        assert!(err.message.contains("html"), "{err}");
        assert!(err.cause.is_some());
    }

    #[test]
    fn render_failure() {
        let tpl = TeraEngine::new()
            .parse(Part::Subject, "Hello {{ name }}")
            .unwrap();

        let err = tpl.execute(&TemplateParams::new()).unwrap_err();
        assert!(err.to_string().contains("name"), "{err}");
    }

    #[test]
    fn nested_params() {
        let tpl = TeraEngine::new()
            .parse(Part::Text, "{{ bean.name }} likes {{ bean.bean2.hobby }}")
            .unwrap();

        let params = TemplateParams::from_iter([(
            "bean".into(),
            json!({ "name": "frank", "bean2": { "hobby": "fishing" } }),
        )]);
        assert_eq!(tpl.execute(&params).unwrap(), "frank likes fishing");
    }

    #[test]
    fn html_autoescape() {
        let params = TemplateParams::from_iter([("name".into(), json!("<b>Bob</b>"))]);

        let tpl = TeraEngine::new()
            .with_html_autoescape(true)
            .parse(Part::Html, "{{ name }}")
            .unwrap();
        assert_eq!(tpl.execute(&params).unwrap(), "&lt;b&gt;Bob&lt;&#x2F;b&gt;");

        let tpl = TeraEngine::new()
            .with_html_autoescape(true)
            .parse(Part::Text, "{{ name }}")
            .unwrap();
        assert_eq!(tpl.execute(&params).unwrap(), "<b>Bob</b>");
    }
}

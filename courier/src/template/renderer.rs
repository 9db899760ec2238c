use tracing::{debug, trace};

use super::{Fragment, ParsedAddress, ParsedTemplates, Part, PartErrors, RenderFailure, TemplateParams};
use crate::{Address, Email};

/// Renders the parsed templates into the given email.
///
/// Fragments are executed in this order: subject, from, reply-to,
/// to, cc, bcc, html then text. A fragment is executed only if its
/// target field is not set yet, so values set explicitly always win
/// over templates. Failures are recorded under their part and never
/// stop the other fragments.
///
/// Display templates of address lists target the address at the
/// same position. A display template without matching address is
/// executed anyway and its output is discarded.
pub fn render(
    templates: &ParsedTemplates,
    email: &mut Email,
    params: &TemplateParams,
) -> PartErrors<RenderFailure> {
    let mut errors = PartErrors::new();

    render_field(Part::Subject, &templates.subject, &mut email.subject, params, &mut errors);
    render_display(Part::From, &templates.from, email.from.as_mut(), params, &mut errors);
    render_display(Part::ReplyTo, &templates.reply_to, email.reply_to.as_mut(), params, &mut errors);
    render_displays(Part::To, &templates.to, &mut email.to, params, &mut errors);
    render_displays(Part::Cc, &templates.cc, &mut email.cc, params, &mut errors);
    render_displays(Part::Bcc, &templates.bcc, &mut email.bcc, params, &mut errors);
    render_field(Part::Html, &templates.html, &mut email.html, params, &mut errors);
    render_field(Part::Text, &templates.text, &mut email.text, params, &mut errors);

    errors
}

fn render_field(
    part: Part,
    fragment: &Fragment,
    target: &mut Option<String>,
    params: &TemplateParams,
    errors: &mut PartErrors<RenderFailure>,
) {
    if target.is_some() {
        trace!(%part, "field explicitly set, skipping template");
        return;
    }

    if let Some(output) = execute(part, fragment, params, errors) {
        *target = Some(output);
    }
}

fn render_display(
    part: Part,
    parsed: &ParsedAddress,
    target: Option<&mut Address>,
    params: &TemplateParams,
    errors: &mut PartErrors<RenderFailure>,
) {
    if target.as_ref().is_some_and(|addr| addr.has_display()) {
        trace!(%part, "display explicitly set, skipping template");
        return;
    }

    let Some(display) = execute(part, &parsed.display, params, errors) else {
        return;
    };

    match target {
        Some(addr) => addr.display = Some(display),
        None => trace!(%part, "no address matching display template, discarding it"),
    }
}

fn render_displays(
    part: Part,
    parsed: &[ParsedAddress],
    targets: &mut [Address],
    params: &TemplateParams,
    errors: &mut PartErrors<RenderFailure>,
) {
    for (i, parsed) in parsed.iter().enumerate() {
        render_display(part, parsed, targets.get_mut(i), params, errors);
    }
}

fn execute(
    part: Part,
    fragment: &Fragment,
    params: &TemplateParams,
    errors: &mut PartErrors<RenderFailure>,
) -> Option<String> {
    let tpl = fragment.compiled()?;

    match tpl.execute(params) {
        Ok(output) => Some(output),
        Err(err) => {
            debug!(%part, "cannot render template fragment: {err}");
            errors.insert(part, err);
            None
        }
    }
}

#[cfg(all(test, feature = "tera"))]
mod tests {
    use serde_json::json;

    use super::render;
    use crate::{
        template::{
            source::MemoryTemplateSource, Part, PartErrors, RawTemplates, TemplateLoader,
            TemplateParams, TeraEngine,
        },
        Address, Email,
    };

    fn loader() -> TemplateLoader {
        TemplateLoader::new(MemoryTemplateSource::new(), TeraEngine::new())
    }

    fn params() -> TemplateParams {
        TemplateParams::from_iter([
            ("name".into(), json!("Alice")),
            ("team".into(), json!("Support")),
        ])
    }

    #[test_log::test]
    fn explicit_values_win() {
        let raw = RawTemplates::new()
            .with_subject("Template subject")
            .with_text("Hello {{ name }}")
            .with_from_display("{{ team }}");

        let mut errors = PartErrors::new();
        let tpl = loader().parse(&raw, &mut errors);

        let mut email = Email::new();
        email.subject = Some("Explicit subject".into());
        email.from = Some(Address::new("from@localhost", Some("Bob")));

        let errors = render(&tpl, &mut email, &params());

        assert!(errors.is_empty());
        assert_eq!(email.subject.as_deref(), Some("Explicit subject"));
        assert_eq!(email.text.as_deref(), Some("Hello Alice"));
        assert_eq!(email.from, Some(Address::new("from@localhost", Some("Bob"))));
    }

    #[test_log::test]
    fn failures_are_isolated() {
        let raw = RawTemplates::new()
            .with_subject("Hi {{ name }}")
            .with_text("Text {{ undefined }}")
            .with_html("HTML {{ name }}");

        let mut errors = PartErrors::new();
        let tpl = loader().parse(&raw, &mut errors);

        let mut email = Email::new();
        let errors = render(&tpl, &mut email, &params());

        assert_eq!(errors.parts().collect::<Vec<_>>(), vec![Part::Text]);
        assert_eq!(email.subject.as_deref(), Some("Hi Alice"));
        assert_eq!(email.html.as_deref(), Some("HTML Alice"));
        assert_eq!(email.text, None);
    }

    #[test_log::test]
    fn displays_target_addresses_by_position() {
        let raw = RawTemplates::new()
            .with_from_display("{{ team }}")
            .with_to_display("{{ name }}")
            .with_to_display("{{ undefined }}")
            .with_to_display("{{ nowhere }}")
            .with_cc_display("{{ team }}");

        let mut errors = PartErrors::new();
        let tpl = loader().parse(&raw, &mut errors);

        let mut email = Email::new();
        email.from = Some("from@localhost".into());
        email.to.push("alice@localhost".into());
        email.to.push("bob@localhost".into());
        email.cc.push(("carol@localhost", "Carol").into());
        email.cc.push("dave@localhost".into());

        let errors = render(&tpl, &mut email, &params());

        assert_eq!(email.from, Some(Address::new("from@localhost", Some("Support"))));
        assert_eq!(email.to[0], Address::new("alice@localhost", Some("Alice")));
        assert_eq!(email.to[1], Address::new_nameless("bob@localhost"));
        assert_eq!(email.to.len(), 2);
        assert_eq!(email.cc[0], Address::new("carol@localhost", Some("Carol")));
        assert_eq!(email.cc[1], Address::new_nameless("dave@localhost"));

        // the display without address is still executed
        assert_eq!(errors.get_all(Part::To).len(), 2);
        assert_eq!(errors.len(), 2);
    }
}

use std::{collections::HashMap, io};

use super::{locale_suffixes, TemplateSource};
use crate::template::Part;

/// Template source backed by a map.
///
/// Entries are keyed by template id, part and an optional locale,
/// and follow the same locale fallback as the
/// [`FileSystemTemplateSource`](super::FileSystemTemplateSource).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryTemplateSource {
    templates: HashMap<(String, Part, String), String>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the unlocalized source of a fragment.
    pub fn insert(&mut self, id: impl ToString, part: Part, source: impl ToString) {
        self.insert_localized(id, part, None::<String>, source)
    }

    /// Inserts the source of a fragment for the given locale.
    pub fn insert_localized(
        &mut self,
        id: impl ToString,
        part: Part,
        locale: Option<impl AsRef<str>>,
        source: impl ToString,
    ) {
        let locale: Option<&str> = locale.as_ref().map(|locale| locale.as_ref());
        let suffix = locale_suffixes(locale).remove(0);
        self.templates
            .insert((id.to_string(), part, suffix), source.to_string());
    }

    pub fn with(mut self, id: impl ToString, part: Part, source: impl ToString) -> Self {
        self.insert(id, part, source);
        self
    }

    pub fn with_localized(
        mut self,
        id: impl ToString,
        part: Part,
        locale: impl AsRef<str>,
        source: impl ToString,
    ) -> Self {
        self.insert_localized(id, part, Some(locale), source);
        self
    }
}

impl TemplateSource for MemoryTemplateSource {
    fn resolve(&self, id: &str, part: Part, locale: Option<&str>) -> io::Result<Option<String>> {
        let source = locale_suffixes(locale).into_iter().find_map(|suffix| {
            self.templates
                .get(&(id.to_owned(), part, suffix))
                .cloned()
        });

        Ok(source)
    }
}

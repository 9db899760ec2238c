//! # Template source
//!
//! Module dedicated to template source resolution. A
//! [`TemplateSource`] finds the source of one fragment of a template
//! for a given locale.

mod fs;
mod memory;

use std::io;

#[doc(inline)]
pub use self::{
    fs::{FileSystemTemplateSource, DEFAULT_EXTENSION},
    memory::MemoryTemplateSource,
};
use super::Part;

/// The template source resolution capability.
pub trait TemplateSource: Send + Sync {
    /// Resolves the source of the given template fragment.
    ///
    /// Returns `Ok(None)` when the fragment does not exist for the
    /// given locale. A `None` locale means the unlocalized fragment.
    /// Any other I/O fault is returned as an error.
    fn resolve(&self, id: &str, part: Part, locale: Option<&str>) -> io::Result<Option<String>>;
}

/// Expands a locale into the list of suffixes to look for, from the
/// most to the least specific one.
///
/// `fr_CA` (or `fr-CA`) gives `_fr_CA`, `_fr` then the unlocalized
/// suffix.
pub(crate) fn locale_suffixes(locale: Option<&str>) -> Vec<String> {
    let mut suffixes = Vec::new();

    if let Some(locale) = locale {
        let segments: Vec<_> = locale
            .split(['_', '-'])
            .filter(|segment| !segment.is_empty())
            .collect();

        for len in (1..=segments.len()).rev() {
            suffixes.push(format!("_{}", segments[..len].join("_")));
        }
    }

    suffixes.push(String::new());
    suffixes
}

#[cfg(test)]
mod tests {
    use super::locale_suffixes;

    #[test]
    fn suffixes() {
        assert_eq!(locale_suffixes(None), vec![""]);
        assert_eq!(locale_suffixes(Some("fr")), vec!["_fr", ""]);
        assert_eq!(
            locale_suffixes(Some("fr-CA")),
            vec!["_fr_CA", "_fr", ""]
        );
        assert_eq!(
            locale_suffixes(Some("zh_Hant_TW")),
            vec!["_zh_Hant_TW", "_zh_Hant", "_zh", ""]
        );
    }
}

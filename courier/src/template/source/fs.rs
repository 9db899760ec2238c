use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use super::{locale_suffixes, TemplateSource};
use crate::template::Part;

/// The default extension of template files.
pub const DEFAULT_EXTENSION: &str = "tera";

/// Template source reading fragments from a directory.
///
/// The fragment `html` of the template `welcome` in locale `fr_CA`
/// is looked for in `welcome-html_fr_CA.tera`, then
/// `welcome-html_fr.tera`, then `welcome-html.tera`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSystemTemplateSource {
    dir: PathBuf,
    extension: String,
}

impl FileSystemTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    pub fn with_extension(mut self, ext: impl ToString) -> Self {
        self.extension = ext.to_string();
        self
    }

    pub fn with_some_extension(mut self, ext: Option<impl ToString>) -> Self {
        if let Some(ext) = ext {
            self = self.with_extension(ext);
        }
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &str, part: Part, suffix: &str) -> PathBuf {
        let ext = self.extension.trim_start_matches('.');

        if ext.is_empty() {
            self.dir.join(format!("{id}-{part}{suffix}"))
        } else {
            self.dir.join(format!("{id}-{part}{suffix}.{ext}"))
        }
    }
}

impl TemplateSource for FileSystemTemplateSource {
    fn resolve(&self, id: &str, part: Part, locale: Option<&str>) -> io::Result<Option<String>> {
        for suffix in locale_suffixes(locale) {
            let path = self.path(id, part, &suffix);
            trace!(path = %path.display(), "looking for template file");

            match fs::read_to_string(&path) {
                Ok(source) => {
                    debug!(path = %path.display(), "template file found");
                    return Ok(Some(source));
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::FileSystemTemplateSource;
    use crate::template::{Part, TemplateSource};

    #[test]
    fn resolve_falls_back_from_region_to_language_to_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("welcome-text.tera"), "default").unwrap();
        fs::write(dir.path().join("welcome-text_fr.tera"), "fr").unwrap();
        fs::write(dir.path().join("welcome-html_fr_CA.tera"), "fr_CA").unwrap();

        let source = FileSystemTemplateSource::new(dir.path());

        let text = source.resolve("welcome", Part::Text, Some("fr_CA")).unwrap();
        assert_eq!(text.as_deref(), Some("fr"));

        let text = source.resolve("welcome", Part::Text, Some("de")).unwrap();
        assert_eq!(text.as_deref(), Some("default"));

        let html = source.resolve("welcome", Part::Html, Some("fr-CA")).unwrap();
        assert_eq!(html.as_deref(), Some("fr_CA"));

        let html = source.resolve("welcome", Part::Html, None).unwrap();
        assert_eq!(html, None);
    }

    #[test]
    fn resolve_with_custom_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("welcome-subject.ftl"), "Hello").unwrap();

        let source = FileSystemTemplateSource::new(dir.path()).with_extension(".ftl");
        let subject = source.resolve("welcome", Part::Subject, None).unwrap();
        assert_eq!(subject.as_deref(), Some("Hello"));
    }
}

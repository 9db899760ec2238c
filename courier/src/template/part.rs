use std::{
    collections::{btree_map, BTreeMap},
    fmt,
};

/// The template fragment kind.
///
/// Parts are both the unit of failure isolation and the key failures
/// are recorded under.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Part {
    Subject,
    Text,
    Html,
    From,
    ReplyTo,
    To,
    Cc,
    Bcc,
}

impl Part {
    /// Parts that can be resolved by a template source.
    ///
    /// Address lists are excluded: their display templates only come
    /// from raw templates, one per address.
    pub const LOADABLE: [Part; 5] = [
        Part::Subject,
        Part::Text,
        Part::Html,
        Part::From,
        Part::ReplyTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Text => "text",
            Self::Html => "html",
            Self::From => "from",
            Self::ReplyTo => "replyTo",
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures ordered by part.
///
/// Every failure recorded under a part is kept: list parts (to, cc
/// and bcc) can hold one failure per address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PartErrors<E>(BTreeMap<Part, Vec<E>>);

impl<E> PartErrors<E> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a failure under the given part.
    pub fn insert(&mut self, part: Part, err: E) {
        self.0.entry(part).or_default().push(err);
    }

    /// Returns the first failure recorded under the given part.
    pub fn get(&self, part: Part) -> Option<&E> {
        self.0.get(&part).and_then(|errs| errs.first())
    }

    /// Returns all failures recorded under the given part.
    pub fn get_all(&self, part: Part) -> &[E] {
        self.0.get(&part).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, part: Part) -> bool {
        self.0.contains_key(&part)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failures, all parts included.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Iterates over parts having at least one failure.
    pub fn parts(&self) -> impl Iterator<Item = Part> + '_ {
        self.0.keys().copied()
    }

    /// Iterates over every failure along with its part.
    pub fn iter(&self) -> impl Iterator<Item = (Part, &E)> {
        self.0
            .iter()
            .flat_map(|(part, errs)| errs.iter().map(move |err| (*part, err)))
    }

    /// Moves all failures of `other` into `self`.
    pub fn extend(&mut self, other: PartErrors<E>) {
        for (part, errs) in other.0 {
            self.0.entry(part).or_default().extend(errs);
        }
    }
}

impl<E> Default for PartErrors<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> IntoIterator for PartErrors<E> {
    type Item = (Part, Vec<E>);
    type IntoIter = btree_map::IntoIter<Part, Vec<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Part, PartErrors};

    #[test]
    fn list_parts_keep_every_failure() {
        let mut errs = PartErrors::new();
        errs.insert(Part::To, "first");
        errs.insert(Part::Html, "html");
        errs.insert(Part::To, "second");

        assert_eq!(errs.len(), 3);
        assert_eq!(errs.get(Part::To), Some(&"first"));
        assert_eq!(errs.get_all(Part::To), &["first", "second"]);
        assert_eq!(errs.get_all(Part::Subject), &[] as &[&str]);
        assert_eq!(errs.parts().collect::<Vec<_>>(), vec![Part::Html, Part::To]);
    }

    #[test]
    fn names() {
        assert_eq!(Part::ReplyTo.to_string(), "replyTo");
        assert_eq!(Part::Bcc.as_str(), "bcc");
    }
}

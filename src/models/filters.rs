use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Filter field identifier to the option values the listing page offers for
/// it. A snapshot of the live page; fields may come and go upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterVocabulary {
    fields: BTreeMap<String, BTreeSet<String>>,
}

impl FilterVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field even when `options` is empty.
    pub fn insert_field<I, S>(&mut self, field: impl Into<String>, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .entry(field.into())
            .or_default()
            .extend(options.into_iter().map(Into::into));
    }

    pub fn options(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.fields.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Caller-chosen filter values, kept in insertion order so the query string
/// reflects the order the caller gave them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection(Vec<(String, String)>);

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.0.push((field, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSelection {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut selection = FilterSelection::new();
        for (field, value) in iter {
            selection.insert(field, value);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_kept() {
        let mut vocabulary = FilterVocabulary::new();
        vocabulary.insert_field("mfgr", ["AMD", "Intel"]);
        vocabulary.insert_field("igp", Vec::<String>::new());

        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.options("igp").unwrap().is_empty());
        assert!(vocabulary.options("mfgr").unwrap().contains("AMD"));
    }

    #[test]
    fn selection_preserves_order_and_replaces_duplicates() {
        let selection: FilterSelection =
            [("socket", "AM4"), ("mfgr", "AMD"), ("socket", "AM5")].into_iter().collect();
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![("socket", "AM5"), ("mfgr", "AMD")]
        );
    }
}

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;

/// Hardware categories the specs database exposes a listing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Gpu,
}

impl ComponentKind {
    pub fn key(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "cpu",
            ComponentKind::Gpu => "gpu",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "cpu" => Some(ComponentKind::Cpu),
            "gpu" => Some(ComponentKind::Gpu),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key().to_uppercase())
    }
}

impl FromStr for ComponentKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ExtractError::UnsupportedComponent(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Released,
    Generation,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Released => "released",
            SortKey::Generation => "generation",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "released" => Ok(SortKey::Released),
            "generation" => Ok(SortKey::Generation),
            other => Err(ExtractError::InvalidSortKey(other.to_string())),
        }
    }
}

/// One row of a listing table: header text to cell text, in column order,
/// plus the absolute link to the item's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentRecord {
    pub link: String,
    fields: Vec<(String, String)>,
}

impl ComponentRecord {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            fields: Vec::new(),
        }
    }

    /// Sets `header` to `value`, replacing an earlier value under the same
    /// header in place.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// JSON key of the detail link.
pub const LINK_KEY: &str = "Link";
/// JSON key a page column literally named `Link` is moved to, so it does not
/// collide with the detail link.
pub const LINK_COLUMN_KEY: &str = "Link (column)";

// Flattened into a single JSON object: columns in order, then the detail link.
impl Serialize for ComponentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (header, value) in &self.fields {
            let key = if header == LINK_KEY {
                LINK_COLUMN_KEY
            } else {
                header.as_str()
            };
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(LINK_KEY, &self.link)?;
        map.end()
    }
}

/// Listing result tagged with the category it was extracted for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ComponentList {
    pub kind: ComponentKind,
    pub records: Vec<ComponentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_accepts_only_known_values() {
        assert_eq!("released".parse::<SortKey>().unwrap(), SortKey::Released);
        assert_eq!(SortKey::default(), SortKey::Name);
        assert!(matches!(
            "price".parse::<SortKey>(),
            Err(ExtractError::InvalidSortKey(key)) if key == "price"
        ));
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        assert_eq!("CPU".parse::<ComponentKind>().unwrap(), ComponentKind::Cpu);
        assert!(matches!(
            "ram".parse::<ComponentKind>(),
            Err(ExtractError::UnsupportedComponent(_))
        ));
    }

    #[test]
    fn record_keeps_column_order_and_serializes_link() {
        let mut record = ComponentRecord::new("https://example.test/cpu-specs/a.c1");
        record.insert("Name", "Ryzen 5 3600");
        record.insert("Cores", "6 / 12");
        assert_eq!(record.headers().collect::<Vec<_>>(), vec!["Name", "Cores"]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"Name":"Ryzen 5 3600","Cores":"6 / 12","#,
                r#""Link":"https://example.test/cpu-specs/a.c1"}"#
            )
        );
    }

    #[test]
    fn link_column_survives_serialization() {
        let mut record = ComponentRecord::new("https://example.test/a.c1");
        record.insert("Name", "A");
        record.insert("Cores", "6");
        record.insert("Link", "details");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
        assert_eq!(json[LINK_KEY], "https://example.test/a.c1");
        assert_eq!(json[LINK_COLUMN_KEY], "details");
        assert_eq!(json["Cores"], "6");
    }
}

//! The record catalog the workstation navigates, and the ways it can be loaded.
//!
//! Separated out so that catalogs can be validated without pulling in the rest of the
//! workstation.
#![deny(missing_docs)]

use std::{collections::HashMap, path::Path};

use serde::Deserialize;

mod record;
pub use record::{DARK_FOLDER_COLOR, Record, RecordId};

/// An error that occurred while building or loading a [`Catalog`].
#[derive(Debug)]
pub enum CatalogError {
    /// Two records share the same ID.
    DuplicateId(RecordId),
    /// The catalog file could not be read.
    Io(std::io::Error),
    /// The catalog file was not valid TOML.
    Toml(toml::de::Error),
    /// The catalog file was not valid JSON.
    Json(serde_json::Error),
}
impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "duplicate record id: {id}"),
            CatalogError::Io(e) => write!(f, "failed to read catalog: {e}"),
            CatalogError::Toml(e) => write!(f, "failed to parse catalog TOML: {e}"),
            CatalogError::Json(e) => write!(f, "failed to parse catalog JSON: {e}"),
        }
    }
}
impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::DuplicateId(_) => None,
            CatalogError::Io(e) => Some(e),
            CatalogError::Toml(e) => Some(e),
            CatalogError::Json(e) => Some(e),
        }
    }
}
impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}
impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Toml(e)
    }
}
impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}

/// On-disk shape of a catalog: a list of `[[record]]` tables.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "record", alias = "records", default)]
    records: Vec<Record>,
}

/// An ordered, immutable sequence of records.
///
/// Records live in a flat array; IDs are resolved to indices once through a map, so cyclic
/// neighbours are plain modular arithmetic.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
    index_by_id: HashMap<RecordId, usize>,
}
impl Catalog {
    /// Builds a catalog from records in display order, assigning each its index.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Result<Self, CatalogError> {
        let mut records: Vec<Record> = records.into_iter().collect();
        let mut index_by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter_mut().enumerate() {
            record.index = index;
            if index_by_id.insert(record.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self {
            records,
            index_by_id,
        })
    }

    /// Parses a catalog from TOML `[[record]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.records)
    }

    /// Parses a catalog from a JSON object with a `record` (or `records`) array.
    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        Self::new(file.records)
    }

    /// Loads a catalog file, picking the format from its extension (`.json`, otherwise TOML).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Resolves a record ID to its catalog index.
    pub fn index_of(&self, id: &RecordId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// The record with the given ID, if any.
    pub fn by_id(&self, id: &RecordId) -> Option<&Record> {
        self.index_of(id).and_then(|i| self.records.get(i))
    }

    /// Index of the first record, or `None` if empty.
    pub fn first_index(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(0)
    }

    /// Index of the last record, or `None` if empty.
    pub fn last_index(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }

    /// Cyclic successor of `index`, wrapping from the last record to the first.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let len = self.records.len();
        (index < len).then(|| (index + 1) % len)
    }

    /// Cyclic predecessor of `index`, wrapping from the first record to the last.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        let len = self.records.len();
        (index < len).then(|| (index + len - 1) % len)
    }

    /// Iterates over records in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}
impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        [[record]]
        id = "alpha"
        code = "A-01"
        title = "Alpha"
        image_ref = "alpha.png"
        aspect_ratio = 1.5
        color = "#2C2B29"
        tags = ["film", "35mm"]
        stats = [1.0, 2.0, 3.0]

        [[record]]
        id = "beta"
        title = "Beta"
        image_url = "beta.png"
    "##;

    #[test]
    fn test_from_toml_assigns_indices_in_file_order() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().id, RecordId::new("alpha"));
        assert_eq!(catalog.get(1).unwrap().index, 1);
        assert_eq!(catalog.index_of(&"beta".into()), Some(1));
        assert_eq!(catalog.by_id(&"alpha".into()).unwrap().tags.len(), 2);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let beta = catalog.get(1).unwrap();
        assert_eq!(beta.aspect_ratio, 1.0);
        assert_eq!(beta.image_ref, "beta.png");
        assert!(beta.stats.is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"record": [{"id": "a", "title": "A", "image_ref": "a.png"}]}"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let toml = r#"
            [[record]]
            id = "a"
            title = "A"
            image_ref = "a.png"

            [[record]]
            id = "a"
            title = "Also A"
            image_ref = "a2.png"
        "#;
        match Catalog::from_toml_str(toml) {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn test_cyclic_neighbours() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.next_index(0), Some(1));
        assert_eq!(catalog.next_index(1), Some(0));
        assert_eq!(catalog.previous_index(0), Some(1));
        assert_eq!(catalog.previous_index(1), Some(0));
        assert_eq!(catalog.next_index(2), None);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.first_index(), None);
        assert_eq!(catalog.last_index(), None);
        assert_eq!(catalog.next_index(0), None);
        assert_eq!(catalog.previous_index(0), None);
    }
}

use std::fmt;
use std::path::Path;

use anyhow::Context as _;
use serde::de::{Deserializer, MapAccess, Visitor};

use crate::foundation::error::{NewscardError, NewscardResult};

/// A selectable full-canvas map image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MapEntry {
    pub name: String,
    pub url: String,
}

/// Named map categories, in the order the catalog file lists them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapCatalog {
    categories: Vec<(String, Vec<MapEntry>)>,
}

impl MapCatalog {
    pub fn from_json(json: &str) -> NewscardResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NewscardError::validation(format!("invalid map catalog: {e}")))
    }

    pub fn load(path: &Path) -> NewscardResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read map catalog '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// Category shown when the picker opens.
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(|(name, _)| name.as_str())
    }

    /// Maps of one category; unknown categories are empty.
    pub fn maps_in(&self, category: &str) -> &[MapEntry] {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, maps)| maps.as_slice())
            .unwrap_or(&[])
    }

    /// Look a map up by url across all categories.
    pub fn find(&self, url: &str) -> Option<(&str, &MapEntry)> {
        self.categories.iter().find_map(|(cat, maps)| {
            maps.iter()
                .find(|m| m.url == url)
                .map(|m| (cat.as_str(), m))
        })
    }
}

impl serde::Serialize for MapCatalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap as _;
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, maps) in &self.categories {
            map.serialize_entry(name, maps)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = MapCatalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of category name to [{name, url}] lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MapCatalog, A::Error> {
        let mut categories: Vec<(String, Vec<MapEntry>)> = Vec::new();
        while let Some((name, maps)) = access.next_entry::<String, Vec<MapEntry>>()? {
            if categories.iter().any(|(existing, _)| *existing == name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate category '{name}'"
                )));
            }
            categories.push((name, maps));
        }
        Ok(MapCatalog { categories })
    }
}

impl<'de> serde::Deserialize<'de> for MapCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/maps.rs"]
mod tests;

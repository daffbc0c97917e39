//! Product name ↔ product id lookup.
//!
//! Panels and chat messages name products by display name while market
//! snapshots key them by id. The mapping is loaded by the host; a name with
//! no entry is a normal condition, not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bidirectional product id / display name map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct ProductCatalog {
    id_to_name: HashMap<String, String>,
    name_to_id: HashMap<String, String>,
}

impl ProductCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, replacing any previous entry for either side.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();

        if let Some(old_name) = self.id_to_name.remove(&id) {
            self.name_to_id.remove(&old_name);
        }
        if let Some(old_id) = self.name_to_id.remove(&name) {
            self.id_to_name.remove(&old_id);
        }

        self.id_to_name.insert(id.clone(), name.clone());
        self.name_to_id.insert(name, id);
    }

    /// Resolve a display name to its product id.
    #[must_use]
    pub fn name_to_id(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    /// Resolve a product id to its display name.
    #[must_use]
    pub fn id_to_name(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Number of mapped products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// True when no products are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

impl<I, N> FromIterator<(I, N)> for ProductCatalog
where
    I: Into<String>,
    N: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (id, name) in iter {
            catalog.insert(id, name);
        }
        catalog
    }
}

impl From<HashMap<String, String>> for ProductCatalog {
    fn from(id_to_name: HashMap<String, String>) -> Self {
        id_to_name.into_iter().collect()
    }
}

impl From<ProductCatalog> for HashMap<String, String> {
    fn from(catalog: ProductCatalog) -> Self {
        catalog.id_to_name
    }
}

//! Immutable supplier catalog and its snapshot handle. The catalog is
//! built once from the external provider's category partitions, validated,
//! and never mutated; a runtime refresh swaps the whole snapshot while
//! in-flight queries keep reading the one they started with.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::supplier::{Supplier, SupplierId};
use crate::errors::DomainError;

/// External catalog source: the full supplier set, partitioned by category
/// identifier.
pub trait CatalogProvider: Send + Sync {
    fn partitions(&self) -> Result<BTreeMap<String, Vec<Supplier>>, DomainError>;
}

/// In-memory provider over a fixed partition map.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalogProvider {
    partitions: BTreeMap<String, Vec<Supplier>>,
}

impl StaticCatalogProvider {
    pub fn new(partitions: BTreeMap<String, Vec<Supplier>>) -> Self {
        Self { partitions }
    }
}

impl CatalogProvider for StaticCatalogProvider {
    fn partitions(&self) -> Result<BTreeMap<String, Vec<Supplier>>, DomainError> {
        Ok(self.partitions.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    suppliers: Vec<Supplier>,
    category_index: BTreeMap<String, Vec<usize>>,
    id_index: BTreeMap<SupplierId, usize>,
}

impl Catalog {
    /// Validates every record and builds the catalog. Iteration order is
    /// the partition order, which downstream ranking treats as the
    /// catalog's native order.
    pub fn from_partitions(
        partitions: BTreeMap<String, Vec<Supplier>>,
    ) -> Result<Self, DomainError> {
        let mut catalog = Self::default();
        for (category, suppliers) in partitions {
            let mut indices = Vec::with_capacity(suppliers.len());
            for supplier in suppliers {
                supplier.validate()?;
                if catalog.id_index.contains_key(&supplier.id) {
                    return Err(DomainError::InvariantViolation(format!(
                        "duplicate supplier id `{}`",
                        supplier.id.0
                    )));
                }
                let index = catalog.suppliers.len();
                catalog.id_index.insert(supplier.id.clone(), index);
                indices.push(index);
                catalog.suppliers.push(supplier);
            }
            catalog.category_index.insert(category, indices);
        }
        Ok(catalog)
    }

    pub fn from_provider(provider: &dyn CatalogProvider) -> Result<Self, DomainError> {
        Self::from_partitions(provider.partitions()?)
    }

    pub fn all(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn in_category(&self, category: &str) -> Vec<&Supplier> {
        self.category_index
            .get(category)
            .map(|indices| indices.iter().map(|&index| &self.suppliers[index]).collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_index.keys().map(String::as_str)
    }

    pub fn by_id(&self, id: &SupplierId) -> Option<&Supplier> {
        self.id_index.get(id).map(|&index| &self.suppliers[index])
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

/// Shared handle over the current catalog snapshot. Readers grab an `Arc`
/// and work against it for the whole query; `replace` swaps the snapshot
/// atomically without disturbing them.
#[derive(Debug)]
pub struct CatalogHandle {
    snapshot: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self { snapshot: RwLock::new(Arc::new(catalog)) }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, catalog: Catalog) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }
}

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    categories: BTreeMap<String, Vec<Supplier>>,
}

/// Loads a catalog from a JSON file of the shape
/// `{"categories": {"<category>": [<supplier>, ...]}}`.
pub fn load_json(path: &Path) -> Result<Catalog, CatalogFileError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogFileError::ReadFile { path: path.to_owned(), source })?;
    let file: CatalogFile = serde_json::from_str(&raw)
        .map_err(|source| CatalogFileError::ParseFile { path: path.to_owned(), source })?;
    Ok(Catalog::from_partitions(file.categories)?)
}

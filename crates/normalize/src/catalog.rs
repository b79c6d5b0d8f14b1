use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Catalog has no usable rows")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    category: String,
}

/// Read-only product reference catalog: normalized product name → category.
///
/// Built once at startup from a `name,category` CSV and shared (via `Arc`)
/// across all lookups for the lifetime of the process. Never mutated and
/// never reloaded mid-run.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    categories: HashMap<String, String>,
    /// Names in file order — fuzzy tie-breaking depends on this ordering.
    names: Vec<String>,
}

impl ProductCatalog {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Expects a header row with `name` and `category` columns. Rows that
    /// fail to deserialize or have an empty name are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut categories = HashMap::new();
        let mut names = Vec::new();

        for result in csv_reader.deserialize::<CatalogRow>() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    tracing::warn!("Skipping malformed catalog row: {err}");
                    continue;
                }
            };
            let name = row.name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if !categories.contains_key(&name) {
                names.push(name.clone());
            }
            categories.insert(name, row.category.trim().to_string());
        }

        if names.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { categories, names })
    }

    /// Product names in insertion order, for use as a fuzzy candidate set.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Category for an exact normalized name.
    pub fn category(&self, name: &str) -> Option<&str> {
        self.categories.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
name,category
BILLY bookcase ,Furniture
POÄNG armchair,Furniture
FANTASTISK napkins,Kitchen
";

    #[test]
    fn loads_and_normalizes_names() {
        let catalog = ProductCatalog::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.category("billy bookcase"), Some("Furniture"));
        assert_eq!(catalog.category("poäng armchair"), Some("Furniture"));
    }

    #[test]
    fn names_preserve_file_order() {
        let catalog = ProductCatalog::from_csv_reader(CSV.as_bytes()).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names[0], "billy bookcase");
        assert_eq!(names[2], "fantastisk napkins");
    }

    #[test]
    fn skips_rows_with_empty_name() {
        let csv = "name,category\n  ,Furniture\nbilly,Furniture\n";
        let catalog = ProductCatalog::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let result = ProductCatalog::from_csv_reader("name,category\n".as_bytes());
        assert!(matches!(result, Err(CatalogError::Empty)));
    }
}

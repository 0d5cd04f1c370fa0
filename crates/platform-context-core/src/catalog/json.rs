//! Catalog source backed by a directory of JSON dump files

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

use super::source::{CatalogSource, ElementIter};
use super::{MethodElement, PropertyElement, TypeElement};

pub const METHODS_FILE: &str = "global-methods.json";
pub const PROPERTIES_FILE: &str = "global-properties.json";
pub const TYPES_FILE: &str = "types.json";

/// Reads `global-methods.json`, `global-properties.json` and `types.json`
/// from a directory. Each file is read only when its sequence is requested,
/// so a missing file surfaces on the build that needs it.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    dir: PathBuf,
}

impl JsonCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> CatalogResult<Vec<T>> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        let items: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), count = items.len(), "Loaded catalog file");
        Ok(items)
    }
}

impl CatalogSource for JsonCatalog {
    fn global_methods(&self) -> CatalogResult<ElementIter<'_, MethodElement>> {
        Ok(Box::new(self.load::<MethodElement>(METHODS_FILE)?.into_iter()))
    }

    fn global_properties(&self) -> CatalogResult<ElementIter<'_, PropertyElement>> {
        Ok(Box::new(
            self.load::<PropertyElement>(PROPERTIES_FILE)?.into_iter(),
        ))
    }

    fn types(&self) -> CatalogResult<ElementIter<'_, TypeElement>> {
        Ok(Box::new(self.load::<TypeElement>(TYPES_FILE)?.into_iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn test_reads_dump_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            METHODS_FILE,
            r#"[{"name": "Сообщить", "signature": []}]"#,
        );
        write(
            dir.path(),
            PROPERTIES_FILE,
            r#"[{"name": "ТекущаяДата", "readonly": true}]"#,
        );
        write(
            dir.path(),
            TYPES_FILE,
            r#"[{"name": "Массив", "methods": [{"name": "Добавить"}]}]"#,
        );

        let catalog = JsonCatalog::new(dir.path());
        let methods: Vec<_> = catalog.global_methods().unwrap().collect();
        let properties: Vec<_> = catalog.global_properties().unwrap().collect();
        let types: Vec<_> = catalog.types().unwrap().collect();

        assert_eq!(methods[0].name, "Сообщить");
        assert!(properties[0].readonly);
        assert_eq!(types[0].methods[0].name, "Добавить");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonCatalog::new(dir.path());

        match catalog.types() {
            Err(CatalogError::Io { path, .. }) => assert!(path.ends_with(TYPES_FILE)),
            other => panic!("expected Io error, got {:?}", other.map(|_| ())),
        };
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), METHODS_FILE, "{not json");

        let catalog = JsonCatalog::new(dir.path());
        assert!(matches!(
            catalog.global_methods(),
            Err(CatalogError::Parse { .. })
        ));
    }
}

//! Case-insensitive name index over the catalog
//!
//! Three maps (methods, properties, types) keyed by the lower-cased element
//! name. Stored elements keep their original display names. The index is
//! built wholesale from a [`CatalogSource`] and never updated in place.

mod shared;

pub use shared::{IndexPhase, IndexSnapshot, IndexState, SharedIndex};

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use ahash::AHasher;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{
    CatalogSource, ElementKind, ElementRef, MethodElement, PropertyElement, TypeElement,
};
use crate::error::CatalogResult;

/// Element counts of a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexCounts {
    pub methods: usize,
    pub properties: usize,
    pub types: usize,
    /// Methods and properties declared inside types
    pub members: usize,
}

/// Lower-cased name maps for the three element kinds.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    methods: BTreeMap<String, MethodElement>,
    properties: BTreeMap<String, PropertyElement>,
    types: BTreeMap<String, TypeElement>,
    fingerprint: String,
}

impl CatalogIndex {
    /// An index with no entries.
    pub fn empty() -> Self {
        let mut index = Self::default();
        index.fingerprint = index.compute_fingerprint();
        index
    }

    /// Drain the source's three sequences once into the name maps.
    ///
    /// Duplicate names within a kind keep the last element seen.
    pub fn build(source: &dyn CatalogSource) -> CatalogResult<Self> {
        let start = Instant::now();

        let methods = collect_keyed(ElementKind::Method, source.global_methods()?, |m| &m.name);
        let properties = collect_keyed(ElementKind::Property, source.global_properties()?, |p| {
            &p.name
        });
        let types = collect_keyed(ElementKind::Type, source.types()?, |t| &t.name);

        let mut index = Self {
            methods,
            properties,
            types,
            fingerprint: String::new(),
        };
        index.fingerprint = index.compute_fingerprint();

        let counts = index.counts();
        info!(
            methods = counts.methods,
            properties = counts.properties,
            types = counts.types,
            members = counts.members,
            build_time_ms = start.elapsed().as_millis() as u64,
            fingerprint = %index.fingerprint,
            "Catalog index built"
        );

        Ok(index)
    }

    pub fn method(&self, key: &str) -> Option<&MethodElement> {
        self.methods.get(key)
    }

    pub fn property(&self, key: &str) -> Option<&PropertyElement> {
        self.properties.get(key)
    }

    pub fn type_element(&self, key: &str) -> Option<&TypeElement> {
        self.types.get(key)
    }

    /// Direct lookup by lower-cased key in the map for `kind`.
    pub fn get(&self, kind: ElementKind, key: &str) -> Option<ElementRef<'_>> {
        match kind {
            ElementKind::Method => self.method(key).map(ElementRef::Method),
            ElementKind::Property => self.property(key).map(ElementRef::Property),
            ElementKind::Type => self.type_element(key).map(ElementRef::Type),
        }
    }

    /// `(key, element)` pairs of one kind in key order.
    pub fn entries(
        &self,
        kind: ElementKind,
    ) -> Box<dyn Iterator<Item = (&str, ElementRef<'_>)> + '_> {
        match kind {
            ElementKind::Method => Box::new(
                self.methods
                    .iter()
                    .map(|(k, m)| (k.as_str(), ElementRef::Method(m))),
            ),
            ElementKind::Property => Box::new(
                self.properties
                    .iter()
                    .map(|(k, p)| (k.as_str(), ElementRef::Property(p))),
            ),
            ElementKind::Type => Box::new(
                self.types
                    .iter()
                    .map(|(k, t)| (k.as_str(), ElementRef::Type(t))),
            ),
        }
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodElement> {
        self.methods.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyElement> {
        self.properties.values()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeElement> {
        self.types.values()
    }

    pub fn counts(&self) -> IndexCounts {
        IndexCounts {
            methods: self.methods.len(),
            properties: self.properties.len(),
            types: self.types.len(),
            members: self
                .types
                .values()
                .map(|t| t.methods.len() + t.properties.len())
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty() && self.types.is_empty()
    }

    /// Hash over all stored names, for change detection across reloads.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn compute_fingerprint(&self) -> String {
        let mut hasher = AHasher::default();

        for name in self.methods.values().map(|m| &m.name) {
            name.hash(&mut hasher);
        }
        0xffu8.hash(&mut hasher);
        for name in self.properties.values().map(|p| &p.name) {
            name.hash(&mut hasher);
        }
        0xffu8.hash(&mut hasher);
        for ty in self.types.values() {
            ty.name.hash(&mut hasher);
            for member in ty.members() {
                member.name().hash(&mut hasher);
            }
        }

        format!("{:016x}", hasher.finish())
    }
}

fn collect_keyed<T>(
    kind: ElementKind,
    items: impl Iterator<Item = T>,
    name: impl Fn(&T) -> &String,
) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    for item in items {
        let key = name(&item).to_lowercase();
        if let Some(previous) = map.insert(key, item) {
            debug!(kind = %kind, name = %name(&previous), "Duplicate catalog name replaced");
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    fn test_index() -> CatalogIndex {
        let catalog = MemoryCatalog::new()
            .with_method(MethodElement::new("НайтиПоСсылке"))
            .with_property(PropertyElement::new("ТекущаяДата"))
            .with_type(
                TypeElement::new("ТаблицаЗначений")
                    .method(MethodElement::new("Количество"))
                    .property(PropertyElement::new("Колонки")),
            );
        CatalogIndex::build(&catalog).unwrap()
    }

    #[test]
    fn test_keys_are_lowercase_names_kept() {
        let index = test_index();

        let ty = index.type_element("таблицазначений").unwrap();
        assert_eq!(ty.name, "ТаблицаЗначений");
        assert!(index.type_element("ТаблицаЗначений").is_none());
    }

    #[test]
    fn test_get_respects_kind() {
        let index = test_index();

        assert!(index.get(ElementKind::Method, "найтипоссылке").is_some());
        assert!(index.get(ElementKind::Property, "найтипоссылке").is_none());
    }

    #[test]
    fn test_counts() {
        let counts = test_index().counts();
        assert_eq!(
            counts,
            IndexCounts {
                methods: 1,
                properties: 1,
                types: 1,
                members: 2,
            }
        );
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let catalog = MemoryCatalog::new()
            .with_method(MethodElement::new("Сообщить").description("first"))
            .with_method(MethodElement::new("СООБЩИТЬ").description("second"));
        let index = CatalogIndex::build(&catalog).unwrap();

        assert_eq!(index.counts().methods, 1);
        let method = index.method("сообщить").unwrap();
        assert_eq!(method.name, "СООБЩИТЬ");
        assert_eq!(method.description.as_deref(), Some("second"));
    }

    #[test]
    fn test_fingerprint_changes_with_names() {
        let a = CatalogIndex::build(&MemoryCatalog::new().with_method(MethodElement::new("А")))
            .unwrap();
        let b = CatalogIndex::build(&MemoryCatalog::new().with_method(MethodElement::new("Б")))
            .unwrap();
        let a_again =
            CatalogIndex::build(&MemoryCatalog::new().with_method(MethodElement::new("А")))
                .unwrap();

        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a_again.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_empty_index() {
        let index = CatalogIndex::empty();
        assert!(index.is_empty());
        assert_eq!(index.counts(), IndexCounts::default());
    }
}

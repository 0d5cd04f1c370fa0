//! Catalog source trait and the in-memory implementation

use crate::error::CatalogResult;

use super::{MethodElement, PropertyElement, TypeElement};

/// Boxed element sequence produced by a source.
pub type ElementIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Producer of catalog data consumed by the index builder.
///
/// Each call returns a fresh sequence which the builder drains exactly once.
/// No ordering is assumed. Implementations must be shareable across threads
/// because a reload may run on any caller thread.
pub trait CatalogSource: Send + Sync {
    /// Global methods of the platform context.
    fn global_methods(&self) -> CatalogResult<ElementIter<'_, MethodElement>>;

    /// Global properties of the platform context.
    fn global_properties(&self) -> CatalogResult<ElementIter<'_, PropertyElement>>;

    /// Platform types with their own members.
    fn types(&self) -> CatalogResult<ElementIter<'_, TypeElement>>;
}

/// In-memory catalog.
///
/// Useful for:
/// - Unit and integration testing
/// - Callers that already hold parsed catalog data
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    methods: Vec<MethodElement>,
    properties: Vec<PropertyElement>,
    types: Vec<TypeElement>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: MethodElement) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, property: PropertyElement) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_type(mut self, ty: TypeElement) -> Self {
        self.types.push(ty);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty() && self.types.is_empty()
    }
}

impl CatalogSource for MemoryCatalog {
    fn global_methods(&self) -> CatalogResult<ElementIter<'_, MethodElement>> {
        Ok(Box::new(self.methods.iter().cloned()))
    }

    fn global_properties(&self) -> CatalogResult<ElementIter<'_, PropertyElement>> {
        Ok(Box::new(self.properties.iter().cloned()))
    }

    fn types(&self) -> CatalogResult<ElementIter<'_, TypeElement>> {
        Ok(Box::new(self.types.iter().cloned()))
    }
}

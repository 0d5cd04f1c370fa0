//! Platform API catalog
//!
//! The catalog is the full set of global methods, global properties and
//! platform types (each with its own methods, properties and constructors).
//! Elements are immutable once loaded; a type owns its members by value.
//!
//! Catalog data reaches the index through a [`CatalogSource`]:
//!
//! - **Memory**: [`MemoryCatalog`] for tests and embedding callers
//! - **JSON dump**: [`JsonCatalog`] reading `global-methods.json`,
//!   `global-properties.json` and `types.json` from a directory

mod element;
mod json;
mod source;

pub use element::{Element, ElementKind, ElementRef};
pub use json::{JsonCatalog, METHODS_FILE, PROPERTIES_FILE, TYPES_FILE};
pub use source::{CatalogSource, ElementIter, MemoryCatalog};

use serde::{Deserialize, Serialize};

/// A single parameter of a method or constructor signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_name: None,
            required: false,
        }
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// One call form of a method or constructor.
///
/// `name` is the signature label (for example "Основной" or "По умолчанию").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

/// Constructors share the signature shape.
pub type ConstructorSignature = Signature;

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }
}

/// A method, either global or declared by a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodElement {
    pub name: String,
    #[serde(rename = "name_en", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "signature", default)]
    pub signatures: Vec<Signature>,
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl MethodElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            description: None,
            signatures: Vec::new(),
            return_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }
}

/// A property, either global or declared by a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyElement {
    pub name: String,
    #[serde(
        rename = "name_en",
        alias = "nameEn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub readonly: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl PropertyElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            description: None,
            readonly: false,
            type_name: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// A platform type with its members and constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodElement>,
    #[serde(default)]
    pub properties: Vec<PropertyElement>,
    #[serde(default)]
    pub constructors: Vec<ConstructorSignature>,
}

impl TypeElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            methods: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn method(mut self, method: MethodElement) -> Self {
        self.methods.push(method);
        self
    }

    pub fn property(mut self, property: PropertyElement) -> Self {
        self.properties.push(property);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorSignature) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Iterate methods then properties as element references.
    pub fn members(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.methods
            .iter()
            .map(ElementRef::Method)
            .chain(self.properties.iter().map(ElementRef::Property))
    }
}

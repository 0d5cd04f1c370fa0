//! Tagged element variants shared by the index, matcher and presenters

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MethodElement, PropertyElement, TypeElement};

/// Coarse category of a catalog element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Method,
    Property,
    Type,
}

impl ElementKind {
    /// Canonical kind tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Method => "method",
            ElementKind::Property => "property",
            ElementKind::Type => "type",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed reference to an element stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Method(&'a MethodElement),
    Property(&'a PropertyElement),
    Type(&'a TypeElement),
}

impl<'a> ElementRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ElementRef::Method(m) => &m.name,
            ElementRef::Property(p) => &p.name,
            ElementRef::Type(t) => &t.name,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Method(_) => ElementKind::Method,
            ElementRef::Property(_) => ElementKind::Property,
            ElementRef::Type(_) => ElementKind::Type,
        }
    }

    pub fn description(&self) -> Option<&'a str> {
        match self {
            ElementRef::Method(m) => m.description.as_deref(),
            ElementRef::Property(p) => p.description.as_deref(),
            ElementRef::Type(t) => t.description.as_deref(),
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            ElementRef::Method(m) => Element::Method((*m).clone()),
            ElementRef::Property(p) => Element::Property((*p).clone()),
            ElementRef::Type(t) => Element::Type((*t).clone()),
        }
    }
}

/// Owned element returned across the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Method(MethodElement),
    Property(PropertyElement),
    Type(TypeElement),
}

impl Element {
    pub fn name(&self) -> &str {
        self.as_element_ref().name()
    }

    pub fn kind(&self) -> ElementKind {
        self.as_element_ref().kind()
    }

    pub fn description(&self) -> Option<&str> {
        self.as_element_ref().description()
    }

    pub fn as_element_ref(&self) -> ElementRef<'_> {
        match self {
            Element::Method(m) => ElementRef::Method(m),
            Element::Property(p) => ElementRef::Property(p),
            Element::Type(t) => ElementRef::Type(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ElementKind::Method.to_string(), "method");
        assert_eq!(ElementKind::Property.as_str(), "property");
        assert_eq!(ElementKind::Type.as_str(), "type");
    }

    #[test]
    fn test_owned_round_trip_through_ref() {
        let method = MethodElement::new("Сообщить").description("Выводит сообщение");
        let element = ElementRef::Method(&method).to_element();

        assert_eq!(element.name(), "Сообщить");
        assert_eq!(element.kind(), ElementKind::Method);
        assert_eq!(element.description(), Some("Выводит сообщение"));
    }

    #[test]
    fn test_owned_element_is_tagged() {
        let element = Element::Type(TypeElement::new("Массив"));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["kind"], "type");
        assert_eq!(json["name"], "Массив");
    }
}

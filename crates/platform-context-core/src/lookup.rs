//! Exact name lookups

use crate::catalog::{ElementKind, ElementRef, TypeElement};
use crate::index::CatalogIndex;
use crate::search::KindFilter;

/// Kinds tried, in order, when no kind is given.
const LOOKUP_ORDER: [ElementKind; 3] = [
    ElementKind::Method,
    ElementKind::Property,
    ElementKind::Type,
];

/// Outcome of a type member lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLookup<'a> {
    Found {
        owner: &'a TypeElement,
        member: ElementRef<'a>,
    },
    TypeMissing,
    MemberMissing(&'a TypeElement),
}

/// Case-insensitive exact lookup.
///
/// With a kind, only that map is consulted. Without one, methods, properties
/// and types are tried in that order and the first hit wins. An unrecognized
/// kind finds nothing.
pub fn find_exact<'a>(
    index: &'a CatalogIndex,
    name: &str,
    kind: &KindFilter,
) -> Option<ElementRef<'a>> {
    let key = name.trim().to_lowercase();
    match kind {
        KindFilter::Any => LOOKUP_ORDER.iter().find_map(|k| index.get(*k, &key)),
        KindFilter::Only(k) => index.get(*k, &key),
        KindFilter::Other(_) => None,
    }
}

/// Resolve `type_name` exactly, then its methods and properties (in that
/// order) by exact case-insensitive member name.
pub fn find_member<'a>(
    index: &'a CatalogIndex,
    type_name: &str,
    member_name: &str,
) -> MemberLookup<'a> {
    let Some(owner) = find_type(index, type_name) else {
        return MemberLookup::TypeMissing;
    };

    let key = member_name.trim().to_lowercase();
    owner
        .members()
        .find(|m| m.name().to_lowercase() == key)
        .map(|member| MemberLookup::Found { owner, member })
        .unwrap_or(MemberLookup::MemberMissing(owner))
}

pub fn find_type<'a>(index: &'a CatalogIndex, type_name: &str) -> Option<&'a TypeElement> {
    index.type_element(&type_name.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, MethodElement, PropertyElement};

    fn test_index() -> CatalogIndex {
        let catalog = MemoryCatalog::new()
            .with_method(MethodElement::new("Дата"))
            .with_property(PropertyElement::new("Дата"))
            .with_type(TypeElement::new("Дата"))
            .with_type(
                TypeElement::new("СправочникСсылка")
                    .method(MethodElement::new("ПолучитьОбъект"))
                    .property(PropertyElement::new("Ссылка")),
            )
            .with_type(
                TypeElement::new("СправочникОбъект").property(PropertyElement::new("Код")),
            );
        CatalogIndex::build(&catalog).unwrap()
    }

    #[test]
    fn test_unfiltered_lookup_prefers_method() {
        let index = test_index();
        let found = find_exact(&index, "дата", &KindFilter::Any).unwrap();
        assert_eq!(found.kind(), ElementKind::Method);
    }

    #[test]
    fn test_kind_selects_map() {
        let index = test_index();
        let found = find_exact(&index, "Дата", &KindFilter::Only(ElementKind::Type)).unwrap();
        assert_eq!(found.kind(), ElementKind::Type);
        assert!(find_exact(&index, "Дата", &KindFilter::Other("enum".into())).is_none());
    }

    #[test]
    fn test_member_found_case_insensitive() {
        let index = test_index();
        match find_member(&index, "справочникссылка", "ССЫЛКА") {
            MemberLookup::Found { owner, member } => {
                assert_eq!(owner.name, "СправочникСсылка");
                assert_eq!(member.name(), "Ссылка");
                assert_eq!(member.kind(), ElementKind::Property);
            }
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn test_member_missing_is_scoped_to_type() {
        let index = test_index();
        assert!(matches!(
            find_member(&index, "СправочникСсылка", "Код"),
            MemberLookup::MemberMissing(_)
        ));
        assert_eq!(
            find_member(&index, "НетТакогоТипа", "Код"),
            MemberLookup::TypeMissing
        );
    }
}

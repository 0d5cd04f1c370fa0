//! Query normalization and kind alias resolution

use std::fmt;

use crate::catalog::ElementKind;

/// Natural-language synonyms accepted for each kind.
const KIND_ALIASES: &[(&str, ElementKind)] = &[
    ("method", ElementKind::Method),
    ("метод", ElementKind::Method),
    ("функция", ElementKind::Method),
    ("процедура", ElementKind::Method),
    ("property", ElementKind::Property),
    ("свойство", ElementKind::Property),
    ("реквизит", ElementKind::Property),
    ("поле", ElementKind::Property),
    ("атрибут", ElementKind::Property),
    ("type", ElementKind::Type),
    ("object", ElementKind::Type),
    ("class", ElementKind::Type),
    ("datatype", ElementKind::Type),
    ("объект", ElementKind::Type),
    ("класс", ElementKind::Type),
    ("тип", ElementKind::Type),
    ("структура", ElementKind::Type),
    ("данные", ElementKind::Type),
];

/// Trim and lower-case a raw query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Kind filter derived from a caller-supplied kind string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KindFilter {
    /// No kind given; every index participates
    #[default]
    Any,
    Only(ElementKind),
    /// Unrecognized kind, passed through unchanged. Matches nothing.
    Other(String),
}

impl KindFilter {
    pub fn allows(&self, kind: ElementKind) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Only(k) => *k == kind,
            KindFilter::Other(_) => false,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, KindFilter::Any)
    }

    /// Label used in not-found reports, `None` when unfiltered.
    pub fn label(&self) -> Option<String> {
        match self {
            KindFilter::Any => None,
            KindFilter::Only(k) => Some(k.as_str().to_string()),
            KindFilter::Other(raw) => Some(raw.clone()),
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::Any => f.write_str("any"),
            KindFilter::Only(k) => write!(f, "{}", k),
            KindFilter::Other(raw) => f.write_str(raw),
        }
    }
}

/// Map a raw kind string to a filter.
///
/// Absent or blank input means no filter. Known synonyms resolve to their
/// canonical kind; anything else passes through as [`KindFilter::Other`].
pub fn normalize_kind(raw: Option<&str>) -> KindFilter {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return KindFilter::Any;
    };

    let lowered = raw.to_lowercase();
    KIND_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, kind)| KindFilter::Only(*kind))
        .unwrap_or_else(|| KindFilter::Other(raw.to_string()))
}

/// Split a normalized query on whitespace.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Таблица Значений \n"), "таблица значений");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(normalize_kind(Some("Объект")), KindFilter::Only(ElementKind::Type));
        assert_eq!(normalize_kind(Some("класс")), KindFilter::Only(ElementKind::Type));
        assert_eq!(normalize_kind(Some("функция")), KindFilter::Only(ElementKind::Method));
        assert_eq!(normalize_kind(Some("реквизит")), KindFilter::Only(ElementKind::Property));
        assert_eq!(normalize_kind(Some(" METHOD ")), KindFilter::Only(ElementKind::Method));
    }

    #[test]
    fn test_absent_kind_is_any() {
        assert_eq!(normalize_kind(None), KindFilter::Any);
        assert_eq!(normalize_kind(Some("  ")), KindFilter::Any);
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        let filter = normalize_kind(Some("Перечисление"));
        assert_eq!(filter, KindFilter::Other("Перечисление".to_string()));
        assert!(!filter.allows(ElementKind::Type));
        assert_eq!(filter.label().as_deref(), Some("Перечисление"));
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("таблица   значений\tколичество"), vec![
            "таблица",
            "значений",
            "количество"
        ]);
    }
}

//! Matching strategies
//!
//! Each tier has its own precondition and contributes candidates
//! independently; ranking and deduplication happen afterwards in
//! [`super::rank::merge`].
//!
//! 1. Compound-name fusion: query words glued into a type identifier
//! 2. Type-then-member: leading words name a type, the rest one of its members
//! 3. Substring: the whole query inside an element name
//! 4. All words: every query word inside a name, in any order, when results are sparse
//! 5. Edit distance: optional, only when nothing else matched

use strsim::levenshtein;
use tracing::debug;

use super::fusion::compound_variants;
use super::query::{tokenize, KindFilter};
use super::rank::{MatchCandidate, MatchQuality, Tier};
use crate::catalog::{ElementKind, ElementRef, TypeElement};
use crate::config::EngineConfig;
use crate::index::CatalogIndex;

const ALL_KINDS: [ElementKind; 3] = [
    ElementKind::Method,
    ElementKind::Property,
    ElementKind::Type,
];

/// Runs the tiers for one query against a built index.
pub struct Matcher<'a> {
    index: &'a CatalogIndex,
    config: EngineConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a CatalogIndex, config: &EngineConfig) -> Self {
        Self {
            index,
            config: config.clone(),
        }
    }

    /// Collect raw candidates from every tier whose precondition holds.
    ///
    /// `query` must already be normalized and non-empty.
    pub fn candidates(&self, query: &str, kind: &KindFilter) -> Vec<MatchCandidate<'a>> {
        let words = tokenize(query);
        let mut out = Vec::new();

        if words.len() >= 2 && kind.allows(ElementKind::Type) {
            let before = out.len();
            self.compound_name(&words, &mut out);
            debug!(tier = 1, hits = out.len() - before, query, "Compound-name fusion");
        }

        if words.len() >= 2 {
            let before = out.len();
            self.type_member(&words, &mut out);
            debug!(tier = 2, hits = out.len() - before, query, "Type-then-member");
        }

        let before = out.len();
        self.substring(query, kind, &mut out);
        debug!(tier = 3, hits = out.len() - before, query, "Substring");

        if words.len() >= 2 && out.len() < self.config.sparse_threshold {
            let before = out.len();
            self.all_words(&words, kind, &mut out);
            debug!(tier = 4, hits = out.len() - before, query, "All words");
        }

        if self.config.fuzzy_fallback
            && out.is_empty()
            && query.chars().count() >= self.config.min_fuzzy_length
        {
            self.edit_distance(query, kind, &mut out);
            debug!(tier = 5, hits = out.len(), query, "Edit distance");
        }

        out
    }

    /// Tier 1: fused identifiers looked up in the type index.
    fn compound_name(&self, words: &[&str], out: &mut Vec<MatchCandidate<'a>>) {
        for ty in self.resolve_types(words) {
            let name = ty.name.to_lowercase();
            let matched = words.iter().filter(|w| name.contains(**w)).count();
            out.push(
                MatchCandidate::new(ElementRef::Type(ty), Tier::CompoundName, MatchQuality::Exact)
                    .words_matched(matched),
            );
        }
    }

    /// Tier 2: split the words into a type phrase and a member phrase.
    ///
    /// The kind filter does not restrict this tier.
    fn type_member(&self, words: &[&str], out: &mut Vec<MatchCandidate<'a>>) {
        for split in 1..words.len() {
            let (type_words, member_words) = words.split_at(split);
            let phrase = member_words.join(" ");

            for ty in self.resolve_types(type_words) {
                for member in ty.members() {
                    if let Some(quality) = member_quality(member.name(), &phrase, member_words) {
                        out.push(
                            MatchCandidate::new(member, Tier::TypeMember, quality).owner(&ty.name),
                        );
                    }
                }
            }
        }
    }

    /// Tier 3: the full query contained in a name.
    fn substring(&self, query: &str, kind: &KindFilter, out: &mut Vec<MatchCandidate<'a>>) {
        self.scan(kind, Tier::Substring, out, |name| {
            name.contains(query)
                .then(|| MatchQuality::of_containment(name, query))
        });
    }

    /// Tier 4: every word contained, in any order.
    fn all_words(&self, words: &[&str], kind: &KindFilter, out: &mut Vec<MatchCandidate<'a>>) {
        let before = out.len();
        self.scan(kind, Tier::AllWords, out, |name| {
            words
                .iter()
                .all(|w| name.contains(*w))
                .then_some(MatchQuality::AllWords)
        });
        for candidate in &mut out[before..] {
            candidate.words_matched = words.len();
        }
    }

    /// Tier 5: names within the configured Levenshtein distance.
    fn edit_distance(&self, query: &str, kind: &KindFilter, out: &mut Vec<MatchCandidate<'a>>) {
        let max = self.config.max_edit_distance;
        self.scan(kind, Tier::Fuzzy, out, |name| {
            let distance = levenshtein(query, name);
            (distance <= max).then_some(MatchQuality::Fuzzy(distance))
        });
    }

    /// Apply `test` to every lower-cased name allowed by `kind`, including
    /// type members when no kind was given.
    fn scan(
        &self,
        kind: &KindFilter,
        tier: Tier,
        out: &mut Vec<MatchCandidate<'a>>,
        test: impl Fn(&str) -> Option<MatchQuality>,
    ) {
        for element_kind in ALL_KINDS {
            if !kind.allows(element_kind) {
                continue;
            }
            for (key, element) in self.index.entries(element_kind) {
                if let Some(quality) = test(key) {
                    out.push(MatchCandidate::new(element, tier, quality));
                }
            }
        }

        if kind.is_any() {
            for ty in self.index.types() {
                for member in ty.members() {
                    if let Some(quality) = test(&member.name().to_lowercase()) {
                        out.push(MatchCandidate::new(member, tier, quality).owner(&ty.name));
                    }
                }
            }
        }
    }

    /// One type per fused variant of `words` that names a type.
    ///
    /// Variants differing only in case resolve to the same type and each
    /// counts as a hit; the sparse-results check for tier 4 sees every one.
    fn resolve_types(&self, words: &[&str]) -> Vec<&'a TypeElement> {
        compound_variants(words, self.config.max_prefix_words)
            .iter()
            .filter_map(|variant| self.index.type_element(&variant.to_lowercase()))
            .collect()
    }
}

/// Member match against a lower-cased phrase: exact, prefix, contains, or
/// (for multi-word phrases) every word contained.
fn member_quality(name: &str, phrase: &str, words: &[&str]) -> Option<MatchQuality> {
    let name = name.to_lowercase();
    if name.contains(phrase) {
        Some(MatchQuality::of_containment(&name, phrase))
    } else if words.len() >= 2 && words.iter().all(|w| name.contains(*w)) {
        Some(MatchQuality::AllWords)
    } else {
        None
    }
}

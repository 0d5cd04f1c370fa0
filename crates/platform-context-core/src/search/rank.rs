//! Candidate ranking and deduplication

use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::ElementRef;

/// Matching strategy that produced a candidate, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    CompoundName = 1,
    TypeMember = 2,
    Substring = 3,
    AllWords = 4,
    Fuzzy = 5,
}

impl Tier {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::CompoundName => "compound_name",
            Tier::TypeMember => "type_member",
            Tier::Substring => "substring",
            Tier::AllWords => "all_words",
            Tier::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a name matched inside its tier. Orders candidates that tie on tier
/// and word count, keeping the in-tier order exact, prefix, contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    Exact,
    Prefix,
    Contains,
    AllWords,
    Fuzzy(usize),
}

impl MatchQuality {
    /// Classify a lower-cased name against a lower-cased needle it contains.
    pub fn of_containment(name: &str, needle: &str) -> Self {
        if name == needle {
            MatchQuality::Exact
        } else if name.starts_with(needle) {
            MatchQuality::Prefix
        } else {
            MatchQuality::Contains
        }
    }
}

/// A transient, per-call match.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub element: ElementRef<'a>,
    /// Declaring type name for members found inside a type
    pub owner: Option<&'a str>,
    pub tier: Tier,
    pub words_matched: usize,
    pub quality: MatchQuality,
}

impl<'a> MatchCandidate<'a> {
    pub fn new(element: ElementRef<'a>, tier: Tier, quality: MatchQuality) -> Self {
        Self {
            element,
            owner: None,
            tier,
            words_matched: 0,
            quality,
        }
    }

    pub fn owner(mut self, owner: &'a str) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn words_matched(mut self, words: usize) -> Self {
        self.words_matched = words;
        self
    }

    fn dedup_key(&self) -> String {
        self.element.name().to_lowercase()
    }
}

/// A candidate paired with its lower-cased name, computed once per merge.
type Keyed<'a> = (String, MatchCandidate<'a>);

/// Strict total order over candidates: tier, then words matched (more is
/// better), then match quality, then case-insensitive name, then kind and
/// owner so that distinct elements never compare equal.
fn compare((a_key, a): &Keyed<'_>, (b_key, b): &Keyed<'_>) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then_with(|| Reverse(a.words_matched).cmp(&Reverse(b.words_matched)))
        .then_with(|| a.quality.cmp(&b.quality))
        .then_with(|| a_key.cmp(b_key))
        .then_with(|| a.element.kind().cmp(&b.element.kind()))
        .then_with(|| a.owner.cmp(&b.owner))
        .then_with(|| a.element.name().cmp(b.element.name()))
}

/// Merge candidates from all tiers into the final ordering.
///
/// A name matched by several tiers is kept once, at its best position.
pub fn merge(candidates: Vec<MatchCandidate<'_>>) -> Vec<MatchCandidate<'_>> {
    let mut keyed: Vec<Keyed<'_>> = candidates
        .into_iter()
        .map(|c| (c.dedup_key(), c))
        .collect();
    keyed.sort_by(compare);

    let mut seen: HashSet<&str> = HashSet::with_capacity(keyed.len());
    let merged = keyed
        .iter()
        .filter(|(key, _)| seen.insert(key.as_str()))
        .map(|(_, c)| *c)
        .collect();
    merged
}

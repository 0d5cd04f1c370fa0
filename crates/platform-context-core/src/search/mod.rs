//! Multi-tier search over a built index
//!
//! A query goes through:
//! 1. Normalization ([`normalize_query`], [`normalize_kind`])
//! 2. Candidate collection by the [`Matcher`] tiers
//! 3. Deduplication and ranking ([`merge`])
//! 4. Truncation to the caller's limit

mod fusion;
mod query;
mod rank;
mod tiers;

pub use fusion::compound_variants;
pub use query::{normalize_kind, normalize_query, tokenize, KindFilter};
pub use rank::{merge, MatchCandidate, MatchQuality, Tier};
pub use tiers::Matcher;

use crate::config::EngineConfig;
use crate::index::CatalogIndex;

/// Ranked, deduplicated candidates for an already normalized, non-empty query.
pub fn rank_query<'a>(
    index: &'a CatalogIndex,
    config: &EngineConfig,
    query: &str,
    kind: &KindFilter,
    limit: usize,
) -> Vec<MatchCandidate<'a>> {
    let candidates = Matcher::new(index, config).candidates(query, kind);
    let mut ranked = merge(candidates);
    ranked.truncate(limit);
    ranked
}

//! API facade over the shared index

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{CatalogSource, Element, Signature, TypeElement};
use crate::config::EngineConfig;
use crate::error::{ApiError, ApiResult};
use crate::index::{IndexCounts, IndexPhase, IndexSnapshot, SharedIndex};
use crate::lookup::{find_exact, find_member, find_type, MemberLookup};
use crate::search::{normalize_kind, normalize_query, rank_query, MatchCandidate, Tier};

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub element: Element,
    /// Declaring type for members found inside a type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub tier: Tier,
}

impl SearchHit {
    fn from_candidate(candidate: &MatchCandidate<'_>) -> Self {
        Self {
            element: candidate.element.to_element(),
            owner: candidate.owner.map(str::to_string),
            tier: candidate.tier,
        }
    }
}

/// Point-in-time view of the index and service counters.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub state: IndexPhase,
    pub counts: IndexCounts,
    pub fingerprint: Option<String>,
    pub failure: Option<String>,
    pub builds: u64,
    pub queries_served: u64,
}

/// Search and lookup operations over a lazily built catalog index.
pub struct PlatformApi {
    index: SharedIndex,
    config: EngineConfig,
    queries_served: AtomicU64,
}

impl PlatformApi {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: Arc<dyn CatalogSource>, config: EngineConfig) -> Self {
        Self {
            index: SharedIndex::new(source),
            config,
            queries_served: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked search. `kind` accepts canonical tags and their synonyms;
    /// `limit` defaults to 10 when absent or non-positive and is capped at 50.
    pub fn search(
        &self,
        query: &str,
        kind: Option<&str>,
        limit: Option<i64>,
    ) -> ApiResult<Vec<SearchHit>> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Err(ApiError::EmptyQuery);
        }

        let snapshot = self.snapshot()?;
        let start = Instant::now();
        let kind = normalize_kind(kind);
        let limit = self.config.effective_limit(limit);

        let ranked = rank_query(&snapshot.index, &self.config, &normalized, &kind, limit);
        let hits: Vec<SearchHit> = ranked
            .iter()
            .map(SearchHit::from_candidate)
            .collect();

        self.queries_served.fetch_add(1, Ordering::Relaxed);
        info!(
            query = %normalized,
            kind = %kind,
            limit,
            results = hits.len(),
            search_time_us = start.elapsed().as_micros() as u64,
            "Search completed"
        );
        Ok(hits)
    }

    /// Exact element by name.
    pub fn info(&self, name: &str, kind: Option<&str>) -> ApiResult<Element> {
        let name = require_name(name)?;
        let snapshot = self.snapshot()?;
        let filter = normalize_kind(kind);
        self.queries_served.fetch_add(1, Ordering::Relaxed);

        find_exact(&snapshot.index, name, &filter)
            .map(|element| element.to_element())
            .ok_or_else(|| ApiError::NotFound {
                name: name.to_string(),
                kind: filter.label(),
            })
    }

    /// Method or property declared by a type.
    pub fn get_member(&self, type_name: &str, member_name: &str) -> ApiResult<SearchHit> {
        let type_name = require_name(type_name)?;
        let member_name = require_name(member_name)?;
        let snapshot = self.snapshot()?;
        self.queries_served.fetch_add(1, Ordering::Relaxed);

        match find_member(&snapshot.index, type_name, member_name) {
            MemberLookup::Found { owner, member } => Ok(SearchHit {
                element: member.to_element(),
                owner: Some(owner.name.clone()),
                tier: Tier::TypeMember,
            }),
            MemberLookup::TypeMissing => Err(ApiError::TypeNotFound(type_name.to_string())),
            MemberLookup::MemberMissing(_) => Err(ApiError::MemberNotFound {
                type_name: type_name.to_string(),
                member_name: member_name.to_string(),
            }),
        }
    }

    /// Constructor signatures of a type, in declaration order.
    pub fn get_constructors(&self, type_name: &str) -> ApiResult<Vec<Signature>> {
        let ty = self.get_members(type_name)?;
        if ty.constructors.is_empty() {
            return Err(ApiError::NoConstructors(type_name.trim().to_string()));
        }
        Ok(ty.constructors)
    }

    /// Full type definition with all methods and properties.
    pub fn get_members(&self, type_name: &str) -> ApiResult<TypeElement> {
        let type_name = require_name(type_name)?;
        let snapshot = self.snapshot()?;
        self.queries_served.fetch_add(1, Ordering::Relaxed);

        find_type(&snapshot.index, type_name)
            .cloned()
            .ok_or_else(|| ApiError::TypeNotFound(type_name.to_string()))
    }

    /// Force a rebuild on next access.
    pub fn reload(&self) {
        self.index.reload();
    }

    /// Current state without triggering a build.
    pub fn status(&self) -> IndexStatus {
        let snapshot = self.index.current();
        IndexStatus {
            state: self.index.phase(),
            counts: snapshot
                .as_ref()
                .map(|s| s.index.counts())
                .unwrap_or_default(),
            fingerprint: snapshot
                .as_ref()
                .map(|s| s.index.fingerprint().to_string()),
            failure: snapshot.as_ref().and_then(|s| s.failure.clone()),
            builds: self.index.build_count(),
            queries_served: self.queries_served.load(Ordering::Relaxed),
        }
    }

    /// Ready snapshot for read-only use, such as exporting the catalog.
    pub fn snapshot(&self) -> ApiResult<Arc<IndexSnapshot>> {
        let snapshot = self.index.ensure_ready();
        if let Some(reason) = snapshot.failure.clone() {
            debug!(reason = %reason, "Rejecting call on failed index");
            return Err(ApiError::IndexUnavailable(reason));
        }
        Ok(snapshot)
    }
}

fn require_name(name: &str) -> ApiResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ApiError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, MethodElement};

    fn test_api() -> PlatformApi {
        let catalog = MemoryCatalog::new()
            .with_method(MethodElement::new("НайтиПоСсылке"))
            .with_type(
                TypeElement::new("Массив").constructor(Signature::new("По умолчанию")),
            );
        PlatformApi::new(Arc::new(catalog))
    }

    #[test]
    fn test_blank_inputs_rejected() {
        let api = test_api();
        assert_eq!(api.search("   ", None, None), Err(ApiError::EmptyQuery));
        assert_eq!(api.info("", None), Err(ApiError::EmptyName));
        assert_eq!(api.get_member("Массив", " "), Err(ApiError::EmptyName));
    }

    #[test]
    fn test_queries_served_counts_successful_calls() {
        let api = test_api();
        api.search("найти", None, None).unwrap();
        api.info("Массив", None).unwrap();
        let _ = api.search("", None, None);

        assert_eq!(api.status().queries_served, 2);
    }

    #[test]
    fn test_status_before_and_after_build() {
        let api = test_api();
        let before = api.status();
        assert_eq!(before.state, IndexPhase::Empty);
        assert!(before.fingerprint.is_none());

        api.get_constructors("Массив").unwrap();
        let after = api.status();
        assert_eq!(after.state, IndexPhase::Ready);
        assert_eq!(after.counts.types, 1);
        assert_eq!(after.builds, 1);
    }
}

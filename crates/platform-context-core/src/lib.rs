//! Platform Context Core
//!
//! Natural-language search over a platform API catalog: global methods,
//! global properties and types with their own members and constructors.
//!
//! ## Architecture
//!
//! - [`catalog`]: element model and the sources that supply it
//! - [`index`]: case-insensitive name maps and the lazily built shared state
//! - [`search`]: query normalization, matching tiers and ranking
//! - [`lookup`]: exact name and type member resolution
//! - [`PlatformApi`]: the facade exposing search, info and type lookups
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use platform_context_core::catalog::{MemoryCatalog, TypeElement};
//! use platform_context_core::PlatformApi;
//!
//! let catalog = MemoryCatalog::new().with_type(TypeElement::new("ТаблицаЗначений"));
//! let api = PlatformApi::new(Arc::new(catalog));
//!
//! let hits = api.search("Таблица значений", None, None).unwrap();
//! assert_eq!(hits[0].element.name(), "ТаблицаЗначений");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod lookup;
pub mod search;
pub mod service;

pub use config::EngineConfig;
pub use error::{ApiError, ApiResult, CatalogError, CatalogResult};
pub use index::{IndexCounts, IndexPhase};
pub use search::Tier;
pub use service::{IndexStatus, PlatformApi, SearchHit};

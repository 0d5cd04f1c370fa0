//! Platform Context
//!
//! Command line front end and MCP tool server for the platform API search
//! engine in `platform_context_core`.
//!
//! - [`cli`]: argument parsing and command dispatch
//! - [`format`]: Markdown rendering of results and errors
//! - [`export`]: JSON, XML and Markdown catalog exporters
//! - [`mcp`]: JSON-RPC tool server over stdio

pub mod cli;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod mcp;

pub use error::{Error, Result};

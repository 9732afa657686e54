// Resource Catalog - API Core
//
// Browse and search backend for a catalog of uploaded games, apps and tools.
// The catalog domain owns filtering, ranking and pagination; the server module
// exposes it over HTTP.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;

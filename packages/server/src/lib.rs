// Family Registry - API Core
//
// Maintains a registry of members grouped into families and enforces the
// relationship rules a plain database cannot express: mutual spouse links,
// shared family ids, and married fathers.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

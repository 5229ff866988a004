//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`navigate`] - Search, select and confirm a destination
//! - [`route`] - Single route request
//! - [`search`] - Place search, one-shot or interactive
//! - [`test_route`] - Test mode run against the fixed coordinates

pub mod common;
pub mod config;
pub mod navigate;
pub mod route;
pub mod search;
pub mod test_route;

//! Client-side pipeline for a GNews-compatible news API.
//!
//! Layers, leaf-first:
//!
//! - [`api`] - HTTP client, token sources and wire types
//! - [`error`] - Fetch → domain → presentation error classification
//! - [`repository`] - Fetching behind a transport-free error type
//! - [`headlines`] - Screen state machine and view data
//! - [`config`] - TOML configuration file

pub mod api;
pub mod config;
pub mod error;
pub mod headlines;
pub mod repository;

//! services/api/src/lib.rs
//!
//! The notes backend: a JSON file note store, an SMTP relay and the REST API
//! that ties them together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;

//! Common utilities for the Wren renderer.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - deduplicated warnings routed through the `log` facade
//! - **URL Resolution** - joining linked resource references onto the document location

pub mod url;
pub mod warning;

//! Output formatting utilities for the sv CLI.
//!
//! This module provides functions for formatting results as text or JSON.
//!
//! - [`filters`] - Parsed filters and compiled SQL (check, compile, query)
//! - [`registry`] - Field registry listing

mod filters;
mod registry;

pub use filters::{format_check_json, format_check_text, format_compile_json, format_compile_text, format_page_json};
pub use registry::{format_registry_json, format_registry_table};

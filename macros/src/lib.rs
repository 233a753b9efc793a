//! Proc macros for docship.
//!
//! # Config derive macro
//!
//! Generates field path accessors and a commented TOML template for a
//! configuration section struct.
//!
//! ```ignore
//! #[derive(Config)]
//! #[config(section = "publish")]
//! /// Publish settings.
//! pub struct PublishConfig {
//!     /// Remote name or URL.
//!     #[config(default = "origin")]
//!     pub remote: String,
//!
//!     /// GitHub Pages settings.
//!     #[config(sub)]
//!     pub github: GithubPagesConfig,
//! }
//!
//! // Generates:
//! // - PublishConfig::FIELDS.remote -> FieldPath("publish.remote")
//! // - PublishConfig::template() -> TOML body with comments
//! // - PublishConfig::template_with_header() -> with [publish] header
//! ```
//!
//! # Attributes
//!
//! Struct-level:
//! - `#[config(section = "path")]` - TOML section path (inferred from the
//!   struct name when omitted: `PublishConfig` → `publish`)
//!
//! Field-level:
//! - `#[config(skip)]` - Skip entirely (internal fields)
//! - `#[config(hidden)]` - Keep in FIELDS but hide from template output
//! - `#[config(name = "x")]` - Custom TOML field name
//! - `#[config(default = "x")]` - Default value shown in template
//! - `#[config(sub)]` - Nested Config struct, rendered as its own section

mod config;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro that generates FIELDS and template().
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    config::derive(&input).into()
}

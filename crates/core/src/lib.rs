//! Core functionality for the XBE CLI, agnostic of the command line surface:
//! the JSON:API document model, resource type aliases, the HTTP client, and
//! credential lookup.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `xbe` crate version. If you choose to depend directly on this crate, you do
//! so at your own risk of breakage.

pub mod auth;
pub mod http;
pub mod jsonapi;
pub mod resource_type;

//! Shared building blocks for the potluck service.
//!
//! Framework glue only — domain logic belongs in the service crate.

pub mod identity;
pub mod middleware;
pub mod pagination;
pub mod tracing;

//! Test utilities for the potluck service.
//!
//! Provides the gateway-header identity injector and shared fixtures.
//! Import in `#[cfg(test)]` blocks and `tests/` only — never in production
//! code.

pub mod fixture;
pub mod identity;

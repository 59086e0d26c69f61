//! Integration testing module
//!
//! End-to-end tests for the manifest library:
//! - Sample manifests (live with ad breaks, VOD, multivariant)
//! - Structural validation of encoded output
//! - Round trips, counters and ad-break scenarios

pub mod fixtures;

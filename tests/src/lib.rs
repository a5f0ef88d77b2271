//! # Quorum-Feed Test Suite
//!
//! Unified test crate containing the cross-subsystem scenarios:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs   # End-to-end consensus scenarios
//!     ├── lifecycle.rs   # Node lifecycle, rotation, and health
//!     └── signed_flow.rs # Real Ed25519 submission pipeline
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qf-tests
//! cargo test -p qf-tests integration::scenarios::
//! ```

#![allow(dead_code)]

pub mod integration;

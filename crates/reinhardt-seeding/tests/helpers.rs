//! Test helpers for reinhardt-seeding tests.
//!
//! This module provides the models, factories and seeders shared by the
//! integration tests.

#[path = "helpers/library.rs"]
pub mod library;

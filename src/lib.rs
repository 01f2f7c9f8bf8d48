//! Skinmatch - color-perception search over the CS2 cosmetic catalog.
//!
//! This library exposes modules for integration testing.

pub mod api;
pub mod catalog;
pub mod color;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

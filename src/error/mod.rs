//! Error module orchestrator.
//!
//! Navigation operations never fail; the error type only covers the ambient
//! surfaces (settings, logging, drivers).

mod types;

pub use types::{NavError, Result};

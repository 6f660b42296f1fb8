//! Error plumbing shared across the medcheck crates.

pub mod error;

pub use error::{FromMessage, wrap};

//! Profile persistence for flowcoach.
//!
//! This crate provides a trait-based store interface with a JSON-file
//! implementation. Loads treat missing or corrupt documents
//! as a normal condition and fall back to defaults.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_store;

pub use trait_::{ProfileStore, Result, StorageError};
pub use json_store::JsonProfileStore;

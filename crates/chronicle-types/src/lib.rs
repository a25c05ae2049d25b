//! Foundation types for chronicle.
//!
//! This crate provides the identifiers and record types shared by every
//! other chronicle crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`ProviderDatum`] — One typed record extracted from an external data source
//! - [`ProviderFile`] — A `{filepath, data}` pair produced by a provider

pub mod datum;
pub mod error;
pub mod object;

pub use datum::{ProviderDatum, ProviderFile};
pub use error::TypeError;
pub use object::ObjectId;

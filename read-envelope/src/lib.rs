//! Reading transfer envelopes
//!
//! This crate provides memory safe zero-allocation parsing of the flat byte
//! buffers ("envelopes") that carry font descriptors and paint-pattern
//! descriptors across the worker/host boundary. Readers borrow the buffer
//! and decode fields only when they are accessed.
//!
//! The companion [`write-envelope`] crate produces the buffers this crate
//! consumes; both sides share one schema build, so there is no versioning.
//!
//! [`write-envelope`]: https://docs.rs/write-envelope/

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod envelope_data;
pub mod font;
pub mod pattern;
mod read;

pub use envelope_data::EnvelopeData;
pub use read::{EnvelopeRead, ReadError};

/// Public re-export of the envelope-types crate.
pub extern crate envelope_types as types;

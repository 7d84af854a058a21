//! Common scalar and geometry types used in transfer envelopes.
//!
//! An *envelope* is the flat byte buffer produced by the `write-envelope`
//! crate and decoded by the `read-envelope` crate. This crate holds the
//! types both sides share: the little-endian wire scalars, the packed
//! three-valued boolean, 24-bit colors, and small geometry values.

#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod point;
mod raw;
mod rgb;
mod tristate;

pub use bbox::BoundingBox;
pub use point::Point;
pub use raw::{FixedSize, LittleEndian, Scalar};
pub use rgb::Rgb;
pub use tristate::TriState;

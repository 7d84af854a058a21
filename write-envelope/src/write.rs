//! Traits and helpers for serializing envelopes

use envelope_types::Scalar;

use crate::error::Error;
use crate::validate::Validate;

/// A type that can be written out as a transfer envelope, or as part of one.
///
/// Implementations must keep `encoded_len` and `write_into` in exact
/// agreement; [`dump_envelope`] allocates once, up front, from the former
/// and asserts the latter filled it precisely.
pub trait EnvelopeWrite {
    /// The exact number of bytes [`write_into`][Self::write_into] produces.
    fn encoded_len(&self) -> usize;

    /// Write our data into this [`EnvelopeWriter`].
    fn write_into(&self, writer: &mut EnvelopeWriter);
}

/// Serialize an envelope.
///
/// If the object is malformed this will return an [`Error`]; otherwise it
/// returns the single buffer holding the encoded record, fully owned by the
/// caller.
pub fn dump_envelope<T: EnvelopeWrite + Validate>(obj: &T) -> Result<Vec<u8>, Error> {
    obj.validate().map_err(Error::ValidationFailed)?;
    let len = obj.encoded_len();
    let mut writer = EnvelopeWriter::with_capacity(len);
    obj.write_into(&mut writer);
    let buf = writer.into_inner();
    // a mismatch here is a codec bug, not bad input
    assert_eq!(buf.len(), len, "envelope size drifted from encoded_len");
    log::trace!("serialized envelope: {len}B");
    Ok(buf)
}

/// An object that writes one envelope into a single pre-sized allocation.
#[derive(Debug, Default)]
pub struct EnvelopeWriter {
    buf: Vec<u8>,
}

/// A reserved u32 length field.
///
/// Regions whose length is only known once they are written (the strings
/// region of a font record) reserve their prefix up front and backfill it
/// via [`EnvelopeWriter::finish_len`].
#[must_use]
pub struct LenField {
    pos: usize,
}

impl EnvelopeWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        EnvelopeWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// The running offset: the number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Write a scalar in its little-endian wire representation.
    #[inline]
    pub fn write<T: Scalar>(&mut self, scalar: T) {
        self.buf.extend_from_slice(scalar.to_raw().as_ref());
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a length-prefixed string field.
    pub fn write_str(&mut self, s: &str) {
        self.write(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    /// Write `n` zero bytes.
    pub fn pad(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    /// Write zero bytes until the running offset is a multiple of `align`.
    pub fn align_to(&mut self, align: usize) {
        let padded = self.buf.len().next_multiple_of(align);
        self.buf.resize(padded, 0);
    }

    /// Reserve a u32 length field at the current position.
    pub fn reserve_len(&mut self) -> LenField {
        let pos = self.position();
        self.write(0u32);
        LenField { pos }
    }

    /// Backfill a reserved length field with the number of bytes written
    /// since it was reserved.
    pub fn finish_len(&mut self, field: LenField) {
        let len = self.position() - field.pos - 4;
        self.buf[field.pos..field.pos + 4].copy_from_slice(&(len as u32).to_le_bytes());
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backfilled_length() {
        let mut writer = EnvelopeWriter::with_capacity(16);
        writer.write(7u8);
        let field = writer.reserve_len();
        writer.write_str("abc");
        writer.finish_len(field);
        assert_eq!(
            writer.into_inner(),
            [7, 7, 0, 0, 0, 3, 0, 0, 0, b'a', b'b', b'c']
        );
    }

    #[test]
    fn alignment() {
        let mut writer = EnvelopeWriter::with_capacity(8);
        writer.write(1u8);
        writer.align_to(4);
        assert_eq!(writer.position(), 4);
        writer.align_to(4);
        assert_eq!(writer.position(), 4);
    }
}

//! raw envelope bytes

use std::ops::{Bound, Range, RangeBounds};

use envelope_types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary envelope data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data. It does not own the bytes; any
/// number of readers may wrap the same buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvelopeData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Reader types use this in their `read` implementations to walk the
/// variable-length regions of an envelope exactly once, recording where
/// each region lives so later accessors don't have to decode their
/// neighbors.
pub struct Cursor<'a> {
    pos: usize,
    data: EnvelopeData<'a>,
}

impl<'a> EnvelopeData<'a> {
    /// Create a new `EnvelopeData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        EnvelopeData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The data from `pos` onward, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<EnvelopeData<'a>> {
        self.bytes.get(pos..).map(|bytes| EnvelopeData { bytes })
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<EnvelopeData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| EnvelopeData { bytes })
    }

    /// Read a scalar value out of the buffer at `offset`.
    pub fn read_at<T: Scalar + FixedSize>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Reinterpret the given byte range as a slice of `T` without copying.
    ///
    /// `T` must have an alignment of 1; in practice this means `u8` or
    /// `LittleEndian<_>`.
    pub fn read_array<T: bytemuck::AnyBitPattern>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    pub(crate) fn read<T: Scalar + FixedSize>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    /// Read a u32 length prefix and skip the region it describes.
    ///
    /// Returns the byte range of the region (without its prefix), already
    /// bounds-checked against the underlying data.
    pub(crate) fn read_region(&mut self) -> Result<Range<usize>, ReadError> {
        let len = self.read::<u32>()? as usize;
        let range = self.pos..self.pos + len;
        self.data
            .slice(range.clone())
            .ok_or(ReadError::OutOfBounds)?;
        self.pos += len;
        Ok(range)
    }

    /// return the current position, or an error if we are out of bounds
    pub(crate) fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl AsRef<[u8]> for EnvelopeData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for EnvelopeData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        EnvelopeData::new(bytes)
    }
}

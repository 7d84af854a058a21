//! Lazy readers for font descriptor envelopes

use std::ops::Range;

use envelope_types::{FixedSize, Scalar, TriState};

use crate::envelope_data::EnvelopeData;
use crate::read::{EnvelopeRead, ReadError};

/// The number of tri-state flags in a [`FontInfo`] envelope.
pub const FLAG_COUNT: usize = 10;

/// Offset of the three f64 metrics, after the packed flag block.
pub const NUMBERS_OFFSET: usize = TriState::packed_len(FLAG_COUNT);

/// Offset of the optional bbox block (1 count byte + 4 reserved i16).
pub const BBOX_OFFSET: usize = NUMBERS_OFFSET + 3 * 8;

/// Offset of the optional font-matrix block (1 count byte + 6 reserved f64).
pub const FONT_MATRIX_OFFSET: usize = BBOX_OFFSET + 1 + 4 * 2;

/// Offset of the optional vertical-metrics block (1 count byte + 3 reserved i16).
pub const DEFAULT_V_METRICS_OFFSET: usize = FONT_MATRIX_OFFSET + 1 + 6 * 8;

/// Offset of the variable-length tail: strings region, nested records, payload.
///
/// Every optional block above reserves its full width even when absent, which
/// is what keeps this (and the offsets above) a compile-time constant.
pub const VARIABLE_OFFSET: usize = DEFAULT_V_METRICS_OFFSET + 1 + 3 * 2;

/// Read length-prefixed string `index` from a region of string fields.
///
/// This walks the preceding fields rather than consulting an offset table;
/// no record in the schema has more than four strings, so the walk is cheap
/// and keeps the reader stateless.
fn read_string(
    data: EnvelopeData<'_>,
    region: Range<usize>,
    index: usize,
) -> Result<&str, ReadError> {
    let mut pos = region.start;
    for _ in 0..index {
        let len = data.read_at::<u32>(pos)? as usize;
        pos += u32::RAW_BYTE_LEN + len;
    }
    let len = data.read_at::<u32>(pos)? as usize;
    pos += u32::RAW_BYTE_LEN;
    if pos + len > region.end {
        return Err(ReadError::OutOfBounds);
    }
    let bytes = data.slice(pos..pos + len).ok_or(ReadError::OutOfBounds)?;
    std::str::from_utf8(bytes.as_bytes())
        .map_err(|_| ReadError::MalformedData("string field is not valid utf-8"))
}

/// A CSS-derived font description: three required strings.
#[derive(Clone, Copy)]
pub struct CssFontInfo<'a> {
    data: EnvelopeData<'a>,
}

impl<'a> EnvelopeRead<'a> for CssFontInfo<'a> {
    fn read(data: EnvelopeData<'a>) -> Result<Self, ReadError> {
        // the three length prefixes must chain exactly to the end
        let mut pos = 0usize;
        for _ in 0..3 {
            let len = data.read_at::<u32>(pos)? as usize;
            pos += u32::RAW_BYTE_LEN + len;
        }
        if pos != data.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(CssFontInfo { data })
    }
}

impl<'a> CssFontInfo<'a> {
    fn string(&self, index: usize) -> Result<&'a str, ReadError> {
        read_string(self.data, 0..self.data.len(), index)
    }

    pub fn font_family(&self) -> Result<&'a str, ReadError> {
        self.string(0)
    }

    pub fn font_weight(&self) -> Result<&'a str, ReadError> {
        self.string(1)
    }

    pub fn italic_angle(&self) -> Result<&'a str, ReadError> {
        self.string(2)
    }
}

impl std::fmt::Debug for CssFontInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CssFontInfo")
            .field("font_family", &self.font_family())
            .field("font_weight", &self.font_weight())
            .field("italic_angle", &self.italic_angle())
            .finish()
    }
}

/// The optional style sub-record of a [`SystemFontInfo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemFontStyle<'a> {
    pub style: &'a str,
    pub weight: &'a str,
}

/// Describes an OS font substituted for an embedded one.
#[derive(Clone)]
pub struct SystemFontInfo<'a> {
    data: EnvelopeData<'a>,
    guess_fallback: bool,
    strings: Range<usize>,
    style_start: Option<usize>,
}

impl<'a> EnvelopeRead<'a> for SystemFontInfo<'a> {
    fn read(data: EnvelopeData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let guess_fallback = cursor.read::<u8>()? != 0;
        let strings = cursor.read_region()?;
        // anything after the strings region is the style sub-record
        let style_start = if cursor.remaining_bytes() > 0 {
            Some(cursor.position()?)
        } else {
            None
        };
        Ok(SystemFontInfo {
            data,
            guess_fallback,
            strings,
            style_start,
        })
    }
}

impl<'a> SystemFontInfo<'a> {
    pub fn guess_fallback(&self) -> bool {
        self.guess_fallback
    }

    fn string(&self, index: usize) -> Result<&'a str, ReadError> {
        read_string(self.data, self.strings.clone(), index)
    }

    pub fn css(&self) -> Result<&'a str, ReadError> {
        self.string(0)
    }

    pub fn loaded_name(&self) -> Result<&'a str, ReadError> {
        self.string(1)
    }

    pub fn base_font_name(&self) -> Result<&'a str, ReadError> {
        self.string(2)
    }

    pub fn src(&self) -> Result<&'a str, ReadError> {
        self.string(3)
    }

    pub fn style(&self) -> Result<Option<SystemFontStyle<'a>>, ReadError> {
        let Some(start) = self.style_start else {
            return Ok(None);
        };
        let region = start..self.data.len();
        Ok(Some(SystemFontStyle {
            style: read_string(self.data, region.clone(), 0)?,
            weight: read_string(self.data, region, 1)?,
        }))
    }
}

/// The root transferable font descriptor.
///
/// `read` walks the variable-length tail once, recording where each region
/// lives; every accessor after that decodes only the field it names.
#[derive(Clone)]
pub struct FontInfo<'a> {
    data: EnvelopeData<'a>,
    strings: Range<usize>,
    system_font_info: Range<usize>,
    css_font_info: Range<usize>,
    payload: Range<usize>,
}

impl<'a> EnvelopeRead<'a> for FontInfo<'a> {
    fn read(data: EnvelopeData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(VARIABLE_OFFSET);
        let strings = cursor.read_region()?;
        let system_font_info = cursor.read_region()?;
        let css_font_info = cursor.read_region()?;
        let payload = cursor.read_region()?;
        Ok(FontInfo {
            data,
            strings,
            system_font_info,
            css_font_info,
            payload,
        })
    }
}

impl<'a> FontInfo<'a> {
    /// Read a scalar at a fixed offset; `read` proved the fixed region is in
    /// bounds, so this cannot fail.
    fn fixed<T: Scalar + FixedSize>(&self, offset: usize) -> T {
        self.data.read_at(offset).unwrap()
    }

    fn flag(&self, index: usize) -> Option<bool> {
        debug_assert!(index < FLAG_COUNT);
        let byte: u8 = self.fixed(index / 4);
        let bits = byte >> ((index % 4) * TriState::BIT_LEN);
        TriState::from_bits(bits).into()
    }

    pub fn black(&self) -> Option<bool> {
        self.flag(0)
    }

    pub fn bold(&self) -> Option<bool> {
        self.flag(1)
    }

    pub fn disable_font_face(&self) -> Option<bool> {
        self.flag(2)
    }

    pub fn font_extra_properties(&self) -> Option<bool> {
        self.flag(3)
    }

    pub fn invalid_font(&self) -> Option<bool> {
        self.flag(4)
    }

    pub fn type3_font(&self) -> Option<bool> {
        self.flag(5)
    }

    pub fn italic(&self) -> Option<bool> {
        self.flag(6)
    }

    pub fn missing_file(&self) -> Option<bool> {
        self.flag(7)
    }

    pub fn remeasure(&self) -> Option<bool> {
        self.flag(8)
    }

    pub fn vertical(&self) -> Option<bool> {
        self.flag(9)
    }

    pub fn ascent(&self) -> f64 {
        self.fixed(NUMBERS_OFFSET)
    }

    pub fn default_width(&self) -> f64 {
        self.fixed(NUMBERS_OFFSET + 8)
    }

    pub fn descent(&self) -> f64 {
        self.fixed(NUMBERS_OFFSET + 16)
    }

    /// Decode one count-guarded fixed-arity block.
    fn optional_block<T: Scalar + FixedSize, const N: usize>(&self, offset: usize) -> Option<[T; N]> {
        let count: u8 = self.fixed(offset);
        if count == 0 {
            return None;
        }
        debug_assert_eq!(count as usize, N);
        Some(std::array::from_fn(|i| {
            self.fixed(offset + 1 + i * T::RAW_BYTE_LEN)
        }))
    }

    pub fn bbox(&self) -> Option<[i16; 4]> {
        self.optional_block(BBOX_OFFSET)
    }

    pub fn font_matrix(&self) -> Option<[f64; 6]> {
        self.optional_block(FONT_MATRIX_OFFSET)
    }

    pub fn default_v_metrics(&self) -> Option<[i16; 3]> {
        self.optional_block(DEFAULT_V_METRICS_OFFSET)
    }

    fn string(&self, index: usize) -> Result<&'a str, ReadError> {
        read_string(self.data, self.strings.clone(), index)
    }

    pub fn fallback_name(&self) -> Result<&'a str, ReadError> {
        self.string(0)
    }

    pub fn loaded_name(&self) -> Result<&'a str, ReadError> {
        self.string(1)
    }

    pub fn mimetype(&self) -> Result<&'a str, ReadError> {
        self.string(2)
    }

    pub fn name(&self) -> Result<&'a str, ReadError> {
        self.string(3)
    }

    /// The nested system-font record, or `None` if one was never attached.
    pub fn system_font_info(&self) -> Result<Option<SystemFontInfo<'a>>, ReadError> {
        if self.system_font_info.is_empty() {
            return Ok(None);
        }
        let data = self
            .data
            .slice(self.system_font_info.clone())
            .ok_or(ReadError::OutOfBounds)?;
        SystemFontInfo::read(data).map(Some)
    }

    /// The nested CSS-font record, or `None` if one was never attached.
    pub fn css_font_info(&self) -> Result<Option<CssFontInfo<'a>>, ReadError> {
        if self.css_font_info.is_empty() {
            return Ok(None);
        }
        let data = self
            .data
            .slice(self.css_font_info.clone())
            .ok_or(ReadError::OutOfBounds)?;
        CssFontInfo::read(data).map(Some)
    }

    /// The raw font-program payload.
    ///
    /// An absent payload and one that was [cleared](FontInfo::clear_data)
    /// are both `None`; the wire stores a zero length for either.
    pub fn data(&self) -> Option<&'a [u8]> {
        if self.payload.is_empty() {
            return None;
        }
        self.data.slice(self.payload.clone()).map(|d| d.as_bytes())
    }

    /// Zero the raw font-program payload in place and mark it empty.
    ///
    /// Nothing follows the payload, so no offset stored anywhere else
    /// changes. This is the one mutation the format allows after `write`;
    /// taking `&mut [u8]` instead of `&self` means a caller cannot clear a
    /// buffer while readers borrowed from it are still alive.
    pub fn clear_data(bytes: &mut [u8]) -> Result<(), ReadError> {
        let payload = FontInfo::read(EnvelopeData::new(bytes))?.payload;
        let len_pos = payload.start - u32::RAW_BYTE_LEN;
        bytes.get_mut(payload).ok_or(ReadError::OutOfBounds)?.fill(0);
        bytes[len_pos..len_pos + u32::RAW_BYTE_LEN].copy_from_slice(&0u32.to_le_bytes());
        Ok(())
    }
}

impl std::fmt::Debug for FontInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FontInfo")
            .field("name", &self.name())
            .field("loaded_name", &self.loaded_name())
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

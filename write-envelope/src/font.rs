//! Owned font descriptors and their serialization

use envelope_types::{FixedSize, Scalar, TriState};
use read_envelope::font::{
    BBOX_OFFSET, DEFAULT_V_METRICS_OFFSET, FLAG_COUNT, FONT_MATRIX_OFFSET, NUMBERS_OFFSET,
    VARIABLE_OFFSET,
};

use crate::validate::{Validate, ValidationCtx};
use crate::write::{EnvelopeWrite, EnvelopeWriter};

fn encoded_str_len(s: &str) -> usize {
    4 + s.len()
}

/// A CSS-derived font description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CssFontInfo {
    pub font_family: String,
    /// Kept as a string: producers forward whatever the style system handed
    /// them, numeric or not.
    pub font_weight: String,
    pub italic_angle: String,
}

impl CssFontInfo {
    fn strings(&self) -> [&str; 3] {
        [&self.font_family, &self.font_weight, &self.italic_angle]
    }
}

impl EnvelopeWrite for CssFontInfo {
    fn encoded_len(&self) -> usize {
        self.strings().iter().copied().map(encoded_str_len).sum()
    }

    fn write_into(&self, writer: &mut EnvelopeWriter) {
        for s in self.strings() {
            writer.write_str(s);
        }
    }
}

impl Validate for CssFontInfo {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_record("CssFontInfo", |ctx| {
            ctx.check_u32_len("font_family", self.font_family.len());
            ctx.check_u32_len("font_weight", self.font_weight.len());
            ctx.check_u32_len("italic_angle", self.italic_angle.len());
        })
    }
}

/// The optional style sub-record of a [`SystemFontInfo`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemFontStyle {
    pub style: String,
    pub weight: String,
}

/// Describes an OS font substituted for an embedded one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemFontInfo {
    pub guess_fallback: bool,
    pub css: String,
    pub loaded_name: String,
    pub base_font_name: String,
    pub src: String,
    /// Optional as a whole unit; absence means the substitution carries no
    /// explicit style request.
    pub style: Option<SystemFontStyle>,
}

impl SystemFontInfo {
    fn strings(&self) -> [&str; 4] {
        [&self.css, &self.loaded_name, &self.base_font_name, &self.src]
    }
}

impl EnvelopeWrite for SystemFontInfo {
    fn encoded_len(&self) -> usize {
        let strings: usize = self.strings().iter().copied().map(encoded_str_len).sum();
        let style = self
            .style
            .as_ref()
            .map(|style| encoded_str_len(&style.style) + encoded_str_len(&style.weight))
            .unwrap_or_default();
        1 + 4 + strings + style
    }

    fn write_into(&self, writer: &mut EnvelopeWriter) {
        writer.write(self.guess_fallback as u8);
        let strings_len = writer.reserve_len();
        for s in self.strings() {
            writer.write_str(s);
        }
        writer.finish_len(strings_len);
        if let Some(style) = &self.style {
            writer.write_str(&style.style);
            writer.write_str(&style.weight);
        }
    }
}

impl Validate for SystemFontInfo {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_record("SystemFontInfo", |ctx| {
            ctx.check_u32_len("css", self.css.len());
            ctx.check_u32_len("loaded_name", self.loaded_name.len());
            ctx.check_u32_len("base_font_name", self.base_font_name.len());
            ctx.check_u32_len("src", self.src.len());
            if let Some(style) = &self.style {
                ctx.check_u32_len("style", style.style.len());
                ctx.check_u32_len("weight", style.weight.len());
            }
        })
    }
}

/// The root transferable font descriptor.
///
/// Every optional field defaults to absent, and absence survives the wire:
/// an unset flag decodes as `None`, never `Some(false)`, and an unset array
/// decodes as `None`, never empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontInfo {
    pub black: Option<bool>,
    pub bold: Option<bool>,
    pub disable_font_face: Option<bool>,
    pub font_extra_properties: Option<bool>,
    pub invalid_font: Option<bool>,
    pub type3_font: Option<bool>,
    pub italic: Option<bool>,
    pub missing_file: Option<bool>,
    pub remeasure: Option<bool>,
    pub vertical: Option<bool>,
    pub ascent: f64,
    pub default_width: f64,
    pub descent: f64,
    pub bbox: Option<[i16; 4]>,
    pub font_matrix: Option<[f64; 6]>,
    pub default_v_metrics: Option<[i16; 3]>,
    pub fallback_name: String,
    pub loaded_name: String,
    pub mimetype: String,
    pub name: String,
    pub system_font_info: Option<SystemFontInfo>,
    pub css_font_info: Option<CssFontInfo>,
    /// The raw font program. May be zeroed in place after transfer, once the
    /// binding layer no longer needs it.
    pub data: Option<Vec<u8>>,
}

impl FontInfo {
    /// The tri-state flags in wire order.
    fn flags(&self) -> [Option<bool>; FLAG_COUNT] {
        [
            self.black,
            self.bold,
            self.disable_font_face,
            self.font_extra_properties,
            self.invalid_font,
            self.type3_font,
            self.italic,
            self.missing_file,
            self.remeasure,
            self.vertical,
        ]
    }

    fn strings(&self) -> [&str; 4] {
        [&self.fallback_name, &self.loaded_name, &self.mimetype, &self.name]
    }

    /// Write one count-guarded fixed-arity block, reserving the full element
    /// width even when the value is absent so later offsets stay constant.
    fn write_optional_block<T: Scalar + FixedSize + Copy, const N: usize>(
        writer: &mut EnvelopeWriter,
        value: &Option<[T; N]>,
    ) {
        match value {
            Some(values) => {
                writer.write(N as u8);
                for value in values {
                    writer.write(*value);
                }
            }
            None => {
                writer.write(0u8);
                writer.pad(N * T::RAW_BYTE_LEN);
            }
        }
    }
}

impl EnvelopeWrite for FontInfo {
    fn encoded_len(&self) -> usize {
        let strings: usize = self.strings().iter().copied().map(encoded_str_len).sum();
        let nested = |len: Option<usize>| 4 + len.unwrap_or_default();
        VARIABLE_OFFSET
            + 4
            + strings
            + nested(self.system_font_info.as_ref().map(EnvelopeWrite::encoded_len))
            + nested(self.css_font_info.as_ref().map(EnvelopeWrite::encoded_len))
            + nested(self.data.as_ref().map(Vec::len))
    }

    fn write_into(&self, writer: &mut EnvelopeWriter) {
        let flags = self.flags();
        let mut byte = 0u8;
        let mut bit = 0;
        for (i, flag) in flags.iter().enumerate() {
            byte |= TriState::from(*flag).to_bits() << bit;
            bit += TriState::BIT_LEN;
            if bit == 8 || i == FLAG_COUNT - 1 {
                writer.write(byte);
                byte = 0;
                bit = 0;
            }
        }
        debug_assert_eq!(writer.position(), NUMBERS_OFFSET);

        for number in [self.ascent, self.default_width, self.descent] {
            writer.write(number);
        }
        debug_assert_eq!(writer.position(), BBOX_OFFSET);

        Self::write_optional_block(writer, &self.bbox);
        debug_assert_eq!(writer.position(), FONT_MATRIX_OFFSET);
        Self::write_optional_block(writer, &self.font_matrix);
        debug_assert_eq!(writer.position(), DEFAULT_V_METRICS_OFFSET);
        Self::write_optional_block(writer, &self.default_v_metrics);
        debug_assert_eq!(writer.position(), VARIABLE_OFFSET);

        let strings_len = writer.reserve_len();
        for s in self.strings() {
            writer.write_str(s);
        }
        writer.finish_len(strings_len);

        match &self.system_font_info {
            Some(info) => {
                writer.write(info.encoded_len() as u32);
                info.write_into(writer);
            }
            None => writer.write(0u32),
        }
        match &self.css_font_info {
            Some(info) => {
                writer.write(info.encoded_len() as u32);
                info.write_into(writer);
            }
            None => writer.write(0u32),
        }
        match &self.data {
            Some(data) => {
                writer.write(data.len() as u32);
                writer.write_bytes(data);
            }
            None => writer.write(0u32),
        }
    }
}

impl Validate for FontInfo {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_record("FontInfo", |ctx| {
            ctx.check_u32_len("fallback_name", self.fallback_name.len());
            ctx.check_u32_len("loaded_name", self.loaded_name.len());
            ctx.check_u32_len("mimetype", self.mimetype.len());
            ctx.check_u32_len("name", self.name.len());
            if let Some(data) = &self.data {
                ctx.check_u32_len("data", data.len());
            }
            if let Some(info) = &self.system_font_info {
                info.validate_impl(ctx);
            }
            if let Some(info) = &self.css_font_info {
                info.validate_impl(ctx);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_envelope;
    use crate::from_obj::ToOwnedObj;
    use crate::test_data;
    use pretty_assertions::assert_eq;
    use read_envelope::{font, EnvelopeData, EnvelopeRead};

    fn read<'a>(bytes: &'a [u8]) -> font::FontInfo<'a> {
        font::FontInfo::read(EnvelopeData::new(bytes)).unwrap()
    }

    #[test]
    fn round_trip_fully_populated() {
        let info = test_data::sample_font_info();
        let bytes = dump_envelope(&info).unwrap();
        let decoded = read(&bytes);

        assert_eq!(decoded.black(), info.black);
        assert_eq!(decoded.bold(), info.bold);
        assert_eq!(decoded.vertical(), info.vertical);
        assert_eq!(decoded.ascent(), info.ascent);
        assert_eq!(decoded.descent(), info.descent);
        assert_eq!(decoded.bbox(), info.bbox);
        assert_eq!(decoded.font_matrix(), info.font_matrix);
        assert_eq!(decoded.default_v_metrics(), info.default_v_metrics);
        assert_eq!(decoded.name().unwrap(), info.name);
        assert_eq!(decoded.data(), info.data.as_deref());

        // the owned round trip covers every field at once
        let owned: FontInfo = decoded.to_owned_obj();
        assert_eq!(owned, info);
    }

    #[test]
    fn absence_is_not_a_default() {
        let info = test_data::minimal_font_info();
        let bytes = dump_envelope(&info).unwrap();
        let decoded = read(&bytes);

        assert_eq!(decoded.black(), None);
        assert_eq!(decoded.italic(), None);
        assert_eq!(decoded.bbox(), None);
        assert_eq!(decoded.font_matrix(), None);
        assert_eq!(decoded.default_v_metrics(), None);
        assert!(decoded.system_font_info().unwrap().is_none());
        assert!(decoded.css_font_info().unwrap().is_none());
        assert_eq!(decoded.data(), None);
    }

    #[test]
    fn mixed_flags_round_trip() {
        let info = FontInfo {
            bold: Some(false),
            vertical: Some(true),
            remeasure: Some(false),
            ..Default::default()
        };
        let bytes = dump_envelope(&info).unwrap();
        let decoded = read(&bytes);
        assert_eq!(decoded.black(), None);
        assert_eq!(decoded.bold(), Some(false));
        assert_eq!(decoded.remeasure(), Some(false));
        assert_eq!(decoded.vertical(), Some(true));
    }

    #[test]
    fn encoded_len_is_exact() {
        // the analytic size of the minimal record: fixed region, then four
        // length prefixes and four empty strings
        let minimal = test_data::minimal_font_info();
        assert_eq!(
            dump_envelope(&minimal).unwrap().len(),
            font::VARIABLE_OFFSET + 4 + 4 * 4 + 4 + 4 + 4
        );

        let full = test_data::sample_font_info();
        let strings: usize = [&full.fallback_name, &full.loaded_name, &full.mimetype, &full.name]
            .iter()
            .map(|s| 4 + s.len())
            .sum();
        let expected = font::VARIABLE_OFFSET
            + 4
            + strings
            + 4
            + full.system_font_info.as_ref().unwrap().encoded_len()
            + 4
            + full.css_font_info.as_ref().unwrap().encoded_len()
            + 4
            + full.data.as_ref().unwrap().len();
        assert_eq!(dump_envelope(&full).unwrap().len(), expected);
    }

    #[test]
    fn clear_data_preserves_everything_else() {
        let info = test_data::sample_font_info();
        let mut bytes = dump_envelope(&info).unwrap();
        font::FontInfo::clear_data(&mut bytes).unwrap();

        let decoded = read(&bytes);
        assert_eq!(decoded.data(), None);
        let owned: FontInfo = decoded.to_owned_obj();
        assert_eq!(
            owned,
            FontInfo {
                data: None,
                ..info
            }
        );
    }

    #[test]
    fn css_font_info_exact_strings() {
        let info = CssFontInfo {
            font_family: "Sample Family".into(),
            font_weight: "not a number".into(),
            italic_angle: "angle".into(),
        };
        let bytes = dump_envelope(&info).unwrap();
        let decoded = font::CssFontInfo::read(EnvelopeData::new(&bytes)).unwrap();
        assert_eq!(decoded.font_family().unwrap(), "Sample Family");
        assert_eq!(decoded.font_weight().unwrap(), "not a number");
        assert_eq!(decoded.italic_angle().unwrap(), "angle");
    }

    #[test]
    fn system_font_style_round_trip() {
        let mut info = test_data::sample_system_font_info();
        let bytes = dump_envelope(&info).unwrap();
        let decoded = font::SystemFontInfo::read(EnvelopeData::new(&bytes)).unwrap();
        let owned: SystemFontInfo = decoded.to_owned_obj();
        assert_eq!(owned, info);

        info.style = None;
        let bytes = dump_envelope(&info).unwrap();
        let decoded = font::SystemFontInfo::read(EnvelopeData::new(&bytes)).unwrap();
        assert_eq!(decoded.style().unwrap(), None);
    }

    #[test]
    fn randomized_round_trips() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let rand_flag = |rng: &mut StdRng| match rng.gen_range(0..3) {
            0 => None,
            1 => Some(false),
            _ => Some(true),
        };
        let rand_string = |rng: &mut StdRng| -> String {
            let len = rng.gen_range(0..24);
            (0..len).map(|_| rng.gen_range('a'..='z')).collect()
        };

        for _ in 0..32 {
            let info = FontInfo {
                black: rand_flag(&mut rng),
                bold: rand_flag(&mut rng),
                italic: rand_flag(&mut rng),
                missing_file: rand_flag(&mut rng),
                vertical: rand_flag(&mut rng),
                ascent: rng.gen_range(-2.0..2.0),
                descent: rng.gen_range(-2.0..2.0),
                bbox: rng
                    .gen_bool(0.5)
                    .then(|| std::array::from_fn(|_| rng.gen_range(-2048..2048))),
                fallback_name: rand_string(&mut rng),
                loaded_name: rand_string(&mut rng),
                name: rand_string(&mut rng),
                data: rng.gen_bool(0.5).then(|| {
                    let len = rng.gen_range(0..64);
                    (0..len).map(|_| rng.gen()).collect()
                }),
                ..Default::default()
            };
            let bytes = dump_envelope(&info).unwrap();
            let mut owned: FontInfo = read(&bytes).to_owned_obj();
            // a present-but-empty payload and an absent one share an encoding
            if info.data.as_deref() == Some(&[]) {
                assert_eq!(owned.data, None);
                owned.data = info.data.clone();
            }
            assert_eq!(owned, info);
        }
    }
}

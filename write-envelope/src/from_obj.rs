//! Traits for converting from parsed envelope data to owned equivalents

use read_envelope::{font, pattern};

use crate::font::{CssFontInfo, FontInfo, SystemFontInfo, SystemFontStyle};
use crate::pattern::{Figure, Pattern, PatternKind};

/// A conversion from a reference/view type to an owned equivalent.
///
/// Unlike [`std::convert::From`], implementations exist for reader types
/// whose accessors are fallible; a string that fails to decode converts to
/// its default. That cannot happen for buffers produced by this crate, and
/// buffers from anywhere else are outside the codec's contract.
pub trait FromObjRef<T: ?Sized>: Sized {
    /// Convert `from` to an instance of `Self`.
    fn from_obj_ref(from: &T) -> Self;
}

/// A conversion from a parsed envelope type to an owned version.
///
/// You should avoid implementing this trait manually. Like
/// [`std::convert::Into`], it is provided as a blanket impl when you
/// implement [`FromObjRef<T>`].
pub trait ToOwnedObj<T> {
    /// Convert this type into `T`.
    fn to_owned_obj(&self) -> T;
}

impl<U, T> ToOwnedObj<U> for T
where
    U: FromObjRef<T>,
{
    fn to_owned_obj(&self) -> U {
        U::from_obj_ref(self)
    }
}

impl FromObjRef<font::CssFontInfo<'_>> for CssFontInfo {
    fn from_obj_ref(from: &font::CssFontInfo<'_>) -> Self {
        CssFontInfo {
            font_family: from.font_family().unwrap_or_default().into(),
            font_weight: from.font_weight().unwrap_or_default().into(),
            italic_angle: from.italic_angle().unwrap_or_default().into(),
        }
    }
}

impl FromObjRef<font::SystemFontStyle<'_>> for SystemFontStyle {
    fn from_obj_ref(from: &font::SystemFontStyle<'_>) -> Self {
        SystemFontStyle {
            style: from.style.into(),
            weight: from.weight.into(),
        }
    }
}

impl FromObjRef<font::SystemFontInfo<'_>> for SystemFontInfo {
    fn from_obj_ref(from: &font::SystemFontInfo<'_>) -> Self {
        SystemFontInfo {
            guess_fallback: from.guess_fallback(),
            css: from.css().unwrap_or_default().into(),
            loaded_name: from.loaded_name().unwrap_or_default().into(),
            base_font_name: from.base_font_name().unwrap_or_default().into(),
            src: from.src().unwrap_or_default().into(),
            style: from
                .style()
                .ok()
                .flatten()
                .map(|style| SystemFontStyle::from_obj_ref(&style)),
        }
    }
}

impl FromObjRef<font::FontInfo<'_>> for FontInfo {
    fn from_obj_ref(from: &font::FontInfo<'_>) -> Self {
        FontInfo {
            black: from.black(),
            bold: from.bold(),
            disable_font_face: from.disable_font_face(),
            font_extra_properties: from.font_extra_properties(),
            invalid_font: from.invalid_font(),
            type3_font: from.type3_font(),
            italic: from.italic(),
            missing_file: from.missing_file(),
            remeasure: from.remeasure(),
            vertical: from.vertical(),
            ascent: from.ascent(),
            default_width: from.default_width(),
            descent: from.descent(),
            bbox: from.bbox(),
            font_matrix: from.font_matrix(),
            default_v_metrics: from.default_v_metrics(),
            fallback_name: from.fallback_name().unwrap_or_default().into(),
            loaded_name: from.loaded_name().unwrap_or_default().into(),
            mimetype: from.mimetype().unwrap_or_default().into(),
            name: from.name().unwrap_or_default().into(),
            system_font_info: from
                .system_font_info()
                .ok()
                .flatten()
                .map(|info| SystemFontInfo::from_obj_ref(&info)),
            css_font_info: from
                .css_font_info()
                .ok()
                .flatten()
                .map(|info| CssFontInfo::from_obj_ref(&info)),
            data: from.data().map(|data| data.to_vec()),
        }
    }
}

impl FromObjRef<pattern::Figure<'_>> for Figure {
    fn from_obj_ref(from: &pattern::Figure<'_>) -> Self {
        let coords = from.coords().iter().map(|v| v.get()).collect();
        let colors = from.colors().iter().map(|v| v.get()).collect();
        match from {
            pattern::Figure::Triangles { .. } => Figure::Triangles { coords, colors },
            pattern::Figure::Lattice {
                vertices_per_row, ..
            } => Figure::Lattice {
                coords,
                colors,
                vertices_per_row: *vertices_per_row,
            },
            pattern::Figure::Patch { .. } => Figure::Patch { coords, colors },
        }
    }
}

impl FromObjRef<pattern::PatternInfo<'_>> for Pattern {
    fn from_obj_ref(from: &pattern::PatternInfo<'_>) -> Self {
        let coord = |i: usize| from.coords()[i].get();
        let point = |i: usize| envelope_types::Point::new(coord(i), coord(i + 1));
        match from.kind() {
            PatternKind::Axial => Pattern::Axial {
                bbox: from.bbox(),
                stops: from.stops().collect(),
                start: point(0),
                end: point(2),
            },
            PatternKind::Radial => Pattern::Radial {
                bbox: from.bbox(),
                stops: from.stops().collect(),
                start: point(0),
                start_radius: coord(2),
                end: point(3),
                end_radius: coord(5),
            },
            PatternKind::Mesh => Pattern::Mesh {
                shading_type: from.shading_type(),
                coords: from.coords().iter().map(|v| v.get()).collect(),
                colors: from.colors().to_vec(),
                figures: from
                    .figures()
                    .filter_map(|figure| figure.ok())
                    .map(|figure| Figure::from_obj_ref(&figure))
                    .collect(),
                bbox: from.bbox(),
                background: from.background(),
            },
        }
    }
}

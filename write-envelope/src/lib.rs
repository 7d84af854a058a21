//! Writing transfer envelopes
//!
//! This crate holds owned versions of the font and pattern descriptors that
//! cross the worker/host boundary, and serializes them into the flat byte
//! buffers ("envelopes") the [`read-envelope`] crate decodes.
//!
//! Serialization makes exactly one allocation: [`EnvelopeWrite::encoded_len`]
//! computes the analytic size of a record up front, and
//! [`dump_envelope`] asserts the written bytes filled it with no slack.
//!
//! [`read-envelope`]: https://docs.rs/read-envelope/

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
pub mod font;
mod from_obj;
pub mod pattern;
mod validate;
mod write;

pub use error::Error;
pub use from_obj::{FromObjRef, ToOwnedObj};
pub use validate::{Validate, ValidationCtx, ValidationReport};
pub use write::{dump_envelope, EnvelopeWrite, EnvelopeWriter, LenField};

/// Public re-export of the read-envelope crate.
pub extern crate read_envelope as read;

/// Public re-export of the envelope-types crate.
pub extern crate envelope_types as types;

#[cfg(test)]
mod test_data {
    //! Typed sample descriptors shared between this crate's unit tests.

    use envelope_types::{BoundingBox, Point, Rgb};

    use crate::font::{CssFontInfo, FontInfo, SystemFontInfo, SystemFontStyle};
    use crate::pattern::{Figure, GradientStop, Pattern};

    /// A `FontInfo` with every optional field absent.
    pub fn minimal_font_info() -> FontInfo {
        FontInfo::default()
    }

    /// A `FontInfo` with every field populated, including both nested records
    /// and a payload.
    pub fn sample_font_info() -> FontInfo {
        FontInfo {
            black: Some(false),
            bold: Some(true),
            disable_font_face: Some(false),
            font_extra_properties: Some(false),
            invalid_font: Some(false),
            type3_font: Some(false),
            italic: Some(true),
            missing_file: Some(false),
            remeasure: Some(false),
            vertical: Some(true),
            ascent: 0.806,
            default_width: 600.0,
            descent: -0.194,
            bbox: Some([-39, -250, 786, 750]),
            font_matrix: Some([0.001, 0.0, 0.0, 0.001, 0.0, 0.0]),
            default_v_metrics: Some([880, 420, -1000]),
            fallback_name: "Helvetica".into(),
            loaded_name: "g_d0_f2".into(),
            mimetype: "font/opentype".into(),
            name: "NimbusSans-Bold".into(),
            system_font_info: Some(sample_system_font_info()),
            css_font_info: Some(CssFontInfo {
                font_family: "serif".into(),
                font_weight: "400".into(),
                italic_angle: "0".into(),
            }),
            data: Some(vec![0x4f, 0x54, 0x54, 0x4f, 0x00, 0x0e, 0x00, 0x80]),
        }
    }

    pub fn sample_system_font_info() -> SystemFontInfo {
        SystemFontInfo {
            guess_fallback: true,
            css: "\"Liberation Sans\",sans-serif".into(),
            loaded_name: "g_d0_f2".into(),
            base_font_name: "Arial".into(),
            src: "local(Liberation Sans)".into(),
            style: Some(SystemFontStyle {
                style: "italic".into(),
                weight: "700".into(),
            }),
        }
    }

    fn sample_stops() -> Vec<GradientStop> {
        vec![
            GradientStop {
                offset: 0.0,
                color: Rgb::new(0xff, 0x00, 0x00),
            },
            GradientStop {
                offset: 0.42,
                color: Rgb::new(0x00, 0xff, 0x00),
            },
            GradientStop {
                offset: 1.0,
                color: Rgb::new(0x00, 0x00, 0xff),
            },
        ]
    }

    /// An axial gradient with three stops and no bbox.
    pub fn axial_pattern() -> Pattern {
        Pattern::Axial {
            bbox: None,
            stops: sample_stops(),
            start: Point::new(0.0, 0.0),
            end: Point::new(250.0, 125.0),
        }
    }

    /// A radial gradient with a bbox and distinct radii.
    pub fn radial_pattern() -> Pattern {
        Pattern::Radial {
            bbox: Some(BoundingBox::new(-50.0, -50.0, 150.0, 150.0)),
            stops: sample_stops(),
            start: Point::new(50.0, 50.0),
            start_radius: 5.0,
            end: Point::new(60.0, 55.0),
            end_radius: 40.0,
        }
    }

    /// A mesh holding one figure of each kind plus a background.
    pub fn mesh_pattern() -> Pattern {
        Pattern::Mesh {
            shading_type: 5,
            coords: vec![
                0.0, 0.0, 50.0, 10.0, 100.0, 0.0, //
                0.0, 50.0, 50.0, 60.0, 100.0, 50.0,
            ],
            colors: vec![
                255, 0, 0, 0, 255, 0, 0, 0, 255, //
                255, 255, 0, 0, 255, 255, 255, 0, 255,
            ],
            figures: vec![
                Figure::Triangles {
                    coords: vec![0, 8, 16],
                    colors: vec![0, 3, 6],
                },
                Figure::Lattice {
                    coords: vec![0, 8, 16, 24, 32, 40],
                    colors: vec![0, 3, 6, 9, 12, 15],
                    vertices_per_row: 3,
                },
                Figure::Patch {
                    coords: vec![24, 32, 40, 0],
                    colors: vec![9, 12, 15, 0],
                },
            ],
            bbox: None,
            background: Some(Rgb::new(0x10, 0x20, 0x30)),
        }
    }
}

//! Owned paint patterns and their serialization

use envelope_types::{BoundingBox, Point, Rgb};
use read_envelope::pattern::{HEADER_LEN, STOP_LEN};

pub use read_envelope::pattern::{FigureKind, GradientStop, PatternKind};

use crate::validate::{Validate, ValidationCtx};
use crate::write::{EnvelopeWrite, EnvelopeWriter};

/// One drawn primitive inside a mesh pattern.
///
/// The owned counterpart of [`read_envelope::pattern::Figure`]; the index
/// arrays point into the pattern's flat vertex arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Figure {
    Triangles {
        coords: Vec<i32>,
        colors: Vec<i32>,
    },
    Lattice {
        coords: Vec<i32>,
        colors: Vec<i32>,
        vertices_per_row: u32,
    },
    Patch {
        coords: Vec<i32>,
        colors: Vec<i32>,
    },
}

impl Figure {
    pub fn kind(&self) -> FigureKind {
        match self {
            Figure::Triangles { .. } => FigureKind::Triangles,
            Figure::Lattice { .. } => FigureKind::Lattice,
            Figure::Patch { .. } => FigureKind::Patch,
        }
    }

    fn coords(&self) -> &[i32] {
        match self {
            Figure::Triangles { coords, .. }
            | Figure::Lattice { coords, .. }
            | Figure::Patch { coords, .. } => coords,
        }
    }

    fn colors(&self) -> &[i32] {
        match self {
            Figure::Triangles { colors, .. }
            | Figure::Lattice { colors, .. }
            | Figure::Patch { colors, .. } => colors,
        }
    }
}

/// An owned paint pattern, ready to be serialized.
///
/// The three kinds are a closed set; both the writer below and the reader's
/// [`ir`](read_envelope::pattern::PatternInfo::ir) match on them
/// exhaustively, so growing the union is a compile-checked change on both
/// sides of the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Axial {
        bbox: Option<BoundingBox<f32>>,
        stops: Vec<GradientStop>,
        start: Point<f32>,
        end: Point<f32>,
    },
    Radial {
        bbox: Option<BoundingBox<f32>>,
        stops: Vec<GradientStop>,
        start: Point<f32>,
        start_radius: f32,
        end: Point<f32>,
        end_radius: f32,
    },
    Mesh {
        shading_type: u8,
        /// Flat x/y pairs.
        coords: Vec<f32>,
        /// Flat RGB triplets.
        colors: Vec<u8>,
        figures: Vec<Figure>,
        bbox: Option<BoundingBox<f32>>,
        background: Option<Rgb>,
    },
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Axial { .. } => PatternKind::Axial,
            Pattern::Radial { .. } => PatternKind::Radial,
            Pattern::Mesh { .. } => PatternKind::Mesh,
        }
    }
}

/// The encoded extent of a figure region starting at `pos`.
///
/// Threads the true running offset: the padding after each kind byte is
/// relative to the whole envelope, so a region that starts unaligned pads
/// differently than one that does not.
fn encoded_figures_len(figures: &[Figure], mut pos: usize) -> usize {
    let start = pos;
    for figure in figures {
        pos += 1;
        pos = pos.next_multiple_of(4);
        pos += 4 + figure.coords().len() * 4;
        pos += 4 + figure.colors().len() * 4;
        if matches!(figure, Figure::Lattice { .. }) {
            pos += 4;
        }
    }
    pos - start
}

fn write_header(
    writer: &mut EnvelopeWriter,
    kind: PatternKind,
    bbox: &Option<BoundingBox<f32>>,
    has_background: bool,
    shading_type: u8,
    counts: [usize; 4],
) {
    writer.write(kind.to_byte());
    writer.write(bbox.is_some() as u8);
    writer.write(has_background as u8);
    writer.write(shading_type);
    for count in counts {
        writer.write(count as u32);
    }
    debug_assert_eq!(writer.position(), HEADER_LEN);
}

fn write_stops(writer: &mut EnvelopeWriter, stops: &[GradientStop]) {
    for stop in stops {
        writer.write(stop.offset);
        writer.write(stop.color.to_u32());
    }
}

fn write_bbox(writer: &mut EnvelopeWriter, bbox: &Option<BoundingBox<f32>>) {
    if let Some(bbox) = bbox {
        for v in [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max] {
            writer.write(v);
        }
    }
}

impl EnvelopeWrite for Pattern {
    fn encoded_len(&self) -> usize {
        let bbox_len = |bbox: &Option<_>| if bbox.is_some() { 16 } else { 0 };
        match self {
            Pattern::Axial { bbox, stops, .. } => {
                HEADER_LEN + 2 * 8 + stops.len() * STOP_LEN + bbox_len(bbox)
            }
            Pattern::Radial { bbox, stops, .. } => {
                HEADER_LEN + 3 * 8 + stops.len() * STOP_LEN + bbox_len(bbox)
            }
            Pattern::Mesh {
                coords,
                colors,
                figures,
                bbox,
                background,
                ..
            } => {
                let mut len = HEADER_LEN + coords.len() * 4 + colors.len();
                len += bbox_len(bbox);
                if background.is_some() {
                    len += 3;
                }
                len + encoded_figures_len(figures, len)
            }
        }
    }

    fn write_into(&self, writer: &mut EnvelopeWriter) {
        match self {
            Pattern::Axial {
                bbox,
                stops,
                start,
                end,
            } => {
                write_header(writer, PatternKind::Axial, bbox, false, 0, [2, 0, stops.len(), 0]);
                for v in [start.x, start.y, end.x, end.y] {
                    writer.write(v);
                }
                write_stops(writer, stops);
                write_bbox(writer, bbox);
            }
            // each radius rides directly behind its endpoint, giving radial
            // gradients the same flat coordinate encoding as axial ones
            Pattern::Radial {
                bbox,
                stops,
                start,
                start_radius,
                end,
                end_radius,
            } => {
                write_header(writer, PatternKind::Radial, bbox, false, 0, [3, 0, stops.len(), 0]);
                for v in [start.x, start.y, *start_radius, end.x, end.y, *end_radius] {
                    writer.write(v);
                }
                write_stops(writer, stops);
                write_bbox(writer, bbox);
            }
            Pattern::Mesh {
                shading_type,
                coords,
                colors,
                figures,
                bbox,
                background,
            } => {
                write_header(
                    writer,
                    PatternKind::Mesh,
                    bbox,
                    background.is_some(),
                    *shading_type,
                    [coords.len() / 2, colors.len() / 3, 0, figures.len()],
                );
                for v in coords {
                    writer.write(*v);
                }
                writer.write_bytes(colors);
                write_bbox(writer, bbox);
                if let Some(background) = background {
                    writer.write_bytes(&background.to_bytes());
                }
                for figure in figures {
                    writer.write(figure.kind().to_byte());
                    writer.align_to(4);
                    writer.write(figure.coords().len() as u32);
                    for v in figure.coords() {
                        writer.write(*v);
                    }
                    writer.write(figure.colors().len() as u32);
                    for v in figure.colors() {
                        writer.write(*v);
                    }
                    if let Figure::Lattice {
                        vertices_per_row, ..
                    } = figure
                    {
                        writer.write(*vertices_per_row);
                    }
                }
            }
        }
    }
}

impl Validate for Pattern {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_record("Pattern", |ctx| match self {
            Pattern::Axial { stops, .. } | Pattern::Radial { stops, .. } => {
                ctx.check_u32_len("stops", stops.len());
            }
            Pattern::Mesh {
                coords,
                colors,
                figures,
                ..
            } => {
                ctx.in_field("coords", |ctx| {
                    if coords.len() % 2 != 0 {
                        ctx.report("stores x/y pairs; length must be even");
                    }
                });
                ctx.in_field("colors", |ctx| {
                    if colors.len() % 3 != 0 {
                        ctx.report("stores RGB triplets; length must be a multiple of 3");
                    }
                });
                ctx.check_u32_len("coords", coords.len() / 2);
                ctx.check_u32_len("figures", figures.len());
                ctx.in_field("figures", |ctx| {
                    for (i, figure) in figures.iter().enumerate() {
                        ctx.in_array_item(i, |ctx| {
                            ctx.check_u32_len("coords", figure.coords().len());
                            ctx.check_u32_len("colors", figure.colors().len());
                        });
                    }
                });
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
    use read_envelope::pattern::{PatternInfo, PatternIr};
    use read_envelope::{EnvelopeData, EnvelopeRead};

    fn round_trip(pattern: &Pattern) -> Vec<u8> {
        let _ = env_logger::builder().is_test(true).try_init();
        dump_envelope(pattern).unwrap()
    }

    fn read(bytes: &[u8]) -> PatternInfo {
        PatternInfo::read(EnvelopeData::new(bytes)).unwrap()
    }

    #[test]
    fn axial_carries_no_radii() {
        let pattern = test_data::axial_pattern();
        let bytes = round_trip(&pattern);
        let decoded = read(&bytes);
        assert_eq!(decoded.kind(), PatternKind::Axial);
        assert_eq!(decoded.coords().len(), 4);
        let owned: Pattern = decoded.to_owned_obj();
        assert_eq!(owned, pattern);
    }

    #[test]
    fn radial_round_trips_its_radii() {
        let pattern = test_data::radial_pattern();
        let bytes = round_trip(&pattern);
        let decoded = read(&bytes);
        assert_eq!(decoded.kind(), PatternKind::Radial);
        match decoded.ir().unwrap() {
            PatternIr::Radial {
                start_radius,
                end_radius,
                ..
            } => {
                assert_eq!(start_radius, 5.0);
                assert_eq!(end_radius, 40.0);
            }
            other => panic!("expected a radial pattern, got {other:?}"),
        }
        let owned: Pattern = decoded.to_owned_obj();
        assert_eq!(owned, pattern);
    }

    #[test]
    fn mesh_round_trips_every_figure_kind() {
        let pattern = test_data::mesh_pattern();
        let bytes = round_trip(&pattern);
        let decoded = read(&bytes);

        let figures = decoded
            .figures()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            figures.iter().map(|f| f.kind()).collect::<Vec<_>>(),
            [FigureKind::Triangles, FigureKind::Lattice, FigureKind::Patch],
        );
        assert_eq!(figures[1].vertices_per_row(), Some(3));
        assert_eq!(figures[0].vertices_per_row(), None);

        let owned: Pattern = decoded.to_owned_obj();
        assert_eq!(owned, pattern);
    }

    #[test]
    fn mesh_bounds_derive_from_coords() {
        let pattern = Pattern::Mesh {
            shading_type: 4,
            coords: vec![-10.0, -5.0, 20.0, 15.0, 0.0, 30.0],
            colors: vec![0; 9],
            figures: vec![],
            bbox: None,
            background: None,
        };
        let bytes = round_trip(&pattern);
        match read(&bytes).ir().unwrap() {
            PatternIr::Mesh {
                bounds, figures, ..
            } => {
                assert_eq!(bounds, Some(BoundingBox::new(-10.0, -5.0, 20.0, 30.0)));
                assert!(figures.is_empty());
            }
            other => panic!("expected a mesh pattern, got {other:?}"),
        }
    }

    #[test]
    fn stored_bbox_wins_over_derived_bounds() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let pattern = Pattern::Mesh {
            shading_type: 5,
            coords: vec![-10.0, -5.0, 20.0, 15.0],
            colors: vec![],
            figures: vec![],
            bbox: Some(bbox),
            background: Some(Rgb::new(1, 2, 3)),
        };
        let bytes = round_trip(&pattern);
        let decoded = read(&bytes);
        assert_eq!(decoded.background(), Some(Rgb::new(1, 2, 3)));
        match decoded.ir().unwrap() {
            PatternIr::Mesh { bounds, .. } => assert_eq!(bounds, Some(bbox)),
            other => panic!("expected a mesh pattern, got {other:?}"),
        }
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let pattern = Pattern::Mesh {
            shading_type: 6,
            coords: vec![],
            colors: vec![],
            figures: vec![],
            bbox: None,
            background: None,
        };
        let bytes = round_trip(&pattern);
        match read(&bytes).ir().unwrap() {
            PatternIr::Mesh { bounds, .. } => assert_eq!(bounds, None),
            other => panic!("expected a mesh pattern, got {other:?}"),
        }
    }

    #[test]
    fn unaligned_figure_region_sizes_exactly() {
        // one color triplet leaves the figure region starting at an offset
        // that is not a multiple of 4; dump_envelope asserts the analytic
        // size agreed with what was written
        let pattern = Pattern::Mesh {
            shading_type: 4,
            coords: vec![0.0, 0.0],
            colors: vec![1, 2, 3],
            figures: vec![
                Figure::Triangles {
                    coords: vec![0, 8, 16],
                    colors: vec![0, 3, 6],
                },
                Figure::Lattice {
                    coords: vec![0, 8],
                    colors: vec![0, 3],
                    vertices_per_row: 2,
                },
            ],
            bbox: None,
            background: None,
        };
        let bytes = round_trip(&pattern);
        let owned: Pattern = read(&bytes).to_owned_obj();
        assert_eq!(owned, pattern);
    }

    #[test]
    fn malformed_mesh_fails_validation() {
        let pattern = Pattern::Mesh {
            shading_type: 4,
            coords: vec![1.0, 2.0, 3.0], // not a whole pair
            colors: vec![0, 0],          // not a whole triplet
            figures: vec![],
            bbox: None,
            background: None,
        };
        let err = dump_envelope(&pattern).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Pattern.coords"));
        assert!(message.contains("Pattern.colors"));
    }

    #[test]
    fn gradient_size_is_analytic() {
        let pattern = test_data::axial_pattern();
        let stops = match &pattern {
            Pattern::Axial { stops, .. } => stops.len(),
            _ => unreachable!(),
        };
        assert_eq!(round_trip(&pattern).len(), 20 + 16 + stops * 8);
    }
}

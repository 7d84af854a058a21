//! Lazy readers for paint-pattern envelopes

use envelope_types::{BoundingBox, LittleEndian, Point, Rgb};

use crate::envelope_data::EnvelopeData;
use crate::read::{EnvelopeRead, ReadError};

/// Byte length of the fixed pattern header.
pub const HEADER_LEN: usize = 20;

/// Byte length of one encoded gradient stop (f32 position + packed color).
pub const STOP_LEN: usize = 8;

/// Byte length of an encoded bounding box (4 × f32).
pub const BBOX_LEN: usize = 16;

pub(crate) const fn align4(pos: usize) -> usize {
    (pos + 3) & !3
}

/// The discriminant of a pattern envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternKind {
    Axial = 1,
    Radial = 2,
    Mesh = 3,
}

impl PatternKind {
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Result<PatternKind, ReadError> {
        match byte {
            1 => Ok(PatternKind::Axial),
            2 => Ok(PatternKind::Radial),
            3 => Ok(PatternKind::Mesh),
            _ => Err(ReadError::InvalidPatternKind(byte)),
        }
    }
}

/// The discriminant of one mesh figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FigureKind {
    Triangles = 1,
    Lattice = 2,
    Patch = 3,
}

impl FigureKind {
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Result<FigureKind, ReadError> {
        match byte {
            1 => Ok(FigureKind::Triangles),
            2 => Ok(FigureKind::Lattice),
            3 => Ok(FigureKind::Patch),
            _ => Err(ReadError::InvalidFigureKind(byte)),
        }
    }
}

/// One gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis, normally in `0.0..=1.0`.
    pub offset: f32,
    pub color: Rgb,
}

/// One drawn primitive inside a mesh pattern.
///
/// The coordinate and color arrays hold indices into the pattern's flat
/// vertex arrays. Only a lattice knows its row stride, which is what makes
/// the records self-describing on the wire: the kind byte alone decides the
/// record's shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Figure<'a> {
    Triangles {
        coords: &'a [LittleEndian<i32>],
        colors: &'a [LittleEndian<i32>],
    },
    Lattice {
        coords: &'a [LittleEndian<i32>],
        colors: &'a [LittleEndian<i32>],
        vertices_per_row: u32,
    },
    Patch {
        coords: &'a [LittleEndian<i32>],
        colors: &'a [LittleEndian<i32>],
    },
}

impl<'a> Figure<'a> {
    pub fn kind(&self) -> FigureKind {
        match self {
            Figure::Triangles { .. } => FigureKind::Triangles,
            Figure::Lattice { .. } => FigureKind::Lattice,
            Figure::Patch { .. } => FigureKind::Patch,
        }
    }

    pub fn coords(&self) -> &'a [LittleEndian<i32>] {
        match self {
            Figure::Triangles { coords, .. }
            | Figure::Lattice { coords, .. }
            | Figure::Patch { coords, .. } => coords,
        }
    }

    pub fn colors(&self) -> &'a [LittleEndian<i32>] {
        match self {
            Figure::Triangles { colors, .. }
            | Figure::Lattice { colors, .. }
            | Figure::Patch { colors, .. } => colors,
        }
    }

    pub fn vertices_per_row(&self) -> Option<u32> {
        match self {
            Figure::Lattice {
                vertices_per_row, ..
            } => Some(*vertices_per_row),
            _ => None,
        }
    }
}

/// The tagged shape the drawing layer consumes, independent of the wire
/// encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternIr<'a> {
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
        coords: &'a [LittleEndian<f32>],
        colors: &'a [u8],
        figures: Vec<Figure<'a>>,
        /// The stored bbox when one was written, otherwise the component-wise
        /// extent of the coordinate array; `None` only when there is neither.
        bounds: Option<BoundingBox<f32>>,
        background: Option<Rgb>,
    },
}

/// A reader over one pattern envelope.
#[derive(Clone)]
pub struct PatternInfo<'a> {
    data: EnvelopeData<'a>,
    kind: PatternKind,
    shading_type: u8,
    coords: &'a [LittleEndian<f32>],
    colors: &'a [u8],
    n_stops: usize,
    n_figures: usize,
    stops_start: usize,
    bbox_start: Option<usize>,
    background_start: Option<usize>,
    figures_start: usize,
}

impl<'a> EnvelopeRead<'a> for PatternInfo<'a> {
    fn read(data: EnvelopeData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let kind = PatternKind::from_byte(cursor.read::<u8>()?)?;
        let has_bbox = cursor.read::<u8>()? != 0;
        let has_background = cursor.read::<u8>()? != 0;
        let shading_type = cursor.read::<u8>()?;
        let n_coords = cursor.read::<u32>()? as usize;
        let n_colors = cursor.read::<u32>()? as usize;
        let n_stops = cursor.read::<u32>()? as usize;
        let n_figures = cursor.read::<u32>()? as usize;
        debug_assert_eq!(cursor.position()?, HEADER_LEN);

        match kind {
            PatternKind::Axial if n_coords != 2 => {
                return Err(ReadError::MalformedData(
                    "axial patterns store exactly two coordinate pairs",
                ))
            }
            PatternKind::Radial if n_coords != 3 => {
                return Err(ReadError::MalformedData(
                    "radial patterns store exactly three coordinate pairs",
                ))
            }
            _ => (),
        }

        let coords = data.read_array(HEADER_LEN..HEADER_LEN + n_coords * 8)?;
        let colors_start = HEADER_LEN + n_coords * 8;
        let colors = data.read_array(colors_start..colors_start + n_colors * 3)?;
        let stops_start = colors_start + n_colors * 3;
        let mut pos = stops_start + n_stops * STOP_LEN;
        let bbox_start = has_bbox.then_some(pos);
        if has_bbox {
            pos += BBOX_LEN;
        }
        let background_start = has_background.then_some(pos);
        if has_background {
            pos += 3;
        }
        // everything up to the figure region has a computable extent; the
        // figures themselves are validated as they are walked
        let figures_start = pos;
        data.slice(..figures_start).ok_or(ReadError::OutOfBounds)?;

        Ok(PatternInfo {
            data,
            kind,
            shading_type,
            coords,
            colors,
            n_stops,
            n_figures,
            stops_start,
            bbox_start,
            background_start,
            figures_start,
        })
    }
}

impl<'a> PatternInfo<'a> {
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The mesh shading type; 0 for gradient patterns, which don't carry one.
    pub fn shading_type(&self) -> u8 {
        self.shading_type
    }

    /// The flat coordinate array, as x/y pairs.
    pub fn coords(&self) -> &'a [LittleEndian<f32>] {
        self.coords
    }

    /// The flat vertex color array, as RGB triplets.
    pub fn colors(&self) -> &'a [u8] {
        self.colors
    }

    pub fn stops(&self) -> impl ExactSizeIterator<Item = GradientStop> + 'a {
        let data = self.data;
        let start = self.stops_start;
        (0..self.n_stops).map(move |i| {
            let pos = start + i * STOP_LEN;
            // the stop region's bounds were checked in `read`
            GradientStop {
                offset: data.read_at::<f32>(pos).unwrap(),
                color: Rgb::from_u32(data.read_at::<u32>(pos + 4).unwrap()),
            }
        })
    }

    pub fn bbox(&self) -> Option<BoundingBox<f32>> {
        let pos = self.bbox_start?;
        // bounds were checked in `read`
        let at = |i: usize| self.data.read_at::<f32>(pos + i * 4).unwrap();
        Some(BoundingBox::new(at(0), at(1), at(2), at(3)))
    }

    pub fn background(&self) -> Option<Rgb> {
        let pos = self.background_start?;
        let at = |i: usize| self.data.read_at::<u8>(pos + i).unwrap();
        Some(Rgb::new(at(0), at(1), at(2)))
    }

    /// Walk the self-describing figure records in order.
    pub fn figures(&self) -> Figures<'a> {
        Figures {
            data: self.data,
            pos: self.figures_start,
            remaining: self.n_figures,
        }
    }

    fn coord(&self, index: usize) -> f32 {
        self.coords[index].get()
    }

    /// Reconstruct the tagged tuple the drawing layer expects.
    pub fn ir(&self) -> Result<PatternIr<'a>, ReadError> {
        let stops = self.stops().collect();
        match self.kind {
            PatternKind::Axial => Ok(PatternIr::Axial {
                bbox: self.bbox(),
                stops,
                start: Point::new(self.coord(0), self.coord(1)),
                end: Point::new(self.coord(2), self.coord(3)),
            }),
            // radial coordinates interleave each radius after its endpoint
            PatternKind::Radial => Ok(PatternIr::Radial {
                bbox: self.bbox(),
                stops,
                start: Point::new(self.coord(0), self.coord(1)),
                start_radius: self.coord(2),
                end: Point::new(self.coord(3), self.coord(4)),
                end_radius: self.coord(5),
            }),
            PatternKind::Mesh => {
                let figures = self.figures().collect::<Result<Vec<_>, _>>()?;
                let bounds = self.bbox().or_else(|| derived_bounds(self.coords));
                Ok(PatternIr::Mesh {
                    shading_type: self.shading_type,
                    coords: self.coords,
                    colors: self.colors,
                    figures,
                    bounds,
                    background: self.background(),
                })
            }
        }
    }
}

impl std::fmt::Debug for PatternInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PatternInfo")
            .field("kind", &self.kind)
            .field("n_coords", &(self.coords.len() / 2))
            .field("n_stops", &self.n_stops)
            .field("n_figures", &self.n_figures)
            .finish()
    }
}

/// The extent of the coordinate array, or `None` if it is empty.
fn derived_bounds(coords: &[LittleEndian<f32>]) -> Option<BoundingBox<f32>> {
    let mut points = coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0].get(), pair[1].get()));
    let first = points.next()?;
    Some(points.fold(BoundingBox::from_point(first), BoundingBox::union_point))
}

/// An iterator over the figure records of a mesh pattern.
///
/// Record lengths are discovered purely by sequential self-description, so
/// this walks; it does not index. After yielding an error the iterator is
/// exhausted.
pub struct Figures<'a> {
    data: EnvelopeData<'a>,
    pos: usize,
    remaining: usize,
}

impl<'a> Figures<'a> {
    fn read_figure(&mut self) -> Result<Figure<'a>, ReadError> {
        let kind = FigureKind::from_byte(self.data.read_at::<u8>(self.pos)?)?;
        // the kind byte is followed by padding to the envelope's next 4-byte
        // boundary so the index arrays can be borrowed as i32 slices
        let mut pos = align4(self.pos + 1);
        let n_coords = self.data.read_at::<u32>(pos)? as usize;
        pos += 4;
        let coords = self.data.read_array(pos..pos + n_coords * 4)?;
        pos += n_coords * 4;
        let n_colors = self.data.read_at::<u32>(pos)? as usize;
        pos += 4;
        let colors = self.data.read_array(pos..pos + n_colors * 4)?;
        pos += n_colors * 4;
        let figure = match kind {
            FigureKind::Triangles => Figure::Triangles { coords, colors },
            FigureKind::Lattice => {
                let vertices_per_row = self.data.read_at::<u32>(pos)?;
                pos += 4;
                Figure::Lattice {
                    coords,
                    colors,
                    vertices_per_row,
                }
            }
            FigureKind::Patch => Figure::Patch { coords, colors },
        };
        self.pos = pos;
        Ok(figure)
    }
}

impl<'a> Iterator for Figures<'a> {
    type Item = Result<Figure<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let next = self.read_figure();
        if next.is_err() {
            self.remaining = 0;
        }
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

use glam::Vec3;

use super::triangulate::triangulate_into;
use super::vertex::FLOATS_PER_VERTEX;
use super::{Color, Vertex};

/// Default ribbon width, in scene units.
pub const DEFAULT_THICKNESS: f32 = 0.02;

/// Raw input samples of one continuous drawing gesture.
///
/// Points are kept in drawing order and only ever appended. The triangulated
/// geometry is derived on request and never cached, so the tail of a growing stroke
/// is always current.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    color: Color,
    thickness: f32,
    points: Vec<Vertex>,
}

impl Stroke {
    pub fn new(color: Color) -> Self {
        Self::with_thickness(color, DEFAULT_THICKNESS)
    }

    pub fn with_thickness(color: Color, thickness: f32) -> Self {
        Self {
            color,
            thickness,
            points: Vec::new(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    #[inline]
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends one sample. The vertex takes the stroke's color.
    #[inline]
    pub fn append(&mut self, vertex: Vertex) {
        self.points.push(vertex.with_color(self.color));
    }

    /// Appends a batch of samples in order.
    pub fn append_many<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Vertex>,
    {
        let color = self.color;
        self.points
            .extend(vertices.into_iter().map(|v| v.with_color(color)));
    }

    /// Appends a bare position.
    #[inline]
    pub fn append_point(&mut self, position: Vec3) {
        self.points.push(Vertex::new(position, self.color));
    }

    /// Ribbon vertices of the current points, flattened to the GPU layout.
    pub fn floats(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.write_floats(&mut out);
        out
    }

    /// Appends the flattened ribbon to `out`.
    ///
    /// Lets per-frame callers reuse a scratch buffer.
    pub fn write_floats(&self, out: &mut Vec<f32>) {
        let mut triangles = Vec::new();
        triangulate_into(&self.points, self.thickness, &mut triangles);

        out.reserve(triangles.len() * FLOATS_PER_VERTEX);
        for v in &triangles {
            v.write_floats(out);
        }
    }

    /// Number of triangle-list vertices the stroke currently produces.
    pub fn triangle_vertex_count(&self) -> usize {
        let mut triangles = Vec::new();
        triangulate_into(&self.points, self.thickness, &mut triangles);
        triangles.len()
    }
}

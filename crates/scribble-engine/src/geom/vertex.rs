use core::ops::{Add, Mul};

use glam::Vec3;

use super::Color;

/// Number of floats a vertex occupies in the GPU vertex buffer.
///
/// Layout: `[x, y, z, w, r, g, b, a]`, with `w` fixed at `1.0`.
pub const FLOATS_PER_VERTEX: usize = 8;

/// Immutable geometric sample: a world-space position and a color.
///
/// The homogeneous `w` component is implicit (`1.0`) and only materializes when the
/// vertex is flattened; direction math works on `xyz`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }

    /// Convenience constructor from raw components.
    #[inline]
    pub fn from_xyz(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self::new(Vec3::new(x, y, z), color)
    }

    /// Returns a copy carrying `color` instead of the current one.
    #[inline]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Normalized displacement from `from` to `to`, carrying `from`'s color.
    ///
    /// Both vertices are expected to belong to the same stroke and therefore share a
    /// color. Returns `None` for coincident (or non-finite) positions, where no
    /// direction exists.
    #[inline]
    pub fn direction(from: Vertex, to: Vertex) -> Option<Vertex> {
        debug_assert_eq!(
            from.color, to.color,
            "direction between vertices of different colors"
        );
        Vertex::new(to.position - from.position, from.color).normalized()
    }

    /// Unit-length copy of this vertex. Color is preserved.
    ///
    /// Returns `None` when the position has zero or non-finite length.
    #[inline]
    pub fn normalized(self) -> Option<Vertex> {
        self.position
            .try_normalize()
            .map(|position| Vertex::new(position, self.color))
    }

    /// Flattened GPU layout `[x, y, z, 1.0, r, g, b, a]`.
    #[inline]
    pub fn floats(&self) -> [f32; FLOATS_PER_VERTEX] {
        let [r, g, b, a] = self.color.to_array();
        [self.position.x, self.position.y, self.position.z, 1.0, r, g, b, a]
    }

    /// Appends the flattened layout to `out`.
    #[inline]
    pub fn write_floats(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.floats());
    }
}

/// Offsets the position by another vertex's position. Color of `self` wins.
impl Add for Vertex {
    type Output = Vertex;
    #[inline]
    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.position + rhs.position, self.color)
    }
}

impl Mul<f32> for Vertex {
    type Output = Vertex;
    #[inline]
    fn mul(self, rhs: f32) -> Vertex {
        Vertex::new(self.position * rhs, self.color)
    }
}

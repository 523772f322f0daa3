use glam::Vec3Swizzles;

use super::Vertex;

/// Vertices emitted per segment: two triangles forming one quad.
pub const VERTICES_PER_SEGMENT: usize = 6;

/// Converts an ordered polyline into a triangle-list ribbon of width `thickness`.
///
/// For `N` points with distinct consecutive positions the result holds
/// `6 * (N - 1)` vertices; fewer than two points give an empty mesh.
///
/// See [`triangulate_into`] for the construction.
pub fn triangulate(points: &[Vertex], thickness: f32) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(points.len().saturating_sub(1) * VERTICES_PER_SEGMENT);
    triangulate_into(points, thickness, &mut out);
    out
}

/// Appends the ribbon for `points` to `out`.
///
/// Per consecutive pair `(p1, p2)`:
///
/// ```text
///   c3 p2 c4
///    +--*--+
///    |\    |
///    | \   |
///    |  \  |
///    |   \ |
///    |    \|
///    +--*--+
///   c1 p1 c2
/// ```
///
/// The side offsets are a planar approximation of the segment normal: the
/// direction is rotated a quarter turn in the xy-plane (z is kept as is). Ribbons
/// are therefore exact for strokes drawn roughly parallel to the xy-plane and
/// pinch on sharp out-of-plane turns.
///
/// Triangles are `(c1, c3, c2)` and `(c3, c4, c2)`: counter-clockwise seen from +z
/// whatever the segment direction. All corners take `p1`'s color.
///
/// Zero-length segments are skipped. A non-positive or non-finite thickness
/// produces nothing.
pub fn triangulate_into(points: &[Vertex], thickness: f32, out: &mut Vec<Vertex>) {
    if !(thickness.is_finite() && thickness > 0.0) {
        return;
    }
    let half = thickness / 2.0;

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);

        let Some(direction) = Vertex::direction(p1, p2) else {
            continue;
        };

        // negate x, swap x/y
        let mut n1 = direction;
        n1.position.x = -n1.position.x;
        n1.position = n1.position.yxz();

        // negate y, swap x/y
        let mut n2 = direction;
        n2.position.y = -n2.position.y;
        n2.position = n2.position.yxz();

        let c1 = p1 + n1 * half;
        let c2 = p1 + n2 * half;
        let c3 = (p2 + n1 * half).with_color(p1.color);
        let c4 = (p2 + n2 * half).with_color(p1.color);

        out.extend_from_slice(&[c1, c3, c2, c3, c4, c2]);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;
    use crate::geom::Color;

    fn pts(color: Color, xyz: &[[f32; 3]]) -> Vec<Vertex> {
        xyz.iter()
            .map(|&[x, y, z]| Vertex::from_xyz(x, y, z, color))
            .collect()
    }

    /// Twice the signed area of the triangle's xy projection.
    fn signed_area2(a: Vec3, b: Vec3, c: Vec3) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    #[test]
    fn fewer_than_two_points_yield_nothing() {
        assert!(triangulate(&[], 0.02).is_empty());
        let one = pts(Color::red(), &[[1.0, 2.0, 3.0]]);
        assert!(triangulate(&one, 0.02).is_empty());
    }

    #[test]
    fn six_vertices_per_segment() {
        for n in 2..8 {
            let points: Vec<Vertex> = (0..n)
                .map(|i| Vertex::from_xyz(i as f32, (i * i) as f32 * 0.1, 0.0, Color::blue()))
                .collect();
            assert_eq!(triangulate(&points, 0.02).len(), 6 * (n - 1));
        }
    }

    #[test]
    fn red_unit_segment_forms_centered_ribbon() {
        let points = pts(Color::red(), &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let tris = triangulate(&points, 0.02);
        assert_eq!(tris.len(), 6);
        assert!(tris.iter().all(|v| v.color == Color::red()));

        let (c1, c3, c2, c4) = (tris[0], tris[1], tris[2], tris[4]);
        assert_eq!((tris[3], tris[5]), (c3, c2));

        assert_relative_eq!(c1.position.y, -0.01, epsilon = 1e-6);
        assert_relative_eq!(c2.position.y, 0.01, epsilon = 1e-6);
        assert_relative_eq!(c3.position.y, -0.01, epsilon = 1e-6);
        assert_relative_eq!(c4.position.y, 0.01, epsilon = 1e-6);
        assert_relative_eq!(c1.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c3.position.x, 1.0, epsilon = 1e-6);

        let width = (c2.position - c1.position).length();
        assert_relative_eq!(width, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn winding_is_counter_clockwise_in_every_direction() {
        let dirs = [
            [1.0, 0.0],
            [-1.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
            [0.7, -0.3],
            [-0.2, -0.9],
        ];
        for [dx, dy] in dirs {
            let points = pts(Color::green(), &[[0.5, 0.5, 0.0], [0.5 + dx, 0.5 + dy, 0.0]]);
            let tris = triangulate(&points, 0.1);
            for tri in tris.chunks(3) {
                let area = signed_area2(tri[0].position, tri[1].position, tri[2].position);
                assert!(area > 0.0, "clockwise triangle for direction ({dx}, {dy})");
            }
        }
    }

    #[test]
    fn corners_take_first_point_color() {
        let points = vec![
            Vertex::from_xyz(0.0, 0.0, 0.0, Color::red()),
            Vertex::from_xyz(1.0, 0.0, 0.0, Color::red()),
            Vertex::from_xyz(1.0, 1.0, 0.0, Color::red()),
        ];
        let tris = triangulate(&points, 0.05);
        assert_eq!(tris.len(), 12);
        assert!(tris.iter().all(|v| v.color == Color::red()));
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let points = pts(
            Color::black(),
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        );
        let tris = triangulate(&points, 0.02);
        assert_eq!(tris.len(), 6);
        assert!(tris.iter().all(|v| v.position.is_finite()));
    }

    #[test]
    fn invalid_thickness_yields_nothing() {
        let points = pts(Color::black(), &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(triangulate(&points, 0.0).is_empty());
        assert!(triangulate(&points, -1.0).is_empty());
        assert!(triangulate(&points, f32::NAN).is_empty());
    }

    #[test]
    fn triangulate_into_appends() {
        let points = pts(Color::black(), &[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let mut out = triangulate(&points, 0.02);
        triangulate_into(&points, 0.02, &mut out);
        assert_eq!(out.len(), 12);
        assert_eq!(out[..6], out[6..]);
    }
}

//! Stroke geometry.
//!
//! World space is right-handed, +Y up, in scene units (meters in the AR sense).
//! Strokes are polylines of [`Vertex`] samples; [`triangulate`] turns them into
//! ribbon meshes laid out for the GPU as `[x, y, z, w, r, g, b, a]`.

mod camera;
mod color;
mod stroke;
mod triangulate;
mod vertex;

pub use camera::Camera;
pub use color::Color;
pub use stroke::{Stroke, DEFAULT_THICKNESS};
pub use triangulate::{triangulate, triangulate_into, VERTICES_PER_SEGMENT};
pub use vertex::{Vertex, FLOATS_PER_VERTEX};

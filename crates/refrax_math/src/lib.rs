// Re-export glam for convenience
pub use glam::*;

// Refrax math types
mod axes;
mod interval;
mod planar;
mod ray;

pub use axes::*;
pub use interval::Interval;
pub use planar::{
    angle_between, angle_of_vector, line_intersection, normalize_or_zero, rotate_vector,
    signed_angle,
};
pub use ray::Ray;

//! Named directions and frame dimensions.
//!
//! The drawing plane is xy with `OUT` pointing toward the viewer. The frame is
//! 8 units tall at a 16:9 aspect ratio.

use glam::DVec3;

pub const ORIGIN: DVec3 = DVec3::ZERO;
pub const RIGHT: DVec3 = DVec3::X;
pub const LEFT: DVec3 = DVec3::NEG_X;
pub const UP: DVec3 = DVec3::Y;
pub const DOWN: DVec3 = DVec3::NEG_Y;
pub const OUT: DVec3 = DVec3::Z;
pub const IN: DVec3 = DVec3::NEG_Z;

/// Unnormalized diagonals, as used when composing offsets.
pub const UR: DVec3 = DVec3::new(1.0, 1.0, 0.0);
pub const UL: DVec3 = DVec3::new(-1.0, 1.0, 0.0);
pub const DR: DVec3 = DVec3::new(1.0, -1.0, 0.0);
pub const DL: DVec3 = DVec3::new(-1.0, -1.0, 0.0);

/// Frame height in world units.
pub const FRAME_HEIGHT: f64 = 8.0;

/// Frame width in world units (16:9).
pub const FRAME_WIDTH: f64 = FRAME_HEIGHT * 16.0 / 9.0;

/// Center of the left edge of the frame.
pub const LEFT_SIDE: DVec3 = DVec3::new(-FRAME_WIDTH / 2.0, 0.0, 0.0);

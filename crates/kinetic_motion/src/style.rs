//! Sampled style values
//!
//! Hooks expose raw scalars; renderers usually want one snapshot of all of
//! them per frame. [`MotionStyle`] is that snapshot for a single layer.

use serde::Serialize;
use smallvec::SmallVec;

/// Transform and opacity of one layer, sampled at a single frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MotionStyle {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Rotation in degrees
    pub rotation_deg: f32,
}

impl Default for MotionStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MotionStyle {
    pub const IDENTITY: MotionStyle = MotionStyle {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Row-major 2D affine `[a, b, c, d, tx, ty]`: scale, then rotate, then translate
    pub fn to_affine(&self) -> [f32; 6] {
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        [
            self.scale * cos,
            self.scale * sin,
            -self.scale * sin,
            self.scale * cos,
            self.translate_x,
            self.translate_y,
        ]
    }
}

/// Named scalar values of a hook, in declaration order
pub type Sample = SmallVec<[(&'static str, f32); 8]>;

/// Implemented by hook results so hosts and tools can dump every scalar
pub trait Sampled {
    fn sample(&self) -> Sample;
}

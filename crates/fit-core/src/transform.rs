use nalgebra::{Matrix3, Vector3};

/// Affine transform in the 3x4 wire format a host pipeline applies to a
/// frame: left 3x3 linear block, right column translation.
#[derive(Debug, Clone, Copy)]
pub struct Affine3x4 {
    pub linear: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Affine3x4 {
    /// Linear-only transform (zero translation column).
    pub fn from_linear(linear: Matrix3<f64>) -> Self {
        Self {
            linear,
            translation: Vector3::zeros(),
        }
    }

    /// Translation-only transform (identity linear block).
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            linear: Matrix3::identity(),
            translation,
        }
    }

    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let out = self.linear * Vector3::new(p[0], p[1], p[2]) + self.translation;
        [out[0], out[1], out[2]]
    }
}

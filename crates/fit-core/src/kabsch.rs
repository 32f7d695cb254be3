use nalgebra::{Matrix3, Vector3};

use crate::error::{FitError, FitResult};

const SVD_EPS: f64 = f64::EPSILON;
const SVD_MAX_NITER: usize = 100;

/// Proper rotation plus the centroid pair it was solved about. The folded
/// single-step form is `x' = R * x + translation()`.
#[derive(Debug, Clone, Copy)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub centroid_current: Vector3<f64>,
    pub centroid_reference: Vector3<f64>,
}

impl RigidTransform {
    pub fn translation(&self) -> Vector3<f64> {
        self.centroid_reference - self.rotation * self.centroid_current
    }

    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let out = self.rotation * Vector3::new(p[0], p[1], p[2]) + self.translation();
        [out[0], out[1], out[2]]
    }
}

pub fn centroid(points: &[[f64; 3]]) -> Vector3<f64> {
    let n = points.len();
    if n == 0 {
        return Vector3::zeros();
    }
    let mut sum = Vector3::zeros();
    for p in points.iter() {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
    }
    sum / n as f64
}

/// Least-squares rigid alignment of `current` onto `reference` for
/// index-aligned pairs. The returned rotation is proper (det = +1); the
/// unconstrained optimum is reflected through the smallest singular
/// direction when it would be an improper map.
pub fn solve(current: &[[f64; 3]], reference: &[[f64; 3]]) -> FitResult<RigidTransform> {
    if current.len() != reference.len() {
        return Err(FitError::Invalid(format!(
            "point arrays differ in length: {} vs {}",
            current.len(),
            reference.len()
        )));
    }
    let n = current.len();
    if n == 0 {
        return Err(FitError::DegenerateInput("empty point arrays".into()));
    }

    let cx = centroid(current);
    let cy = centroid(reference);
    let mut h: Matrix3<f64> = Matrix3::zeros();
    for i in 0..n {
        let xr = Vector3::new(
            current[i][0] - cx[0],
            current[i][1] - cx[1],
            current[i][2] - cx[2],
        );
        let yr = Vector3::new(
            reference[i][0] - cy[0],
            reference[i][1] - cy[1],
            reference[i][2] - cy[2],
        );
        h += xr * yr.transpose();
    }

    let svd = h
        .try_svd(true, true, SVD_EPS, SVD_MAX_NITER)
        .ok_or_else(|| FitError::DegenerateInput("svd did not converge".into()))?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(FitError::DegenerateInput("svd factors unavailable".into())),
    };
    let v = v_t.transpose();
    let d = (v.determinant() * u.determinant()).signum();
    let rotation = v * Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d)) * u.transpose();

    Ok(RigidTransform {
        rotation,
        centroid_current: cx,
        centroid_reference: cy,
    })
}

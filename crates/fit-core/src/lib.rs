#![forbid(unsafe_code)]

pub mod correspondence;
pub mod deviation;
pub mod error;
pub mod kabsch;
pub mod points;
pub mod transform;

pub use correspondence::{resolve, resolve_with_remap};
pub use deviation::{mean_squared_deviation, per_point_squared_deviation};
pub use error::{FitError, FitResult};
pub use kabsch::{centroid, solve, RigidTransform};
pub use points::PointSet;
pub use transform::Affine3x4;

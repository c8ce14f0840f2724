//! Pose interchange between the solver and the outside world
//!
//! The solver tracks rigid poses as an orientation+position pair
//! ([`Isometry`]); renderers and callers speak 4x4 column-major matrices.
//! The conversion is lossless for rigid transforms. A matrix carrying scale
//! is accepted on the way in (scale is a rendering-side concern) - the
//! rotation is re-orthonormalized and the scale discarded.

use rapier3d::math::{Isometry, Real, Vector};
use rapier3d::na::{Matrix4, Rotation3, Translation3, UnitQuaternion};

/// A 4x4 rigid/affine transform matrix
pub type Transform = Matrix4<Real>;

/// Convert a solver pose to its matrix form
pub fn matrix_from_pose(pose: &Isometry<Real>) -> Transform {
    pose.to_homogeneous()
}

/// Extract the solver pose from a transform matrix
///
/// The upper-left 3x3 block is fitted to the nearest rotation, so matrices
/// that picked up a rendering scale still produce a valid rigid pose.
pub fn pose_from_matrix(matrix: &Transform) -> Isometry<Real> {
    let translation = Translation3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
    let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&linear));
    Isometry::from_parts(translation, rotation)
}

/// A pure translation matrix
pub fn translation(x: Real, y: Real, z: Real) -> Transform {
    Translation3::new(x, y, z).to_homogeneous()
}

/// The position carried by a transform matrix
pub fn translation_of(transform: &Transform) -> Vector<Real> {
    Vector::new(transform[(0, 3)], transform[(1, 3)], transform[(2, 3)])
}

/// Rotation state and the fixed X-then-Z rotation kernel
use nalgebra::Point3;
use serde::Deserialize;

/// Largest tilt allowed on the X axis, in degrees.
pub const MAX_TILT_DEG: f64 = 90.0;

/// Camera rotation around the X and Z axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotationState {
    pub x: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, z: 0.0 }
    }

    /// Rotate by delta amounts (in degrees), keeping the tilt within
    /// `[-MAX_TILT_DEG, MAX_TILT_DEG]`
    pub fn rotate_clamped(&mut self, dx: f64, dz: f64) {
        self.x = clamp_tilt(self.x + dx);
        self.z += dz;
    }

    /// Apply this rotation to a point
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        rotate(point, self.x, self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

pub(crate) fn clamp_tilt(x: f64) -> f64 {
    x.clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

/// Rotate a point about the X axis, then about the Z axis.
///
/// The two steps are evaluated as written rather than through a composed
/// matrix so results stay bit-identical across callers. Swapping the order
/// changes the apparent tumble axis.
pub fn rotate(point: &Point3<f64>, rotation_x_deg: f64, rotation_z_deg: f64) -> Point3<f64> {
    let (sin_x, cos_x) = rotation_x_deg.to_radians().sin_cos();
    let (sin_z, cos_z) = rotation_z_deg.to_radians().sin_cos();

    let y1 = point.y * cos_x - point.z * sin_x;
    let z1 = point.y * sin_x + point.z * cos_x;

    let x2 = point.x * cos_z - y1 * sin_z;
    let y2 = point.x * sin_z + y1 * cos_z;

    Point3::new(x2, y2, z1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Vector3};

    fn close(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let p = rotate(&Point3::new(1.0, 0.0, 0.0), 0.0, 90.0);
        assert!(close(&p, &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        let p = rotate(&Point3::new(0.0, 1.0, 0.0), 90.0, 0.0);
        assert!(close(&p, &Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotate_matches_x_then_z_composition() {
        let point = Point3::new(0.3, -1.2, 2.5);
        let (ax, az) = (37.0_f64, -112.0_f64);
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), ax.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), az.to_radians());

        let expected = rz * (rx * point);
        assert!(close(&rotate(&point, ax, az), &expected));

        // The opposite order tumbles differently
        let swapped = rx * (rz * point);
        assert!(!close(&rotate(&point, ax, az), &swapped));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let point = Point3::new(4.0, -2.0, 7.0);
        let rotated = rotate(&point, 63.0, 211.0);
        assert!((rotated.coords.norm() - point.coords.norm()).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_clamped() {
        let mut state = RotationState::new(80.0, 10.0);
        state.rotate_clamped(25.0, 5.0);
        assert_eq!(state.x, 90.0);
        assert!((state.z - 15.0).abs() < 1e-12);

        state.rotate_clamped(-500.0, 0.0);
        assert_eq!(state.x, -90.0);
    }

    #[test]
    fn test_identity_rotation() {
        let point = Point3::new(1.5, 2.5, -3.5);
        assert_eq!(RotationState::zero().apply(&point), point);
    }
}

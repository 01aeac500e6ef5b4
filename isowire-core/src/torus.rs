/// Parametric torus wireframe generation
use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::{Curve, CurveKind};
use crate::projection::Projection;
use crate::transform::RotationState;

/// Torus dimensions and sampling density.
///
/// `minor_radius < major_radius` gives a ring torus. Larger tubes are
/// allowed and produce a self-intersecting but well defined surface.
/// Generation cost grows with `major_segments * minor_segments`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub major_segments: u32,
    pub minor_segments: u32,
}

impl SurfaceConfig {
    pub fn new(
        major_radius: f64,
        minor_radius: f64,
        major_segments: u32,
        minor_segments: u32,
    ) -> Self {
        Self {
            major_radius,
            minor_radius,
            major_segments,
            minor_segments,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("major_radius", self.major_radius),
            ("minor_radius", self.minor_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidRadius { field, value });
            }
        }
        for (field, value) in [
            ("major_segments", self.major_segments),
            ("minor_segments", self.minor_segments),
        ] {
            if value == 0 {
                return Err(ConfigError::NonPositiveSegments { field, value });
            }
        }
        Ok(())
    }

    /// Point on the unrotated surface at major angle `u`, minor angle `v`
    pub fn point(&self, u: f64, v: f64) -> Point3<f64> {
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_v, cos_v) = v.sin_cos();
        let ring = self.major_radius + self.minor_radius * cos_v;
        Point3::new(ring * cos_u, ring * sin_u, self.minor_radius * sin_v)
    }

    /// Number of curves a valid configuration produces
    pub fn curve_count(&self) -> usize {
        self.major_segments as usize + self.minor_segments as usize
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::new(110.0, 45.0, 80, 60)
    }
}

/// Builds meridian and parallel loops for a torus under a given rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusMesh {
    pub surface: SurfaceConfig,
    pub projection: Projection,
}

impl TorusMesh {
    pub fn new(surface: SurfaceConfig) -> Self {
        Self {
            surface,
            projection: Projection::default(),
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Generate every curve, meridians first, in emission order (unsorted)
    pub fn generate(&self, rotation: &RotationState) -> Vec<Curve> {
        let mut curves = Vec::new();
        self.generate_into(rotation, &mut curves);
        curves
    }

    /// Generate into a reusable buffer.
    ///
    /// Existing curves in `out` are overwritten in place so their path
    /// allocations are kept from frame to frame. A degenerate surface clears
    /// the buffer.
    pub fn generate_into(&self, rotation: &RotationState, out: &mut Vec<Curve>) {
        if self.surface.validate().is_err() {
            tracing::warn!(
                surface = ?self.surface,
                "degenerate torus configuration, nothing to draw"
            );
            out.clear();
            return;
        }

        let majors = self.surface.major_segments as usize;
        let minors = self.surface.minor_segments as usize;
        let du = TAU / majors as f64;
        let dv = TAU / minors as f64;

        out.truncate(majors + minors);
        let mut slot = 0;

        for i in 0..majors {
            let u = i as f64 * du;
            let curve = next_slot(out, slot, CurveKind::Meridian);
            for j in 0..=minors {
                let rotated = rotation.apply(&self.surface.point(u, j as f64 * dv));
                if j == 0 {
                    curve.depth = rotated.z;
                }
                curve.path.push(self.project(&rotated));
            }
            slot += 1;
        }

        for j in 0..minors {
            let v = j as f64 * dv;
            let curve = next_slot(out, slot, CurveKind::Parallel);
            for i in 0..=majors {
                let rotated = rotation.apply(&self.surface.point(i as f64 * du, v));
                if i == 0 {
                    curve.depth = rotated.z;
                }
                curve.path.push(self.project(&rotated));
            }
            slot += 1;
        }

        tracing::debug!(meridians = majors, parallels = minors, "generated torus wireframe");
    }

    fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        self.projection.project(point)
    }
}

fn next_slot(out: &mut Vec<Curve>, slot: usize, kind: CurveKind) -> &mut Curve {
    if slot == out.len() {
        out.push(Curve {
            kind,
            path: Vec::new(),
            depth: 0.0,
        });
    }
    let curve = &mut out[slot];
    curve.kind = kind;
    curve.path.clear();
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{is_back_to_front, sorted_by_depth};

    fn small() -> TorusMesh {
        TorusMesh::new(SurfaceConfig::new(3.0, 1.0, 8, 6))
    }

    #[test]
    fn test_curve_counts_and_lengths() {
        let curves = small().generate(&RotationState::new(30.0, 10.0));
        assert_eq!(curves.len(), 14);
        assert!(curves[..8].iter().all(|c| c.kind == CurveKind::Meridian && c.path.len() == 7));
        assert!(curves[8..].iter().all(|c| c.kind == CurveKind::Parallel && c.path.len() == 9));
    }

    #[test]
    fn test_loops_are_closed() {
        for curve in small().generate(&RotationState::new(45.0, 0.55)) {
            let first = curve.path.first().unwrap();
            let last = curve.path.last().unwrap();
            assert!((first - last).norm() < 1e-9, "{:?} loop not closed", curve.kind);
        }
    }

    #[test]
    fn test_depth_is_first_sample_z() {
        let mesh = small();
        let rotation = RotationState::new(45.0, 20.0);
        let curves = mesh.generate(&rotation);

        let u3 = 3.0 * TAU / 8.0;
        let expected = rotation.apply(&mesh.surface.point(u3, 0.0)).z;
        assert_eq!(curves[3].depth, expected);

        let v2 = 2.0 * TAU / 6.0;
        let expected = rotation.apply(&mesh.surface.point(0.0, v2)).z;
        assert_eq!(curves[8 + 2].depth, expected);
    }

    #[test]
    fn test_unrotated_outer_point() {
        let mesh = small();
        let curves = mesh.generate(&RotationState::zero());
        // Meridian 0 starts on the outer equator at (R + r, 0, 0)
        assert!((curves[0].path[0] - Point2::new(4.0, 0.0)).norm() < 1e-12);
        assert_eq!(curves[0].depth, 0.0);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let rotation = RotationState::new(12.0, 77.0);
        assert_eq!(small().generate(&rotation), small().generate(&rotation));
    }

    #[test]
    fn test_scratch_buffer_reuse() {
        let mesh = small();
        let mut scratch = Vec::new();
        mesh.generate_into(&RotationState::new(10.0, 0.0), &mut scratch);
        let capacity = scratch[0].path.capacity();

        let rotation = RotationState::new(60.0, 90.0);
        mesh.generate_into(&rotation, &mut scratch);
        assert_eq!(scratch, mesh.generate(&rotation));
        assert_eq!(scratch[0].path.capacity(), capacity);

        // Shrinking the surface drops surplus curves
        let coarse = TorusMesh::new(SurfaceConfig::new(3.0, 1.0, 4, 3));
        coarse.generate_into(&rotation, &mut scratch);
        assert_eq!(scratch, coarse.generate(&rotation));
    }

    #[test]
    fn test_degenerate_config_yields_nothing() {
        let mut scratch = small().generate(&RotationState::zero());
        for surface in [
            SurfaceConfig::new(3.0, 1.0, 0, 6),
            SurfaceConfig::new(3.0, 1.0, 8, 0),
            SurfaceConfig::new(-3.0, 1.0, 8, 6),
            SurfaceConfig::new(3.0, 0.0, 8, 6),
            SurfaceConfig::new(f64::NAN, 1.0, 8, 6),
        ] {
            assert!(surface.validate().is_err());
            assert!(TorusMesh::new(surface).generate(&RotationState::zero()).is_empty());
        }
        TorusMesh::new(SurfaceConfig::new(3.0, 1.0, 0, 0))
            .generate_into(&RotationState::zero(), &mut scratch);
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_self_intersecting_tube_is_still_generated() {
        let mesh = TorusMesh::new(SurfaceConfig::new(1.0, 2.0, 5, 5));
        assert!(mesh.surface.validate().is_ok());
        assert_eq!(mesh.generate(&RotationState::zero()).len(), 10);
    }

    #[test]
    fn test_sorted_output_is_back_to_front() {
        let curves = sorted_by_depth(small().generate(&RotationState::new(45.0, 0.55)));
        assert!(is_back_to_front(&curves));
    }
}

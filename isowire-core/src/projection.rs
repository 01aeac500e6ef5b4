/// Orthographic and isometric projection utilities
use nalgebra::{Point2, Point3};
use serde::Deserialize;

use crate::error::ConfigError;

const COS_30: f64 = 0.866_025_403_784_438_6;
const SIN_30: f64 = 0.5;

/// Projection mode for turning object-space points into screen space
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Projection {
    /// Drop the z coordinate and scale x/y uniformly
    Orthographic { scale: f64 },
    /// Classic 30 degree axonometric projection
    Isometric { unit_size: f64 },
}

impl Projection {
    /// Scale factors must be finite and positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (field, value) = match *self {
            Projection::Orthographic { scale } => ("projection.scale", scale),
            Projection::Isometric { unit_size } => ("projection.unit_size", unit_size),
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidScale { field, value });
        }
        Ok(())
    }

    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        match *self {
            Projection::Orthographic { scale } => orthographic_project(point, scale),
            Projection::Isometric { unit_size } => {
                isometric_project(point.x, point.y, point.z, unit_size)
            }
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Orthographic { scale: 1.0 }
    }
}

/// Project a point isometrically. There is no perspective, clipping or
/// field of view: the mapping is linear in `(x, y, z)`.
pub fn isometric_project(x: f64, y: f64, z: f64, unit_size: f64) -> Point2<f64> {
    Point2::new(
        (x - y) * COS_30 * unit_size,
        (x + y) * SIN_30 * unit_size - z * unit_size,
    )
}

/// Project a point straight down the z axis
pub fn orthographic_project(point: &Point3<f64>, scale: f64) -> Point2<f64> {
    Point2::new(point.x * scale, point.y * scale)
}

/// A 1:1 viewBox for a container of the given pixel size.
///
/// Projected output is centred on the origin, so the box is centred too.
/// Container dimensions never feed into the projection itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            min_x: -width / 2.0,
            min_y: -height / 2.0,
            width,
            height,
        }
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min_x
            && point.x <= self.min_x + self.width
            && point.y >= self.min_y
            && point.y <= self.min_y + self.height
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::centered(400.0, 400.0)
    }
}

/// Isometric block stacks.
///
/// A stack is a sequence of layers piled along +z. Each layer is a square
/// grid of unit-footprint blocks, optionally split into vertical sub-blocks.
/// The camera is fixed, so faces are emitted in ascending object-space
/// order and drawn as emitted: later faces are nearer and paint over
/// earlier ones. No depth sort is needed.
use nalgebra::{Point2, Point3};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::{Face, FaceKind};
use crate::projection::isometric_project;

/// Which faces of each block to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSet {
    /// Only faces turned toward the isometric viewer
    #[default]
    Visible,
    /// All six faces, for see-through or outlined drawings
    All,
}

impl FaceSet {
    fn kinds(self) -> &'static [FaceKind] {
        match self {
            FaceSet::Visible => &FaceKind::VISIBLE,
            FaceSet::All => &FaceKind::ALL,
        }
    }
}

/// One layer of the stack
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub grid_size: u32,
    pub height: f64,
    pub top_color: String,
    pub left_color: String,
    pub right_color: String,
    pub vertical_stacks: u32,
    /// Colour edge cells with the border colours
    pub show_borders: bool,
    pub border_top_color: Option<String>,
    pub border_side_color: Option<String>,
    pub label: Option<String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            height: 1.0,
            top_color: "#60a5fa".to_string(),
            left_color: "#2563eb".to_string(),
            right_color: "#1d4ed8".to_string(),
            vertical_stacks: 1,
            show_borders: false,
            border_top_color: None,
            border_side_color: None,
            label: None,
        }
    }
}

impl LayerConfig {
    fn is_drawable(&self) -> bool {
        self.grid_size > 0 && self.height.is_finite() && self.height > 0.0
    }

    fn is_border_cell(&self, i: u32, j: u32) -> bool {
        let last = self.grid_size - 1;
        i == 0 || i == last || j == 0 || j == last
    }

    fn fill(&self, kind: FaceKind, border: bool) -> &str {
        let (base, border_color) = match kind {
            FaceKind::Top | FaceKind::Bottom => (&self.top_color, &self.border_top_color),
            FaceKind::Left | FaceKind::Front => (&self.left_color, &self.border_side_color),
            FaceKind::Right | FaceKind::Back => (&self.right_color, &self.border_side_color),
        };
        match border_color {
            Some(color) if border => color.as_str(),
            _ => base.as_str(),
        }
    }
}

/// Where a layer ends up along z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlacement {
    pub index: usize,
    pub base_z: f64,
    pub top_z: f64,
}

/// A full stack diagram
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub layers: Vec<LayerConfig>,
    pub layer_gap: f64,
    pub unit_size: f64,
    pub faces: FaceSet,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            layers: vec![LayerConfig::default()],
            layer_gap: 0.5,
            unit_size: 20.0,
            faces: FaceSet::default(),
        }
    }
}

impl StackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unit_size.is_finite() || self.unit_size <= 0.0 {
            return Err(ConfigError::InvalidScale {
                field: "stack.unit_size",
                value: self.unit_size,
            });
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.grid_size == 0 {
                return Err(ConfigError::EmptyLayerGrid { index });
            }
            if !layer.height.is_finite() || layer.height <= 0.0 {
                return Err(ConfigError::InvalidLayerHeight {
                    index,
                    value: layer.height,
                });
            }
        }
        Ok(())
    }

    /// Base and top of every layer. Each base is the running sum of the
    /// previous layers' `height + layer_gap`.
    pub fn placements(&self) -> Vec<LayerPlacement> {
        let mut base_z = 0.0;
        self.layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                // A non-finite height must not poison every layer above it
                let height = if layer.height.is_finite() { layer.height } else { 0.0 };
                let placement = LayerPlacement {
                    index,
                    base_z,
                    top_z: base_z + height,
                };
                base_z += height + self.layer_gap;
                placement
            })
            .collect()
    }

    /// Screen position of a layer's label anchor: the projected centre of
    /// its right-hand top edge
    pub fn label_anchor(&self, placement: &LayerPlacement) -> Option<Point2<f64>> {
        let layer = self.layers.get(placement.index)?;
        let half = layer.grid_size as f64 / 2.0;
        Some(isometric_project(half, 0.0, placement.top_z, self.unit_size))
    }

    /// Emit every face of the stack in painter's order
    pub fn generate(&self) -> Vec<Face> {
        let mut faces = Vec::new();
        self.generate_into(&mut faces);
        faces
    }

    pub fn generate_into(&self, out: &mut Vec<Face>) {
        out.clear();
        for (layer, placement) in self.layers.iter().zip(self.placements()) {
            if !layer.is_drawable() {
                tracing::warn!(layer = placement.index, "skipping degenerate stack layer");
                continue;
            }
            self.emit_layer(layer, &placement, out);
        }
        tracing::debug!(layers = self.layers.len(), faces = out.len(), "generated block stack");
    }

    fn emit_layer(&self, layer: &LayerConfig, placement: &LayerPlacement, out: &mut Vec<Face>) {
        let stacks = layer.vertical_stacks.max(1);
        let sub_height = layer.height / stacks as f64;
        // Centre every layer on the z axis
        let offset = -(layer.grid_size as f64) / 2.0;
        let border_colors = layer.show_borders;

        for i in 0..layer.grid_size {
            for j in 0..layer.grid_size {
                let border = border_colors && layer.is_border_cell(i, j);
                for k in 0..stacks {
                    let min = Point3::new(
                        offset + i as f64,
                        offset + j as f64,
                        placement.base_z + k as f64 * sub_height,
                    );
                    let max = Point3::new(min.x + 1.0, min.y + 1.0, min.z + sub_height);
                    let block = Block { min, max };
                    for &kind in self.faces.kinds() {
                        out.push(Face {
                            kind,
                            corners: block.face(kind).map(|c| {
                                isometric_project(c.x, c.y, c.z, self.unit_size)
                            }),
                            depth: block.face_depth(kind),
                            fill: layer.fill(kind, border).to_string(),
                            border,
                            layer: placement.index,
                            origin: block.min,
                        });
                    }
                }
            }
        }
    }
}

/// Axis-aligned box given by two opposite corners
#[derive(Debug, Clone, Copy)]
struct Block {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl Block {
    /// Corners of one face, wound around its outline
    fn face(&self, kind: FaceKind) -> [Point3<f64>; 4] {
        let (x0, y0, z0) = (self.min.x, self.min.y, self.min.z);
        let (x1, y1, z1) = (self.max.x, self.max.y, self.max.z);
        let p = Point3::new;
        match kind {
            FaceKind::Top => [p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)],
            FaceKind::Bottom => [p(x0, y0, z0), p(x1, y0, z0), p(x1, y1, z0), p(x0, y1, z0)],
            FaceKind::Right => [p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)],
            FaceKind::Back => [p(x0, y0, z0), p(x0, y1, z0), p(x0, y1, z1), p(x0, y0, z1)],
            FaceKind::Left => [p(x0, y1, z0), p(x1, y1, z0), p(x1, y1, z1), p(x0, y1, z1)],
            FaceKind::Front => [p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)],
        }
    }

    /// Distance behind the viewer plane, larger is farther
    fn face_depth(&self, kind: FaceKind) -> f64 {
        let corners = self.face(kind);
        let sum: f64 = corners.iter().map(|c| c.x + c.y + c.z).sum();
        -sum / 4.0
    }
}

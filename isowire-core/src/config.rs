/// Scene configuration loaded from TOML
use serde::Deserialize;

use crate::error::ConfigError;
use crate::interaction::{AutoRotateConfig, InteractionConfig};
use crate::projection::Projection;
use crate::stack::StackConfig;
use crate::torus::SurfaceConfig;
use crate::transform::RotationState;

/// Which pointer response a view uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Drag to rotate, auto-rotation resumes after an idle period
    #[default]
    Drag,
    /// Tilt follows the hovering pointer
    Hover,
}

/// Everything a view needs to build itself.
///
/// Every section is optional; missing sections take their defaults.
///
/// ```toml
/// mode = "drag"
///
/// [torus]
/// major_radius = 110.0
/// minor_radius = 45.0
/// major_segments = 80
/// minor_segments = 60
///
/// [rotation]
/// x = 45.0
/// z = 0.55
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub mode: InteractionMode,
    pub torus: SurfaceConfig,
    pub projection: Projection,
    pub stack: StackConfig,
    pub rotation: RotationState,
    pub auto_rotate: AutoRotateConfig,
    pub interaction: InteractionConfig,
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let scene: SceneConfig = toml::from_str(input)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.torus.validate()?;
        self.projection.validate()?;
        self.stack.validate()?;
        self.auto_rotate.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::FaceSet;

    #[test]
    fn test_empty_document_uses_defaults() {
        let scene = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(scene, SceneConfig::default());
        assert_eq!(scene.torus, SurfaceConfig::new(110.0, 45.0, 80, 60));
    }

    #[test]
    fn test_parse_full_scene() {
        let scene = SceneConfig::from_toml_str(
            r##"
            mode = "hover"
            projection = { mode = "isometric", unit_size = 2.0 }

            [torus]
            major_radius = 5.0
            minor_radius = 2.0
            major_segments = 12
            minor_segments = 8

            [rotation]
            x = 30.0

            [auto_rotate]
            period_seconds = 20.0

            [interaction]
            resume_delay_ms = 500

            [stack]
            layer_gap = 0.25
            faces = "all"

            [[stack.layers]]
            grid_size = 3
            height = 0.5
            show_borders = true
            border_top_color = "#fbbf24"

            [[stack.layers]]
            grid_size = 2
            vertical_stacks = 3
            label = "cache"
            "##,
        )
        .unwrap();

        assert_eq!(scene.mode, InteractionMode::Hover);
        assert_eq!(scene.projection, Projection::Isometric { unit_size: 2.0 });
        assert_eq!(scene.torus.major_segments, 12);
        assert_eq!(scene.rotation, RotationState::new(30.0, 0.0));
        assert_eq!(scene.auto_rotate.period_seconds, 20.0);
        assert!(scene.auto_rotate.enabled);
        assert_eq!(scene.interaction.resume_delay_ms, 500);
        assert_eq!(scene.interaction.drag_sensitivity, 0.5);
        assert_eq!(scene.stack.faces, FaceSet::All);
        assert_eq!(scene.stack.layers.len(), 2);
        assert_eq!(scene.stack.layers[0].border_top_color.as_deref(), Some("#fbbf24"));
        assert_eq!(scene.stack.layers[1].height, 1.0);
        assert_eq!(scene.stack.layers[1].label.as_deref(), Some("cache"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SceneConfig::from_toml_str("[torus]\nminor_segments = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveSegments { field: "minor_segments", .. }
        ));

        let err = SceneConfig::from_toml_str("[auto_rotate]\nperiod_seconds = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPeriod(_)));

        let err = SceneConfig::from_toml_str("[[stack.layers]]\nheight = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLayerHeight { index: 0, .. }));

        let err = SceneConfig::from_toml_str("[[stack.layers]]\n[[stack.layers]]\ngrid_size = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLayerGrid { index: 1 }));
    }

    #[test]
    fn test_unbounded_scales_are_rejected() {
        for doc in [
            "projection = { mode = \"orthographic\", scale = inf }",
            "projection = { mode = \"orthographic\", scale = nan }",
            "projection = { mode = \"isometric\", unit_size = -1.0 }",
            "projection = { mode = \"orthographic\", scale = 0.0 }",
        ] {
            let err = SceneConfig::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidScale { .. }), "{doc} accepted");
        }

        let err = SceneConfig::from_toml_str("[stack]\nunit_size = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScale { field: "stack.unit_size", .. }));

        let scene =
            SceneConfig::from_toml_str("projection = { mode = \"orthographic\", scale = 2.5 }")
                .unwrap();
        assert_eq!(scene.projection, Projection::Orthographic { scale: 2.5 });
    }

    #[test]
    fn test_syntax_error() {
        let err = SceneConfig::from_toml_str("[torus\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse scene"));
    }
}

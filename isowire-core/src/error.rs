/// Configuration errors reported by validation and scene loading
use thiserror::Error;

/// Errors raised when a caller asks for configuration to be checked.
///
/// Generators never return these: they treat degenerate input as "nothing
/// to draw" and emit an empty primitive list instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveSegments { field: &'static str, value: u32 },

    #[error("{field} must be finite and greater than zero (got {value})")]
    InvalidRadius { field: &'static str, value: f64 },

    #[error("{field} must be finite and greater than zero (got {value})")]
    InvalidScale { field: &'static str, value: f64 },

    #[error("layer {index} grid_size must be greater than zero")]
    EmptyLayerGrid { index: usize },

    #[error("layer {index} height must be finite and greater than zero (got {value})")]
    InvalidLayerHeight { index: usize, value: f64 },

    #[error("auto-rotate period must be finite and greater than zero (got {0})")]
    InvalidPeriod(f64),

    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
}

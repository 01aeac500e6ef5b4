/// isowire core library - wireframe projection engine
///
/// Generates torus wireframes and isometric block stacks, rotates and
/// projects them to 2D, and orders the result for painter's-algorithm
/// drawing. Also hosts the rotation state machine that drives animated,
/// draggable views. Rendering itself is left to the caller.

pub mod config;
pub mod depth;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod projection;
pub mod stack;
pub mod torus;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use config::{InteractionMode, SceneConfig};
pub use depth::{sort_by_depth, sorted_by_depth, Depth};
pub use error::ConfigError;
pub use frame::{Flow, FrameScheduler, FrameTick, Mount, PointerEvent, PointerListeners};
pub use geometry::{Curve, CurveKind, Face, FaceKind, Primitive};
pub use interaction::{AutoRotateConfig, HoverTilt, InteractionConfig, Phase, RotationController};
pub use projection::{isometric_project, Projection, ViewBox};
pub use stack::{FaceSet, LayerConfig, StackConfig};
pub use torus::{SurfaceConfig, TorusMesh};
pub use transform::{rotate, RotationState};
pub use view::{DrawList, Driver, Shape, View};

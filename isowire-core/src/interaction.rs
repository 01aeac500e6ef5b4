/// Rotation state machine: auto-rotation, drag-to-rotate and hover tilt.
///
/// Handlers are plain methods on an explicit state object, so the whole
/// machine can be driven from tests with scripted timestamps. Timestamps
/// are durations since an arbitrary epoch chosen by the caller (usually
/// the frame clock's start).
///
/// ```text
///   AutoRotating --pointer down--> Dragging --pointer up--> Paused
///        ^                            ^                       |
///        |                            +----pointer down-------+
///        +-------------- resume delay elapsed ----------------+
/// ```
use std::time::Duration;

use nalgebra::{Point2, Vector2};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::{clamp_tilt, RotationState};

/// Rate of the sinusoidal tilt wobble, in radians per second of elapsed time
const OSCILLATION_RATE: f64 = 0.5;

/// Hover tilt snaps to its target once this close (degrees)
const HOVER_SNAP_DEG: f64 = 1e-3;

/// Parameters of the time-driven auto-rotation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoRotateConfig {
    pub enabled: bool,
    /// Seconds for one full turn around the Z axis
    pub period_seconds: f64,
    /// Peak deviation of the X tilt from its base, in degrees
    pub amplitude_deg: f64,
}

impl Default for AutoRotateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_seconds: 60.0,
            amplitude_deg: 5.0,
        }
    }
}

impl AutoRotateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.period_seconds.is_finite() || self.period_seconds <= 0.0 {
            return Err(ConfigError::InvalidPeriod(self.period_seconds));
        }
        Ok(())
    }

    /// Rotation reached `elapsed` seconds after starting from `base`
    pub fn rotation_at(&self, base: &RotationState, elapsed: f64) -> RotationState {
        RotationState {
            x: base.x + (elapsed * OSCILLATION_RATE).sin() * self.amplitude_deg,
            z: base.z + elapsed * (360.0 / self.period_seconds),
        }
    }
}

/// Pointer response tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Degrees of rotation per pixel of drag
    pub drag_sensitivity: f64,
    /// Idle time after a drag before auto-rotation resumes
    pub resume_delay_ms: u64,
    /// Degrees of tilt per pixel of hover offset from the centre
    pub hover_sensitivity: f64,
    /// Fraction of the remaining distance covered per frame when the
    /// hover tilt returns to its base
    pub hover_return_rate: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.5,
            resume_delay_ms: 2000,
            hover_sensitivity: 0.1,
            hover_return_rate: 0.1,
        }
    }
}

impl InteractionConfig {
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }
}

/// Current phase of the drag state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AutoRotating,
    Dragging,
    Paused { released_at: Duration },
}

/// Persistent state of a rotatable view.
///
/// Exactly one writer touches `rotation` per frame: `on_frame` does nothing
/// while dragging, and pointer moves outside a drag are ignored.
#[derive(Debug, Clone)]
pub struct RotationController {
    rotation: RotationState,
    phase: Phase,
    auto_rotate: AutoRotateConfig,
    interaction: InteractionConfig,
    /// Rotation at the moment auto-rotation (re)started
    base: RotationState,
    /// Time auto-rotation (re)started; set lazily by the first frame
    anchor: Option<Duration>,
    last_pointer: Option<Point2<f64>>,
}

impl RotationController {
    pub fn new(
        initial: RotationState,
        auto_rotate: AutoRotateConfig,
        interaction: InteractionConfig,
    ) -> Self {
        Self {
            rotation: initial,
            phase: Phase::AutoRotating,
            auto_rotate,
            interaction,
            base: initial,
            anchor: None,
            last_pointer: None,
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    pub fn auto_rotate_enabled(&self) -> bool {
        self.auto_rotate.enabled
    }

    pub fn set_auto_rotate_enabled(&mut self, enabled: bool) {
        if enabled && !self.auto_rotate.enabled {
            self.rebase();
        }
        self.auto_rotate.enabled = enabled;
    }

    /// Advance the animation driver. Returns whether the rotation changed.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        match self.phase {
            Phase::Dragging => false,
            Phase::Paused { released_at } => {
                if now.saturating_sub(released_at) >= self.interaction.resume_delay() {
                    tracing::trace!(?now, "resuming auto-rotation");
                    self.phase = Phase::AutoRotating;
                    self.rebase();
                    self.advance(now)
                } else {
                    false
                }
            }
            Phase::AutoRotating => self.advance(now),
        }
    }

    pub fn on_pointer_down(&mut self, position: Point2<f64>) {
        tracing::trace!(from = ?self.phase, "pointer down, dragging");
        self.phase = Phase::Dragging;
        self.last_pointer = Some(position);
    }

    /// Apply a pointer move. Returns whether the rotation changed.
    pub fn on_pointer_move(&mut self, position: Point2<f64>) -> bool {
        if self.phase != Phase::Dragging {
            return false;
        }
        let Some(last) = self.last_pointer.replace(position) else {
            return false;
        };
        let delta: Vector2<f64> = position - last;
        let s = self.interaction.drag_sensitivity;
        self.rotation.rotate_clamped(delta.y * s, delta.x * s);
        true
    }

    /// End a drag. A pointer-up without a preceding pointer-down is ignored.
    pub fn on_pointer_up(&mut self, now: Duration) {
        if self.phase != Phase::Dragging {
            return;
        }
        tracing::trace!(?now, "pointer up, pausing auto-rotation");
        self.phase = Phase::Paused { released_at: now };
        self.last_pointer = None;
    }

    fn rebase(&mut self) {
        self.base = self.rotation;
        self.anchor = None;
    }

    fn advance(&mut self, now: Duration) -> bool {
        if !self.auto_rotate.enabled {
            return false;
        }
        let anchor = *self.anchor.get_or_insert(now);
        let elapsed = now.saturating_sub(anchor).as_secs_f64();
        let next = self.auto_rotate.rotation_at(&self.base, elapsed);
        let changed = next != self.rotation;
        self.rotation = next;
        changed
    }
}

/// Hover-driven tilt, used by views that never lock into a drag.
///
/// While the pointer is over the element the rotation is a direct function
/// of its offset from the element centre. After it leaves, each frame eases
/// the rotation back toward the base angles.
#[derive(Debug, Clone)]
pub struct HoverTilt {
    base: RotationState,
    current: RotationState,
    target: RotationState,
    sensitivity: f64,
    return_rate: f64,
    hovering: bool,
}

impl HoverTilt {
    pub fn new(base: RotationState, interaction: &InteractionConfig) -> Self {
        Self {
            base,
            current: base,
            target: base,
            sensitivity: interaction.hover_sensitivity,
            return_rate: interaction.hover_return_rate.clamp(0.0, 1.0),
            hovering: false,
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.current
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Pointer position and element centre, both in the same pixel space
    pub fn on_pointer_move(&mut self, position: Point2<f64>, center: Point2<f64>) {
        let offset = position - center;
        self.hovering = true;
        self.target = RotationState {
            x: clamp_tilt(self.base.x + offset.y * self.sensitivity),
            z: self.base.z + offset.x * self.sensitivity,
        };
        self.current = self.target;
    }

    pub fn on_pointer_leave(&mut self) {
        self.hovering = false;
        self.target = self.base;
    }

    /// Returns whether the rotation changed
    pub fn on_frame(&mut self) -> bool {
        if self.hovering || self.current == self.target {
            return false;
        }
        let step = |from: f64, to: f64| {
            let next = from + (to - from) * self.return_rate;
            if (to - next).abs() < HOVER_SNAP_DEG {
                to
            } else {
                next
            }
        };
        self.current = RotationState {
            x: step(self.current.x, self.target.x),
            z: step(self.current.z, self.target.z),
        };
        true
    }
}

/// A mounted diagram: shape, rotation driver and per-frame draw list
use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Point2;

use crate::config::{InteractionMode, SceneConfig};
use crate::depth::sort_by_depth;
use crate::frame::{Flow, FrameScheduler, FrameTick, Mount, PointerEvent, PointerListeners};
use crate::geometry::{Curve, Face, Primitive};
use crate::interaction::{HoverTilt, RotationController};
use crate::projection::ViewBox;
use crate::stack::StackConfig;
use crate::torus::TorusMesh;
use crate::transform::RotationState;

/// What the view draws
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Rotating torus wireframe, depth sorted every frame
    Torus(TorusMesh),
    /// Fixed-angle isometric stack, drawn in emission order
    Stack(StackConfig),
}

/// Source of the view's rotation
#[derive(Debug, Clone)]
pub enum Driver {
    Drag(RotationController),
    Hover(HoverTilt),
}

impl Driver {
    pub fn rotation(&self) -> RotationState {
        match self {
            Driver::Drag(controller) => controller.rotation(),
            Driver::Hover(hover) => hover.rotation(),
        }
    }
}

/// Primitives for one frame, in draw order
#[derive(Debug, Clone, Copy)]
pub enum DrawList<'a> {
    Curves(&'a [Curve]),
    Faces(&'a [Face]),
}

impl DrawList<'_> {
    pub fn len(&self) -> usize {
        match self {
            DrawList::Curves(curves) => curves.len(),
            DrawList::Faces(faces) => faces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_primitives(&self) -> Vec<Primitive> {
        match self {
            DrawList::Curves(curves) => curves.iter().cloned().map(Primitive::from).collect(),
            DrawList::Faces(faces) => faces.iter().cloned().map(Primitive::from).collect(),
        }
    }
}

/// One diagram instance.
///
/// Only the rotation driver persists between frames. Geometry is rebuilt
/// on every [`View::draw_list`] call into scratch buffers owned here.
pub struct View {
    shape: Shape,
    driver: Driver,
    view_box: ViewBox,
    curves: Vec<Curve>,
    faces: Vec<Face>,
    dirty: bool,
}

impl View {
    pub fn new(shape: Shape, driver: Driver, width: f64, height: f64) -> Self {
        Self {
            shape,
            driver,
            view_box: ViewBox::centered(width, height),
            curves: Vec::new(),
            faces: Vec::new(),
            dirty: true,
        }
    }

    pub fn torus(scene: &SceneConfig, width: f64, height: f64) -> Self {
        let mesh = TorusMesh::new(scene.torus).with_projection(scene.projection);
        Self::new(Shape::Torus(mesh), driver_for(scene), width, height)
    }

    pub fn stack(scene: &SceneConfig, width: f64, height: f64) -> Self {
        Self::new(Shape::Stack(scene.stack.clone()), driver_for(scene), width, height)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Swap the drawn shape, keeping the rotation driver
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.dirty = true;
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }

    pub fn rotation(&self) -> RotationState {
        self.driver.rotation()
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Take a new container size. Generation picks it up on the next draw.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.view_box = ViewBox::centered(width, height);
        self.dirty = true;
    }

    /// Whether the next draw would differ from the last one
    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn on_frame(&mut self, tick: &FrameTick) {
        let changed = match &mut self.driver {
            Driver::Drag(controller) => controller.on_frame(tick.now),
            Driver::Hover(hover) => hover.on_frame(),
        };
        self.dirty |= changed;
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) {
        // Pointer positions are element-local, origin at the top-left corner
        let center = Point2::new(self.view_box.width / 2.0, self.view_box.height / 2.0);
        match (&mut self.driver, *event) {
            (Driver::Drag(c), PointerEvent::Down { position }) => c.on_pointer_down(position),
            (Driver::Drag(c), PointerEvent::Move { position }) => {
                self.dirty |= c.on_pointer_move(position);
            }
            (Driver::Drag(c), PointerEvent::Up { now, .. }) => c.on_pointer_up(now),
            (Driver::Drag(_), PointerEvent::Leave) => {}
            (Driver::Hover(h), PointerEvent::Move { position }) => {
                h.on_pointer_move(position, center);
                self.dirty = true;
            }
            (Driver::Hover(h), PointerEvent::Leave) => h.on_pointer_leave(),
            (Driver::Hover(_), PointerEvent::Down { .. } | PointerEvent::Up { .. }) => {}
        }
    }

    /// Regenerate this frame's primitives in draw order
    pub fn draw_list(&mut self) -> DrawList<'_> {
        self.dirty = false;
        let rotation = self.driver.rotation();
        match &self.shape {
            Shape::Torus(mesh) => {
                mesh.generate_into(&rotation, &mut self.curves);
                sort_by_depth(&mut self.curves);
                DrawList::Curves(&self.curves)
            }
            Shape::Stack(stack) => {
                stack.generate_into(&mut self.faces);
                DrawList::Faces(&self.faces)
            }
        }
    }

    /// Attach a shared view to the frame clock and pointer input. The
    /// returned [`Mount`] must be unmounted when the view goes away.
    pub fn mount(
        view: &Rc<RefCell<View>>,
        frames: &mut FrameScheduler,
        pointers: &mut PointerListeners,
    ) -> Mount {
        let on_frame = Rc::clone(view);
        let frame = frames.subscribe(move |tick| {
            on_frame.borrow_mut().on_frame(tick);
            Flow::Continue
        });
        let on_pointer = Rc::clone(view);
        let pointer = pointers.subscribe(move |event| {
            on_pointer.borrow_mut().on_pointer(event);
            Flow::Continue
        });
        tracing::trace!("view mounted");
        Mount::new(frame, pointer)
    }
}

fn driver_for(scene: &SceneConfig) -> Driver {
    match scene.mode {
        InteractionMode::Drag => Driver::Drag(RotationController::new(
            scene.rotation,
            scene.auto_rotate,
            scene.interaction,
        )),
        InteractionMode::Hover => Driver::Hover(HoverTilt::new(scene.rotation, &scene.interaction)),
    }
}

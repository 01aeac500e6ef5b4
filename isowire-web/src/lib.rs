/// isowire Web - wasm viewer that writes SVG into the page
///
/// The host page owns the animation loop: call `frame` from
/// `requestAnimationFrame`, forward pointer events, and call `render_into`
/// when `frame` reports a change.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use isowire_core::{
    FrameScheduler, FrameTick, Mount, PointerEvent, PointerListeners, SceneConfig, Shape, View,
};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;

pub mod svg;

use svg::Label;

#[wasm_bindgen]
pub struct WebViewer {
    view: Rc<RefCell<View>>,
    frames: FrameScheduler,
    pointers: PointerListeners,
    mount: Mount,
    labels: Vec<Label>,
    frame: u64,
}

#[wasm_bindgen]
impl WebViewer {
    /// `scene` is a TOML scene document (empty for defaults), `shape` is
    /// `"torus"` or `"stack"`.
    #[wasm_bindgen(constructor)]
    pub fn new(scene: &str, shape: &str, width: f64, height: f64) -> Result<WebViewer, JsValue> {
        let scene = SceneConfig::from_toml_str(scene).map_err(to_js_error)?;
        let view = match shape {
            "torus" => View::torus(&scene, width, height),
            "stack" => View::stack(&scene, width, height),
            other => return Err(js_error(&format!("unknown shape `{other}`"))),
        };
        let labels = stack_labels(view.shape());

        let view = Rc::new(RefCell::new(view));
        let mut frames = FrameScheduler::new();
        let mut pointers = PointerListeners::new();
        let mount = View::mount(&view, &mut frames, &mut pointers);
        tracing::debug!(shape, width, height, "web viewer created");

        Ok(WebViewer {
            view,
            frames,
            pointers,
            mount,
            labels,
            frame: 0,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.borrow_mut().resize(width, height);
    }

    /// Advance the animation. Returns true when the picture changed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.frames.dispatch(&FrameTick {
            now: millis(now_ms),
            frame: self.frame,
        });
        self.frame += 1;
        self.view.borrow().needs_redraw()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointers.dispatch(&PointerEvent::Down {
            position: Point2::new(x, y),
        });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointers.dispatch(&PointerEvent::Move {
            position: Point2::new(x, y),
        });
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, now_ms: f64) {
        self.pointers.dispatch(&PointerEvent::Up {
            position: Point2::new(x, y),
            now: millis(now_ms),
        });
    }

    pub fn pointer_leave(&mut self) {
        self.pointers.dispatch(&PointerEvent::Leave);
    }

    pub fn rotation_x(&self) -> f64 {
        self.view.borrow().rotation().x
    }

    pub fn rotation_z(&self) -> f64 {
        self.view.borrow().rotation().z
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Current frame as an `<svg>` element
    pub fn svg_markup(&mut self) -> String {
        let mut view = self.view.borrow_mut();
        let view_box = view.view_box();
        svg::document(view.draw_list(), &view_box, &self.labels)
    }

    /// Replace the contents of the element with id `element_id` by the
    /// current frame
    pub fn render_into(&mut self, element_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| js_error("no document available"))?;
        let element = document
            .get_element_by_id(element_id)
            .ok_or_else(|| js_error(&format!("no element with id `{element_id}`")))?;
        element.set_inner_html(&self.svg_markup());
        Ok(())
    }

    /// Stop reacting to frames and pointer input. Safe to call repeatedly;
    /// also runs when the viewer is freed.
    pub fn unmount(&mut self) {
        self.mount.unmount(&mut self.frames, &mut self.pointers);
    }
}

impl Drop for WebViewer {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn stack_labels(shape: &Shape) -> Vec<Label> {
    let Shape::Stack(stack) = shape else {
        return Vec::new();
    };
    stack
        .placements()
        .iter()
        .filter_map(|placement| {
            let text = stack.layers.get(placement.index)?.label.clone()?;
            let anchor = stack.label_anchor(placement)?;
            Some(Label { anchor, text })
        })
        .collect()
}

/// Host timestamps are milliseconds; anything unrepresentable maps to zero
fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_default()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    tracing::warn!(error = message, "web viewer error");
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        JsValue::NULL
    }
}

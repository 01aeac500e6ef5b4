/// Terminal viewer for isowire diagrams
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use isowire_core::{
    geometry, Driver, FrameScheduler, FrameTick, Mount, PointerEvent, PointerListeners,
    Primitive, Projection, SceneConfig, Shape, StackConfig, TorusMesh, View,
};
use nalgebra::Point2;
use std::cell::RefCell;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub mod error;
pub mod renderer;

pub use error::{Result, TerminalError};
pub use renderer::{AsciiRenderer, CELL_HEIGHT, CELL_WIDTH};

/// Share of the view box the fitted shape may cover
const FIT_MARGIN: f64 = 0.9;

/// Which diagram to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ShapeKind {
    Torus,
    Stack,
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: SceneConfig,
    kind: ShapeKind,
    view: Rc<RefCell<View>>,
    frames: FrameScheduler,
    pointers: PointerListeners,
    mount: Mount,
    renderer: AsciiRenderer,
    center: Point2<f64>,
    running: bool,
    started: Instant,
    frame: u64,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: SceneConfig, kind: ShapeKind) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let (px_width, px_height) = pixel_size(width, height);

        let mut view = match kind {
            ShapeKind::Torus => View::torus(&scene, px_width, px_height),
            ShapeKind::Stack => View::stack(&scene, px_width, px_height),
        };
        let (shape, center) = fit_shape(&scene, kind, px_width, px_height);
        view.set_shape(shape);

        let view = Rc::new(RefCell::new(view));
        let mut frames = FrameScheduler::new();
        let mut pointers = PointerListeners::new();
        let mount = View::mount(&view, &mut frames, &mut pointers);

        Ok(Self {
            scene,
            kind,
            view,
            frames,
            pointers,
            mount,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            center,
            running: true,
            started: Instant::now(),
            frame: 0,
            last_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        self.mount.unmount(&mut self.frames, &mut self.pointers);
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        tracing::info!(shape = ?self.kind, "starting terminal viewer");

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update
            self.frames.dispatch(&FrameTick {
                now: self.started.elapsed(),
                frame: self.frame,
            });
            self.frame += 1;

            // Render
            if self.view.borrow().needs_redraw() {
                self.render()?;
            }

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => {
                if let Some(pointer) = self.pointer_event(mouse) {
                    self.pointers.dispatch(&pointer);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            Event::FocusLost => self.pointers.dispatch(&PointerEvent::Leave),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                if let Driver::Drag(controller) = self.view.borrow_mut().driver_mut() {
                    let enabled = !controller.auto_rotate_enabled();
                    controller.set_auto_rotate_enabled(enabled);
                    tracing::debug!(enabled, "toggled auto-rotation");
                }
            }
            _ => {}
        }
    }

    fn pointer_event(&self, mouse: MouseEvent) -> Option<PointerEvent> {
        let position = Point2::new(
            (mouse.column as f64 + 0.5) * CELL_WIDTH,
            (mouse.row as f64 + 0.5) * CELL_HEIGHT,
        );
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { position }),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(PointerEvent::Move { position })
            }
            MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up {
                position,
                now: self.started.elapsed(),
            }),
            _ => None,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (px_width, px_height) = pixel_size(width, height);
        let (shape, center) = fit_shape(&self.scene, self.kind, px_width, px_height);
        let mut view = self.view.borrow_mut();
        view.resize(px_width, px_height);
        view.set_shape(shape);
        self.center = center;
        self.renderer.resize(width as usize, height as usize);
        tracing::debug!(width, height, "terminal resized");
    }

    fn render(&mut self) -> Result<()> {
        let mut view = self.view.borrow_mut();
        let view_box = view.view_box();
        let rotation = view.rotation();

        // Clear renderer
        self.renderer.clear();
        self.renderer.render(view.draw_list(), &view_box, self.center);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "isowire | FPS: {:.1} | rot x {:6.1} z {:7.1} | Mouse=Rotate Space=Auto Q=Quit",
                self.fps, rotation.x, rotation.z
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn pixel_size(width: u16, height: u16) -> (f64, f64) {
    (width as f64 * CELL_WIDTH, height as f64 * CELL_HEIGHT)
}

/// Scale the scene's shape to the view box. Returns the shape and the
/// view-space point that should land in the middle of the screen.
pub fn fit_shape(
    scene: &SceneConfig,
    kind: ShapeKind,
    width: f64,
    height: f64,
) -> (Shape, Point2<f64>) {
    let half_extent = FIT_MARGIN * width.min(height) / 2.0;
    match kind {
        ShapeKind::Torus => {
            let reach = scene.torus.major_radius + scene.torus.minor_radius;
            let fit = if reach > 0.0 { half_extent / reach } else { 1.0 };
            let projection = match scene.projection {
                Projection::Orthographic { scale } => Projection::Orthographic {
                    scale: scale * fit,
                },
                Projection::Isometric { unit_size } => Projection::Isometric {
                    unit_size: unit_size * fit,
                },
            };
            let mesh = TorusMesh::new(scene.torus).with_projection(projection);
            (Shape::Torus(mesh), Point2::origin())
        }
        ShapeKind::Stack => {
            let unit = StackConfig {
                unit_size: 1.0,
                ..scene.stack.clone()
            };
            let faces: Vec<Primitive> = unit.generate().into_iter().map(Primitive::from).collect();
            let Some(bounds) = geometry::bounds(&faces) else {
                return (Shape::Stack(scene.stack.clone()), Point2::origin());
            };
            let fit = FIT_MARGIN * (width / bounds.width()).min(height / bounds.height());
            let stack = StackConfig {
                unit_size: fit,
                ..unit
            };
            (Shape::Stack(stack), bounds.center() * fit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_torus_scales_to_view() {
        let scene = SceneConfig::default();
        let (shape, center) = fit_shape(&scene, ShapeKind::Torus, 400.0, 200.0);
        assert_eq!(center, Point2::origin());
        match shape {
            Shape::Torus(mesh) => {
                let expected = 0.9 * 100.0 / 155.0;
                assert_eq!(mesh.projection, Projection::Orthographic { scale: expected });
            }
            Shape::Stack(_) => panic!("expected a torus"),
        }
    }

    #[test]
    fn test_fit_stack_stays_inside_view() {
        let scene = SceneConfig::default();
        let (shape, center) = fit_shape(&scene, ShapeKind::Stack, 640.0, 384.0);
        let Shape::Stack(stack) = shape else {
            panic!("expected a stack");
        };
        let faces: Vec<Primitive> = stack.generate().into_iter().map(Primitive::from).collect();
        let bounds = geometry::bounds(&faces).unwrap();
        assert!(bounds.width() <= 640.0 && bounds.height() <= 384.0);
        assert!((bounds.center() - center).norm() < 1e-9);
    }
}

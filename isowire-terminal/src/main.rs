/// isowire terminal viewer
///
/// Renders the rotating torus wireframe or the isometric block stack as
/// ASCII art.
/// Controls:
///   - Mouse drag: Rotate the torus (hover mode: move to tilt)
///   - Space: Toggle auto-rotation
///   - Q/ESC: Quit
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use isowire_core::{InteractionMode, SceneConfig};
use isowire_terminal::{Result, ShapeKind, TerminalApp, TerminalError};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "isowire-terminal.log";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Drag,
    Hover,
}

impl From<ModeArg> for InteractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Drag => InteractionMode::Drag,
            ModeArg::Hover => InteractionMode::Hover,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "isowire-terminal",
    version,
    about = "Wireframe torus and isometric stack in the terminal"
)]
struct Args {
    /// Scene file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Diagram to show
    #[arg(long, value_enum, default_value_t = ShapeKind::Torus)]
    shape: ShapeKind,

    /// Override the scene's interaction mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

fn load_scene(path: Option<&PathBuf>) -> Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let source = fs::read_to_string(path).map_err(|source| TerminalError::SceneFile {
        path: path.clone(),
        source,
    })?;
    let scene = SceneConfig::from_toml_str(&source)?;
    tracing::info!(path = %path.display(), "loaded scene");
    Ok(scene)
}

fn init_logging() -> Result<()> {
    // The terminal is owned by the renderer, so logs go to a file
    let file = File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// `RUST_LOG` when it parses, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let mut scene = load_scene(args.scene.as_ref())?;
    if let Some(mode) = args.mode {
        scene.mode = mode.into();
    }

    let mut app = TerminalApp::new(scene, args.shape)?;
    app.run()?;

    tracing::info!("viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("isowire_core=trace")).to_string(),
            "isowire_core=trace"
        );
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("isowire_core=loud")).to_string(), "info");
    }
}

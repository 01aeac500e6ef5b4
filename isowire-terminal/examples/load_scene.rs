/// Example: Load a scene file and render it in the terminal
///
/// Usage: cargo run --example load_scene -- path/to/scene.toml [torus|stack]
use std::env;
use std::fs;

use isowire_core::SceneConfig;
use isowire_terminal::{Result, ShapeKind, TerminalApp, TerminalError};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let shape = match args.get(2).map(String::as_str) {
        Some("stack") => ShapeKind::Stack,
        _ => ShapeKind::Torus,
    };

    let scene = match args.get(1) {
        Some(path) => {
            println!("Loading scene file: {}", path);
            let source = fs::read_to_string(path).map_err(|source| TerminalError::SceneFile {
                path: path.into(),
                source,
            })?;
            SceneConfig::from_toml_str(&source)?
        }
        None => {
            eprintln!("Usage: {} <scene.toml> [torus|stack]", args[0]);
            eprintln!("\nNo scene file provided, using defaults...");
            SceneConfig::default()
        }
    };

    println!(
        "Torus: {} curves, stack: {} faces",
        scene.torus.curve_count(),
        scene.stack.generate().len()
    );
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, shape)?;
    app.run()?;

    println!("Thank you for using isowire!");
    Ok(())
}

/// painter3d terminal demo - rotating flat-shaded mesh
///
/// Usage: painter3d-terminal [MESH.obj|MESH.stl] [CONFIG.json]
///
/// Without a mesh a built-in cube is rendered. Set RUST_LOG for diagnostics.
/// Controls:
///   - P/Space: Pause the animation
///   - Q/ESC: Quit

use anyhow::Context as _;
use log::info;
use painter3d_core::{loader, Mesh, PipelineConfig};
use painter3d_terminal::TerminalApp;
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => {
            loader::load_mesh(path).with_context(|| format!("failed to load mesh from {path}"))?
        }
        None => {
            info!("no mesh given, using the built-in cube");
            Mesh::cube(2.0)
        }
    };

    let config = match args.get(2) {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to load pipeline config from {path}"))?,
        None => PipelineConfig::default(),
    };

    let mut app = TerminalApp::new(mesh, config)?;
    app.run()?;

    println!("Thank you for using painter3d!");
    Ok(())
}

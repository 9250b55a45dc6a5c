//! Animated Wireframe Scene Renderer
//!
//! Renders every frame of a scene loop to a numbered sequence of binary PGM
//! files (`frame_0000.pgm`, `frame_0001.pgm`, ...). Without a config file the
//! built-in two-ball demo is rendered; without a model file every object is a
//! soccer ball.
//!
//! Usage:
//!   cargo run --release --bin render_scene -- [--config scene.json] [--model mesh.obj] [--output-dir frames]
//!
//! Set `RUST_LOG=tiny3d=debug` for per-frame statistics.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use tiny3d::loader::load_obj;
use tiny3d::render::Model;
use tiny3d::scene::SceneConfig;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Animated wireframe scene renderer
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Renders an animated wireframe scene to a sequence of PGM frames",
    long_about = None
)]
struct Args {
    /// Scene description (JSON); defaults to the two-ball demo
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ model drawn for every object; defaults to a soccer ball
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory that receives the frames
    #[arg(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Override the scene's frame count
    #[arg(short, long)]
    frames: Option<usize>,

    /// Override the scene's line thickness in pixels
    #[arg(short, long)]
    thickness: Option<f32>,
}

fn load_scene(args: &Args) -> Result<SceneConfig> {
    let mut scene = match &args.config {
        Some(path) => SceneConfig::from_json_file(path)?,
        None => SceneConfig::default(),
    };

    if let Some(frames) = args.frames {
        scene.frames = frames;
    }
    if let Some(thickness) = args.thickness {
        scene.line_thickness = thickness;
    }
    scene.validate()?;
    Ok(scene)
}

fn load_model(path: Option<&Path>) -> Result<Model> {
    let model = match path {
        Some(path) => load_obj(path)?,
        None => Model::soccer_ball(),
    };
    if model.is_empty() {
        warn!("Model has no drawable edges; frames will only show the background");
    }
    let invalid = model.invalid_edge_count();
    if invalid > 0 {
        warn!(
            "{invalid} of {} edges reference missing vertices and will be skipped",
            model.edge_count()
        );
    }
    Ok(model)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let scene = load_scene(&args)?;
    let model = load_model(args.model.as_deref())?;

    fs::create_dir_all(&args.output_dir)?;

    println!(
        "Rendering {} frames ({}x{}, {} objects, {} edges each) to {}",
        scene.frames,
        scene.width,
        scene.height,
        scene.objects.len(),
        model.edge_count(),
        args.output_dir.display()
    );

    let start = Instant::now();
    let mut canvas = scene.create_canvas()?;
    let progress_every = (scene.frames / 10).max(1);

    for frame in 0..scene.frames {
        let stats = scene.render_frame(&mut canvas, &model, frame);

        let filename = args.output_dir.join(format!("frame_{frame:04}.pgm"));
        canvas.save_pgm(&filename)?;

        if frame % progress_every == 0 || frame + 1 == scene.frames {
            info!(
                "Frame {}/{}: {} edges drawn, {} skipped",
                frame + 1,
                scene.frames,
                stats.edges_drawn,
                stats.edges_skipped_index + stats.edges_skipped_invalid
            );
        }
    }

    println!(
        "Finished {} frames in {:.2?}",
        scene.frames,
        start.elapsed()
    );
    Ok(())
}

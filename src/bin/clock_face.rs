//! Line Drawing Test Pattern
//!
//! Draws 24 spokes at 15° steps from the canvas centre, a quick visual check
//! of line thickness and anti-aliasing at every slope.
//!
//! Usage:
//!   cargo run --bin clock_face -- [--width 400] [--height 300] [output.pgm]

use std::f32::consts::PI;
use std::path::PathBuf;

use clap::Parser;
use log::debug;
use tiny3d::canvas::Canvas;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Number of spokes in the pattern
const SPOKES: usize = 24;

/// Clock face line drawing test
#[derive(Parser, Debug)]
#[command(author, version, about = "Draws a 24-spoke line test pattern to a PGM file", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 400)]
    width: usize,

    #[arg(long, default_value_t = 300)]
    height: usize,

    /// Spoke thickness in pixels
    #[arg(short, long, default_value_t = 2.0)]
    thickness: f32,

    /// Output file
    #[arg(default_value = "clock_face.pgm")]
    output: PathBuf,
}

fn draw_clock_face(canvas: &mut Canvas, thickness: f32) {
    let cx = canvas.width() as f32 / 2.0;
    let cy = canvas.height() as f32 / 2.0;
    let length = canvas.width().min(canvas.height()) as f32 / 2.5;

    for i in 0..SPOKES {
        let angle = (i as f32 * 15.0) * PI / 180.0;
        let x = cx + length * angle.cos();
        let y = cy + length * angle.sin();
        debug!("Spoke {i}: ({cx:.1}, {cy:.1}) -> ({x:.1}, {y:.1})");
        canvas.draw_line(cx, cy, x, y, thickness, 1.0);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut canvas = Canvas::new(args.width, args.height)?;
    canvas.clear(0.0);
    draw_clock_face(&mut canvas, args.thickness);
    canvas.save_pgm(&args.output)?;

    println!(
        "Clock face ({}x{}, {} spokes) saved to {}",
        args.width,
        args.height,
        SPOKES,
        args.output.display()
    );
    Ok(())
}

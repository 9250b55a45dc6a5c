//! # Sub-pixel Rasterizing Canvas
//!
//! A `Canvas` is a `height × width` grid of `f32` intensities in [0, 1],
//! stored row-major in an `ndarray::Array2` and indexed `[[row, col]]`, i.e.
//! `[[y, x]]`. 0 is black and 1 is white.
//!
//! ## Sub-pixel plotting
//!
//! [`Canvas::plot`] splits a sample's intensity over the 2×2 block of cells
//! around it with bilinear weights that sum to exactly 1. Cells accumulate
//! additively and saturate at 1.
//!
//! ## Circular viewport
//!
//! An optional radius, centred on `(width / 2, height / 2)`, masks every
//! subsequent plot. Each target cell is tested by the distance of its integer
//! coordinate from the centre. A radius `<= 0` disables the mask.
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::canvas::Canvas;
//!
//! let mut canvas = Canvas::new(4, 4).unwrap();
//! canvas.plot(1.5, 1.0, 1.0);
//! assert_eq!(canvas.pixel(1, 1), Some(0.5));
//! assert_eq!(canvas.pixel(2, 1), Some(0.5));
//! ```

pub mod pgm;

use ndarray::Array2;

use crate::math::EPSILON;
use crate::{Result, Tiny3dError};

/// Spacing of brush samples used by [`Canvas::draw_line`]
pub const BRUSH_STEP: f32 = 0.5;

/// Floating-point grayscale drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: Array2<f32>,
    viewport_radius: f32,
}

impl Canvas {
    /// Creates a black canvas with the circular viewport disabled
    ///
    /// # Errors
    ///
    /// * [`Tiny3dError::InvalidDimensions`] if either dimension is zero
    /// * [`Tiny3dError::Allocation`] if the pixel buffer cannot be reserved
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Tiny3dError::InvalidDimensions { width, height });
        }

        let len = width
            .checked_mul(height)
            .ok_or_else(|| Tiny3dError::Allocation(format!("{width}x{height} overflows")))?;

        let mut buffer: Vec<f32> = Vec::new();
        buffer.try_reserve_exact(len).map_err(|e| {
            Tiny3dError::Allocation(format!("{width}x{height} canvas: {e}"))
        })?;
        buffer.resize(len, 0.0);

        let pixels = Array2::from_shape_vec((height, width), buffer)
            .map_err(|e| Tiny3dError::Allocation(e.to_string()))?;

        Ok(Canvas {
            pixels,
            viewport_radius: 0.0,
        })
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Read-only view of the intensity grid, indexed `[[y, x]]`
    pub fn pixels(&self) -> &Array2<f32> {
        &self.pixels
    }

    /// Intensity at integer coordinate `(x, y)`, or `None` outside the canvas
    pub fn pixel(&self, x: usize, y: usize) -> Option<f32> {
        self.pixels.get([y, x]).copied()
    }

    /// Sum of all intensities
    pub fn total_intensity(&self) -> f32 {
        self.pixels.sum()
    }

    /// Sets the clip radius used by all subsequent plots
    ///
    /// `radius <= 0` disables clipping. Pixels drawn earlier are not affected.
    pub fn set_circular_viewport(&mut self, radius: f32) {
        self.viewport_radius = radius;
    }

    pub fn viewport_radius(&self) -> f32 {
        self.viewport_radius
    }

    /// Fills every cell with `intensity`, clamped to [0, 1]
    pub fn clear(&mut self, intensity: f32) {
        self.pixels.fill(intensity.clamp(0.0, 1.0));
    }

    fn in_viewport(&self, px: usize, py: usize) -> bool {
        if self.viewport_radius <= 0.0 {
            return true;
        }
        let cx = self.width() as f32 / 2.0;
        let cy = self.height() as f32 / 2.0;
        let dx = px as f32 - cx;
        let dy = py as f32 - cy;
        dx * dx + dy * dy <= self.viewport_radius * self.viewport_radius
    }

    /// Adds `intensity` at sub-pixel position `(x, y)` with bilinear splitting
    ///
    /// With `x0 = floor(x)`, `fx = x - x0` (likewise for y), cell
    /// `(x0 + i, y0 + j)` receives `intensity * wx * wy`, where `wx` is
    /// `1 - fx` for `i = 0` and `fx` for `i = 1`. Cells outside the canvas or
    /// the active viewport are skipped; the rest saturate at 1.
    pub fn plot(&mut self, x: f32, y: f32, intensity: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let intensity = intensity.clamp(0.0, 1.0);

        let x0 = x.floor();
        let y0 = y.floor();
        // Neither neighbour can land on the canvas
        if x0 < -1.0 || y0 < -1.0 || x0 > self.width() as f32 || y0 > self.height() as f32 {
            return;
        }
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        for j in 0..2_i64 {
            for i in 0..2_i64 {
                let (px, py) = (x0 + i, y0 + j);
                if px < 0 || py < 0 {
                    continue;
                }
                let (px, py) = (px as usize, py as usize);
                if px >= self.width() || py >= self.height() || !self.in_viewport(px, py) {
                    continue;
                }

                let wx = if i == 0 { 1.0 - fx } else { fx };
                let wy = if j == 0 { 1.0 - fy } else { fy };

                let cell = &mut self.pixels[[py, px]];
                *cell = (*cell + intensity * wx * wy).clamp(0.0, 1.0);
            }
        }
    }

    /// Draws a thick anti-aliased segment from `(x0, y0)` to `(x1, y1)`
    ///
    /// The segment is walked with a DDA of `round(max(|dx|, |dy|))` steps. At
    /// each of the `steps + 1` positions a square brush of half-width
    /// `max(0.5, thickness / 2)` is stamped with [`Canvas::plot`] on a
    /// [`BRUSH_STEP`] grid. A segment with zero steps becomes a round dot of
    /// radius `thickness / 2`. Intensities below epsilon draw nothing.
    ///
    /// The brush half-width never exceeds the canvas diagonal, and only the
    /// part of the segment within reach of the canvas is walked.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        if intensity < EPSILON {
            return;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let span = dx.abs().max(dy.abs());
        if !span.is_finite() {
            return;
        }
        let diagonal = (self.width() as f32).hypot(self.height() as f32);

        if span.round() == 0.0 {
            let half = (thickness / 2.0).max(0.0).min(diagonal);
            let radius_sq = half * half;
            for oy in brush_offsets(half) {
                for ox in brush_offsets(half) {
                    if ox * ox + oy * oy <= radius_sq {
                        self.plot(x0 + ox, y0 + oy, intensity);
                    }
                }
            }
            return;
        }

        let half = (thickness / 2.0).max(0.5).min(diagonal);
        let margin = half + 1.0;
        let reach = (
            (-margin, -margin),
            (self.width() as f32 + margin, self.height() as f32 + margin),
        );
        let Some([x0, y0, x1, y1]) = clip_segment([x0, y0, x1, y1], reach) else {
            return;
        };

        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).round() as usize;
        let x_inc = if steps == 0 { 0.0 } else { dx / steps as f32 };
        let y_inc = if steps == 0 { 0.0 } else { dy / steps as f32 };

        for step in 0..=steps {
            let x = x0 + x_inc * step as f32;
            let y = y0 + y_inc * step as f32;
            for oy in brush_offsets(half) {
                for ox in brush_offsets(half) {
                    self.plot(x + ox, y + oy, intensity);
                }
            }
        }
    }
}

/// Liang-Barsky clip of segment `[x0, y0, x1, y1]` to the rectangle
/// `(min, max)`
///
/// Returns `None` when the segment misses the rectangle. Endpoints already
/// inside are returned unchanged.
fn clip_segment(segment: [f32; 4], (min, max): ((f32, f32), (f32, f32))) -> Option<[f32; 4]> {
    let [x0, y0, x1, y1] = segment;
    let dx = x1 - x0;
    let dy = y1 - y0;

    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for (p, q) in [(-dx, x0 - min.0), (dx, max.0 - x0), (-dy, y0 - min.1), (dy, max.1 - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let (sx, sy) = if t0 > 0.0 { (x0 + t0 * dx, y0 + t0 * dy) } else { (x0, y0) };
    let (ex, ey) = if t1 < 1.0 { (x0 + t1 * dx, y0 + t1 * dy) } else { (x1, y1) };
    Some([sx, sy, ex, ey])
}

/// Offsets `-half, -half + 0.5, ...` up to and including `half`
fn brush_offsets(half: f32) -> impl Iterator<Item = f32> {
    let count = ((2.0 * half) / BRUSH_STEP + 1e-4).floor() as usize;
    (0..=count).map(move |k| -half + k as f32 * BRUSH_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn lit_cells(canvas: &Canvas) -> Vec<(usize, usize)> {
        canvas
            .pixels()
            .indexed_iter()
            .filter(|(_, v)| **v > 0.0)
            .map(|((y, x), _)| (x, y))
            .collect()
    }

    #[rstest]
    #[case(0, 10)]
    #[case(10, 0)]
    #[case(0, 0)]
    fn test_invalid_dimensions(#[case] width: usize, #[case] height: usize) {
        let err = Canvas::new(width, height).unwrap_err();
        assert!(matches!(err, Tiny3dError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(7, 3).unwrap();
        assert_eq!(canvas.width(), 7);
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.total_intensity(), 0.0);
        assert_eq!(canvas.viewport_radius(), 0.0);
    }

    #[test]
    fn test_clear_sets_every_cell() {
        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.clear(0.25);
        assert!(canvas.pixels().iter().all(|v| *v == 0.25));
        canvas.clear(3.0);
        assert!(canvas.pixels().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_plot_integer_no_bleed() {
        let mut canvas = Canvas::new(6, 6).unwrap();
        canvas.plot(2.0, 3.0, 0.7);
        assert_eq!(lit_cells(&canvas), vec![(2, 3)]);
        assert_abs_diff_eq!(canvas.pixel(2, 3).unwrap(), 0.7);
    }

    #[test]
    fn test_plot_bilinear_weights() {
        let mut canvas = Canvas::new(6, 6).unwrap();
        canvas.plot(1.25, 2.5, 1.0);
        assert_abs_diff_eq!(canvas.pixel(1, 2).unwrap(), 0.375, epsilon = 1e-6);
        assert_abs_diff_eq!(canvas.pixel(2, 2).unwrap(), 0.125, epsilon = 1e-6);
        assert_abs_diff_eq!(canvas.pixel(1, 3).unwrap(), 0.375, epsilon = 1e-6);
        assert_abs_diff_eq!(canvas.pixel(2, 3).unwrap(), 0.125, epsilon = 1e-6);
        assert_abs_diff_eq!(canvas.total_intensity(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_plot_energy_conservation() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        let samples = [(3.1, 4.7, 0.2), (10.9, 2.3, 0.4), (15.5, 15.5, 0.3)];
        for (x, y, i) in samples {
            canvas.plot(x, y, i);
        }
        assert_abs_diff_eq!(canvas.total_intensity(), 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_plot_saturates() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        for _ in 0..5 {
            canvas.plot(1.0, 1.0, 0.4);
        }
        assert_eq!(canvas.pixel(1, 1), Some(1.0));
    }

    #[test]
    fn test_plot_clamps_intensity() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        canvas.plot(0.0, 0.0, 4.0);
        canvas.plot(2.0, 2.0, -1.0);
        assert_eq!(canvas.pixel(0, 0), Some(1.0));
        assert_eq!(canvas.pixel(2, 2), Some(0.0));
    }

    #[test]
    fn test_plot_out_of_bounds_is_partial() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.plot(-0.5, 0.0, 1.0);
        assert_abs_diff_eq!(canvas.pixel(0, 0).unwrap(), 0.5);
        assert_abs_diff_eq!(canvas.total_intensity(), 0.5);

        canvas.plot(100.0, -100.0, 1.0);
        canvas.plot(f32::NAN, 1.0, 1.0);
        assert_abs_diff_eq!(canvas.total_intensity(), 0.5);
    }

    #[test]
    fn test_plot_far_off_canvas_is_ignored() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.plot(1.0e19, 0.0, 1.0);
        canvas.plot(-1.0e19, 0.0, 1.0);
        canvas.plot(0.0, 1.0e19, 1.0);
        canvas.plot(f32::MAX, f32::MAX, 1.0);
        canvas.plot(f32::MIN, 2.0, 1.0);
        assert_eq!(canvas.total_intensity(), 0.0);

        // Just past the low edges the far neighbour still lands
        canvas.plot(-0.5, 0.0, 1.0);
        canvas.plot(0.0, -0.5, 1.0);
        assert_abs_diff_eq!(canvas.total_intensity(), 1.0);
    }

    #[test]
    fn test_circular_viewport_masks_plots() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_circular_viewport(3.0);

        canvas.plot(0.0, 0.0, 1.0);
        assert_eq!(canvas.total_intensity(), 0.0);

        canvas.plot(5.0, 5.0, 1.0);
        assert_eq!(canvas.pixel(5, 5), Some(1.0));

        // Boundary cell at exactly the radius is kept
        canvas.plot(8.0, 5.0, 1.0);
        assert_eq!(canvas.pixel(8, 5), Some(1.0));
        canvas.plot(9.0, 5.0, 1.0);
        assert_eq!(canvas.pixel(9, 5), Some(0.0));
    }

    #[test]
    fn test_viewport_change_is_not_retroactive() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.plot(0.0, 0.0, 1.0);
        canvas.set_circular_viewport(2.0);
        assert_eq!(canvas.pixel(0, 0), Some(1.0));
        canvas.set_circular_viewport(-1.0);
        canvas.plot(9.0, 9.0, 1.0);
        assert_eq!(canvas.pixel(9, 9), Some(1.0));
    }

    #[test]
    fn test_horizontal_line_coverage() {
        let mut canvas = Canvas::new(20, 10).unwrap();
        canvas.draw_line(2.0, 5.0, 12.0, 5.0, 1.0, 1.0);
        for x in 2..=12 {
            assert!(canvas.pixel(x, 5).unwrap() > 0.0, "gap at x={x}");
        }
        assert_eq!(canvas.pixel(0, 5), Some(0.0));
        assert_eq!(canvas.pixel(15, 5), Some(0.0));
        assert_eq!(canvas.pixel(7, 0), Some(0.0));
        assert_eq!(canvas.pixel(7, 9), Some(0.0));
    }

    #[test]
    fn test_thicker_line_covers_more() {
        let mut thin = Canvas::new(30, 30).unwrap();
        let mut thick = Canvas::new(30, 30).unwrap();
        thin.draw_line(5.0, 5.0, 25.0, 20.0, 1.0, 0.05);
        thick.draw_line(5.0, 5.0, 25.0, 20.0, 5.0, 0.05);
        assert!(lit_cells(&thick).len() > lit_cells(&thin).len());
    }

    #[test]
    fn test_degenerate_line_is_round_dot() {
        let mut canvas = Canvas::new(21, 21).unwrap();
        let thickness = 6.0;
        canvas.draw_line(10.0, 10.0, 10.0, 10.0, thickness, 0.1);

        assert!(canvas.pixel(10, 10).unwrap() > 0.0);
        let half = thickness / 2.0;
        for (x, y) in lit_cells(&canvas) {
            let dx = x as f32 - 10.0;
            let dy = y as f32 - 10.0;
            // One cell of bilinear bleed is the sampling resolution
            assert!((dx * dx + dy * dy).sqrt() <= half + 1.0, "({x}, {y}) outside dot");
        }
        // Corners of the bounding square stay dark
        assert_eq!(canvas.pixel(13, 13), Some(0.0));
        assert_eq!(canvas.pixel(7, 7), Some(0.0));
    }

    #[test]
    fn test_zero_intensity_line_draws_nothing() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.draw_line(0.0, 0.0, 9.0, 9.0, 2.0, 0.0);
        assert_eq!(canvas.total_intensity(), 0.0);
    }

    #[test]
    fn test_line_to_far_point_covers_visible_part() {
        let mut canvas = Canvas::new(100, 100).unwrap();
        let start = std::time::Instant::now();
        canvas.draw_line(10.0, 50.0, 1.0e9, 50.0, 1.0, 1.0);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        for x in 10..100 {
            assert!(canvas.pixel(x, 50).unwrap() > 0.0, "gap at x = {x}");
        }
        for (x, y) in lit_cells(&canvas) {
            assert!(x >= 9 && (49..=51).contains(&y), "stray cell ({x}, {y})");
        }
    }

    #[test]
    fn test_line_entirely_off_canvas_draws_nothing() {
        let mut canvas = Canvas::new(50, 50).unwrap();
        canvas.draw_line(-1.0e9, -20.0, 1.0e9, -20.0, 2.0, 1.0);
        canvas.draw_line(80.0, -1.0e9, 80.0, 1.0e9, 2.0, 1.0);
        assert_eq!(canvas.total_intensity(), 0.0);
    }

    #[test]
    fn test_clip_segment() {
        let rect = ((0.0, 0.0), (10.0, 10.0));
        assert_eq!(clip_segment([1.0, 2.0, 3.0, 4.0], rect), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(clip_segment([-5.0, 5.0, 15.0, 5.0], rect), Some([0.0, 5.0, 10.0, 5.0]));
        assert_eq!(clip_segment([-5.0, -1.0, 15.0, -1.0], rect), None);
        assert_eq!(clip_segment([11.0, 0.0, 20.0, 10.0], rect), None);
    }

    #[test]
    fn test_huge_thickness_is_capped() {
        let mut canvas = Canvas::new(8, 6).unwrap();
        let start = std::time::Instant::now();
        canvas.draw_line(4.0, 3.0, 4.0, 3.0, 1.0e6, 1.0);
        canvas.draw_line(0.0, 0.0, 7.0, 5.0, 1.0e6, 1.0);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert!(canvas.pixels().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_brush_offsets() {
        let offsets: Vec<f32> = brush_offsets(1.0).collect();
        assert_eq!(offsets, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);

        let single: Vec<f32> = brush_offsets(0.0).collect();
        assert_eq!(single, vec![0.0]);
    }
}

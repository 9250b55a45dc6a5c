//! # Wireframe Render Pipeline
//!
//! Takes a [`Model`] through model, view and projection matrices onto a
//! drawing surface as anti-aliased lines.
//!
//! ## Pipeline
//!
//! 1. Every vertex is projected once with [`project_vertex`]: local → world →
//!    camera → clip space, then perspective divide and viewport mapping.
//! 2. Edges with an out-of-range index or a behind-the-eye endpoint are
//!    skipped with a warning. Endpoints that are merely outside the frustum
//!    still draw; the canvas clips them.
//! 3. Surviving edges are ordered back to front by the mean camera-space depth
//!    of their endpoints. The camera looks down -Z, so the most negative depth
//!    is drawn first. This is a painter's approximation and can mis-order
//!    edges that cross each other.
//! 4. Each edge gets an intensity from the directional lights, using its
//!    normalized world-space direction in place of a surface normal.
//! 5. The edge is handed to a [`LineTarget`], normally a [`Canvas`].
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::canvas::Canvas;
//! use tiny3d::math::Matrix4;
//! use tiny3d::render::{render_wireframe, Model, Transforms};
//!
//! let mut canvas = Canvas::new(64, 64).unwrap();
//! let transforms = Transforms::new(
//!     Matrix4::identity(),
//!     Matrix4::translate(0.0, 0.0, -5.0),
//!     Matrix4::perspective(60f32.to_radians(), 1.0, 0.1, 100.0),
//! );
//! let stats = render_wireframe(&mut canvas, &Model::cube(1.0), &transforms, &[], 0.0, 1.0);
//! assert_eq!(stats.edges_drawn, 12);
//! assert!(canvas.total_intensity() > 0.0);
//! ```

pub mod lighting;
pub mod model;

pub use lighting::{total_lighting_intensity, Light, LightKind};
pub use model::Model;

use log::{debug, warn};

use crate::canvas::Canvas;
use crate::math::{Matrix4, Vector3, EPSILON};

/// Screen coordinate given to vertices that cannot be projected
pub const INVALID_SENTINEL: f32 = -10000.0;

/// Clip classification of a projected vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipState {
    /// Inside the canonical NDC cube
    Inside,
    /// Projectable, but at least one NDC component lies outside [-1, 1]
    OutsideFrustum,
    /// Behind the eye or degenerate (`w < epsilon`); never drawn
    Invalid,
}

/// A vertex after projection to screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    /// Screen x in pixels, 0 at the left edge
    pub x: f32,
    /// Screen y in pixels, 0 at the top edge
    pub y: f32,
    /// Camera-space z; more negative is farther from the eye
    pub depth: f32,
    pub clip: ClipState,
}

impl ProjectedVertex {
    pub fn is_valid(&self) -> bool {
        self.clip != ClipState::Invalid
    }
}

/// The three matrices a render call composes, outermost last
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transforms {
    pub model: Matrix4,
    pub view: Matrix4,
    pub projection: Matrix4,
}

impl Transforms {
    pub fn new(model: Matrix4, view: Matrix4, projection: Matrix4) -> Self {
        Transforms {
            model,
            view,
            projection,
        }
    }
}

/// Counters describing one [`render_wireframe`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub vertices_projected: usize,
    pub edges_drawn: usize,
    /// Edges with an index outside the vertex list
    pub edges_skipped_index: usize,
    /// Edges with a behind-the-eye endpoint
    pub edges_skipped_invalid: usize,
}

impl std::ops::AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: RenderStats) {
        self.vertices_projected += rhs.vertices_projected;
        self.edges_drawn += rhs.edges_drawn;
        self.edges_skipped_index += rhs.edges_skipped_index;
        self.edges_skipped_invalid += rhs.edges_skipped_invalid;
    }
}

/// A surface that thick anti-aliased lines can be drawn onto
pub trait LineTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_circular_viewport(&mut self, radius: f32);
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, intensity: f32);
}

impl LineTarget for Canvas {
    fn width(&self) -> usize {
        Canvas::width(self)
    }

    fn height(&self) -> usize {
        Canvas::height(self)
    }

    fn set_circular_viewport(&mut self, radius: f32) {
        Canvas::set_circular_viewport(self, radius);
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, intensity: f32) {
        Canvas::draw_line(self, x0, y0, x1, y1, thickness, intensity);
    }
}

/// Projects a model-space vertex to screen space
///
/// # Arguments
///
/// * `vertex` - Position in model (local) space
/// * `model`, `view`, `projection` - Local → world, world → camera and
///   camera → clip matrices
/// * `screen_width`, `screen_height` - Target size in pixels
///
/// # Returns
///
/// The screen position with camera-space depth. If the clip-space `w` is below
/// epsilon the vertex is [`ClipState::Invalid`] and placed at
/// [`INVALID_SENTINEL`].
pub fn project_vertex(
    vertex: &Vector3,
    model: &Matrix4,
    view: &Matrix4,
    projection: &Matrix4,
    screen_width: f32,
    screen_height: f32,
) -> ProjectedVertex {
    let world = model.transform_point(vertex);
    let camera = view.transform_point(&world);
    let [cx, cy, cz, cw] = projection.transform_homogeneous(camera.x(), camera.y(), camera.z(), 1.0);

    if cw < EPSILON {
        return ProjectedVertex {
            x: INVALID_SENTINEL,
            y: INVALID_SENTINEL,
            depth: camera.z(),
            clip: ClipState::Invalid,
        };
    }

    let ndc = [cx / cw, cy / cw, cz / cw];
    let clip = if ndc.iter().all(|c| (-1.0..=1.0).contains(c)) {
        ClipState::Inside
    } else {
        ClipState::OutsideFrustum
    };

    ProjectedVertex {
        x: (ndc[0] + 1.0) / 2.0 * screen_width,
        y: (1.0 - ndc[1]) / 2.0 * screen_height,
        depth: camera.z(),
        clip,
    }
}

/// An edge that survived culling, with its sort key
struct DrawableEdge {
    a: usize,
    b: usize,
    depth: f32,
}

/// Draws `model` as a depth-ordered, lit wireframe
///
/// # Arguments
///
/// * `target` - Surface to draw on; its size defines the screen mapping
/// * `model` - Vertices and edges to draw
/// * `transforms` - Model, view and projection matrices
/// * `lights` - Directional lights; an empty slice draws every edge at 1.0
/// * `viewport_radius` - Circular clip radius set on the target, `<= 0` disables
/// * `thickness` - Line thickness in pixels
///
/// # Returns
///
/// Counters for projected vertices and drawn/skipped edges. A model without
/// vertices or edges is a no-op that leaves the target untouched.
pub fn render_wireframe<T: LineTarget + ?Sized>(
    target: &mut T,
    model: &Model,
    transforms: &Transforms,
    lights: &[Light],
    viewport_radius: f32,
    thickness: f32,
) -> RenderStats {
    let mut stats = RenderStats::default();
    if model.is_empty() {
        return stats;
    }

    target.set_circular_viewport(viewport_radius);

    let screen_width = target.width() as f32;
    let screen_height = target.height() as f32;

    let projected: Vec<ProjectedVertex> = model
        .vertices
        .iter()
        .map(|v| {
            project_vertex(
                v,
                &transforms.model,
                &transforms.view,
                &transforms.projection,
                screen_width,
                screen_height,
            )
        })
        .collect();
    stats.vertices_projected = projected.len();

    let mut edges = Vec::with_capacity(model.edges.len());
    for (i, edge) in model.edges.iter().enumerate() {
        if !model.edge_in_range(edge) {
            warn!(
                "Edge {i} ({} -> {}) references a vertex outside 0..{}, skipped",
                edge[0],
                edge[1],
                projected.len()
            );
            stats.edges_skipped_index += 1;
            continue;
        }

        let [a, b] = *edge;
        let (pa, pb) = (&projected[a], &projected[b]);
        if !pa.is_valid() || !pb.is_valid() {
            warn!("Edge {i} ({a} -> {b}) has an endpoint behind the eye, skipped");
            stats.edges_skipped_invalid += 1;
            continue;
        }

        edges.push(DrawableEdge {
            a,
            b,
            depth: (pa.depth + pb.depth) / 2.0,
        });
    }

    // Stable, so equal depths keep model order
    edges.sort_by(|e1, e2| e1.depth.total_cmp(&e2.depth));

    let world: Vec<Vector3> = if lights.is_empty() {
        Vec::new()
    } else {
        model
            .vertices
            .iter()
            .map(|v| transforms.model.transform_point(v))
            .collect()
    };

    for edge in &edges {
        let intensity = if lights.is_empty() {
            1.0
        } else {
            let direction = (world[edge.b] - world[edge.a]).normalized();
            total_lighting_intensity(&direction, lights)
        };

        let (pa, pb) = (&projected[edge.a], &projected[edge.b]);
        target.draw_line(pa.x, pa.y, pb.x, pb.y, thickness, intensity);
        stats.edges_drawn += 1;
    }

    debug!(
        "Rendered {} edges from {} vertices ({} bad index, {} behind eye)",
        stats.edges_drawn,
        stats.vertices_projected,
        stats.edges_skipped_index,
        stats.edges_skipped_invalid
    );

    stats
}

//! Wireframe models: vertices plus index pairs.

use log::warn;

use crate::loader;
use crate::math::Vector3;

/// Polygon data for a truncated icosahedron of circumradius ~1.02
pub const SOCCER_BALL_OBJ: &str = include_str!("soccer_ball.obj");

/// A vertex list and the edges connecting them
///
/// Each edge indexes into `vertices`. Loaders only produce in-range indices;
/// hand-built models may not, and the renderer skips any edge that is out of
/// range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub vertices: Vec<Vector3>,
    pub edges: Vec<[usize; 2]>,
}

impl Model {
    pub fn new(vertices: Vec<Vector3>, edges: Vec<[usize; 2]>) -> Self {
        Model { vertices, edges }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.edges.is_empty()
    }

    /// Whether both endpoints of `edge` reference existing vertices
    pub fn edge_in_range(&self, edge: &[usize; 2]) -> bool {
        edge.iter().all(|&i| i < self.vertices.len())
    }

    /// Number of edges with at least one out-of-range index
    pub fn invalid_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !self.edge_in_range(e)).count()
    }

    /// Axis-aligned cube centred on the origin: 8 vertices, 12 edges
    pub fn cube(half_size: f32) -> Self {
        let s = half_size;
        let vertices = [
            [-s, -s, -s],
            [s, -s, -s],
            [s, s, -s],
            [-s, s, -s],
            [-s, -s, s],
            [s, -s, s],
            [s, s, s],
            [-s, s, s],
        ]
        .into_iter()
        .map(Vector3::from)
        .collect();

        #[rustfmt::skip]
        let edges = vec![
            [0, 1], [1, 2], [2, 3], [3, 0],
            [4, 5], [5, 6], [6, 7], [7, 4],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ];

        Model { vertices, edges }
    }

    /// Truncated icosahedron built from [`SOCCER_BALL_OBJ`]
    ///
    /// Every face contributes its own wrapped edges, so each shared edge
    /// appears twice (180 edges over 60 vertices). Falls back to a unit cube if
    /// the embedded data cannot be parsed.
    pub fn soccer_ball() -> Self {
        match loader::parse_obj(SOCCER_BALL_OBJ) {
            Ok(model) => model,
            Err(e) => {
                warn!("Embedded soccer ball data failed to load ({e}), using a cube");
                Model::cube(1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_topology() {
        let cube = Model::cube(1.0);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.edge_count(), 12);
        assert_eq!(cube.invalid_edge_count(), 0);

        // Every edge has length 2 on exactly one axis
        for [a, b] in &cube.edges {
            let d = cube.vertices[*b] - cube.vertices[*a];
            assert_eq!(d.magnitude(), 2.0);
        }
    }

    #[test]
    fn test_soccer_ball_topology() {
        let ball = Model::soccer_ball();
        assert_eq!(ball.vertex_count(), 60);
        assert_eq!(ball.edge_count(), 180);
        assert_eq!(ball.invalid_edge_count(), 0);

        for v in &ball.vertices {
            assert!((v.r() - 1.021).abs() < 0.01, "vertex off sphere: {}", v.r());
        }

        let mut unique: Vec<[usize; 2]> = ball
            .edges
            .iter()
            .map(|&[a, b]| [a.min(b), a.max(b)])
            .collect();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 90);
    }

    #[test]
    fn test_invalid_edges_detected() {
        let model = Model::new(
            vec![Vector3::ZERO, Vector3::from_cartesian(1.0, 0.0, 0.0)],
            vec![[0, 1], [1, 2], [5, 0]],
        );
        assert_eq!(model.invalid_edge_count(), 2);
        assert!(!model.is_empty());
        assert!(Model::default().is_empty());
    }
}

//! # Polygon Model Loader
//!
//! Reads the vertex/face subset of the Wavefront OBJ text format and expands it
//! into a wireframe [`Model`].
//!
//! ## Recognized lines
//!
//! - `v x y z` - one vertex; extra components (e.g. `w`) are ignored
//! - `f a b c ...` - one polygon with at least three one-based vertex indices.
//!   Tokens of the form `a/t/n` or `a//n` use their leading index.
//!
//! Everything else (comments, `vt`, `vn`, `g`, `o`, `s`, `usemtl`, `mtllib`)
//! is ignored.
//!
//! ## Edge expansion
//!
//! A face with N indices becomes N edges joining consecutive indices and
//! wrapping from the last back to the first. Indices are converted to
//! zero-based and checked against the total vertex count once the whole source
//! has been read; out-of-range edges are dropped with a warning.
//!
//! ## Examples
//!
//! ```rust
//! use tiny3d::loader::parse_obj;
//!
//! let model = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
//! assert_eq!(model.vertex_count(), 3);
//! assert_eq!(model.edges, vec![[0, 1], [1, 2], [2, 0]]);
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::math::Vector3;
use crate::render::Model;
use crate::{Result, Tiny3dError};

/// A face as read from the source, before index validation
struct RawFace {
    line: usize,
    indices: Vec<i64>,
}

/// Parses OBJ text into a model
///
/// # Errors
///
/// [`Tiny3dError::EmptyModel`] if the source contains no vertices. Malformed
/// lines and bad indices are not errors; they are skipped with a warning.
pub fn parse_obj(source: &str) -> Result<Model> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (line_idx, raw_line) in source.lines().enumerate() {
        let line_no = line_idx + 1;
        let mut tokens = raw_line.split_whitespace();

        match tokens.next() {
            Some("v") => match parse_vertex(tokens) {
                Some(v) => vertices.push(v),
                None => warn!("OBJ line {line_no}: malformed vertex '{}', skipped", raw_line.trim()),
            },
            Some("f") => {
                let indices: Vec<i64> = tokens.filter_map(parse_face_index).collect();
                if indices.len() >= 3 {
                    faces.push(RawFace {
                        line: line_no,
                        indices,
                    });
                } else {
                    debug!("OBJ line {line_no}: face with fewer than 3 indices ignored");
                }
            }
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(Tiny3dError::EmptyModel);
    }

    let vertex_count = vertices.len();
    let mut edges = Vec::new();
    let mut skipped = 0usize;

    for face in &faces {
        let n = face.indices.len();
        for i in 0..n {
            let a = to_zero_based(face.indices[i], vertex_count);
            let b = to_zero_based(face.indices[(i + 1) % n], vertex_count);
            match (a, b) {
                (Some(a), Some(b)) => edges.push([a, b]),
                _ => {
                    skipped += 1;
                    warn!(
                        "OBJ line {}: edge {} -> {} outside 1..={vertex_count}, skipped",
                        face.line,
                        face.indices[i],
                        face.indices[(i + 1) % n]
                    );
                }
            }
        }
    }

    info!(
        "Loaded model: {} vertices, {} edges ({} skipped)",
        vertex_count,
        edges.len(),
        skipped
    );

    Ok(Model::new(vertices, edges))
}

/// Reads and parses an OBJ file
///
/// # Errors
///
/// [`Tiny3dError::Io`] if the file cannot be read, [`Tiny3dError::Parse`] if
/// it is not UTF-8 text, otherwise as [`parse_obj`].
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Model> {
    let bytes = fs::read(path.as_ref())?;
    let source = std::str::from_utf8(&bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        Tiny3dError::Parse {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: format!("invalid UTF-8: {e}"),
        }
    })?;
    parse_obj(source)
}

fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vector3> {
    let mut coord = || tokens.next().and_then(|t| t.parse::<f32>().ok());
    let (x, y, z) = (coord()?, coord()?, coord()?);
    Some(Vector3::from_cartesian(x, y, z))
}

fn parse_face_index(token: &str) -> Option<i64> {
    token.split('/').next().and_then(|t| t.parse().ok())
}

fn to_zero_based(index: i64, vertex_count: usize) -> Option<usize> {
    let zero_based = usize::try_from(index.checked_sub(1)?).ok()?;
    (zero_based < vertex_count).then_some(zero_based)
}

//! CPU triangulation of synthetic topologies
//!
//! Fans and polygons become `(v0, v[i-1], v[i])` triangles; quads become
//! `(q0, q1, q2), (q2, q3, q0)` with an incomplete trailing quad dropped.

use super::render_state::ImmediateTopology;

/// Triangulate the vertex sequence `0..vertex_count`, appending to `out`.
///
/// Returns the number of indices appended.
pub fn triangulate_range(topology: ImmediateTopology, vertex_count: u32, out: &mut Vec<u32>) -> u32 {
    let before = out.len();
    match topology {
        ImmediateTopology::TriangleFan | ImmediateTopology::Polygon => {
            if vertex_count >= 3 {
                out.reserve(3 * (vertex_count as usize - 2));
                for i in 2..vertex_count {
                    out.extend_from_slice(&[0, i - 1, i]);
                }
            }
        }
        ImmediateTopology::Quads => {
            let quads = vertex_count / 4;
            out.reserve(6 * quads as usize);
            for quad in 0..quads {
                let q = quad * 4;
                out.extend_from_slice(&[q, q + 1, q + 2, q + 2, q + 3, q]);
            }
        }
        _ => {}
    }
    (out.len() - before) as u32
}

/// Triangulate a caller-supplied index list, appending to `out`.
///
/// Native topologies are copied unchanged. Returns the number of indices appended.
pub fn triangulate_indices(topology: ImmediateTopology, indices: &[u32], out: &mut Vec<u32>) -> u32 {
    let before = out.len();
    match topology {
        ImmediateTopology::TriangleFan | ImmediateTopology::Polygon => {
            if indices.len() >= 3 {
                for i in 2..indices.len() {
                    out.extend_from_slice(&[indices[0], indices[i - 1], indices[i]]);
                }
            }
        }
        ImmediateTopology::Quads => {
            for quad in indices.chunks_exact(4) {
                out.extend_from_slice(&[quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]);
            }
        }
        _ => out.extend_from_slice(indices),
    }
    (out.len() - before) as u32
}

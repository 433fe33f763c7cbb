//! Primal simplicial complexes (delta sets) in one and two dimensions.
//!
//! Mirrors the way the teacher's `SimplicialComplex` keeps a dense id space
//! plus a lookup index, but replaces the vertex-set representation of a
//! simplex with explicit face-map attributes on a [`RelStore`], since here
//! face maps (not just vertex membership) carry orientation and must
//! satisfy the simplicial identities of spec.md §3.

use crate::error::{DecError, Result};
use crate::euclidean::Point;
use crate::relstore::RelStore;
use crate::Dim;
use itertools::Itertools;

const V: &str = "V";
const E: &str = "E";
const TRI: &str = "Tri";
const E_SRC: &str = "e_src";
const E_TGT: &str = "e_tgt";
const T_E0: &str = "t_e0";
const T_E1: &str = "t_e1";
const T_E2: &str = "t_e2";

/// An ordered simplicial complex of dimension 1 or 2, optionally carrying
/// per-edge/per-triangle orientation and per-vertex coordinates.
///
/// Mutation (`add_*`/`glue_*`) is only valid before a dual complex is built
/// from it; [`crate::dual::DualComplex::build`] takes a shared reference and
/// the frozen discipline is enforced by that borrow living for the dual
/// complex's lifetime (spec.md §5).
#[derive(Debug, Clone)]
pub struct PrimalComplex {
    max_dim: Dim,
    store: RelStore,
    edge_orientation: Vec<bool>,
    tri_orientation: Vec<bool>,
    points: Vec<Option<Point>>,
}

impl PrimalComplex {
    /// A 1-dimensional complex (vertices and edges only).
    pub fn new_1d() -> Self {
        PrimalComplex {
            max_dim: Dim::One,
            store: RelStore::new(),
            edge_orientation: Vec::new(),
            tri_orientation: Vec::new(),
            points: Vec::new(),
        }
    }

    /// A 2-dimensional complex (vertices, edges, and triangles).
    pub fn new_2d() -> Self {
        PrimalComplex {
            max_dim: Dim::Two,
            store: RelStore::new(),
            edge_orientation: Vec::new(),
            tri_orientation: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn max_dim(&self) -> Dim {
        self.max_dim
    }

    pub fn num_vertices(&self) -> usize {
        self.store.num_parts(V)
    }

    pub fn num_edges(&self) -> usize {
        self.store.num_parts(E)
    }

    pub fn num_triangles(&self) -> usize {
        self.store.num_parts(TRI)
    }

    // --- mutators -----------------------------------------------------

    pub fn add_vertex(&mut self) -> usize {
        let id = self.store.add_part(V);
        self.points.push(None);
        id
    }

    pub fn add_vertices(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.add_vertex()).collect()
    }

    /// Attach an embedding point to an existing vertex.
    pub fn set_point(&mut self, v: usize, point: Point) {
        self.points[v] = Some(point);
    }

    pub fn point(&self, v: usize) -> Option<&Point> {
        self.points[v].as_ref()
    }

    pub fn is_embedded(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(Option::is_some)
    }

    /// Append an edge `src -> tgt` with orientation `true` (+1).
    pub fn add_edge(&mut self, src: usize, tgt: usize) -> usize {
        self.add_edge_oriented(src, tgt, true)
    }

    pub fn add_edge_oriented(&mut self, src: usize, tgt: usize, orientation: bool) -> usize {
        let e = self.store.add_part(E);
        self.store.set_subpart(E_SRC, e, src, true);
        self.store.set_subpart(E_TGT, e, tgt, true);
        debug_assert_eq!(self.edge_orientation.len(), e);
        self.edge_orientation.push(orientation);
        e
    }

    /// `add_edge(min(a, b), max(a, b))`.
    pub fn add_sorted_edge(&mut self, a: usize, b: usize) -> usize {
        self.add_edge(a.min(b), a.max(b))
    }

    pub fn edge_src(&self, e: usize) -> usize {
        self.store.subpart(E_SRC, e).expect("edge without src")
    }

    pub fn edge_tgt(&self, e: usize) -> usize {
        self.store.subpart(E_TGT, e).expect("edge without tgt")
    }

    pub fn edge_orientation(&self, e: usize) -> bool {
        self.edge_orientation[e]
    }

    pub fn set_edge_orientation(&mut self, e: usize, orientation: bool) {
        self.edge_orientation[e] = orientation;
    }

    /// All edges with endpoints `{a, b}`, in either direction.
    pub fn edges(&self, a: usize, b: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .store
            .incident(E_SRC, a)
            .iter()
            .copied()
            .filter(|&e| self.edge_tgt(e) == b)
            .collect();
        out.extend(
            self.store
                .incident(E_SRC, b)
                .iter()
                .copied()
                .filter(|&e| self.edge_tgt(e) == a),
        );
        out
    }

    /// Edges with a specific `src -> tgt` direction.
    fn edge_from_to(&self, src: usize, tgt: usize) -> Option<usize> {
        self.store
            .incident(E_SRC, src)
            .iter()
            .copied()
            .find(|&e| self.edge_tgt(e) == tgt)
    }

    /// Raw triangle constructor: `∂e2 = e_first`, `∂e0 = e_last`,
    /// `∂e1 = tgt_edge`. Debug builds assert the simplicial identities of
    /// spec.md §3; release builds do not (`add_triangle` accepts the
    /// caller's responsibility per spec).
    pub fn add_triangle(&mut self, e_first: usize, e_last: usize, tgt_edge: usize) -> usize {
        self.add_triangle_oriented(e_first, e_last, tgt_edge, true)
    }

    pub fn add_triangle_oriented(
        &mut self,
        e_first: usize,
        e_last: usize,
        tgt_edge: usize,
        orientation: bool,
    ) -> usize {
        debug_assert!(
            self.edge_src(tgt_edge) == self.edge_src(e_first),
            "src(e1) must equal src(e2)"
        );
        debug_assert!(
            self.edge_tgt(e_first) == self.edge_src(e_last),
            "tgt(e2) must equal src(e0)"
        );
        debug_assert!(
            self.edge_tgt(e_last) == self.edge_tgt(tgt_edge),
            "tgt(e0) must equal tgt(e1)"
        );

        let t = self.store.add_part(TRI);
        self.store.set_subpart(T_E0, t, e_last, true);
        self.store.set_subpart(T_E1, t, tgt_edge, true);
        self.store.set_subpart(T_E2, t, e_first, true);
        debug_assert_eq!(self.tri_orientation.len(), t);
        self.tri_orientation.push(orientation);
        t
    }

    /// Fallible raw triangle constructor that checks identities even in
    /// release builds, surfacing [`DecError::InvalidTopology`] on mismatch.
    pub fn try_add_triangle(
        &mut self,
        e_first: usize,
        e_last: usize,
        tgt_edge: usize,
    ) -> Result<usize> {
        if self.edge_src(tgt_edge) != self.edge_src(e_first)
            || self.edge_tgt(e_first) != self.edge_src(e_last)
            || self.edge_tgt(e_last) != self.edge_tgt(tgt_edge)
        {
            return Err(DecError::InvalidTopology {
                reason: format!(
                    "edges ({e_first}, {e_last}, {tgt_edge}) do not satisfy the simplicial identities"
                ),
            });
        }
        Ok(self.add_triangle(e_first, e_last, tgt_edge))
    }

    /// The only constructor that guarantees the simplicial identities: for
    /// each positional pair `(v_i, v_j)` with `i < j`, reuse the first
    /// existing edge from `v_i` to `v_j` (in either direction) if any, else
    /// create a sorted edge; then build the triangle from those three
    /// edges.
    pub fn glue_triangle(&mut self, v0: usize, v1: usize, v2: usize) -> Result<usize> {
        let e2 = self.reuse_or_create_edge(v0, v1);
        let e1 = self.reuse_or_create_edge(v0, v2);
        let e0 = self.reuse_or_create_edge(v1, v2);
        self.try_add_triangle(e2, e0, e1)
    }

    /// `glue_triangle` after sorting the three vertices ascending, which
    /// always satisfies the identities exactly (every edge it touches is
    /// traversed in increasing-vertex-id direction).
    pub fn glue_sorted_triangle(&mut self, a: usize, b: usize, c: usize) -> Result<usize> {
        let mut v = [a, b, c];
        v.sort_unstable();
        self.glue_triangle(v[0], v[1], v[2])
    }

    fn reuse_or_create_edge(&mut self, from: usize, to: usize) -> usize {
        if let Some(e) = self.edge_from_to(from, to) {
            return e;
        }
        if let Some(e) = self.edge_from_to(to, from) {
            return e;
        }
        self.add_sorted_edge(from, to)
    }

    pub fn triangle_edges(&self, t: usize) -> (usize, usize, usize) {
        let e0 = self.store.subpart(T_E0, t).expect("triangle without e0");
        let e1 = self.store.subpart(T_E1, t).expect("triangle without e1");
        let e2 = self.store.subpart(T_E2, t).expect("triangle without e2");
        (e0, e1, e2)
    }

    /// `(src(e1), tgt(e2), tgt(e1))`, which the simplicial identities
    /// equate with `(v0, v1, v2)` when the triangle was built in sorted (or
    /// otherwise internally consistent) vertex order.
    pub fn triangle_vertices(&self, t: usize) -> (usize, usize, usize) {
        let (_, e1, e2) = self.triangle_edges(t);
        (self.edge_src(e1), self.edge_tgt(e2), self.edge_tgt(e1))
    }

    pub fn triangle_orientation(&self, t: usize) -> bool {
        self.tri_orientation[t]
    }

    pub fn set_triangle_orientation(&mut self, t: usize, orientation: bool) {
        self.tri_orientation[t] = orientation;
    }

    /// Edges with `tgt == v` or `src == v` (coface query on `V`).
    pub fn edges_incident_to_vertex(&self, v: usize) -> Vec<usize> {
        let mut out = self.store.incident(E_SRC, v).to_vec();
        out.extend_from_slice(self.store.incident(E_TGT, v));
        out.into_iter().sorted().dedup().collect()
    }

    /// Triangles having `e` as one of their three edges (coface query on `E`).
    pub fn triangles_incident_to_edge(&self, e: usize) -> Vec<usize> {
        let mut out = self.store.incident(T_E0, e).to_vec();
        out.extend_from_slice(self.store.incident(T_E1, e));
        out.extend_from_slice(self.store.incident(T_E2, e));
        out.into_iter().sorted().dedup().collect()
    }

    /// Triangles having `v` as one of their three vertices.
    pub fn triangles_incident_to_vertex(&self, v: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for &e in &self.edges_incident_to_vertex(v) {
            out.extend(self.triangles_incident_to_edge(e));
        }
        out.into_iter().sorted().dedup().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_graph_structure() {
        let mut p = PrimalComplex::new_1d();
        let v = p.add_vertices(5);
        for w in v.windows(2) {
            p.add_edge(w[0], w[1]);
        }
        assert_eq!(p.num_vertices(), 5);
        assert_eq!(p.num_edges(), 4);
        assert_eq!(p.edges_incident_to_vertex(v[2]).len(), 2);
        assert_eq!(p.edges_incident_to_vertex(v[0]).len(), 1);
    }

    #[test]
    fn glue_triangle_satisfies_identities() {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(3);
        let t = p.glue_triangle(v[0], v[1], v[2]).unwrap();
        assert_eq!(p.num_edges(), 3);
        assert_eq!(p.triangle_vertices(t), (v[0], v[1], v[2]));
    }

    #[test]
    fn glue_triangle_reuses_shared_edges() {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(4);
        p.glue_triangle(v[0], v[1], v[2]).unwrap();
        p.glue_triangle(v[0], v[2], v[3]).unwrap();
        // Shared edge v0-v2 must be reused, not duplicated.
        assert_eq!(p.num_edges(), 5);
        assert_eq!(p.num_triangles(), 2);
    }

    #[test]
    fn glue_sorted_triangle_normalizes_order() {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(3);
        let t = p.glue_sorted_triangle(v[2], v[0], v[1]).unwrap();
        assert_eq!(p.triangle_vertices(t), (v[0], v[1], v[2]));
    }

    #[test]
    fn try_add_triangle_rejects_bad_identities() {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(4);
        let e0 = p.add_edge(v[1], v[2]);
        let e1 = p.add_edge(v[0], v[2]);
        let e_bad = p.add_edge(v[3], v[1]); // does not share src with e0/e1
        assert!(p.try_add_triangle(e1, e0, e_bad).is_err());
    }
}

//! Poincaré-dual complex of a 1D or 2D [`PrimalComplex`].
//!
//! For a 2D complex, the dual vertices are one per primal triangle (the
//! subdivision center); dual edges come in two roles both grounded in
//! spec.md §4.4 but merged into a single `DualE` table for volume
//! purposes: a "spoke" role carrying an edge center to its two adjacent
//! triangle centers, and a "half-edge" role carrying a triangle center to
//! each of its three edge midpoints. Dual triangles are the six sextants
//! each primal triangle splits into under subdivision. For a 1D complex,
//! dual vertices are edge midpoints and dual edges connect consecutive
//! ones along each primal edge's incident-vertex star.

use crate::error::{DecError, Result};
use crate::euclidean::{self, Point};
use crate::primal::PrimalComplex;
use crate::Dim;

/// Which point is chosen as the subdivision center of each primal
/// triangle (and, by extension, of each primal edge as that center's
/// projection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubdivisionRule {
    Barycenter,
    Circumcenter,
    Incenter,
}

/// A geometric point attached to a sextant corner: a primal vertex, a
/// primal triangle's center, or a primal edge's midpoint. Kept as a tagged
/// id rather than a bare `usize` because the three id spaces (vertices,
/// triangles, edges) otherwise collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPoint {
    Vertex(usize),
    Center(usize),
    EdgeMid(usize),
}

/// One of the six triangular sextants a primal triangle is split into: the
/// region bounded by one primal vertex, the triangle center, and one
/// adjacent edge midpoint.
#[derive(Debug, Clone, Copy)]
pub struct DualTri {
    pub points: [CellPoint; 3],
}

/// A dual edge: in 2D, a "spoke" from a triangle's center to one of its
/// edge midpoints; in 1D, a link between two edge midpoints sharing a
/// primal vertex (`src == tgt` as an edge id, disambiguated only by
/// `sign`, matching the 1D dual boundary telescoping along a vertex star).
#[derive(Debug, Clone, Copy)]
pub struct DualE {
    pub src: CellPoint,
    pub tgt: CellPoint,
    pub sign: f64,
}

/// The dual complex built over a (shared, immutable) primal complex.
pub struct DualComplex<'p> {
    primal: &'p PrimalComplex,
    /// Dual vertex per primal cell of top dimension: one per triangle in
    /// 2D, one per edge in 1D.
    dual_points: Vec<Option<Point>>,
    dual_edges: Vec<DualE>,
    dual_tris: Vec<DualTri>,
    /// 2D-only: edge midpoints, recomputed from the primal embedding and
    /// kept separate from `dual_points` since they are not themselves
    /// top-dimensional dual vertices.
    edge_center_points: Option<Vec<Point>>,
    rule: Option<SubdivisionRule>,
}

impl<'p> DualComplex<'p> {
    /// Borrow `primal` and lay out (but do not yet subdivide) its dual.
    pub fn build(primal: &'p PrimalComplex) -> Self {
        let n_centers = match primal.max_dim() {
            Dim::One => primal.num_edges(),
            _ => primal.num_triangles(),
        };
        DualComplex {
            primal,
            dual_points: vec![None; n_centers],
            dual_edges: Vec::new(),
            dual_tris: Vec::new(),
            edge_center_points: None,
            rule: None,
        }
    }

    pub fn primal(&self) -> &PrimalComplex {
        self.primal
    }

    pub fn subdivision_rule(&self) -> Option<SubdivisionRule> {
        self.rule
    }

    /// Convenience forward to [`crate::operators::hodge_star`].
    pub fn hodge_star(
        &self,
        dim: Dim,
        kind: crate::operators::HodgeKind,
    ) -> Result<crate::operators::Operator> {
        crate::operators::hodge_star(self, dim, kind)
    }

    fn center_of(&self, rule: SubdivisionRule, pts: &[Point]) -> Result<Point> {
        match rule {
            SubdivisionRule::Barycenter => Ok(euclidean::barycenter(pts)),
            SubdivisionRule::Circumcenter => {
                if pts.len() == 2 {
                    Ok(euclidean::barycenter(pts))
                } else {
                    euclidean::circumcenter(&pts[0], &pts[1], &pts[2])
                }
            }
            SubdivisionRule::Incenter => {
                if pts.len() == 2 {
                    Ok(euclidean::barycenter(pts))
                } else {
                    Ok(euclidean::incenter(&pts[0], &pts[1], &pts[2]))
                }
            }
        }
    }

    /// Compute dual-vertex positions and, in 2D, dual edges and dual
    /// triangles, using `rule` to place each primal top-cell's center.
    /// Requires `primal` to be fully embedded ([`PrimalComplex::is_embedded`]).
    pub fn subdivide_duals(&mut self, rule: SubdivisionRule) -> Result<()> {
        if !self.primal.is_embedded() {
            return Err(DecError::InvalidTopology {
                reason: "dual subdivision requires an embedded primal complex".to_string(),
            });
        }
        self.rule = Some(rule);

        match self.primal.max_dim() {
            Dim::One => self.subdivide_1d(rule),
            _ => self.subdivide_2d(rule),
        }
    }

    fn point_of(&self, v: usize) -> Point {
        self.primal.point(v).expect("embedded complex").clone()
    }

    fn edge_endpoints_points(&self, e: usize) -> [Point; 2] {
        [
            self.point_of(self.primal.edge_src(e)),
            self.point_of(self.primal.edge_tgt(e)),
        ]
    }

    fn subdivide_1d(&mut self, rule: SubdivisionRule) -> Result<()> {
        for e in 0..self.primal.num_edges() {
            let [p, q] = self.edge_endpoints_points(e);
            let center = self.center_of(rule, &[p, q])?;
            self.dual_points[e] = Some(center);
        }
        // A dual edge connects the midpoints of any two edges sharing a
        // vertex, signed by the shared vertex's local role (source-end
        // vs. target-end) so the assembled dual boundary telescopes along
        // each primal edge's star.
        for v in 0..self.primal.num_vertices() {
            let incident = self.primal.edges_incident_to_vertex(v);
            for &e in &incident {
                let sign = if self.primal.edge_tgt(e) == v {
                    1.0
                } else {
                    -1.0
                };
                self.dual_edges.push(DualE {
                    src: CellPoint::EdgeMid(e),
                    tgt: CellPoint::EdgeMid(e),
                    sign,
                });
            }
        }
        Ok(())
    }

    fn edge_center(&self, e: usize) -> Point {
        self.edge_center_points.as_ref().expect("subdivided")[e].clone()
    }

    fn subdivide_2d(&mut self, rule: SubdivisionRule) -> Result<()> {
        for t in 0..self.primal.num_triangles() {
            let (v0, v1, v2) = self.primal.triangle_vertices(t);
            let pts = [self.point_of(v0), self.point_of(v1), self.point_of(v2)];
            let center = self.center_of(rule, &pts)?;
            self.dual_points[t] = Some(center);
        }

        // Edge-center points are needed for dual geometry but are not
        // top-dimensional dual vertices; store them alongside as derived
        // data recomputed from the primal embedding.
        let mut edge_centers: Vec<Point> = Vec::with_capacity(self.primal.num_edges());
        for e in 0..self.primal.num_edges() {
            let [p, q] = self.edge_endpoints_points(e);
            edge_centers.push(euclidean::barycenter(&[p, q]));
        }

        for t in 0..self.primal.num_triangles() {
            let (e0, e1, e2) = self.primal.triangle_edges(t);
            let (v0, v1, v2) = self.primal.triangle_vertices(t);
            let center = CellPoint::Center(t);

            // Spokes: triangle center -> each edge midpoint, local sign
            // matching the boundary convention e0 - e1 + e2.
            for (e, local_sign) in [(e0, 1.0), (e1, -1.0), (e2, 1.0)] {
                self.dual_edges.push(DualE {
                    src: center,
                    tgt: CellPoint::EdgeMid(e),
                    sign: local_sign,
                });
            }

            // Six sextants: (vertex, center, edge-midpoint) for each
            // vertex paired with each of its two incident edges of this
            // triangle.
            let sextants = [
                (v0, e1),
                (v0, e2),
                (v1, e0),
                (v1, e2),
                (v2, e0),
                (v2, e1),
            ];
            for (v, e) in sextants {
                self.dual_tris.push(DualTri {
                    points: [CellPoint::Vertex(v), center, CellPoint::EdgeMid(e)],
                });
            }
        }

        self.edge_center_points = Some(edge_centers);
        Ok(())
    }

    /// Position of dual vertex `id` (a triangle center in 2D, an edge
    /// midpoint in 1D).
    pub fn dual_point(&self, id: usize) -> Option<&Point> {
        self.dual_points[id].as_ref()
    }

    pub fn dual_edges(&self) -> &[DualE] {
        &self.dual_edges
    }

    pub fn dual_triangles(&self) -> &[DualTri] {
        &self.dual_tris
    }

    /// Resolve a tagged sextant corner to its actual embedded position.
    fn cell_point(&self, cp: CellPoint) -> Point {
        match cp {
            CellPoint::Vertex(v) => self.point_of(v),
            CellPoint::Center(t) => self.dual_points[t].clone().expect("subdivided"),
            CellPoint::EdgeMid(e) => self.edge_center(e),
        }
    }

    /// Dual volume of a primal k-simplex's corresponding dual cell:
    /// the 1D vertex dual is the sum of half-lengths of incident edges; the
    /// 2D vertex dual is the sum of incident sextant areas; the 2D edge dual
    /// is the sum of distances from its midpoint to adjacent triangle
    /// centers; the top-dimensional dual (2D triangle, 1D edge) has
    /// convention volume 1.
    pub fn dual_volume(&self, dim: Dim, id: usize) -> f64 {
        match (self.primal.max_dim(), dim) {
            (Dim::One, Dim::Zero) => self
                .primal
                .edges_incident_to_vertex(id)
                .iter()
                .map(|&e| {
                    let [p, q] = self.edge_endpoints_points(e);
                    euclidean::sqdistance(&p, &q).sqrt() / 2.0
                })
                .sum(),
            (Dim::One, Dim::One) => 1.0,
            (Dim::Two, Dim::Zero) => self
                .primal
                .triangles_incident_to_vertex(id)
                .iter()
                .flat_map(|&t| self.sextants_of(t))
                .filter(|dt| dt.points[0] == CellPoint::Vertex(id))
                .map(|dt| self.dual_tri_area(&dt))
                .sum(),
            (Dim::Two, Dim::One) => {
                let center = self.edge_center(id);
                self.primal
                    .triangles_incident_to_edge(id)
                    .iter()
                    .map(|&t| {
                        let tc = self.dual_points[t].as_ref().expect("subdivided");
                        euclidean::sqdistance(&center, tc).sqrt()
                    })
                    .sum()
            }
            (Dim::Two, Dim::Two) => 1.0,
            _ => 0.0,
        }
    }

    fn sextants_of(&self, t: usize) -> Vec<DualTri> {
        let start = t * 6;
        self.dual_tris[start..start + 6].to_vec()
    }

    fn dual_tri_area(&self, dt: &DualTri) -> f64 {
        let pts: Vec<Point> = dt.points.iter().map(|&cp| self.cell_point(cp)).collect();
        euclidean::volume(&pts)
    }
}

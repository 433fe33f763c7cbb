//! Consistent global orientation of a 2D [`PrimalComplex`].
//!
//! A manifold mesh is orientable iff triangles can be assigned signs such
//! that every edge shared by exactly two triangles is traversed in opposite
//! directions by its two cofaces. Finding such an assignment (or detecting
//! that none exists) is the same union-find-driven connectivity problem as
//! the teacher's `persistent_homology::UnionFind`, extended with a parity
//! bit per union so two triangles can be constrained to "same" or "flipped"
//! relative orientation — the standard parity/bipartite variant of
//! union-find, generalizing the teacher's plain disjoint-set.

use crate::error::{DecError, Result};
use crate::primal::PrimalComplex;
use crate::Orientation;

/// Disjoint-set over triangle ids where each element additionally carries a
/// parity relative to its set's root: `true` means "same orientation as
/// root", `false` means "flipped relative to root".
struct ParityUnionFind {
    parent: Vec<usize>,
    parity: Vec<bool>,
}

impl ParityUnionFind {
    fn new(n: usize) -> Self {
        ParityUnionFind {
            parent: (0..n).collect(),
            parity: vec![true; n],
        }
    }

    /// Root of `x` and the parity of `x` relative to that root.
    fn find(&mut self, x: usize) -> (usize, bool) {
        if self.parent[x] == x {
            return (x, true);
        }
        let (root, parent_parity) = self.find(self.parent[x]);
        let total_parity = parent_parity == self.parity[x];
        self.parent[x] = root;
        self.parity[x] = total_parity;
        (root, total_parity)
    }

    /// Record that `a` and `b` have relative parity `same` (`true` = same
    /// orientation, `false` = flipped). Returns `false` if this contradicts
    /// an existing constraint.
    fn union(&mut self, a: usize, b: usize, same: bool) -> bool {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            return (pa == pb) == same;
        }
        // Attach rb's tree under ra such that b's parity relative to ra
        // matches the requested constraint.
        self.parent[rb] = ra;
        self.parity[rb] = pa == (pb == same);
        true
    }
}

/// The local sign of edge slot `e_i` (i in 0..=2) in the boundary of a
/// 2-simplex `[v0, v1, v2]`: `∂ = e0 - e1 + e2`.
fn local_sign(slot: usize) -> f64 {
    match slot {
        0 => 1.0,
        1 => -1.0,
        2 => 1.0,
        _ => unreachable!("triangle has exactly 3 edge slots"),
    }
}

/// The sign with which triangle `t` induces a direction on edge `e`, given
/// `t`'s current stored orientation: `tri_sign * local_sign(slot) * edge_sign`.
fn induced_sign(primal: &PrimalComplex, t: usize, e: usize) -> f64 {
    use crate::Orientation;
    let (e0, e1, e2) = primal.triangle_edges(t);
    let slot = if e == e0 {
        0
    } else if e == e1 {
        1
    } else if e == e2 {
        2
    } else {
        panic!("edge {e} is not a face of triangle {t}");
    };
    primal.triangle_orientation(t).to_sign() * local_sign(slot) * primal.edge_orientation(e).to_sign()
}

/// Attempt to assign a consistent global orientation to every triangle of
/// `primal`, flipping [`PrimalComplex::set_triangle_orientation`] as needed.
///
/// Edges with more than two incident triangles are non-manifold and are
/// skipped when building adjacency constraints (any two of their incident
/// triangles may legitimately need either relative orientation); edges with
/// exactly one incident triangle are boundary edges and impose no
/// constraint. Returns [`DecError::NonOrientable`] if some component cannot
/// be consistently signed.
pub fn orient(primal: &mut PrimalComplex) -> Result<()> {
    let n = primal.num_triangles();
    if n == 0 {
        return Ok(());
    }
    let mut dsu = ParityUnionFind::new(n);

    for e in 0..primal.num_edges() {
        let incident = primal.triangles_incident_to_edge(e);
        if incident.len() != 2 {
            continue;
        }
        let (t0, t1) = (incident[0], incident[1]);
        let s0 = induced_sign(primal, t0, e);
        let s1 = induced_sign(primal, t1, e);
        // A consistent orientation makes the two triangles induce opposite
        // directions on their shared edge, i.e. opposite induced signs
        // relative to each triangle's *current* orientation flag; "same"
        // constraint on the underlying orientation bit is therefore keyed
        // off whether the current signs already disagree.
        let same = (s0 * s1) < 0.0;
        if !dsu.union(t0, t1, same) {
            return Err(DecError::NonOrientable {
                reason: format!(
                    "triangles {t0} and {t1} sharing edge {e} cannot be consistently oriented"
                ),
            });
        }
    }

    // Each component's root keeps its current orientation; every other
    // member is set to match (same) or flip relative to the root based on
    // accumulated parity.
    for t in 0..n {
        let (_, same_as_root) = dsu.find(t);
        if !same_as_root {
            let current = primal.triangle_orientation(t);
            primal.set_triangle_orientation(t, current.negate());
        }
    }
    Ok(())
}

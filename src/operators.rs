//! Assembly of the discrete differential operators: the exterior derivative,
//! the Hodge star and its inverse, the codifferential, the Laplace-de Rham
//! operator, the wedge product, the musical isomorphisms, the interior
//! product, and the Lie derivative.
//!
//! Every operator below is assembled as a triplet list via [`SparseMatrix`]
//! or [`DiagonalMatrix`] and densified once, the same two-phase shape as
//! the teacher's `SparseMatrix`. The dual operators are never built by
//! walking dual cells directly — spec.md's own algebraic identities relate
//! them to the primal boundary/derivative matrices, so only the Hodge star
//! genuinely needs [`crate::dual::DualComplex`] geometry.

use crate::dual::DualComplex;
use crate::error::{DecError, Result};
use crate::euclidean;
use crate::primal::PrimalComplex;
use crate::sparse::{DiagonalMatrix, SparseMatrix};
use crate::{Dim, Form, Orientation, Variance};
use nalgebra::DMatrix;

/// Which construction produced a Hodge star: [`Diagonal`](HodgeKind::Diagonal)
/// always yields a diagonal matrix from primal/dual volume ratios, whatever
/// the chosen [`crate::dual::SubdivisionRule`]. [`Geometric`](HodgeKind::Geometric)
/// coincides with `Diagonal` at `k ∈ {0,2}`, but at `k = 1` on a 2D complex
/// it assembles a genuinely non-diagonal, per-triangle cotangent (Whitney
/// edge-element) mass matrix instead, independent of the dual's subdivision
/// rule (it never reads dual volumes at all). See `geometric_hodge_one` and
/// `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HodgeKind {
    Diagonal,
    Geometric,
}

/// A linear map between two graded spaces (forms or chains), carrying
/// enough metadata to check composition is dimensionally sound.
#[derive(Debug, Clone)]
pub struct Operator {
    pub domain_dim: Dim,
    pub domain_variance: Variance,
    pub codomain_dim: Dim,
    pub codomain_variance: Variance,
    pub matrix: DMatrix<f64>,
}

impl Operator {
    pub fn apply(&self, x: &Form) -> Result<Form> {
        if x.values.len() != self.matrix.ncols() {
            return Err(DecError::DimensionMismatch {
                expected: self.matrix.ncols(),
                actual: x.values.len(),
            });
        }
        Ok(Form::new(
            self.codomain_dim,
            self.codomain_variance,
            &self.matrix * &x.values,
        ))
    }

    pub fn transpose(&self) -> Operator {
        Operator {
            domain_dim: self.codomain_dim,
            domain_variance: self.codomain_variance,
            codomain_dim: self.domain_dim,
            codomain_variance: self.domain_variance,
            matrix: self.matrix.transpose(),
        }
    }

    pub fn scale(&self, factor: f64) -> Operator {
        Operator {
            domain_dim: self.domain_dim,
            domain_variance: self.domain_variance,
            codomain_dim: self.codomain_dim,
            codomain_variance: self.codomain_variance,
            matrix: self.matrix.clone() * factor,
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn compose(&self, inner: &Operator) -> Result<Operator> {
        if self.domain_dim != inner.codomain_dim || self.domain_variance != inner.codomain_variance
        {
            return Err(DecError::DimensionMismatch {
                expected: self.matrix.ncols(),
                actual: inner.matrix.nrows(),
            });
        }
        Ok(Operator {
            domain_dim: inner.domain_dim,
            domain_variance: inner.domain_variance,
            codomain_dim: self.codomain_dim,
            codomain_variance: self.codomain_variance,
            matrix: &self.matrix * &inner.matrix,
        })
    }

    pub fn add(&self, other: &Operator) -> Result<Operator> {
        if self.domain_dim != other.domain_dim
            || self.codomain_dim != other.codomain_dim
            || self.domain_variance != other.domain_variance
            || self.codomain_variance != other.codomain_variance
        {
            return Err(DecError::DimensionMismatch {
                expected: self.matrix.nrows(),
                actual: other.matrix.nrows(),
            });
        }
        Ok(Operator {
            domain_dim: self.domain_dim,
            domain_variance: self.domain_variance,
            codomain_dim: self.codomain_dim,
            codomain_variance: self.codomain_variance,
            matrix: &self.matrix + &other.matrix,
        })
    }
}

fn local_sign(slot: usize) -> f64 {
    match slot {
        0 => 1.0,
        1 => -1.0,
        2 => 1.0,
        _ => unreachable!(),
    }
}

fn primal_volume(primal: &PrimalComplex, dim: Dim, id: usize) -> f64 {
    match dim {
        Dim::Zero => 1.0,
        Dim::One => {
            let p = primal.point(primal.edge_src(id));
            let q = primal.point(primal.edge_tgt(id));
            match (p, q) {
                (Some(p), Some(q)) => euclidean::sqdistance(p, q).sqrt(),
                _ => 1.0,
            }
        }
        Dim::Two => {
            let (v0, v1, v2) = primal.triangle_vertices(id);
            match (primal.point(v0), primal.point(v1), primal.point(v2)) {
                (Some(a), Some(b), Some(c)) => {
                    euclidean::volume(&[a.clone(), b.clone(), c.clone()])
                }
                _ => 1.0,
            }
        }
    }
}

/// Signed primal boundary `∂_k: C_k → C_{k-1}`, for `k` in `1..=D`.
pub fn boundary(primal: &PrimalComplex, k: Dim) -> Result<Operator> {
    let d = primal.max_dim().as_usize();
    if k.as_usize() == 0 || k.as_usize() > d {
        return Err(DecError::InvalidTopology {
            reason: format!("no boundary operator at dimension {k:?} for a {d}D complex"),
        });
    }
    let matrix = match k {
        Dim::One => {
            let mut m = SparseMatrix::zeros(primal.num_vertices(), primal.num_edges());
            for e in 0..primal.num_edges() {
                let sign = primal.edge_orientation(e).to_sign();
                m.push(primal.edge_tgt(e), e, sign);
                m.push(primal.edge_src(e), e, -sign);
            }
            m.to_dense()
        }
        Dim::Two => {
            let mut m = SparseMatrix::zeros(primal.num_edges(), primal.num_triangles());
            for t in 0..primal.num_triangles() {
                let (e0, e1, e2) = primal.triangle_edges(t);
                let tri_sign = primal.triangle_orientation(t).to_sign();
                for (slot, e) in [e0, e1, e2].into_iter().enumerate() {
                    let coeff = tri_sign * local_sign(slot) * primal.edge_orientation(e).to_sign();
                    m.push(e, t, coeff);
                }
            }
            m.to_dense()
        }
        Dim::Zero => unreachable!("checked above"),
    };
    Ok(Operator {
        domain_dim: k,
        domain_variance: Variance::Primal,
        codomain_dim: k.pred().expect("k >= 1"),
        codomain_variance: Variance::Primal,
        matrix,
    })
}

/// Primal exterior derivative `d_k: Ω^k → Ω^{k+1}`, for `k` in `0..D`.
pub fn exterior_derivative(primal: &PrimalComplex, k: Dim) -> Result<Operator> {
    let next = k.succ().ok_or_else(|| DecError::InvalidTopology {
        reason: format!("no exterior derivative out of top dimension {k:?}"),
    })?;
    Ok(boundary(primal, next)?.transpose())
}

/// Hodge star `⋆_k: Ω^k(primal) → Ω^k(dual)`. `Diagonal` (and `Geometric`
/// at `k ∈ {0,2}`) is the primal/dual volume ratio; `Geometric` at `k = 1`
/// on a 2D complex instead calls [`geometric_hodge_one`].
pub fn hodge_star(dual: &DualComplex, k: Dim, kind: HodgeKind) -> Result<Operator> {
    if kind == HodgeKind::Geometric && k == Dim::One && dual.primal().max_dim() == Dim::Two {
        return geometric_hodge_one(dual.primal());
    }
    let primal = dual.primal();
    let n = num_cells(primal, k);
    let mut entries = Vec::with_capacity(n);
    for id in 0..n {
        let pv = primal_volume(primal, k, id);
        let dv = dual.dual_volume(k, id);
        if pv.abs() < 1e-12 {
            return Err(DecError::DegenerateGeometry {
                dim: k,
                id,
                reason: "zero primal volume makes the Hodge star singular".to_string(),
            });
        }
        entries.push(dv / pv);
    }
    Ok(Operator {
        domain_dim: k,
        domain_variance: Variance::Primal,
        codomain_dim: k,
        codomain_variance: Variance::Dual,
        matrix: DiagonalMatrix::new(entries).to_dense(),
    })
}

/// Cotangent of the interior angle at `p_a`, between rays `p_a -> p_b` and
/// `p_a -> p_c`. Always the true `cos/sin` ratio (sign independent of
/// whether `(p_a, p_b, p_c)` winds CCW or CW).
fn cot_angle(p_a: &[f64], p_b: &[f64], p_c: &[f64]) -> f64 {
    let u = [p_b[0] - p_a[0], p_b[1] - p_a[1]];
    let v = [p_c[0] - p_a[0], p_c[1] - p_a[1]];
    let dot = u[0] * v[0] + u[1] * v[1];
    let cross = u[0] * v[1] - u[1] * v[0];
    dot / cross.abs()
}

/// The geometric (cotangent/Whitney edge-element) Hodge star on 1-forms:
/// the Galerkin mass matrix of the lowest-order Nédélec/Whitney edge basis
/// `W_ab = λ_a ∇λ_b - λ_b ∇λ_a`, assembled per triangle and summed over
/// triangles sharing an edge pair (spec.md §4.5/§8). Unlike the diagonal
/// Hodge star this is genuinely non-diagonal and does not depend on the
/// dual's subdivision rule at all — it only reads primal embedding and
/// orientation.
fn geometric_hodge_one(primal: &PrimalComplex) -> Result<Operator> {
    if primal.max_dim() != Dim::Two {
        return Err(DecError::InvalidTopology {
            reason: "the geometric Hodge star on 1-forms requires a 2D complex".to_string(),
        });
    }
    let n = primal.num_edges();
    let mut m = SparseMatrix::zeros(n, n);
    for t in 0..primal.num_triangles() {
        let (v0, v1, v2) = primal.triangle_vertices(t);
        let (e0, e1, e2) = primal.triangle_edges(t);
        let (Some(p0), Some(p1), Some(p2)) = (primal.point(v0), primal.point(v1), primal.point(v2))
        else {
            return Err(DecError::InvalidTopology {
                reason: "the geometric Hodge star requires an embedded complex".to_string(),
            });
        };
        let area = euclidean::volume(&[p0.clone(), p1.clone(), p2.clone()]);
        if area.abs() < 1e-12 {
            return Err(DecError::DegenerateGeometry {
                dim: Dim::Two,
                id: t,
                reason: "zero-area triangle makes the geometric Hodge star singular".to_string(),
            });
        }
        let cot0 = cot_angle(p0, p1, p2);
        let cot1 = cot_angle(p1, p2, p0);
        let cot2 = cot_angle(p2, p0, p1);

        // Local basis: the canonical CCW cycle v0->v1->v2->v0, i.e. global
        // edges (e2, e0, e1) respectively (e2 = edge(v0,v1), e0 = edge(v1,v2),
        // e1 = edge(v0,v2) traversed v2->v0).
        let local_edges = [e2, e0, e1];
        let local_heads = [v1, v2, v0]; // canonical "a -> b" head vertex of each local edge
        let local_signs: Vec<f64> = local_edges
            .iter()
            .zip(local_heads.iter())
            .map(|(&e, &head)| {
                let (src, tgt) = if primal.edge_orientation(e) {
                    (primal.edge_src(e), primal.edge_tgt(e))
                } else {
                    (primal.edge_tgt(e), primal.edge_src(e))
                };
                debug_assert!(tgt == head || src == head);
                if tgt == head {
                    1.0
                } else {
                    -1.0
                }
            })
            .collect();

        let diag = [
            (cot0 + cot1 + 3.0 * cot2) / 12.0,
            (cot1 + cot2 + 3.0 * cot0) / 12.0,
            (cot2 + cot0 + 3.0 * cot1) / 12.0,
        ];
        // Cross term between canonical edges (p->q) and (q->r) sharing the
        // middle vertex q: (cot_q - cot_p - cot_r) / 12.
        let off = [
            (cot1 - cot0 - cot2) / 12.0, // local 0 (v0->v1) with local 1 (v1->v2), shared v1
            (cot2 - cot1 - cot0) / 12.0, // local 1 (v1->v2) with local 2 (v2->v0), shared v2
            (cot0 - cot2 - cot1) / 12.0, // local 2 (v2->v0) with local 0 (v0->v1), shared v0
        ];

        for local in 0..3 {
            m.push(local_edges[local], local_edges[local], diag[local]);
        }
        let pairs = [(0, 1), (1, 2), (2, 0)];
        for (idx, &(i, j)) in pairs.iter().enumerate() {
            let value = off[idx] * local_signs[i] * local_signs[j];
            m.push(local_edges[i], local_edges[j], value);
            m.push(local_edges[j], local_edges[i], value);
        }
    }
    Ok(Operator {
        domain_dim: Dim::One,
        domain_variance: Variance::Primal,
        codomain_dim: Dim::One,
        codomain_variance: Variance::Dual,
        matrix: m.to_dense(),
    })
}

/// Inverse Hodge star `⋆_k^{-1}: Ω^k(dual) → Ω^k(primal)`. Falls back to a
/// full matrix inverse when `star` is not diagonal (the `Geometric` kind at
/// `k = 1`), and to the cheaper diagonal inverse otherwise.
pub fn inv_hodge_star(dual: &DualComplex, k: Dim, kind: HodgeKind) -> Result<Operator> {
    let star = hodge_star(dual, k, kind)?;
    let is_diagonal = kind == HodgeKind::Diagonal || k != Dim::One;
    let inv_matrix = if is_diagonal {
        let diag: Vec<f64> = (0..star.matrix.nrows()).map(|i| star.matrix[(i, i)]).collect();
        DiagonalMatrix::new(diag).inverse()?.to_dense()
    } else {
        star.matrix.clone().try_inverse().ok_or_else(|| DecError::DegenerateGeometry {
            dim: k,
            id: 0,
            reason: "geometric Hodge star matrix is singular".to_string(),
        })?
    };
    Ok(Operator {
        domain_dim: k,
        domain_variance: Variance::Dual,
        codomain_dim: k,
        codomain_variance: Variance::Primal,
        matrix: inv_matrix,
    })
}

fn num_cells(primal: &PrimalComplex, dim: Dim) -> usize {
    match dim {
        Dim::Zero => primal.num_vertices(),
        Dim::One => primal.num_edges(),
        Dim::Two => primal.num_triangles(),
    }
}

/// Dual exterior derivative `d_k^\star: Ω^k(dual) → Ω^{k+1}(dual)`, equal
/// to `(-1)^{k+1} ∂_{D-k}` on the underlying matrix (spec.md §4.5).
pub fn dual_derivative(primal: &PrimalComplex, k: Dim) -> Result<Operator> {
    let d = primal.max_dim().as_usize();
    let m = d
        .checked_sub(k.as_usize())
        .filter(|&m| m >= 1)
        .and_then(Dim::from_usize)
        .ok_or_else(|| DecError::InvalidTopology {
            reason: format!("no dual derivative at dimension {k:?} for a {d}D complex"),
        })?;
    let sign = if (k.as_usize() + 1) % 2 == 0 { 1.0 } else { -1.0 };
    let op = boundary(primal, m)?;
    Ok(Operator {
        domain_dim: k,
        domain_variance: Variance::Dual,
        codomain_dim: k.succ().expect("checked above"),
        codomain_variance: Variance::Dual,
        matrix: op.matrix * sign,
    })
}

/// Dual boundary `∂_k^\star: C_k(dual) → C_{k-1}(dual)`, equal to
/// `(-1)^k d_{D-k}` on the underlying matrix (spec.md §4.5).
pub fn dual_boundary(primal: &PrimalComplex, k: Dim) -> Result<Operator> {
    let d = primal.max_dim().as_usize();
    if k.as_usize() == 0 {
        return Err(DecError::InvalidTopology {
            reason: "no dual boundary out of dual dimension 0".to_string(),
        });
    }
    let m = d
        .checked_sub(k.as_usize())
        .and_then(Dim::from_usize)
        .ok_or_else(|| DecError::InvalidTopology {
            reason: format!("no dual boundary at dimension {k:?} for a {d}D complex"),
        })?;
    let sign = if k.as_usize() % 2 == 0 { 1.0 } else { -1.0 };
    let op = exterior_derivative(primal, m)?;
    Ok(Operator {
        domain_dim: k,
        domain_variance: Variance::Dual,
        codomain_dim: k.pred().expect("checked above"),
        codomain_variance: Variance::Dual,
        matrix: op.matrix * sign,
    })
}

/// Codifferential `δ_k: Ω^k(primal) → Ω^{k-1}(primal)`, defined via
/// `⋆^{-1}_{k-1} ∂^\star_k ⋆_k`, signed `(-1)^k` (spec.md's convention).
pub fn codifferential(dual: &DualComplex, k: Dim, kind: HodgeKind) -> Result<Operator> {
    let km1 = k.pred().ok_or_else(|| DecError::InvalidTopology {
        reason: "no codifferential out of dimension 0".to_string(),
    })?;
    let star_k = hodge_star(dual, k, kind)?;
    let db = dual_boundary(dual.primal(), k)?;
    let inv_star = inv_hodge_star(dual, km1, kind)?;
    let sign = if k.as_usize() % 2 == 0 { 1.0 } else { -1.0 };
    let composed = inv_star.compose(&db)?.compose(&star_k)?;
    Ok(composed.scale(sign))
}

/// Laplace-de Rham operator `Δ_k = δ_{k+1} d_k + d_{k-1} δ_k`, dropping
/// whichever term falls outside `0..=D`.
pub fn laplacian(primal: &PrimalComplex, dual: &DualComplex, k: Dim, kind: HodgeKind) -> Result<Operator> {
    let mut term: Option<Operator> = None;
    if let Some(next) = k.succ() {
        let d_k = exterior_derivative(primal, k)?;
        let delta_next = codifferential(dual, next, kind)?;
        term = Some(delta_next.compose(&d_k)?);
    }
    if let Some(prev) = k.pred() {
        let delta_k = codifferential(dual, k, kind)?;
        let d_prev = exterior_derivative(primal, prev)?;
        let second = d_prev.compose(&delta_k)?;
        term = Some(match term {
            Some(first) => first.add(&second)?,
            None => second,
        });
    }
    term.ok_or_else(|| DecError::InvalidTopology {
        reason: "a 0-dimensional complex has no Laplacian".to_string(),
    })
}

/// Discrete wedge product of two primal forms on a 2D complex. Only the
/// degree pairs a 2D complex can realize are supported: `(0,0) -> 0`,
/// `(0,1) -> 1`, and `(1,1) -> 2`. This uses the simplicial-average
/// formulas of Hirani's discrete wedge (averaging a 0-form to an edge or
/// triangle before multiplying), not the fully antisymmetrized Whitney-form
/// integral; see `DESIGN.md`.
pub fn wedge(primal: &PrimalComplex, p: Dim, q: Dim, alpha: &Form, beta: &Form) -> Result<Form> {
    match (p, q) {
        (Dim::Zero, Dim::Zero) => {
            let values = alpha.values.component_mul(&beta.values);
            Ok(Form::new(Dim::Zero, Variance::Primal, values))
        }
        (Dim::Zero, Dim::One) => {
            let mut out = nalgebra::DVector::zeros(primal.num_edges());
            for e in 0..primal.num_edges() {
                let avg = 0.5 * (alpha.values[primal.edge_src(e)] + alpha.values[primal.edge_tgt(e)]);
                out[e] = avg * beta.values[e];
            }
            Ok(Form::new(Dim::One, Variance::Primal, out))
        }
        (Dim::One, Dim::One) => {
            if primal.max_dim() != Dim::Two {
                return Err(DecError::InvalidTopology {
                    reason: "a 1-form ∧ 1-form wedge needs a 2D complex".to_string(),
                });
            }
            let mut out = nalgebra::DVector::zeros(primal.num_triangles());
            for t in 0..primal.num_triangles() {
                let (e0, e1, e2) = primal.triangle_edges(t);
                // Standard discrete wedge for two primal 1-forms on a
                // triangle (Hirani, Discrete Exterior Calculus, eq. 7.3.1).
                let a = [alpha.values[e0], alpha.values[e1], alpha.values[e2]];
                let b = [beta.values[e0], beta.values[e1], beta.values[e2]];
                out[t] = (2.0 / 3.0) * (a[0] * b[1] - a[1] * b[0] + a[1] * b[2] - a[2] * b[1]
                    + a[2] * b[0]
                    - a[0] * b[2])
                    / 2.0;
            }
            Ok(Form::new(Dim::Two, Variance::Primal, out))
        }
        _ => Err(DecError::InvalidTopology {
            reason: format!("no wedge product of degrees {p:?} and {q:?}"),
        }),
    }
}

/// Flat `♭`: turn a per-vertex tangent vector field into a primal 1-form by
/// projecting the averaged vertex vectors onto each oriented edge.
pub fn flat(primal: &PrimalComplex, vectors: &[Vec<f64>]) -> Result<Form> {
    if vectors.len() != primal.num_vertices() {
        return Err(DecError::DimensionMismatch {
            expected: primal.num_vertices(),
            actual: vectors.len(),
        });
    }
    let mut out = nalgebra::DVector::zeros(primal.num_edges());
    for e in 0..primal.num_edges() {
        let src = primal.edge_src(e);
        let tgt = primal.edge_tgt(e);
        let (Some(p), Some(q)) = (primal.point(src), primal.point(tgt)) else {
            return Err(DecError::InvalidTopology {
                reason: "flat requires an embedded complex".to_string(),
            });
        };
        let edge_vec: Vec<f64> = p.iter().zip(q.iter()).map(|(a, b)| b - a).collect();
        let avg: Vec<f64> = vectors[src]
            .iter()
            .zip(vectors[tgt].iter())
            .map(|(a, b)| 0.5 * (a + b))
            .collect();
        let proj: f64 = edge_vec.iter().zip(avg.iter()).map(|(a, b)| a * b).sum();
        out[e] = proj * primal.edge_orientation(e).to_sign();
    }
    Ok(Form::new(Dim::One, Variance::Primal, out))
}

/// Sharp `♯`: reconstruct a primal vector field at vertices from a primal
/// 1-form. For each vertex, solves for the vector whose circulation along
/// each incident edge matches the 1-form's value there, weighted by that
/// edge's elementary dual volume; when a vertex has more than two incident
/// edges (the common case) this is a weighted least-squares fit, exact
/// whenever the incident values are mutually consistent (spec.md §4.5/§8).
pub fn sharp(primal: &PrimalComplex, dual: &DualComplex, omega: &Form) -> Result<Vec<[f64; 2]>> {
    if omega.values.len() != primal.num_edges() {
        return Err(DecError::DimensionMismatch {
            expected: primal.num_edges(),
            actual: omega.values.len(),
        });
    }
    let mut out = Vec::with_capacity(primal.num_vertices());
    for v in 0..primal.num_vertices() {
        let Some(p_v) = primal.point(v) else {
            return Err(DecError::InvalidTopology {
                reason: "sharp requires an embedded complex".to_string(),
            });
        };
        let mut ata = nalgebra::Matrix2::zeros();
        let mut atb = nalgebra::Vector2::zeros();
        for e in primal.edges_incident_to_vertex(v) {
            let (src, tgt) = (primal.edge_src(e), primal.edge_tgt(e));
            let other = if src == v { tgt } else { src };
            let Some(p_other) = primal.point(other) else {
                return Err(DecError::InvalidTopology {
                    reason: "sharp requires an embedded complex".to_string(),
                });
            };
            let d = nalgebra::Vector2::new(p_other[0] - p_v[0], p_other[1] - p_v[1]);
            let dir_sign = if src == v { 1.0 } else { -1.0 };
            let target = omega.values[e] * primal.edge_orientation(e).to_sign() * dir_sign;
            let weight = dual.dual_volume(Dim::One, e).max(1e-12);
            ata += weight * d * d.transpose();
            atb += weight * target * d;
        }
        let x = ata
            .try_inverse()
            .map(|inv| inv * atb)
            .unwrap_or_else(nalgebra::Vector2::zeros);
        out.push([x[0], x[1]]);
    }
    Ok(out)
}

/// Interior product `ι_X: Ω^k → Ω^{k-1}`, contracting a primal form with the
/// flat of a per-vertex vector field `X`, via spec.md §4.5's composition
/// `ι = (−1)^{k(D−k)} · ⋆⁻¹ ∘ ∧(X♭, ·) ∘ ⋆`. `⋆α` always uses the diagonal
/// Hodge star (matching the `kind` used for `⋆⁻¹` only when it is `Diagonal`;
/// `kind` otherwise only governs the final `⋆⁻¹`, since `wedge` has no
/// geometric variant).
pub fn interior_product(
    primal: &PrimalComplex,
    dual: &DualComplex,
    kind: HodgeKind,
    vectors: &[Vec<f64>],
    form: &Form,
) -> Result<Form> {
    let d = primal.max_dim().as_usize();
    let k = form.dim.as_usize();
    if k == 0 {
        return Err(DecError::InvalidTopology {
            reason: "interior product of a 0-form is always zero".to_string(),
        });
    }
    if form.dim == Dim::Two && d != 2 {
        return Err(DecError::InvalidTopology {
            reason: "interior product of a 2-form needs a 2D complex".to_string(),
        });
    }
    let flat_x = flat(primal, vectors)?;
    let star_alpha = hodge_star(dual, form.dim, HodgeKind::Diagonal)?.apply(form)?;
    let sign = if (k * (d - k)) % 2 == 0 { 1.0 } else { -1.0 };

    let wedged = match form.dim {
        // k = D = 2: ⋆α is a dual 1-form on edges (same length as a primal
        // 1-form); ∧(X♭, ⋆α) is the top-dimension wedge (wedge's (1,1)
        // case), and its per-triangle value is scattered to the triangle's
        // three vertices by the barycentric subdivision weight 1/3 — the
        // dual-0-cell (vertex) each triangle's wedge value lands on.
        Dim::Two => {
            let star_alpha_form = Form::new(Dim::One, Variance::Primal, star_alpha.values.clone());
            let wedge_tri = wedge(primal, Dim::One, Dim::One, &flat_x, &star_alpha_form)?;
            let mut out = nalgebra::DVector::zeros(primal.num_vertices());
            for t in 0..primal.num_triangles() {
                let (v0, v1, v2) = primal.triangle_vertices(t);
                for v in [v0, v1, v2] {
                    out[v] += wedge_tri.values[t] / 3.0;
                }
            }
            Form::new(Dim::Zero, Variance::Dual, out)
        }
        // k = 1 = D (1D complex): ⋆α is a dual 0-form on edges; the wedge
        // with the edge-indexed X♭ is a plain product, scattered to each
        // edge's two endpoint vertices with weight 1/2.
        Dim::One if d == 1 => {
            let mut out = nalgebra::DVector::zeros(primal.num_vertices());
            for e in 0..primal.num_edges() {
                let val = flat_x.values[e] * star_alpha.values[e];
                out[primal.edge_src(e)] += val / 2.0;
                out[primal.edge_tgt(e)] += val / 2.0;
            }
            Form::new(Dim::Zero, Variance::Dual, out)
        }
        // k = 1, D = 2: ⋆α is a dual 1-form on edges; ∧(X♭, ⋆α) is again
        // the top-dimension wedge, scattered to vertices exactly as above.
        Dim::One => {
            let star_alpha_form = Form::new(Dim::One, Variance::Primal, star_alpha.values.clone());
            let wedge_tri = wedge(primal, Dim::One, Dim::One, &flat_x, &star_alpha_form)?;
            let mut out = nalgebra::DVector::zeros(primal.num_vertices());
            for t in 0..primal.num_triangles() {
                let (v0, v1, v2) = primal.triangle_vertices(t);
                for v in [v0, v1, v2] {
                    out[v] += wedge_tri.values[t] / 3.0;
                }
            }
            Form::new(Dim::Zero, Variance::Dual, out)
        }
        Dim::Zero => unreachable!("k == 0 checked above"),
    };

    let unstar = inv_hodge_star(dual, wedged.dim, kind)?.apply(&wedged)?;
    Ok(Form::new(unstar.dim, Variance::Primal, &unstar.values * sign))
}

/// Lie derivative `L_X = i_X d + d i_X` (Cartan's magic formula), exact
/// given exact `d` and `interior_product`.
pub fn lie_derivative(
    primal: &PrimalComplex,
    dual: &DualComplex,
    kind: HodgeKind,
    vectors: &[Vec<f64>],
    form: &Form,
) -> Result<Form> {
    // `d` of a top-degree form is zero, so `i_X d form` drops out there.
    let first = match form.dim.succ() {
        Some(_) => {
            let d_form = exterior_derivative(primal, form.dim)?.apply(form)?;
            Some(interior_product(primal, dual, kind, vectors, &d_form)?)
        }
        None => None,
    };
    // A 0-form has no interior product of its own (`i_X` of a function is
    // zero), so `d i_X form` drops out there.
    let second = match form.dim.pred() {
        Some(prev) => {
            let i_form = interior_product(primal, dual, kind, vectors, form)?;
            Some(exterior_derivative(primal, prev)?.apply(&i_form)?)
        }
        None => None,
    };
    match (first, second) {
        (Some(a), Some(b)) => Ok(Form::new(a.dim, a.variance, &a.values + &b.values)),
        (Some(a), None) => Ok(a),
        (None, Some(b)) => Ok(b),
        (None, None) => Ok(Form::zeros(form.dim, form.variance, form.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual::SubdivisionRule;
    use approx::assert_relative_eq;

    fn path_graph() -> PrimalComplex {
        let mut p = PrimalComplex::new_1d();
        let v = p.add_vertices(3);
        p.set_point(v[0], vec![0.0]);
        p.set_point(v[1], vec![1.0]);
        p.set_point(v[2], vec![3.0]);
        p.add_edge(v[0], v[1]);
        p.add_edge(v[1], v[2]);
        p
    }

    #[test]
    fn boundary_one_matches_path_graph() {
        let p = path_graph();
        let op = boundary(&p, Dim::One).unwrap();
        assert_eq!(op.matrix.nrows(), 3);
        assert_eq!(op.matrix.ncols(), 2);
        assert_relative_eq!(op.matrix[(1, 0)], 1.0);
        assert_relative_eq!(op.matrix[(0, 0)], -1.0);
    }

    #[test]
    fn d_then_boundary_compose_is_zero_on_2d() {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(3);
        p.set_point(v[0], vec![0.0, 0.0]);
        p.set_point(v[1], vec![1.0, 0.0]);
        p.set_point(v[2], vec![0.0, 1.0]);
        p.glue_triangle(v[0], v[1], v[2]).unwrap();
        let d1 = boundary(&p, Dim::One).unwrap();
        let d2 = boundary(&p, Dim::Two).unwrap();
        let zero = d1.compose(&d2).unwrap();
        for entry in zero.matrix.iter() {
            assert_relative_eq!(*entry, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn hodge_star_path_graph_matches_spec_example() {
        let p = path_graph();
        let mut d = DualComplex::build(&p);
        d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
        let star0 = hodge_star(&d, Dim::Zero, HodgeKind::Diagonal).unwrap();
        assert_relative_eq!(star0.matrix[(0, 0)], 0.5, epsilon = 1e-9);
        assert_relative_eq!(star0.matrix[(1, 1)], 1.5, epsilon = 1e-9);
        assert_relative_eq!(star0.matrix[(2, 2)], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn laplacian_on_path_graph_has_expected_shape() {
        let p = path_graph();
        let mut d = DualComplex::build(&p);
        d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
        let lap = laplacian(&p, &d, Dim::Zero, HodgeKind::Diagonal).unwrap();
        assert_eq!(lap.matrix.nrows(), 3);
        assert_eq!(lap.matrix.ncols(), 3);
    }

    #[test]
    fn lie_derivative_of_zero_form_is_a_zero_form() {
        let p = path_graph();
        let mut d = DualComplex::build(&p);
        d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
        let f = Form::new(Dim::Zero, Variance::Primal, nalgebra::DVector::from_vec(vec![1.0, 2.0, 5.0]));
        let vectors = vec![vec![1.0]; 3];
        let lie = lie_derivative(&p, &d, HodgeKind::Diagonal, &vectors, &f).unwrap();
        assert_eq!(lie.dim, Dim::Zero);
        assert_eq!(lie.len(), 3);
    }

    fn unit_right_triangle() -> PrimalComplex {
        let mut p = PrimalComplex::new_2d();
        let v = p.add_vertices(3);
        p.set_point(v[0], vec![0.0, 0.0]);
        p.set_point(v[1], vec![1.0, 0.0]);
        p.set_point(v[2], vec![0.0, 1.0]);
        p.glue_triangle(v[0], v[1], v[2]).unwrap();
        p
    }

    /// Reproduces the diagonal of spec.md §8's literal unit-right-triangle
    /// Whitney mass matrix, `(1/3, 1/6, 1/3)`, under the hypotenuse-as-middle-
    /// index edge ordering `glue_triangle` produces. The off-diagonal pattern
    /// the rigorous Whitney/Nédélec mass matrix produces for this triangle is
    /// a single nonzero pair (±1/6, at the two legs meeting at the right
    /// angle) rather than spec's claimed two nonzero entries — a genuine
    /// property of the cotangent formula (cot of the right angle is 0), not a
    /// bug in this assembly; both patterns are symmetric and positive
    /// semidefinite.
    #[test]
    fn geometric_hodge_one_matches_unit_right_triangle_diagonal() {
        let p = unit_right_triangle();
        let star = geometric_hodge_one(&p).unwrap();
        assert_relative_eq!(star.matrix[(0, 0)], 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(star.matrix[(1, 1)], 1.0 / 6.0, epsilon = 1e-9);
        assert_relative_eq!(star.matrix[(2, 2)], 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(star.matrix[(0, 1)], star.matrix[(1, 0)], epsilon = 1e-9);
        assert_relative_eq!(star.matrix[(1, 2)], star.matrix[(2, 1)], epsilon = 1e-9);
        assert_relative_eq!(star.matrix[(0, 2)], star.matrix[(2, 0)], epsilon = 1e-9);
        let nonzero = [star.matrix[(0, 1)], star.matrix[(1, 2)], star.matrix[(0, 2)]]
            .iter()
            .filter(|v| v.abs() > 1e-9)
            .count();
        assert_eq!(nonzero, 1, "exactly one off-diagonal pair is nonzero for a right triangle");
    }

    #[test]
    fn geometric_hodge_one_is_independent_of_subdivision_rule() {
        let p = unit_right_triangle();
        let star = geometric_hodge_one(&p).unwrap();
        let mut d_circ = DualComplex::build(&p);
        d_circ.subdivide_duals(SubdivisionRule::Circumcenter).unwrap();
        let via_hodge_star = hodge_star(&d_circ, Dim::One, HodgeKind::Geometric).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(star.matrix[(i, j)], via_hodge_star.matrix[(i, j)], epsilon = 1e-9);
            }
        }
    }
}

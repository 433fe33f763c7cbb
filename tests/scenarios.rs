//! End-to-end scenarios matching the concrete worked examples that motivate
//! this library's operator conventions: a 3-vertex path graph, the unit
//! right triangle under all three subdivision rules, the unit square, and
//! an equilateral triangle's Hodge-star consistency.

use approx::assert_relative_eq;
use dec::dual::{DualComplex, SubdivisionRule};
use dec::operators::{self, HodgeKind};
use dec::primal::PrimalComplex;
use dec::{Dim, Form, Variance};

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

fn unit_right_triangle() -> PrimalComplex {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(3);
    p.set_point(v[0], vec![0.0, 0.0]);
    p.set_point(v[1], vec![1.0, 0.0]);
    p.set_point(v[2], vec![0.0, 1.0]);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();
    p
}

#[test]
fn path_graph_hodge_zero_matches_half_lengths() {
    let p = path_graph();
    let mut d = DualComplex::build(&p);
    d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
    let star0 = operators::hodge_star(&d, Dim::Zero, HodgeKind::Diagonal).unwrap();
    assert_relative_eq!(star0.matrix[(0, 0)], 0.5, epsilon = 1e-9);
    assert_relative_eq!(star0.matrix[(1, 1)], 1.5, epsilon = 1e-9);
    assert_relative_eq!(star0.matrix[(2, 2)], 1.0, epsilon = 1e-9);
}

#[test]
fn path_graph_laplacian_rows_sum_to_zero() {
    let p = path_graph();
    let mut d = DualComplex::build(&p);
    d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
    let lap = operators::laplacian(&p, &d, Dim::Zero, HodgeKind::Diagonal).unwrap();
    // The graph Laplacian annihilates the constant function.
    let ones = Form::new(Dim::Zero, Variance::Primal, nalgebra::DVector::from_element(3, 1.0));
    let result = lap.apply(&ones).unwrap();
    for i in 0..3 {
        assert_relative_eq!(result.values[i], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn unit_right_triangle_under_all_subdivision_rules_preserves_total_area() {
    for rule in [
        SubdivisionRule::Barycenter,
        SubdivisionRule::Circumcenter,
        SubdivisionRule::Incenter,
    ] {
        let p = unit_right_triangle();
        let mut d = DualComplex::build(&p);
        d.subdivide_duals(rule).unwrap();
        let total: f64 = (0..3).map(|v| d.dual_volume(Dim::Zero, v)).sum();
        assert_relative_eq!(total, 0.5, epsilon = 1e-9, max_relative = 1e-6);
    }
}

#[test]
fn unit_square_flat_then_sharp_recovers_constant_field() {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(4);
    p.set_point(v[0], vec![0.0, 0.0]);
    p.set_point(v[1], vec![1.0, 0.0]);
    p.set_point(v[2], vec![1.0, 1.0]);
    p.set_point(v[3], vec![0.0, 1.0]);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();
    p.glue_triangle(v[0], v[2], v[3]).unwrap();

    let mut d = DualComplex::build(&p);
    d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();

    let field = vec![vec![1.0, 0.0]; 4];
    let flat = operators::flat(&p, &field).unwrap();
    let recovered = operators::sharp(&p, &d, &flat).unwrap();

    assert_eq!(recovered.len(), 4);
    for v in recovered {
        assert_relative_eq!(v[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-9);
    }
}

/// The literal `♯(s, EForm([2,0,0,2,0]))` scenario on a unit square (corners
/// `(±1,±1)`) split along the `v0-v2` diagonal: the reconstructed field has
/// positive x at the vertex opposite the split on one side and negative x at
/// the vertex opposite it on the other. `glue_triangle(v0,v1,v2)` then
/// `glue_triangle(v0,v2,v3)` assigns edge ids (bottom, diag, right, left,
/// top) = (0, 1, 2, 3, 4), so the values matching spec's prose order
/// `[2,0,0,2,0]` (bottom, right, diag, left, top) land at `[2, 0, 0, 0, 2]`
/// in this crate's own edge order.
#[test]
fn unit_square_sharp_of_literal_eform_scenario() {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(4);
    p.set_point(v[0], vec![-1.0, -1.0]);
    p.set_point(v[1], vec![1.0, -1.0]);
    p.set_point(v[2], vec![1.0, 1.0]);
    p.set_point(v[3], vec![-1.0, 1.0]);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();
    p.glue_triangle(v[0], v[2], v[3]).unwrap();

    let mut d = DualComplex::build(&p);
    d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();

    let omega = Form::new(
        Dim::One,
        Variance::Primal,
        nalgebra::DVector::from_vec(vec![2.0, 0.0, 0.0, 0.0, 2.0]),
    );
    let recovered = operators::sharp(&p, &d, &omega).unwrap();

    assert!(recovered[1][0] > 0.0, "vertex2 (v1) should have positive x");
    assert!(recovered[3][0] < 0.0, "vertex4 (v3) should have negative x");
}

#[test]
fn equilateral_triangle_diagonal_and_geometric_hodge_agree_under_barycenter() {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(3);
    let h = 3f64.sqrt() / 2.0;
    p.set_point(v[0], vec![0.0, 0.0]);
    p.set_point(v[1], vec![1.0, 0.0]);
    p.set_point(v[2], vec![0.5, h]);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();

    let mut d = DualComplex::build(&p);
    d.subdivide_duals(SubdivisionRule::Barycenter).unwrap();

    let diagonal = operators::hodge_star(&d, Dim::One, HodgeKind::Diagonal).unwrap();
    let geometric = operators::hodge_star(&d, Dim::One, HodgeKind::Geometric).unwrap();
    for i in 0..diagonal.matrix.nrows() {
        assert_relative_eq!(diagonal.matrix[(i, i)], geometric.matrix[(i, i)], epsilon = 1e-9);
    }

    // spec.md §8's literal equilateral-triangle Laplacian,
    // `[[-12,-6,6],[-6,-12,6],[6,6,-12]]`, up to the edge permutation and
    // signs `glue_triangle` happens to assign: diagonal entries are all
    // `-12`, every off-diagonal entry has magnitude `6`, and the operator
    // agrees identically between the diagonal and geometric Hodge star.
    let lap_diag = operators::laplacian(&p, &d, Dim::One, HodgeKind::Diagonal).unwrap();
    let lap_geo = operators::laplacian(&p, &d, Dim::One, HodgeKind::Geometric).unwrap();
    for i in 0..3 {
        assert_relative_eq!(lap_diag.matrix[(i, i)], -12.0, epsilon = 1e-9);
        for j in 0..3 {
            assert_relative_eq!(lap_diag.matrix[(i, j)], lap_geo.matrix[(i, j)], epsilon = 1e-9);
            if i != j {
                assert_relative_eq!(lap_diag.matrix[(i, j)].abs(), 6.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn orientation_pass_accepts_a_consistently_oriented_patch() {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(4);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();
    p.glue_triangle(v[0], v[2], v[3]).unwrap();
    assert!(dec::orientation::orient(&mut p).is_ok());
}

#[test]
fn boundary_of_boundary_vanishes_on_a_two_triangle_patch() {
    let mut p = PrimalComplex::new_2d();
    let v = p.add_vertices(4);
    p.set_point(v[0], vec![0.0, 0.0]);
    p.set_point(v[1], vec![1.0, 0.0]);
    p.set_point(v[2], vec![1.0, 1.0]);
    p.set_point(v[3], vec![0.0, 1.0]);
    p.glue_triangle(v[0], v[1], v[2]).unwrap();
    p.glue_triangle(v[0], v[2], v[3]).unwrap();

    let d1 = operators::boundary(&p, Dim::One).unwrap();
    let d2 = operators::boundary(&p, Dim::Two).unwrap();
    let composed = d1.compose(&d2).unwrap();
    for entry in composed.matrix.iter() {
        assert_relative_eq!(*entry, 0.0, epsilon = 1e-9);
    }
}

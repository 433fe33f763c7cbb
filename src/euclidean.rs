//! Cayley-Menger volumes and simplex centers for points in Euclidean space.
//!
//! A point is a plain `Vec<f64>` of length 2 or 3 rather than a fixed-size
//! `nalgebra::Point2`/`Point3`, so the same kernel serves both embeddings;
//! the linear-algebra-heavy pieces (the Cayley-Menger determinant,
//! circumcenter's normal-equations solve) still go through `nalgebra`, the
//! way the teacher crate computes everything through `nalgebra::DMatrix`.

use crate::error::{DecError, Result};
use crate::Dim;
use nalgebra::DMatrix;

pub type Point = Vec<f64>;

/// Squared Euclidean distance between two points of equal dimension.
pub fn sqdistance(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}

fn sub(p: &[f64], q: &[f64]) -> Vec<f64> {
    p.iter().zip(q.iter()).map(|(a, b)| a - b).collect()
}

fn dot(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q.iter()).map(|(a, b)| a * b).sum()
}

fn norm(p: &[f64]) -> f64 {
    dot(p, p).sqrt()
}

fn scale(p: &[f64], s: f64) -> Vec<f64> {
    p.iter().map(|a| a * s).collect()
}

fn add(p: &[f64], q: &[f64]) -> Vec<f64> {
    p.iter().zip(q.iter()).map(|(a, b)| a + b).collect()
}

/// Pad a point to 3 components so 2D and 3D geometry share one code path.
fn to3(p: &[f64]) -> [f64; 3] {
    [
        p.first().copied().unwrap_or(0.0),
        p.get(1).copied().unwrap_or(0.0),
        p.get(2).copied().unwrap_or(0.0),
    ]
}

fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// The (k+2)x(k+2) Cayley-Menger matrix of `points` (a (k+1)-simplex):
/// a zero diagonal, a border of ones (except the [0,0] corner), and squared
/// distances in the interior.
pub fn cayley_menger(points: &[Point]) -> DMatrix<f64> {
    let n = points.len() + 1;
    let mut m = DMatrix::<f64>::zeros(n, n);
    for i in 1..n {
        m[(0, i)] = 1.0;
        m[(i, 0)] = 1.0;
    }
    for i in 1..n {
        for j in 1..n {
            if i != j {
                m[(i, j)] = sqdistance(&points[i - 1], &points[j - 1]);
            }
        }
    }
    m
}

/// Volume of the k-simplex spanned by `points` (k = `points.len() - 1`),
/// via `sqrt(|det CM| / 2^k) / k!`.
pub fn volume(points: &[Point]) -> f64 {
    if points.len() <= 1 {
        return 1.0;
    }
    let k = points.len() - 1;
    let cm = cayley_menger(points);
    let det = cm.determinant();
    let two_k = 2f64.powi(k as i32);
    let factorial: f64 = (1..=k as u64).product::<u64>() as f64;
    (det.abs() / two_k).sqrt() / factorial
}

/// Mean of the given points.
pub fn barycenter(points: &[Point]) -> Point {
    let dim = points[0].len();
    let mut sum = vec![0.0; dim];
    for p in points {
        sum = add(&sum, p);
    }
    scale(&sum, 1.0 / points.len() as f64)
}

/// Circumcenter of a triangle `(p0, p1, p2)`, via the 3D cross-product
/// formula (2D points are treated as lying in the z = 0 plane).
pub fn circumcenter(p0: &Point, p1: &Point, p2: &Point) -> Result<Point> {
    let dim = p0.len();
    let (a0, b0, c0) = (to3(p0), to3(p1), to3(p2));
    let a = sub(&b0, &a0);
    let b = sub(&c0, &a0);
    let a = [a[0], a[1], a[2]];
    let b = [b[0], b[1], b[2]];
    let cross_ab = cross3(a, b);
    let cross_ab_sq = dot(&cross_ab, &cross_ab);
    if cross_ab_sq < 1e-24 {
        return Err(DecError::DegenerateGeometry {
            dim: Dim::Two,
            id: usize::MAX,
            reason: "collinear points have no circumcenter".to_string(),
        });
    }
    let a_sq = dot(&a, &a);
    let b_sq = dot(&b, &b);
    let term1 = cross3(cross_ab, a);
    let term2 = cross3(b, cross_ab);
    let numerator = add(&scale(&term1, b_sq), &scale(&term2, a_sq));
    let offset = scale(&numerator, 1.0 / (2.0 * cross_ab_sq));
    let result3 = add(&a0, &offset);
    Ok(result3[..dim].to_vec())
}

/// Incenter of a triangle, weighted by the opposite edge lengths.
pub fn incenter(p0: &Point, p1: &Point, p2: &Point) -> Point {
    let a = sqdistance(p1, p2).sqrt();
    let b = sqdistance(p0, p2).sqrt();
    let c = sqdistance(p0, p1).sqrt();
    let perimeter = a + b + c;
    let dim = p0.len();
    let mut out = vec![0.0; dim];
    for (p, w) in [(p0, a), (p1, b), (p2, c)] {
        for d in 0..dim {
            out[d] += p[d] * w;
        }
    }
    scale(&out, 1.0 / perimeter)
}

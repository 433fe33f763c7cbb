//! Discrete Exterior Calculus (DEC) on semi-simplicial complexes in one and
//! two dimensions.
//!
//! Given a piecewise-linear mesh — an ordered simplicial complex, optionally
//! equipped with orientations and vertex coordinates — this library builds
//! the Poincaré-dual subdivision of that mesh and assembles the discrete
//! differential operators used to discretize PDEs on meshes: the exterior
//! derivative `d`, the Hodge star `⋆` (diagonal and geometric variants), the
//! codifferential `δ`, the Laplace-de Rham operator `Δ`, the wedge product
//! `∧`, the musical isomorphisms `♭` and `♯`, the interior product, and the
//! Lie derivative.
//!
//! # Pipeline
//!
//! ```
//! use dec::primal::PrimalComplex;
//! use dec::dual::{DualComplex, SubdivisionRule};
//! use dec::operators::HodgeKind;
//!
//! // Unit right triangle.
//! let mut primal = PrimalComplex::new_2d();
//! let v = primal.add_vertices(3);
//! primal.set_point(v[0], vec![0.0, 0.0]);
//! primal.set_point(v[1], vec![1.0, 0.0]);
//! primal.set_point(v[2], vec![0.0, 1.0]);
//! primal.glue_triangle(v[0], v[1], v[2]).unwrap();
//!
//! let mut dual = DualComplex::build(&primal);
//! dual.subdivide_duals(SubdivisionRule::Barycenter).unwrap();
//!
//! let star0 = dual.hodge_star(dec::Dim::Zero, HodgeKind::Diagonal).unwrap();
//! assert_eq!(star0.matrix.nrows(), 3);
//! ```
//!
//! This library does not solve PDEs: it returns operator matrices that the
//! caller applies and, if desired, hands to an external linear solver.

pub mod dual;
pub mod error;
pub mod euclidean;
pub mod operators;
pub mod orientation;
pub mod primal;
pub mod relstore;
pub mod sparse;

pub use error::{DecError, Result};

/// Dimension of a simplex, chain, or form. This library covers 0, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    Zero,
    One,
    Two,
}

impl Dim {
    pub fn as_usize(self) -> usize {
        match self {
            Dim::Zero => 0,
            Dim::One => 1,
            Dim::Two => 2,
        }
    }

    pub fn from_usize(k: usize) -> Option<Dim> {
        match k {
            0 => Some(Dim::Zero),
            1 => Some(Dim::One),
            2 => Some(Dim::Two),
            _ => None,
        }
    }

    /// The next higher dimension, if it is still within 0..=2.
    pub fn succ(self) -> Option<Dim> {
        Dim::from_usize(self.as_usize() + 1)
    }

    /// The next lower dimension, if `self` is not already 0.
    pub fn pred(self) -> Option<Dim> {
        self.as_usize().checked_sub(1).and_then(Dim::from_usize)
    }
}

/// Whether a chain/form/operator lives on the primal complex or the dual
/// complex. Kept as an explicit type rather than erased so the type system
/// tracks the distinction the way spec.md's data model requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Primal,
    Dual,
}

/// An orientation alphabet. Booleans are the concrete type used throughout
/// this crate (`true` == `+1`); the trait exists so every sign-bearing
/// operator signs through `negate`/`to_sign` instead of hand-rolling a
/// type-by-type copy, per the source's multiple-dispatch polymorphism over
/// orientation types.
pub trait Orientation: Copy {
    fn negate(self) -> Self;
    fn to_sign(self) -> f64;
}

impl Orientation for bool {
    fn negate(self) -> Self {
        !self
    }

    fn to_sign(self) -> f64 {
        if self {
            1.0
        } else {
            -1.0
        }
    }
}

/// A dense real-valued assignment to k-simplices of a given variance — the
/// coboundary side of the chain/cochain distinction.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub dim: Dim,
    pub variance: Variance,
    pub values: nalgebra::DVector<f64>,
}

impl Form {
    pub fn new(dim: Dim, variance: Variance, values: nalgebra::DVector<f64>) -> Self {
        Form {
            dim,
            variance,
            values,
        }
    }

    pub fn zeros(dim: Dim, variance: Variance, n: usize) -> Self {
        Form::new(dim, variance, nalgebra::DVector::zeros(n))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A formal sum of oriented k-simplices — the boundary side of the
/// chain/cochain distinction. Structurally identical to [`Form`] but kept as
/// a distinct type so the two variances cannot be mixed up at a call site.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub dim: Dim,
    pub variance: Variance,
    pub values: nalgebra::DVector<f64>,
}

impl Chain {
    pub fn new(dim: Dim, variance: Variance, values: nalgebra::DVector<f64>) -> Self {
        Chain {
            dim,
            variance,
            values,
        }
    }

    pub fn zeros(dim: Dim, variance: Variance, n: usize) -> Self {
        Chain::new(dim, variance, nalgebra::DVector::zeros(n))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convenience re-exports for the common entry points.
pub mod prelude {
    pub use crate::dual::{DualComplex, SubdivisionRule};
    pub use crate::error::{DecError, Result};
    pub use crate::operators::HodgeKind;
    pub use crate::primal::PrimalComplex;
    pub use crate::{Chain, Dim, Form, Orientation, Variance};
}

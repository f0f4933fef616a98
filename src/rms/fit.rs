//! Coordinate extraction, rigid superposition and RMSD evaluation.
//!
//! The superposition follows the closed-form quaternion solution: for two
//! centered point sets the rotation minimizing the summed squared distances
//! is encoded by the eigenvector belonging to the largest eigenvalue of a
//! symmetric 4×4 matrix assembled from their cross-covariance. The result is
//! always a proper rotation (no reflection, no scaling).

use std::ops::ControlFlow;

use nalgebra::{Matrix3, Matrix4, Quaternion, SymmetricEigen, UnitQuaternion, Vector3};

use super::mapper::{Mapping, MappingVisitor};
use crate::model::molecule::Molecule;

pub type Point = Vector3<f64>;

/// Paired coordinates: `reference[i]` corresponds to `test[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateSet {
    pub reference: Vec<Point>,
    pub test: Vec<Point>,
}

impl CoordinateSet {
    /// Orders coordinates by `mapping`: index `i` holds reference atom `i`
    /// and the test atom it maps to.
    pub fn from_mapping(mapping: &Mapping, reference: &Molecule, test: &Molecule) -> Self {
        let (reference, test) = mapping
            .pairs()
            .map(|(r, t)| {
                (
                    Point::from(reference.atoms[r].position),
                    Point::from(test.atoms[t].position),
                )
            })
            .unzip();
        Self { reference, test }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Moves both sets to the origin and rotates the test set onto the
    /// reference. Returns the applied rotation.
    pub fn superpose(&mut self) -> Matrix3<f64> {
        center(&mut self.reference);
        center(&mut self.test);
        let rotation = optimal_rotation(&self.reference, &self.test);
        rotate(&mut self.test, &rotation);
        rotation
    }

    pub fn rmsd(&self) -> f64 {
        rmsd(&self.reference, &self.test)
    }
}

/// Arithmetic mean of `points`; the origin for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::zeros();
    }
    points.iter().sum::<Point>() / points.len() as f64
}

/// Translates `points` so their centroid is the origin. Returns the
/// centroid that was removed.
pub fn center(points: &mut [Point]) -> Point {
    let c = centroid(points);
    for p in points.iter_mut() {
        *p -= c;
    }
    c
}

/// Rotation `R` minimizing `Σ |reference[i] − R·test[i]|²`.
///
/// Both sets are expected to be centered already and of equal length.
pub fn optimal_rotation(reference: &[Point], test: &[Point]) -> Matrix3<f64> {
    let s: Matrix3<f64> = test
        .iter()
        .zip(reference)
        .map(|(t, r)| t * r.transpose())
        .sum();

    let (sxx, sxy, sxz) = (s[(0, 0)], s[(0, 1)], s[(0, 2)]);
    let (syx, syy, syz) = (s[(1, 0)], s[(1, 1)], s[(1, 2)]);
    let (szx, szy, szz) = (s[(2, 0)], s[(2, 1)], s[(2, 2)]);

    #[rustfmt::skip]
    let horn = Matrix4::new(
        sxx + syy + szz, syz - szy,        szx - sxz,        sxy - syx,
        syz - szy,       sxx - syy - szz,  sxy + syx,        szx + sxz,
        szx - sxz,       sxy + syx,        -sxx + syy - szz, syz + szy,
        sxy - syx,       szx + sxz,        syz + szy,        -sxx - syy + szz,
    );

    let eigen = SymmetricEigen::new(horn);
    let q = eigen.eigenvectors.column(eigen.eigenvalues.imax());

    UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
        .to_rotation_matrix()
        .into_inner()
}

pub fn rotate(points: &mut [Point], rotation: &Matrix3<f64>) {
    for p in points.iter_mut() {
        *p = rotation * *p;
    }
}

/// Root-mean-square deviation of paired points; `0.0` for empty input.
pub fn rmsd(a: &[Point], b: &[Point]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(p, q)| (p - q).norm_squared()).sum();
    (sum / n as f64).sqrt()
}

/// Visitor that scores every mapping and keeps the lowest RMSD.
///
/// Never stops the enumeration early: all correspondences are scored
/// whether or not `minimize` is set.
#[derive(Debug, Clone)]
pub struct RmsdEvaluator<'a> {
    reference: &'a Molecule,
    test: &'a Molecule,
    minimize: bool,
    best: f64,
}

impl<'a> RmsdEvaluator<'a> {
    pub fn new(reference: &'a Molecule, test: &'a Molecule, minimize: bool) -> Self {
        Self {
            reference,
            test,
            minimize,
            best: f64::INFINITY,
        }
    }

    /// RMSD for a single mapping, superposed first when `minimize` is set.
    pub fn evaluate(&self, mapping: &Mapping) -> f64 {
        let mut coords = CoordinateSet::from_mapping(mapping, self.reference, self.test);
        if self.minimize && !coords.is_empty() {
            coords.superpose();
        }
        coords.rmsd()
    }

    /// Lowest RMSD seen so far, `f64::INFINITY` if no mapping was visited.
    #[inline]
    pub fn best_rmsd(&self) -> f64 {
        self.best
    }
}

impl MappingVisitor for RmsdEvaluator<'_> {
    fn visit(&mut self, mapping: &Mapping) -> ControlFlow<()> {
        let value = self.evaluate(mapping);
        if value < self.best {
            self.best = value;
        }
        ControlFlow::Continue(())
    }
}

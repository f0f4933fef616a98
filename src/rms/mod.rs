mod batch;
mod config;
mod fit;
mod mapper;
mod normalize;
mod query;

pub use batch::{BatchSummary, Comparison, run};
pub use config::{PairingMode, RmsConfig};
pub use fit::{
    CoordinateSet, Point, RmsdEvaluator, center, centroid, optimal_rotation, rmsd, rotate,
};
pub use mapper::{Mapping, MappingVisitor, enumerate, enumerate_graph};
pub use normalize::{normalize, normalized};
pub use query::{AtomLabel, BondLabel, LabeledGraph, Query};

use log::{debug, warn};

use crate::model::molecule::Molecule;

/// Heavy-atom RMSD between `reference` and `test`.
///
/// Both molecules are normalized (on copies) before matching. Returns the
/// minimum RMSD over every atom correspondence, superposing each one first
/// when `minimize` is set, or `f64::INFINITY` when the two heavy-atom graphs
/// admit no correspondence.
pub fn compare_one(reference: &Molecule, test: &Molecule, minimize: bool) -> f64 {
    let matcher = Matcher::new(reference);
    matcher.compute_rmsd(&normalized(test), minimize)
}

/// A normalized reference structure with its compiled query, reusable
/// across any number of test structures.
#[derive(Debug, Clone)]
pub struct Matcher {
    reference: Molecule,
    query: Query,
}

impl Matcher {
    pub fn new(reference: &Molecule) -> Self {
        let reference = normalized(reference);
        let query = Query::compile(&reference);
        Self { reference, query }
    }

    #[inline]
    pub fn reference(&self) -> &Molecule {
        &self.reference
    }

    #[inline]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// RMSD against a test molecule that has already been normalized.
    pub fn compute_rmsd(&self, test: &Molecule, minimize: bool) -> f64 {
        if self.reference.is_empty() && test.is_empty() {
            warn!(
                "'{}' vs '{}': no heavy atoms to compare",
                self.reference.title, test.title
            );
        }

        let mut evaluator = RmsdEvaluator::new(&self.reference, test, minimize);
        let found = enumerate(&self.query, test, &mut evaluator);

        if found == 0 {
            warn!(
                "'{}' ({} heavy atoms) and '{}' ({} heavy atoms) have no atom correspondence",
                self.reference.title,
                self.reference.atom_count(),
                test.title,
                test.atom_count()
            );
        } else {
            debug!(
                "'{}' vs '{}': {} correspondences, best RMSD {:.4}",
                self.reference.title,
                test.title,
                found,
                evaluator.best_rmsd()
            );
        }

        evaluator.best_rmsd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::molecule::Bond;
    use crate::model::types::{BondOrder, Element};
    use nalgebra::{Rotation3, Vector3};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    /// 1,1,1-trifluoroethane with explicit hydrogens on the methyl group.
    fn trifluoroethane() -> Molecule {
        let mut mol = Molecule::with_title("trifluoroethane");
        let atoms = [
            (Element::C, [0.000, 0.000, 0.000]),
            (Element::C, [1.510, 0.000, 0.000]),
            (Element::F, [2.000, 1.290, 0.000]),
            (Element::F, [2.000, -0.645, 1.117]),
            (Element::F, [2.000, -0.645, -1.117]),
            (Element::H, [-0.370, 1.030, 0.000]),
            (Element::H, [-0.370, -0.515, 0.892]),
            (Element::H, [-0.370, -0.515, -0.892]),
        ];
        for (element, position) in atoms {
            mol.atoms.push(Atom::new(element, position));
        }
        for (i, j) in [(0, 1), (1, 2), (1, 3), (1, 4), (0, 5), (0, 6), (0, 7)] {
            mol.bonds.push(Bond::new(i, j, BondOrder::Single));
        }
        mol
    }

    fn transformed(mol: &Molecule, rotation: &Rotation3<f64>, shift: Vector3<f64>) -> Molecule {
        let mut out = mol.clone();
        for atom in &mut out.atoms {
            let p = rotation * Vector3::from(atom.position) + shift;
            atom.position = [p.x, p.y, p.z];
        }
        out
    }

    fn bonded_pair(a: [f64; 3], b: [f64; 3]) -> Molecule {
        let mut mol = Molecule::new();
        mol.atoms.push(Atom::new(Element::C, a));
        mol.atoms.push(Atom::new(Element::O, b));
        mol.bonds.push(Bond::new(0, 1, BondOrder::Single));
        mol
    }

    #[test]
    fn identity_comparison_is_zero() {
        let mol = trifluoroethane();
        assert_eq!(compare_one(&mol, &mol, false), 0.0);
        assert!(compare_one(&mol, &mol, true) < 1e-12);
    }

    #[test]
    fn rigid_motion_is_recovered_by_minimization() {
        let mol = trifluoroethane();
        let rotation = Rotation3::from_euler_angles(1.2, -0.3, 0.8);
        let moved = transformed(&mol, &rotation, Vector3::new(5.0, -2.0, 0.5));

        assert!(compare_one(&mol, &moved, true) < 1e-9);
        assert!(compare_one(&mol, &moved, false) > 1.0);
    }

    #[test]
    fn translated_bond_without_and_with_fit() {
        let reference = bonded_pair([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let test = bonded_pair([0.0, 0.0, 1.0], [1.0, 0.0, 1.0]);

        assert!(approx_eq(compare_one(&reference, &test, false), 1.0, 1e-12));
        assert!(compare_one(&reference, &test, true) < 1e-12);
    }

    #[test]
    fn permuted_symmetric_branches_give_zero() {
        let reference = trifluoroethane();
        let mut test = reference.clone();
        // rotate the fluorine labels: F2 <- F3 <- F4 <- F2, coordinates travel with atoms
        test.atoms.swap(2, 3);
        test.atoms.swap(3, 4);

        let matcher = Matcher::new(&reference);
        let normalized_test = normalized(&test);
        let mut evaluator = RmsdEvaluator::new(matcher.reference(), &normalized_test, false);
        let found = enumerate(matcher.query(), &normalized_test, &mut evaluator);

        assert!(found >= 3);
        assert_eq!(evaluator.best_rmsd(), 0.0);
        assert_eq!(compare_one(&reference, &test, false), 0.0);
    }

    #[test]
    fn relabeling_test_atoms_does_not_change_rmsd() {
        let reference = trifluoroethane();
        let rotation = Rotation3::from_euler_angles(0.1, 0.2, 0.3);
        let test = transformed(&reference, &rotation, Vector3::new(0.2, 0.0, -0.1));

        // reverse atom order and remap the bonds accordingly
        let n = test.atom_count();
        let mut shuffled = Molecule::with_title("shuffled");
        shuffled.atoms = test.atoms.iter().rev().cloned().collect();
        shuffled.bonds = test
            .bonds
            .iter()
            .map(|b| Bond::new(n - 1 - b.i, n - 1 - b.j, b.order))
            .collect();

        for minimize in [false, true] {
            let a = compare_one(&reference, &test, minimize);
            let b = compare_one(&reference, &shuffled, minimize);
            assert!(approx_eq(a, b, 1e-12), "minimize={minimize}: {a} vs {b}");
        }
    }

    #[test]
    fn different_heavy_atom_counts_are_incomparable() {
        let reference = trifluoroethane();
        let mut test = reference.clone();
        test.atoms.push(Atom::new(Element::Cl, [3.0, 3.0, 3.0]));
        test.bonds.push(Bond::new(1, 8, BondOrder::Single));

        assert_eq!(compare_one(&reference, &test, false), f64::INFINITY);
        assert_eq!(compare_one(&reference, &test, true), f64::INFINITY);
    }

    #[test]
    fn hydrogen_counts_do_not_matter() {
        let reference = trifluoroethane();
        let mut stripped = reference.clone();
        normalize(&mut stripped);
        assert_eq!(compare_one(&reference, &stripped, false), 0.0);
    }

    #[test]
    fn aromatic_annotations_do_not_block_matching() {
        let reference = trifluoroethane();
        let mut test = reference.clone();
        test.atoms[0].aromatic = true;
        test.bonds[0] = Bond::new(0, 1, BondOrder::Aromatic);
        assert_eq!(compare_one(&reference, &test, false), 0.0);
    }

    #[test]
    fn minimized_rmsd_never_exceeds_plain_rmsd() {
        let reference = trifluoroethane();
        let mut test = transformed(
            &reference,
            &Rotation3::from_euler_angles(0.5, 0.0, -0.2),
            Vector3::new(0.3, 0.3, 0.3),
        );
        test.atoms[2].position[1] += 0.4;
        test.atoms[1].position[0] -= 0.2;

        let plain = compare_one(&reference, &test, false);
        let fitted = compare_one(&reference, &test, true);
        assert!(fitted.is_finite());
        assert!(fitted <= plain + 1e-12);
        assert!(fitted > 0.0);
    }

    #[test]
    fn empty_structures_compare_as_zero() {
        let mut protons = Molecule::with_title("H+");
        protons.atoms.push(Atom::new(Element::H, [0.0, 0.0, 0.0]));

        assert_eq!(compare_one(&protons, &protons, false), 0.0);
        assert_eq!(compare_one(&protons, &protons, true), 0.0);
        assert_eq!(compare_one(&protons, &trifluoroethane(), true), f64::INFINITY);
    }

    #[test]
    fn matcher_is_reusable_across_tests() {
        let reference = trifluoroethane();
        let matcher = Matcher::new(&reference);
        assert_eq!(matcher.reference().atom_count(), 5);

        let first = normalized(&reference);
        let second = normalized(&transformed(
            &reference,
            &Rotation3::identity(),
            Vector3::new(0.0, 2.0, 0.0),
        ));
        assert_eq!(matcher.compute_rmsd(&first, false), 0.0);
        assert!(approx_eq(matcher.compute_rmsd(&second, false), 2.0, 1e-12));
        assert!(matcher.compute_rmsd(&second, true) < 1e-12);
    }
}

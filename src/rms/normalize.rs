//! Reduction of a molecule to the heavy-atom graph used for matching.
//!
//! Aromaticity and ring membership as written by different tools (or
//! perceived differently for different conformers of the same compound)
//! would make otherwise equivalent atoms incompatible. Those annotations are
//! overwritten with one uniform value so that only element identity and
//! connectivity distinguish atoms.

use log::debug;

use crate::model::molecule::{Bond, Molecule};
use crate::model::types::BondOrder;

/// Normalizes `mol` in place.
///
/// Removes hydrogens together with their bonds, clears aromatic flags, marks
/// every remaining atom and bond as in-ring and sets every bond order to
/// single. Idempotent; an empty molecule is left empty.
pub fn normalize(mol: &mut Molecule) {
    let removed = strip_hydrogens(mol);

    for atom in &mut mol.atoms {
        atom.aromatic = false;
        atom.in_ring = true;
    }
    for bond in &mut mol.bonds {
        bond.aromatic = false;
        bond.order = BondOrder::Single;
        bond.in_ring = true;
    }

    debug!(
        "normalized '{}': {} heavy atoms, {} bonds, {} hydrogens removed",
        mol.title,
        mol.atom_count(),
        mol.bond_count(),
        removed
    );
}

/// Returns a normalized copy, leaving `mol` untouched.
pub fn normalized(mol: &Molecule) -> Molecule {
    let mut copy = mol.clone();
    normalize(&mut copy);
    copy
}

fn strip_hydrogens(mol: &mut Molecule) -> usize {
    let mut remap = vec![None; mol.atoms.len()];
    let mut next = 0;
    for (old, atom) in mol.atoms.iter().enumerate() {
        if !atom.element.is_hydrogen() {
            remap[old] = Some(next);
            next += 1;
        }
    }

    let removed = mol.atoms.len() - next;
    if removed == 0 {
        return 0;
    }

    mol.atoms.retain(|a| !a.element.is_hydrogen());
    mol.bonds = mol
        .bonds
        .iter()
        .filter_map(|bond| {
            let i = remap.get(bond.i).copied().flatten()?;
            let j = remap.get(bond.j).copied().flatten()?;
            Some(Bond { i, j, ..bond.clone() })
        })
        .collect();

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::Element;

    fn ethanol() -> Molecule {
        let mut mol = Molecule::with_title("ethanol");
        mol.atoms.push(Atom::new(Element::C, [-1.270, 0.248, 0.000]));
        mol.atoms.push(Atom::new(Element::H, [-1.317, 0.885, 0.883]));
        mol.atoms.push(Atom::new(Element::C, [0.139, -0.308, 0.000]));
        mol.atoms.push(Atom::new(Element::H, [0.358, -0.920, 0.876]));
        mol.atoms.push(Atom::new(Element::O, [1.036, 0.789, 0.000]));
        mol.atoms.push(Atom::new(Element::H, [1.939, 0.473, 0.000]));
        mol.bonds.push(Bond::new(0, 1, BondOrder::Single));
        mol.bonds.push(Bond::new(0, 2, BondOrder::Single));
        mol.bonds.push(Bond::new(2, 3, BondOrder::Single));
        mol.bonds.push(Bond::new(2, 4, BondOrder::Double));
        mol.bonds.push(Bond::new(4, 5, BondOrder::Single));
        mol
    }

    #[test]
    fn strips_hydrogens_and_reindexes_bonds() {
        let mut mol = ethanol();
        normalize(&mut mol);

        let elements: Vec<_> = mol.atoms.iter().map(|a| a.element).collect();
        assert_eq!(elements, vec![Element::C, Element::C, Element::O]);
        assert_eq!(mol.atoms[2].position, [1.036, 0.789, 0.000]);

        let pairs: Vec<_> = mol.bonds.iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn overwrites_perception_flags() {
        let mut mol = ethanol();
        mol.atoms[0].aromatic = true;
        mol.bonds[1] = Bond::new(0, 2, BondOrder::Aromatic);
        normalize(&mut mol);

        assert!(mol.atoms.iter().all(|a| !a.aromatic && a.in_ring));
        assert!(
            mol.bonds
                .iter()
                .all(|b| !b.aromatic && b.in_ring && b.order == BondOrder::Single)
        );
    }

    #[test]
    fn is_idempotent() {
        let once = normalized(&ethanol());
        let twice = normalized(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_and_hydrogen_only_molecules_normalize_to_empty() {
        let mut empty = Molecule::new();
        normalize(&mut empty);
        assert!(empty.is_empty());

        let mut h2 = Molecule::with_title("H2");
        h2.atoms.push(Atom::new(Element::H, [0.0, 0.0, 0.0]));
        h2.atoms.push(Atom::new(Element::H, [0.74, 0.0, 0.0]));
        h2.bonds.push(Bond::new(0, 1, BondOrder::Single));
        normalize(&mut h2);
        assert!(h2.is_empty());
        assert_eq!(h2.bond_count(), 0);
    }

    #[test]
    fn normalized_leaves_source_untouched() {
        let source = ethanol();
        let copy = normalized(&source);
        assert_eq!(source.atom_count(), 6);
        assert_eq!(copy.atom_count(), 3);
    }
}

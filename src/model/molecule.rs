use super::atom::Atom;
use super::types::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
    pub aromatic: bool,
    pub in_ring: bool,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        let (i, j) = if idx1 <= idx2 {
            (idx1, idx2)
        } else {
            (idx2, idx1)
        };
        Self {
            i,
            j,
            order,
            aromatic: order == BondOrder::Aromatic,
            in_ring: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms
            .iter()
            .filter(|a| !a.element.is_hydrogen())
            .count()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;

    #[test]
    fn bond_new_orders_indices() {
        let bond = Bond::new(4, 1, BondOrder::Double);
        assert_eq!((bond.i, bond.j), (1, 4));
        assert_eq!(bond.order, BondOrder::Double);
    }

    #[test]
    fn aromatic_order_sets_aromatic_flag() {
        assert!(Bond::new(0, 1, BondOrder::Aromatic).aromatic);
        assert!(!Bond::new(0, 1, BondOrder::Single).aromatic);
    }

    #[test]
    fn heavy_atom_count_skips_hydrogens() {
        let mut mol = Molecule::with_title("water");
        mol.atoms.push(Atom::new(Element::O, [0.0, 0.0, 0.0]));
        mol.atoms.push(Atom::new(Element::H, [0.96, 0.0, 0.0]));
        mol.atoms.push(Atom::new(Element::H, [-0.24, 0.93, 0.0]));
        mol.bonds.push(Bond::new(0, 1, BondOrder::Single));
        mol.bonds.push(Bond::new(2, 0, BondOrder::Single));

        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.heavy_atom_count(), 1);
        assert_eq!(mol.title, "water");
    }
}

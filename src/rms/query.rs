//! Precompiled topological pattern of a reference molecule.
//!
//! A [`Query`] is built once per reference structure and reused for every
//! test structure compared against it. It stores the labelled adjacency of
//! the reference together with a search order in which each atom, except the
//! first of its connected component, is bonded to an atom placed before it.

use std::collections::VecDeque;

use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};

/// Atom properties that must agree between corresponding atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomLabel {
    pub element: Element,
    pub aromatic: bool,
    pub in_ring: bool,
}

impl AtomLabel {
    pub fn of(atom: &Atom) -> Self {
        Self {
            element: atom.element,
            aromatic: atom.aromatic,
            in_ring: atom.in_ring,
        }
    }
}

/// Bond properties that must agree between corresponding bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BondLabel {
    pub order: BondOrder,
    pub aromatic: bool,
    pub in_ring: bool,
}

impl BondLabel {
    pub fn of(bond: &Bond) -> Self {
        Self {
            order: bond.order,
            aromatic: bond.aromatic,
            in_ring: bond.in_ring,
        }
    }
}

/// Labelled undirected graph view of a molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledGraph {
    labels: Vec<AtomLabel>,
    adjacency: Vec<Vec<(usize, BondLabel)>>,
    bond_count: usize,
}

impl LabeledGraph {
    pub fn from_molecule(mol: &Molecule) -> Self {
        let labels: Vec<AtomLabel> = mol.atoms.iter().map(AtomLabel::of).collect();

        let mut adjacency = vec![Vec::new(); labels.len()];
        for bond in &mol.bonds {
            let label = BondLabel::of(bond);
            adjacency[bond.i].push((bond.j, label));
            adjacency[bond.j].push((bond.i, label));
        }
        for list in &mut adjacency {
            list.sort_by_key(|&(n, _)| n);
        }

        Self {
            labels,
            adjacency,
            bond_count: mol.bonds.len(),
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bond_count
    }

    #[inline]
    pub fn label(&self, atom: usize) -> AtomLabel {
        self.labels[atom]
    }

    #[inline]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    #[inline]
    pub fn neighbors(&self, atom: usize) -> &[(usize, BondLabel)] {
        &self.adjacency[atom]
    }

    /// Label of the bond between `a` and `b`, or `None` if they are not bonded.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<BondLabel> {
        let list = &self.adjacency[a];
        list.binary_search_by_key(&b, |&(n, _)| n)
            .ok()
            .map(|pos| list[pos].1)
    }

    /// Sorted multiset of `(label, degree)` pairs, a cheap isomorphism invariant.
    pub fn invariant(&self) -> Vec<(u8, bool, bool, usize)> {
        let mut inv: Vec<_> = (0..self.atom_count())
            .map(|a| {
                let l = self.labels[a];
                (l.element.atomic_number(), l.aromatic, l.in_ring, self.degree(a))
            })
            .collect();
        inv.sort_unstable();
        inv
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    graph: LabeledGraph,
    order: Vec<usize>,
    anchors: Vec<Option<usize>>,
    invariant: Vec<(u8, bool, bool, usize)>,
}

impl Query {
    /// Compiles the topology of `reference`.
    ///
    /// Deterministic: the same molecule always yields the same query,
    /// including its search order.
    pub fn compile(reference: &Molecule) -> Self {
        let graph = LabeledGraph::from_molecule(reference);
        let n = graph.atom_count();

        let mut order = Vec::with_capacity(n);
        let mut anchors = Vec::with_capacity(n);
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();

        for root in 0..n {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            order.push(root);
            anchors.push(None);
            queue.push_back(root);

            while let Some(atom) = queue.pop_front() {
                for &(next, _) in graph.neighbors(atom) {
                    if !seen[next] {
                        seen[next] = true;
                        order.push(next);
                        anchors.push(Some(atom));
                        queue.push_back(next);
                    }
                }
            }
        }

        let invariant = graph.invariant();
        Self {
            graph,
            order,
            anchors,
            invariant,
        }
    }

    #[inline]
    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.graph.atom_count()
    }

    /// Reference atoms in the order the search assigns them.
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Previously placed reference atom bonded to `order()[depth]`, if any.
    #[inline]
    pub fn anchor(&self, depth: usize) -> Option<usize> {
        self.anchors[depth]
    }

    #[inline]
    pub fn invariant(&self) -> &[(u8, bool, bool, usize)] {
        &self.invariant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(elements: &[Element]) -> Molecule {
        let mut mol = Molecule::new();
        for (i, &e) in elements.iter().enumerate() {
            mol.atoms.push(Atom::new(e, [i as f64, 0.0, 0.0]));
        }
        for i in 1..elements.len() {
            mol.bonds.push(Bond::new(i - 1, i, BondOrder::Single));
        }
        mol
    }

    #[test]
    fn search_order_keeps_components_connected() {
        let mut mol = chain(&[Element::C, Element::C, Element::O, Element::N]);
        mol.atoms.push(Atom::new(Element::Na, [9.0, 0.0, 0.0]));
        let query = Query::compile(&mol);

        assert_eq!(query.order(), &[0, 1, 2, 3, 4]);
        assert_eq!(query.anchor(0), None);
        assert_eq!(query.anchor(1), Some(0));
        assert_eq!(query.anchor(3), Some(2));
        assert_eq!(query.anchor(4), None);
    }

    #[test]
    fn every_anchor_is_bonded_and_placed_earlier() {
        let mut mol = chain(&[Element::C; 6]);
        mol.bonds.push(Bond::new(0, 5, BondOrder::Single));
        mol.bonds.push(Bond::new(1, 4, BondOrder::Single));
        let query = Query::compile(&mol);

        for depth in 1..query.order().len() {
            let atom = query.order()[depth];
            let anchor = query.anchor(depth).expect("connected graph");
            assert!(query.order()[..depth].contains(&anchor));
            assert!(query.graph().bond_between(atom, anchor).is_some());
        }
    }

    #[test]
    fn bond_between_is_symmetric() {
        let graph = LabeledGraph::from_molecule(&chain(&[Element::C, Element::O, Element::C]));
        assert!(graph.bond_between(0, 1).is_some());
        assert!(graph.bond_between(1, 0).is_some());
        assert!(graph.bond_between(0, 2).is_none());
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.bond_count(), 2);
    }

    #[test]
    fn compile_is_deterministic() {
        let mol = chain(&[Element::C, Element::N, Element::O]);
        assert_eq!(Query::compile(&mol), Query::compile(&mol));
    }

    #[test]
    fn invariant_ignores_atom_order() {
        let a = LabeledGraph::from_molecule(&chain(&[Element::C, Element::C, Element::O]));
        let b = LabeledGraph::from_molecule(&chain(&[Element::O, Element::C, Element::C]));
        assert_eq!(a.invariant(), b.invariant());
    }
}

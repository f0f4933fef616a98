//! Exhaustive enumeration of atom correspondences.
//!
//! Every bijection between the atoms of a compiled [`Query`] and a test
//! molecule that preserves atom labels and bonding (edges map to edges with
//! equal bond labels, non-edges to non-edges) is handed to a visitor. The
//! search is a depth-first extension of partial mappings along the query's
//! search order, pruned by label, degree and adjacency consistency.

use std::ops::ControlFlow;

use log::trace;

use super::query::{LabeledGraph, Query};
use crate::model::molecule::Molecule;

/// A complete correspondence: reference atom `i` maps to test atom
/// `test_index(i)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping {
    targets: Vec<usize>,
}

impl Mapping {
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn test_index(&self, reference: usize) -> usize {
        self.targets[reference]
    }

    /// `(reference, test)` index pairs in reference order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.targets
    }
}

/// Receives each mapping found. `ControlFlow::Break(())` stops the search.
pub trait MappingVisitor {
    fn visit(&mut self, mapping: &Mapping) -> ControlFlow<()>;
}

impl<F> MappingVisitor for F
where
    F: FnMut(&Mapping) -> ControlFlow<()>,
{
    fn visit(&mut self, mapping: &Mapping) -> ControlFlow<()> {
        self(mapping)
    }
}

/// Enumerates all correspondences between `query` and `test`.
///
/// Returns the number of mappings passed to `visitor`. If the graphs are not
/// isomorphic the visitor is never called and `0` is returned.
pub fn enumerate<V>(query: &Query, test: &Molecule, visitor: &mut V) -> usize
where
    V: MappingVisitor + ?Sized,
{
    let target = LabeledGraph::from_molecule(test);
    enumerate_graph(query, &target, visitor)
}

/// Same as [`enumerate`] for an already built test graph.
pub fn enumerate_graph<V>(query: &Query, target: &LabeledGraph, visitor: &mut V) -> usize
where
    V: MappingVisitor + ?Sized,
{
    let pattern = query.graph();
    if pattern.atom_count() != target.atom_count()
        || pattern.bond_count() != target.bond_count()
        || query.invariant() != target.invariant().as_slice()
    {
        trace!("graphs differ in size or degree/label sequence; no mapping possible");
        return 0;
    }

    let n = pattern.atom_count();
    let mut search = Search {
        query,
        target,
        ref_to_test: vec![None; n],
        test_to_ref: vec![None; n],
        mapping: Mapping {
            targets: vec![0; n],
        },
        visited: 0,
        visitor,
    };
    if search.extend(0).is_break() {
        trace!("visitor stopped the search after {} mappings", search.visited);
    }
    search.visited
}

struct Search<'a, V: ?Sized> {
    query: &'a Query,
    target: &'a LabeledGraph,
    ref_to_test: Vec<Option<usize>>,
    test_to_ref: Vec<Option<usize>>,
    mapping: Mapping,
    visited: usize,
    visitor: &'a mut V,
}

impl<V> Search<'_, V>
where
    V: MappingVisitor + ?Sized,
{
    fn extend(&mut self, depth: usize) -> ControlFlow<()> {
        let order = self.query.order();
        if depth == order.len() {
            for (r, t) in self.ref_to_test.iter().enumerate() {
                // every slot is filled once depth reaches the atom count
                self.mapping.targets[r] = t.unwrap_or_default();
            }
            self.visited += 1;
            return self.visitor.visit(&self.mapping);
        }

        let r = order[depth];
        for t in self.candidates(depth) {
            if !self.is_feasible(r, t) {
                continue;
            }
            self.ref_to_test[r] = Some(t);
            self.test_to_ref[t] = Some(r);

            let flow = self.extend(depth + 1);

            self.ref_to_test[r] = None;
            self.test_to_ref[t] = None;
            flow?;
        }

        ControlFlow::Continue(())
    }

    fn candidates(&self, depth: usize) -> Vec<usize> {
        match self.query.anchor(depth).and_then(|a| self.ref_to_test[a]) {
            Some(anchor) => self
                .target
                .neighbors(anchor)
                .iter()
                .map(|&(n, _)| n)
                .filter(|&n| self.test_to_ref[n].is_none())
                .collect(),
            None => (0..self.target.atom_count())
                .filter(|&n| self.test_to_ref[n].is_none())
                .collect(),
        }
    }

    fn is_feasible(&self, r: usize, t: usize) -> bool {
        let pattern = self.query.graph();
        if pattern.label(r) != self.target.label(t) || pattern.degree(r) != self.target.degree(t)
        {
            return false;
        }

        let mut mapped_neighbors = 0;
        for &(r_neighbor, label) in pattern.neighbors(r) {
            if let Some(t_neighbor) = self.ref_to_test[r_neighbor] {
                if self.target.bond_between(t, t_neighbor) != Some(label) {
                    return false;
                }
                mapped_neighbors += 1;
            }
        }

        let t_mapped_neighbors = self
            .target
            .neighbors(t)
            .iter()
            .filter(|&&(n, _)| self.test_to_ref[n].is_some())
            .count();

        t_mapped_neighbors == mapped_neighbors
    }
}

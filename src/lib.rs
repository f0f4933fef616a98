//! Heavy-atom RMSD between molecular structures, with every symmetry-equivalent
//! atom correspondence taken into account.
//!
//! Structures are reduced to their heavy-atom connectivity, every
//! isomorphism between the reference graph and the test graph is enumerated,
//! and the lowest RMSD over all of them is reported. Optionally each
//! correspondence is rigidly superposed first, so the result is independent
//! of the frame the two structures were written in.
//!
//! # Features
//!
//! - **Symmetry-aware matching**: equivalent atoms (the three fluorines on a
//!   CF₃ group, the ring carbons of benzene) are tried in every arrangement
//! - **Optimal superposition**: closed-form quaternion fit, proper rotations
//!   only
//! - **Streaming I/O**: multi-record SDF and MOL2 files, optionally gzipped
//!
//! # Quick Start
//!
//! ```
//! use rms_forge::{Atom, Bond, BondOrder, Element, Molecule, compare_one};
//!
//! // Carbon monoxide with one hydrogen that the comparison ignores
//! let mut reference = Molecule::with_title("ref");
//! reference.atoms.push(Atom::new(Element::C, [0.0, 0.0, 0.0]));
//! reference.atoms.push(Atom::new(Element::O, [1.128, 0.0, 0.0]));
//! reference.atoms.push(Atom::new(Element::H, [-1.0, 0.0, 0.0]));
//! reference.bonds.push(Bond::new(0, 1, BondOrder::Triple));
//! reference.bonds.push(Bond::new(0, 2, BondOrder::Single));
//!
//! // The same molecule shifted by 1 Å along z, hydrogens omitted
//! let mut test = Molecule::with_title("test");
//! test.atoms.push(Atom::new(Element::O, [1.128, 0.0, 1.0]));
//! test.atoms.push(Atom::new(Element::C, [0.0, 0.0, 1.0]));
//! test.bonds.push(Bond::new(0, 1, BondOrder::Triple));
//!
//! let plain = compare_one(&reference, &test, false);
//! assert!((plain - 1.0).abs() < 1e-12);
//!
//! let fitted = compare_one(&reference, &test, true);
//! assert!(fitted < 1e-9);
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: SDF / MOL2 readers and gzip handling
//! - [`rms`]: normalization, graph matching, superposition and batch runs
//!
//! # Data Types
//!
//! - [`Molecule`]: titled set of atoms and bonds
//! - [`Atom`]: element, Cartesian position and ring/aromatic flags
//! - [`Bond`]: bond between two atoms with bond order
//! - [`Element`]: chemical element (H through Og)
//! - [`BondOrder`]: bond order (Single, Double, Triple, Aromatic)

mod model;

pub mod io;
pub mod rms;

pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::types::{BondOrder, Element, ParseElementError};

pub use rms::{Matcher, PairingMode, RmsConfig, compare_one};

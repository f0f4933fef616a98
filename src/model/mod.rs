//! Molecular graph types consumed by the matcher.
//!
//! - [`atom`] – Atom with element, Cartesian coordinates and perception flags.
//! - [`types`] – Periodic table elements and bond order classifications.
//! - [`molecule`] – Titled molecule: ordered atoms plus undirected bonds.
//!
//! The aromatic and ring flags carried here are whatever the structure file
//! claimed. They are never trusted for matching; [`crate::rms::normalize`]
//! overwrites them before a comparison.

pub mod atom;
pub mod molecule;
pub mod types;

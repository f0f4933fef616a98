//! Tripos `.mol2` files.

mod reader;

pub(crate) use reader::read_next;

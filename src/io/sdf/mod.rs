//! MDL V2000 connection tables (`.sdf`, `.mol`, `.sd`).

mod reader;

pub(crate) use reader::read_next;

//! Reading molecular structures from SDF and MOL2 files.
//!
//! [`ChemReader`] streams the records of a file one [`Molecule`] at a time,
//! so multi-structure inputs (docking poses, conformer libraries) are never
//! loaded whole. Compressed input is handled by wrapping the byte stream with
//! [`gzip::open_maybe_gzip`] first.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use crate::model::molecule::Molecule;

pub mod error;
pub mod gzip;
pub mod util;

mod mol2;
mod sdf;

pub use error::Error;
pub use gzip::{MaybeGzReader, is_gzip_path, open_maybe_gzip};

use util::LineReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Sdf,
    Mol2,
}

impl Format {
    /// Infers the format from a file extension, looking through a trailing
    /// `.gz`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let stem_path;
        let path = if is_gzip_path(path) {
            stem_path = path.with_extension("");
            stem_path.as_path()
        } else {
            path
        };

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sdf" | "sd" | "mol" | "mdl" => Ok(Format::Sdf),
            "mol2" | "ml2" => Ok(Format::Mol2),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Mol2 => write!(f, "MOL2"),
        }
    }
}

/// Streaming reader yielding one molecule per record.
///
/// After the first error the iterator is fused and yields `None`.
pub struct ChemReader<R> {
    lines: LineReader<R>,
    format: Format,
    done: bool,
}

impl<R: BufRead> ChemReader<R> {
    pub fn new(reader: R, format: Format) -> Self {
        Self {
            lines: LineReader::new(reader),
            format,
            done: false,
        }
    }

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Reads the next record, `Ok(None)` at end of input.
    pub fn next_molecule(&mut self) -> Result<Option<Molecule>, Error> {
        if self.done {
            return Ok(None);
        }
        let result = match self.format {
            Format::Sdf => sdf::read_next(&mut self.lines),
            Format::Mol2 => mol2::read_next(&mut self.lines),
        };
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    /// Reads the first record, failing if the input holds none.
    pub fn read(mut self) -> Result<Molecule, Error> {
        self.next_molecule()?.ok_or(Error::NoRecord(self.format))
    }
}

impl<R: BufRead> Iterator for ChemReader<R> {
    type Item = Result<Molecule, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_molecule().transpose()
    }
}

use crate::io::util::{self, LineReader};
use crate::io::{Format, error::Error};
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
};
use std::collections::HashMap;
use std::io::BufRead;

const MOLECULE: &str = "@<TRIPOS>MOLECULE";
const ATOM: &str = "@<TRIPOS>ATOM";
const BOND: &str = "@<TRIPOS>BOND";

fn is_section(line: &str, name: &str) -> bool {
    line.trim().eq_ignore_ascii_case(name)
}

/// Reads the next `@<TRIPOS>MOLECULE` block, or `None` at end of input.
pub(crate) fn read_next<R: BufRead>(
    lines: &mut LineReader<R>,
) -> Result<Option<Molecule>, Error> {
    loop {
        match lines.next_line()? {
            None => return Ok(None),
            Some((_, line)) if is_section(&line, MOLECULE) => break,
            Some(_) => continue,
        }
    }

    let title = lines
        .next_line()?
        .map(|(_, name)| name.trim().to_string())
        .ok_or_else(|| Error::parse(Format::Mol2, lines.line_no(), "missing molecule name"))?;

    let (count_line_no, count_line) = next_data_line(lines)?
        .ok_or_else(|| Error::parse(Format::Mol2, lines.line_no(), "missing counts line"))?;
    let (atom_count, bond_count) = parse_counts(&count_line, count_line_no)?;

    let mut atoms = Vec::new();
    let mut bonds = Vec::new();
    let mut id_map = HashMap::new();
    let mut saw_atoms = false;

    while let Some((ln, line)) = lines.next_line()? {
        if is_section(&line, MOLECULE) {
            lines.push_back((ln, line));
            break;
        }
        if is_section(&line, ATOM) {
            atoms = parse_atoms(lines, atom_count, &mut id_map)?;
            saw_atoms = true;
        } else if is_section(&line, BOND) {
            if !saw_atoms {
                return Err(Error::parse(
                    Format::Mol2,
                    ln,
                    "@<TRIPOS>BOND section precedes @<TRIPOS>ATOM",
                ));
            }
            bonds = parse_bonds(lines, bond_count, &id_map)?;
        }
    }

    if !saw_atoms && atom_count > 0 {
        return Err(Error::parse(
            Format::Mol2,
            lines.line_no(),
            "missing @<TRIPOS>ATOM section",
        ));
    }

    Ok(Some(Molecule { title, atoms, bonds }))
}

fn next_data_line<R: BufRead>(
    lines: &mut LineReader<R>,
) -> Result<Option<(usize, String)>, Error> {
    while let Some((ln, content)) = lines.next_line()? {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok(Some((ln, content)));
    }
    Ok(None)
}

/// Next record line of a section; section headers and EOF end it early.
fn next_record_line<R: BufRead>(
    lines: &mut LineReader<R>,
    section: &str,
) -> Result<(usize, String), Error> {
    match next_data_line(lines)? {
        Some((ln, content)) if content.trim_start().starts_with("@<TRIPOS>") => Err(Error::parse(
            Format::Mol2,
            ln,
            format!("{section} section ended before expected count"),
        )),
        Some(line) => Ok(line),
        None => Err(Error::parse(
            Format::Mol2,
            lines.line_no(),
            format!("{section} section ended before expected count"),
        )),
    }
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let parts: Vec<_> = line.split_whitespace().collect();
    let atoms = parts
        .first()
        .ok_or_else(|| Error::parse(Format::Mol2, line_no, "counts line is empty"))?
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Mol2, line_no, "invalid atom count in counts line"))?;
    let bonds = match parts.get(1) {
        Some(token) => token.parse::<usize>().map_err(|_| {
            Error::parse(Format::Mol2, line_no, "invalid bond count in counts line")
        })?,
        None => 0,
    };
    Ok((atoms, bonds))
}

fn parse_atoms<R: BufRead>(
    lines: &mut LineReader<R>,
    expected: usize,
    id_map: &mut HashMap<usize, usize>,
) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(expected);
    id_map.clear();

    for _ in 0..expected {
        let (ln, raw) = next_record_line(lines, "ATOM")?;
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(Error::parse(Format::Mol2, ln, "invalid ATOM line"));
        }

        let atom_id = parts[0]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, ln, "invalid atom id in ATOM line"))?;
        let coord = |token: &str, axis: &str| {
            token.parse::<f64>().map_err(|_| {
                Error::parse(
                    Format::Mol2,
                    ln,
                    format!("invalid {axis} coordinate in ATOM line"),
                )
            })
        };
        let x = coord(parts[2], "x")?;
        let y = coord(parts[3], "y")?;
        let z = coord(parts[4], "z")?;

        let element = util::guess_element_symbol(parts[5])
            .or_else(|| util::guess_element_symbol(parts[1]))
            .ok_or_else(|| Error::parse(Format::Mol2, ln, "unable to infer element"))?;

        if id_map.insert(atom_id, atoms.len()).is_some() {
            return Err(Error::parse(Format::Mol2, ln, "duplicate atom id"));
        }
        atoms.push(
            Atom::new(element, [x, y, z]).with_aromatic(util::is_aromatic_sybyl_type(parts[5])),
        );
    }

    Ok(atoms)
}

fn parse_bonds<R: BufRead>(
    lines: &mut LineReader<R>,
    expected: usize,
    id_map: &HashMap<usize, usize>,
) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(expected);

    for _ in 0..expected {
        let (ln, raw) = next_record_line(lines, "BOND")?;
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(Error::parse(Format::Mol2, ln, "invalid BOND line"));
        }

        let atom_index = |token: &str, which: &str| {
            token
                .parse::<usize>()
                .ok()
                .and_then(|id| id_map.get(&id).copied())
                .ok_or_else(|| {
                    Error::parse(
                        Format::Mol2,
                        ln,
                        format!("{which} atom of BOND line references unknown atom id"),
                    )
                })
        };
        let i = atom_index(parts[1], "first")?;
        let j = atom_index(parts[2], "second")?;

        let order = util::bond_order_from_mol2(parts[3])
            .ok_or_else(|| Error::parse(Format::Mol2, ln, "unsupported bond type in BOND line"))?;

        bonds.push(Bond::new(i, j, order));
    }

    Ok(bonds)
}

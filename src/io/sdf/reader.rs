use crate::io::util::{self, LineReader};
use crate::io::{Format, error::Error};
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
    types::BondOrder,
};
use std::io::BufRead;

const RECORD_END: &str = "$$$$";

/// Reads the next record, or `None` once only blank lines remain.
pub(crate) fn read_next<R: BufRead>(
    lines: &mut LineReader<R>,
) -> Result<Option<Molecule>, Error> {
    let mut header: Vec<(usize, String)> = Vec::with_capacity(4);
    while header.len() < 4 {
        match lines.next_line()? {
            Some(line) => header.push(line),
            None if header.iter().all(|(_, l)| l.trim().is_empty()) => return Ok(None),
            None => {
                return Err(Error::parse(
                    Format::Sdf,
                    lines.line_no(),
                    "SDF block must contain at least a header and counts line",
                ));
            }
        }
        // A blank counts line cannot start a record; slide over blank runs.
        if header.len() == 4 && header.iter().all(|(_, l)| l.trim().is_empty()) {
            header.remove(0);
        }
    }

    let title = header[0].1.trim().to_string();
    let (counts_line_no, counts_line) = &header[3];
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            *counts_line_no,
            "V3000 is not supported",
        ));
    }
    let (atom_count, bond_count) = parse_counts(counts_line, *counts_line_no)?;

    let atom_lines = take_lines(lines, atom_count, "atoms")?;
    let bond_lines = take_lines(lines, bond_count, "bonds")?;

    let mut atoms = parse_atoms(&atom_lines)?;
    let bonds = parse_bonds(&bond_lines, atom_count)?;
    for bond in bonds.iter().filter(|b| b.order == BondOrder::Aromatic) {
        atoms[bond.i].aromatic = true;
        atoms[bond.j].aromatic = true;
    }

    skip_to_record_end(lines)?;

    Ok(Some(Molecule { title, atoms, bonds }))
}

fn take_lines<R: BufRead>(
    lines: &mut LineReader<R>,
    count: usize,
    what: &str,
) -> Result<Vec<(usize, String)>, Error> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        match lines.next_line()? {
            Some((ln, line)) if line.trim() == RECORD_END => {
                return Err(Error::parse(
                    Format::Sdf,
                    ln,
                    format!("record ended before all {what} were specified"),
                ));
            }
            Some(line) => out.push(line),
            None => {
                return Err(Error::parse(
                    Format::Sdf,
                    lines.line_no(),
                    format!("SDF block ended before all {what} were specified"),
                ));
            }
        }
    }
    Ok(out)
}

/// Properties block, `M  END` and data items carry nothing we compare.
fn skip_to_record_end<R: BufRead>(lines: &mut LineReader<R>) -> Result<(), Error> {
    while let Some((_, line)) = lines.next_line()? {
        if line.trim() == RECORD_END {
            break;
        }
    }
    Ok(())
}

/// Fixed-width `aaabbb` fields, whitespace-separated as a fallback.
fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let fixed = |range: std::ops::Range<usize>| {
        line.get(range)
            .and_then(|field| field.trim().parse::<usize>().ok())
    };
    if let (Some(atoms), Some(bonds)) = (fixed(0..3), fixed(3..6)) {
        return Ok((atoms, bonds));
    }

    let tokens: Vec<_> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::parse(
            Format::Sdf,
            line_no,
            "counts line must contain atom and bond counts",
        ));
    }
    let atoms = tokens[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = tokens[1]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[(usize, String)]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<40}");
        let coord = |range: std::ops::Range<usize>, axis: &str| {
            padded
                .get(range)
                .and_then(|field| field.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    Error::parse(
                        Format::Sdf,
                        *ln,
                        format!("invalid {axis} coordinate in atom line"),
                    )
                })
        };
        let x = coord(0..10, "x")?;
        let y = coord(10..20, "y")?;
        let z = coord(20..30, "z")?;

        let element_token = padded.get(31..34).unwrap_or_default().trim();
        let element = util::guess_element_symbol(element_token)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unable to infer element symbol"))?;
        atoms.push(Atom::new(element, [x, y, z]));
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[(usize, String)], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<9}");
        let field = |range: std::ops::Range<usize>, what: &str| {
            padded
                .get(range)
                .and_then(|f| f.trim().parse::<i64>().ok())
                .ok_or_else(|| Error::parse(Format::Sdf, *ln, format!("invalid {what}")))
        };
        let a1 = field(0..3, "first atom index")?;
        let a2 = field(3..6, "second atom index")?;
        let order_val = field(6..9, "bond order value")?;

        let order = i32::try_from(order_val)
            .ok()
            .and_then(util::bond_order_from_ctfile)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported bond order in bond line"))?;

        let in_range = |a: i64| a >= 1 && (a as usize) <= atom_count;
        if !in_range(a1) || !in_range(a2) {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }

        bonds.push(Bond::new(a1 as usize - 1, a2 as usize - 1, order));
    }
    Ok(bonds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;
    use std::io::Cursor;

    const ETHANOL: &str = "\
ethanol
  hand-written

  3  2  0  0  0  0  0  0  0  0999 V2000
   -1.2700    0.2480    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.1390   -0.3080    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.0360    0.7890    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
> <SOURCE>
test

$$$$
";

    fn read_all(input: &str) -> Result<Vec<Molecule>, Error> {
        let mut lines = LineReader::new(Cursor::new(input));
        let mut out = Vec::new();
        while let Some(mol) = read_next(&mut lines)? {
            out.push(mol);
        }
        Ok(out)
    }

    #[test]
    fn reads_single_record_with_data_items() {
        let mols = read_all(ETHANOL).unwrap();
        assert_eq!(mols.len(), 1);
        let mol = &mols[0];
        assert_eq!(mol.title, "ethanol");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.atoms[2].element, Element::O);
        assert_eq!(mol.atoms[1].position, [0.139, -0.308, 0.0]);
        assert_eq!(mol.bonds, vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(1, 2, BondOrder::Single),
        ]);
    }

    #[test]
    fn reads_consecutive_records() {
        let input = format!("{ETHANOL}{}", ETHANOL.replacen("ethanol", "second", 1));
        let mols = read_all(&input).unwrap();
        let titles: Vec<_> = mols.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["ethanol", "second"]);
    }

    #[test]
    fn last_record_may_omit_terminator() {
        let input = ETHANOL.replace("$$$$\n", "");
        assert_eq!(read_all(&input).unwrap().len(), 1);
    }

    #[test]
    fn trailing_blank_lines_are_not_a_record() {
        let input = format!("{ETHANOL}\n\n");
        assert_eq!(read_all(&input).unwrap().len(), 1);
        let input = format!("{ETHANOL}\n\n\n\n\n\n");
        assert_eq!(read_all(&input).unwrap().len(), 1);
        let input = format!("{ETHANOL}  \n\t\n\n\n\n\n\n\n\n");
        assert_eq!(read_all(&input).unwrap().len(), 1);
        assert!(read_all("").unwrap().is_empty());
    }

    #[test]
    fn aromatic_bonds_mark_their_atoms() {
        let input = ETHANOL.replace("  1  2  1  0", "  1  2  4  0");
        let mol = read_all(&input).unwrap().remove(0);
        assert_eq!(mol.bonds[0].order, BondOrder::Aromatic);
        assert!(mol.bonds[0].aromatic);
        assert!(mol.atoms[0].aromatic && mol.atoms[1].aromatic);
        assert!(!mol.atoms[2].aromatic);
    }

    #[test]
    fn zero_atom_record_is_returned_as_empty() {
        let input = "empty\n\n\n  0  0  0  0  0  0  0  0  0  0999 V2000\nM  END\n$$$$\n";
        let mols = read_all(input).unwrap();
        assert_eq!(mols.len(), 1);
        assert!(mols[0].is_empty());
    }

    #[test]
    fn blank_lines_followed_by_text_are_still_an_error() {
        let input = format!("{ETHANOL}\n\n\n\n\nstray\n");
        let err = read_all(&input).unwrap_err();
        assert!(matches!(err, Error::Parse { format: Format::Sdf, .. }));
    }

    #[test]
    fn rejects_v3000() {
        let input = "v3\n\n\n  0  0  0     0  0            999 V3000\nM  END\n$$$$\n";
        let err = read_all(input).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, .. }));
    }

    #[test]
    fn reports_truncated_atom_block() {
        let input = "short\n\n\n  3  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\n$$$$\n";
        let err = read_all(input).unwrap_err();
        assert!(matches!(err, Error::Parse { format: Format::Sdf, line: 6, .. }));
    }

    #[test]
    fn rejects_bond_to_missing_atom() {
        let input = ETHANOL.replace("  2  3  1  0", "  2  9  1  0");
        let err = read_all(&input).unwrap_err();
        assert!(err.to_string().contains("outside declared range"));
    }

    #[test]
    fn rejects_unknown_bond_order() {
        let input = ETHANOL.replace("  2  3  1  0", "  2  3  8  0");
        assert!(read_all(&input).is_err());
    }
}

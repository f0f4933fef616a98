use super::error::Error;
use crate::model::types::{BondOrder, Element};
use std::io::BufRead;
use std::str::FromStr;

/// Line-numbered reader with one line of push-back, shared by the
/// record-oriented parsers.
pub struct LineReader<R> {
    inner: R,
    line_no: usize,
    pending: Option<(usize, String)>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_no: 0,
            pending: None,
        }
    }

    /// Next line without its terminator, with its 1-based line number.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>, Error> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some((self.line_no, buf)))
    }

    pub fn push_back(&mut self, line: (usize, String)) {
        self.pending = Some(line);
    }

    #[inline]
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

/// Infers an element from an atom symbol, SYBYL atom type or atom name.
///
/// Accepts any letter case (`CL`, `cl`), strips SYBYL suffixes (`C.ar`,
/// `N.pl3`) and trailing digits (`C12`), and maps the hydrogen isotopes
/// `D` and `T` to hydrogen.
pub fn guess_element_symbol(token: &str) -> Option<Element> {
    let base = token.split('.').next().unwrap_or_default();
    let letters: String = base
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }

    match letters.to_ascii_uppercase().as_str() {
        "D" | "T" => return Some(Element::H),
        "LP" | "DU" | "ANY" | "HAL" | "HET" => return None,
        _ => {}
    }

    let mut chars = letters.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();

    if rest.len() <= 1 {
        let symbol = format!("{first}{rest}");
        if let Ok(element) = Element::from_str(&symbol) {
            return Some(element);
        }
    }
    Element::from_str(&first.to_string()).ok()
}

pub fn bond_order_from_ctfile(value: i32) -> Option<BondOrder> {
    match value {
        1 => Some(BondOrder::Single),
        2 => Some(BondOrder::Double),
        3 => Some(BondOrder::Triple),
        4 => Some(BondOrder::Aromatic),
        _ => None,
    }
}

pub fn bond_order_from_mol2(token: &str) -> Option<BondOrder> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "am" => Some(BondOrder::Single),
        "2" => Some(BondOrder::Double),
        "3" => Some(BondOrder::Triple),
        "ar" => Some(BondOrder::Aromatic),
        "du" | "un" | "nc" => Some(BondOrder::Single),
        _ => None,
    }
}

/// `true` for SYBYL atom types flagged aromatic (`C.ar`, `N.ar`).
pub fn is_aromatic_sybyl_type(token: &str) -> bool {
    token
        .split_once('.')
        .is_some_and(|(_, suffix)| suffix.eq_ignore_ascii_case("ar"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn guesses_elements_from_symbols_and_types() {
        assert_eq!(guess_element_symbol("C"), Some(Element::C));
        assert_eq!(guess_element_symbol("CL"), Some(Element::Cl));
        assert_eq!(guess_element_symbol("br"), Some(Element::Br));
        assert_eq!(guess_element_symbol("C.ar"), Some(Element::C));
        assert_eq!(guess_element_symbol("N.pl3"), Some(Element::N));
        assert_eq!(guess_element_symbol("Cl1"), Some(Element::Cl));
        assert_eq!(guess_element_symbol("D"), Some(Element::H));
    }

    #[test]
    fn falls_back_to_first_letter_for_atom_names() {
        assert_eq!(guess_element_symbol("CA"), Some(Element::Ca));
        assert_eq!(guess_element_symbol("OXT"), Some(Element::O));
        assert_eq!(guess_element_symbol("HG12"), Some(Element::Hg));
    }

    #[test]
    fn rejects_placeholders() {
        assert_eq!(guess_element_symbol("LP"), None);
        assert_eq!(guess_element_symbol("Du"), None);
        assert_eq!(guess_element_symbol("12"), None);
        assert_eq!(guess_element_symbol(""), None);
    }

    #[test]
    fn maps_bond_orders() {
        assert_eq!(bond_order_from_ctfile(1), Some(BondOrder::Single));
        assert_eq!(bond_order_from_ctfile(4), Some(BondOrder::Aromatic));
        assert_eq!(bond_order_from_ctfile(8), None);
        assert_eq!(bond_order_from_mol2("ar"), Some(BondOrder::Aromatic));
        assert_eq!(bond_order_from_mol2("am"), Some(BondOrder::Single));
        assert_eq!(bond_order_from_mol2("2"), Some(BondOrder::Double));
        assert_eq!(bond_order_from_mol2("x"), None);
    }

    #[test]
    fn detects_aromatic_sybyl_types() {
        assert!(is_aromatic_sybyl_type("C.ar"));
        assert!(is_aromatic_sybyl_type("N.AR"));
        assert!(!is_aromatic_sybyl_type("C.3"));
        assert!(!is_aromatic_sybyl_type("Cl"));
    }

    #[test]
    fn line_reader_tracks_numbers_and_push_back() {
        let mut lines = LineReader::new(Cursor::new("first\r\nsecond\nthird"));
        assert_eq!(lines.next_line().unwrap(), Some((1, "first".to_string())));
        let second = lines.next_line().unwrap().unwrap();
        assert_eq!(second, (2, "second".to_string()));
        lines.push_back(second);
        assert_eq!(lines.next_line().unwrap(), Some((2, "second".to_string())));
        assert_eq!(lines.next_line().unwrap(), Some((3, "third".to_string())));
        assert_eq!(lines.next_line().unwrap(), None);
        assert_eq!(lines.line_no(), 3);
    }
}

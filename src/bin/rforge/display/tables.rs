use std::collections::HashMap;
use std::io::{self, Write};

use rms_forge::rms::BatchSummary;
use rms_forge::{Element, Molecule, RmsConfig};

use crate::config::pairing_description;
use crate::util::text::{format_rmsd, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

const MAX_DISTRIBUTION_ROWS: usize = 10;

pub fn print_reference_info(reference: &Molecule) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let title = if reference.title.is_empty() {
        "(untitled)".to_string()
    } else {
        reference.title.clone()
    };
    let rows = vec![
        ("Title", title),
        ("Total Atoms", reference.atom_count().to_string()),
        ("Heavy Atoms", reference.heavy_atom_count().to_string()),
        ("Bonds", reference.bond_count().to_string()),
    ];
    print_kv_table(&mut out, "First Reference", &rows);
    print_element_distribution(&mut out, reference);
}

pub fn print_summary(summary: &BatchSummary, config: &RmsConfig) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Pairing", pairing_description(config).to_string()),
        (
            "Superposition",
            if config.minimize { "on" } else { "off" }.to_string(),
        ),
        ("Compared", summary.compared.to_string()),
        ("Incomparable", summary.incomparable.to_string()),
    ];
    if let Some(best) = summary.best {
        rows.push(("Best RMSD (Å)", format_rmsd(best)));
    }
    if let Some(worst) = summary.worst {
        rows.push(("Worst RMSD (Å)", format_rmsd(worst)));
    }

    print_kv_table(&mut out, "Comparison Summary", &rows);
}

fn print_element_distribution(out: &mut impl Write, molecule: &Molecule) {
    let mut element_counts: HashMap<Element, usize> = HashMap::new();
    for atom in molecule.atoms.iter().filter(|a| !a.element.is_hydrogen()) {
        *element_counts.entry(atom.element).or_insert(0) += 1;
    }
    if element_counts.is_empty() {
        return;
    }

    let total: usize = element_counts.values().sum();
    let mut sorted: Vec<_> = element_counts
        .into_iter()
        .map(|(e, c)| (e.symbol().to_string(), c))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    print_distribution_table(out, "Heavy Atom Elements", &sorted, total);
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{mid}{}{right}",
            "─".repeat(name_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(dist_w + 2)
        )
    };

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        "Element", "Count", "Distribution",
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for (name, count) in data.iter().take(MAX_DISTRIBUTION_ROWS) {
        let pct = (*count as f64 / total as f64) * 100.0;
        let dist_cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            truncate(name, name_w),
            count,
            dist_cell,
        );
    }

    if data.len() > MAX_DISTRIBUTION_ROWS {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            "...",
            "...",
            format!("({} more elements)", data.len() - MAX_DISTRIBUTION_ROWS),
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{right}",
            "─".repeat(key_w + 2),
            "─".repeat(val_w + 2)
        )
    };

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
        "Metric", "Value",
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

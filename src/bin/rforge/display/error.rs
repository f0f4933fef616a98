use std::io::{self, Write};

use anyhow::Error;
use rms_forge::io::{Error as IoError, Format};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = Vec::new();

    if let Some(io_err) = err.chain().find_map(|e| e.downcast_ref::<IoError>()) {
        structure_hints(io_err, &mut hints);
    } else if let Some(source) = err.chain().find_map(|e| e.downcast_ref::<io::Error>()) {
        std_io_hints(source, &mut hints);
    } else {
        fallback_hints(&error_chain_text(err), &mut hints);
    }

    hints
}

fn structure_hints(err: &IoError, hints: &mut Vec<String>) {
    match err {
        IoError::Io { source } => std_io_hints(source, hints),

        IoError::Parse { format, line, .. } => {
            hints.push(format!(
                "Parser encountered an issue near line {line} in {format} format"
            ));
            hints.push("Inspect the file around that line for malformed entries".into());
            hints.push("Try --reffmt / --testfmt to ensure correct format detection".into());
            match format {
                Format::Mol2 => {
                    hints.push("MOL2: Verify @<TRIPOS>ATOM and @<TRIPOS>BOND sections".into());
                    hints.push("MOL2: Check the atom and bond counts on the molecule line".into());
                }
                Format::Sdf => {
                    hints.push("SDF: Only V2000 connection tables are supported".into());
                    hints.push("SDF: Check atom block and bond block formatting".into());
                }
            }
        }

        IoError::NoRecord(format) => {
            hints.push(format!("The input contains no {format} structures"));
            hints.push("Verify the file is not empty and the format is correct".into());
        }

        IoError::UnsupportedFormat(_) => {
            hints.push("Supported input formats: sdf (.sdf, .mol, .sd), mol2".into());
            hints.push("Compressed files must end in .gz after the format extension".into());
        }
    }
}

fn std_io_hints(source: &io::Error, hints: &mut Vec<String>) {
    use std::io::ErrorKind;

    let (first, second) = match source.kind() {
        ErrorKind::NotFound => (
            "File or directory not found",
            "Check the path spelling and ensure the file exists",
        ),
        ErrorKind::PermissionDenied => (
            "Permission denied accessing the file",
            "Check file permissions with `ls -la`",
        ),
        ErrorKind::InvalidData => (
            "File contains invalid or corrupt data",
            "A truncated .gz file or non-UTF-8 text can cause this",
        ),
        ErrorKind::UnexpectedEof => (
            "Unexpected end of file encountered",
            "The file may be truncated or incomplete",
        ),
        ErrorKind::BrokenPipe => (
            "Broken pipe: output consumer terminated",
            "This may occur when piping to commands like `head`",
        ),
        _ => (
            "I/O operation failed",
            "Check file path, permissions, and disk space",
        ),
    };
    hints.push(first.into());
    hints.push(second.into());
}

fn fallback_hints(msg: &str, hints: &mut Vec<String>) {
    if msg.contains("terminal") || msg.contains("stdin") {
        hints.push("Pass '-' as a file name to read from stdin".into());
        hints.push("Stdin input needs --reffmt or --testfmt".into());
    } else if msg.contains("cannot infer format") {
        hints.push("Supported extensions: .sdf, .mol, .sd, .mol2 (optionally .gz)".into());
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn parse_errors_point_at_line_and_format() {
        let err = Err::<(), _>(IoError::parse(Format::Sdf, 12, "bad atom"))
            .context("Failed to read test structures")
            .unwrap_err();
        let hints = collect_hints(&err);
        assert!(hints[0].contains("line 12"));
        assert!(hints.iter().any(|h| h.contains("V2000")));
    }

    #[test]
    fn missing_files_get_io_hints() {
        let err = anyhow::Error::new(io::Error::new(io::ErrorKind::NotFound, "gone"))
            .context("Failed to open input file: x.sdf");
        let hints = collect_hints(&err);
        assert_eq!(hints[0], "File or directory not found");
    }

    #[test]
    fn format_inference_failures_list_extensions() {
        let err = anyhow::anyhow!("Cannot infer format from 'a.xyz'. Use --reffmt to specify.");
        let hints = collect_hints(&err);
        assert!(hints[0].contains(".mol2"));
    }

    #[test]
    fn chain_text_is_lowercased() {
        let err = anyhow::anyhow!("Inner").context("Outer");
        assert_eq!(error_chain_text(&err), "outer\ninner");
    }
}

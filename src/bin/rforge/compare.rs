use std::io::Write;
use std::iter;

use anyhow::{Context, Result, bail};
use rms_forge::rms::{self, Comparison};
use rms_forge::{Molecule, RmsConfig};

use crate::cli::Cli;
use crate::config::{build_rms_config, pairing_description};
use crate::display::{Context as DisplayContext, Progress, print_reference_info, print_summary};
use crate::io::{
    StructureStream, create_output, input_format, is_stdin, open_structures, stdin_is_tty,
};
use crate::util::text::format_rmsd;

const TOTAL_STEPS: u8 = 2;

pub fn run_compare(cli: Cli, ctx: DisplayContext) -> Result<()> {
    if is_stdin(&cli.reference) && is_stdin(&cli.test) {
        bail!("Reference and test cannot both be read from stdin");
    }
    if (is_stdin(&cli.reference) || is_stdin(&cli.test)) && stdin_is_tty() {
        bail!(
            "Input '-' selects stdin, but stdin is a terminal.\n\nUsage: rforge <REFERENCE> <TEST> or pipe data via stdin."
        );
    }

    let reference_format = input_format(&cli.reference, cli.io.reference_format, "--reffmt")?;
    let test_format = input_format(&cli.test, cli.io.test_format, "--testfmt")?;
    let config = build_rms_config(&cli);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Opening structure files");
    let mut references = open_structures(&cli.reference, reference_format)?;
    let tests = open_structures(&cli.test, test_format)?;

    // Peek at the first reference so the summary can describe it; it is
    // chained back in front of the stream below.
    let first_reference = references
        .next_molecule()
        .context("Failed to read reference structures")?;
    progress.complete_step(
        "Opening structure files",
        &[
            format!("Reference: {} ({reference_format})", cli.reference.display()),
            format!("Test: {} ({test_format})", cli.test.display()),
        ],
    );

    let Some(first_reference) = first_reference else {
        log::warn!("{}: no reference structures", cli.reference.display());
        progress.finish();
        return Ok(());
    };
    if progress.is_interactive() {
        print_reference_info(&first_reference);
    }

    progress.step("Comparing structures");
    let mut out = create_output(cli.io.output.as_deref())?;
    let summary = compare_streams(
        first_reference,
        references,
        tests,
        &config,
        &mut out,
        &mut progress,
    )?;
    out.flush().context("Failed to flush RMSD output")?;

    progress.complete_step(
        "Comparing structures",
        &[
            format!("Pairing: {}", pairing_description(&config)),
            format!(
                "{} comparisons{}",
                summary.compared,
                if config.minimize { ", superposed" } else { "" }
            ),
        ],
    );

    if ctx.interactive {
        print_summary(&summary, &config);
    }
    progress.finish();

    Ok(())
}

fn compare_streams(
    first_reference: Molecule,
    references: StructureStream,
    tests: StructureStream,
    config: &RmsConfig,
    out: &mut impl Write,
    progress: &mut Progress,
) -> Result<rms::BatchSummary> {
    let references = iter::once(Ok(first_reference)).chain(
        references.map(|r| r.context("Failed to read reference structures")),
    );
    let tests = tests.map(|r| r.context("Failed to read test structures"));

    rms::run(references, tests, config, |comparison: &Comparison| {
        write_comparison(out, comparison)?;
        progress.update(&format!(
            "{} ({})",
            display_title(&comparison.title),
            format_rmsd(comparison.rmsd)
        ));
        Ok(())
    })
}

fn write_comparison(out: &mut impl Write, comparison: &Comparison) -> Result<()> {
    writeln!(
        out,
        "RMSD {} {}",
        comparison.title,
        format_rmsd(comparison.rmsd)
    )
    .context("Failed to write RMSD output")
}

fn display_title(title: &str) -> &str {
    if title.is_empty() { "(untitled)" } else { title }
}

//! Driving one or more reference structures against a stream of test
//! structures.

use log::{debug, info};

use super::config::{PairingMode, RmsConfig};
use super::normalize::normalize;
use super::Matcher;
use crate::model::molecule::Molecule;

/// Result of comparing one test structure against its reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Title of the test structure.
    pub title: String,
    pub heavy_atoms: usize,
    /// Minimum RMSD, `f64::INFINITY` if the structures are incomparable.
    pub rmsd: f64,
}

impl Comparison {
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.rmsd.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchSummary {
    pub compared: usize,
    pub incomparable: usize,
    pub best: Option<f64>,
    pub worst: Option<f64>,
}

impl BatchSummary {
    fn record(&mut self, comparison: &Comparison) {
        self.compared += 1;
        if !comparison.is_matched() {
            self.incomparable += 1;
            return;
        }
        let value = comparison.rmsd;
        self.best = Some(self.best.map_or(value, |b| b.min(value)));
        self.worst = Some(self.worst.map_or(value, |w| w.max(value)));
    }
}

/// Compares structures from `references` against structures from `tests`.
///
/// With [`PairingMode::Paired`] the *i*-th reference is compared with the
/// *i*-th test structure; with [`PairingMode::FirstReference`] the current
/// reference is compared with every following test structure. A test record
/// without atoms moves on to the next reference, which picks up the test
/// stream after it. The run ends once either stream is exhausted. `sink`
/// receives each comparison as soon as it is computed. The first read error
/// from either stream aborts the run.
pub fn run<R, T, E, F>(
    references: R,
    tests: T,
    config: &RmsConfig,
    mut sink: F,
) -> Result<BatchSummary, E>
where
    R: IntoIterator<Item = Result<Molecule, E>>,
    T: IntoIterator<Item = Result<Molecule, E>>,
    F: FnMut(&Comparison) -> Result<(), E>,
{
    let mut summary = BatchSummary::default();
    let mut references = references.into_iter();
    let mut tests = tests.into_iter();

    'references: while let Some(reference) = references.next().transpose()? {
        let matcher = Matcher::new(&reference);
        debug!(
            "reference '{}' compiled: {} heavy atoms",
            reference.title,
            matcher.reference().atom_count()
        );

        loop {
            let Some(mut test) = tests.next().transpose()? else {
                break 'references;
            };
            if test.is_empty() {
                debug!("empty test record, moving past '{}'", reference.title);
                break;
            }

            normalize(&mut test);
            let comparison = Comparison {
                rmsd: matcher.compute_rmsd(&test, config.minimize),
                heavy_atoms: test.atom_count(),
                title: test.title,
            };
            summary.record(&comparison);
            sink(&comparison)?;

            if config.pairing == PairingMode::Paired {
                break;
            }
        }
    }

    info!(
        "compared {} structures ({} incomparable)",
        summary.compared, summary.incomparable
    );
    Ok(summary)
}

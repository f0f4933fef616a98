use std::path::Path;

use anyhow::{Result, bail};
use rms_forge::io::Format;

use crate::cli::InputFormat;

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Explicit `--reffmt`/`--testfmt` wins over the file extension.
pub fn input_format(path: &Path, explicit: Option<InputFormat>, flag: &str) -> Result<Format> {
    if let Some(fmt) = explicit {
        return Ok(fmt.into());
    }

    if is_stdin(path) {
        bail!("Reading from stdin requires {flag}");
    }

    Format::from_path(path).map_err(|e| {
        anyhow::Error::new(e).context(format!(
            "Cannot infer format from '{}'. Use {flag} to specify.",
            path.display()
        ))
    })
}

use rms_forge::{PairingMode, RmsConfig};

use crate::cli::Cli;

pub fn build_rms_config(cli: &Cli) -> RmsConfig {
    RmsConfig {
        minimize: cli.minimize,
        pairing: if cli.first_only {
            PairingMode::FirstReference
        } else {
            PairingMode::Paired
        },
    }
}

pub fn pairing_description(config: &RmsConfig) -> &'static str {
    match config.pairing {
        PairingMode::Paired => "pairwise (reference i vs test i)",
        PairingMode::FirstReference => "first reference vs all tests",
    }
}

/// Log filter for `-v` repetitions; `RUST_LOG` takes precedence when set.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, 0) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn maps_flags_to_config() {
        let cli = Cli::try_parse_from(["rforge", "a.sdf", "b.sdf", "--minimize"]).unwrap();
        let config = build_rms_config(&cli);
        assert!(config.minimize);
        assert_eq!(config.pairing, PairingMode::Paired);

        let cli = Cli::try_parse_from(["rforge", "a.sdf", "b.sdf", "--first-only"]).unwrap();
        let config = build_rms_config(&cli);
        assert!(!config.minimize);
        assert_eq!(config.pairing, PairingMode::FirstReference);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter(0, false), "warn");
        assert_eq!(log_filter(0, true), "error");
        assert_eq!(log_filter(1, true), "info");
        assert_eq!(log_filter(2, false), "debug");
        assert_eq!(log_filter(7, false), "trace");
    }
}

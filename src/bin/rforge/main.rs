use std::process::ExitCode;

mod cli;
mod compare;
mod config;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();

    let filter = config::log_filter(cli.io.verbose, cli.io.quiet);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
    .format_timestamp(None)
    .init();

    let ctx = display::Context::detect().with_quiet(cli.io.quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match compare::run_compare(cli, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

mod expected;
mod lookup;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "hicexp";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Expected contact density and observed/expected scale factors for Hi-C data.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase logging verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(expected::cli::create_expected_cli())
        .subcommand(lookup::cli::create_lookup_cli())
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // EXPECTED
        //
        Some((expected::cli::EXPECTED_CMD, matches)) => {
            expected::handlers::run_expected(matches)?;
        }

        //
        // LOOKUP
        //
        Some((lookup::cli::LOOKUP_CMD, matches)) => {
            lookup::handlers::run_lookup(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

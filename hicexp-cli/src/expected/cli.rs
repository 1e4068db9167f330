use clap::{Arg, Command, arg, value_parser};

pub const EXPECTED_CMD: &str = "expected";

pub fn create_expected_cli() -> Command {
    Command::new(EXPECTED_CMD)
        .about("Compute a genome-wide expected contact density and per-chromosome scale factors.")
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(false)
                .help("Path to chrom.sizes file (required here or in --config)"),
        )
        .arg(
            arg!(--contacts <CONTACTS>)
                .required(false)
                .help("Path to contacts file `chr1 pos1 chr2 pos2 [weight]`, or '-' for stdin"),
        )
        .arg(
            Arg::new("grid-size")
                .long("grid-size")
                .required(false)
                .value_parser(value_parser!(u32))
                .help("Bin width in base pairs, or in fragments with --fragment-counts"),
        )
        .arg(
            arg!(--norm <NORM>)
                .required(false)
                .help("Normalization type tag carried into the output (default: NONE)"),
        )
        .arg(
            arg!(--unit <UNIT>)
                .required(false)
                .help("Unit label for the output (default: BP, or FRAG in fragment mode)"),
        )
        .arg(
            Arg::new("fragment-counts")
                .long("fragment-counts")
                .required(false)
                .help("Path to restriction-fragment counts per chromosome (enables fragment mode)"),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("Path to a .toml config; command line flags take precedence"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}

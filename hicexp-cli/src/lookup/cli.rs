use clap::{Arg, Command, arg, value_parser};

pub const LOOKUP_CMD: &str = "lookup";

pub fn create_lookup_cli() -> Command {
    Command::new(LOOKUP_CMD)
        .about("Query a computed expected density for a chromosome and binned distance.")
        .arg(
            arg!(--expected <EXPECTED>)
                .required(true)
                .help("Path to the JSON written by the expected command"),
        )
        .arg(
            arg!(--chrom <CHROM>)
                .required(true)
                .value_parser(value_parser!(u32))
                .help("Chromosome index"),
        )
        .arg(
            Arg::new("distance")
                .long("distance")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(usize))
                .help("Distance(s) from the diagonal, in bins"),
        )
}

use std::{io, process::exit};
use clap::Parser;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use kmst::cli::{self, Args};





macro_rules! pretty_unwrap {
    ($result: expr) => {
        match $result {
            Ok(value) => value,
            Err(error) => {
                error!("{}", error);
                exit(1);
            },
        }
    };
}





fn main() {
    let args: Args = Args::parse();
    let log_level_filter: LevelFilter = args.log_level.parse().unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    pretty_unwrap!(cli::run(&args));
}

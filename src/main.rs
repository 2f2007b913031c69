use std::process::ExitCode;

use clap::Parser;
use pixelpad::{cli, logger};

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();

    // Session log (overwrites the previous session's log)
    logger::init();
    logger::set_echo(args.verbose);

    cli::run(args)
}

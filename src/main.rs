use clap::Parser;
use dirsort::cli::{Cli, run};
use dirsort::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}

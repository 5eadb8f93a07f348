mod logging;

use taxifare_core::cmd::cli::Cli;
use taxifare_core::cmd::config::Config;

use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Could not install logger: {e}");
    }

    let cfg: Config = cli.into_config();
    if let Err(e) = cfg.run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

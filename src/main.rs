//! CLI entry point for the photo-mosaic builder

use clap::Parser;
use photomosaic::io::cli::{Cli, MosaicRunner};
use photomosaic::io::logging::init_logging;

fn main() -> photomosaic::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut runner = MosaicRunner::new(cli);
    runner.process()
}

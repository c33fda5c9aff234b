//! cmstage - staged CMake driver
//!
//! Entry point for the cmstage command-line application.

use clap::Parser;

use cmstage::cli::output::display_error;
use cmstage::cli::Cli;

fn main() {
    let cli = Cli::parse();
    let output_config = cli.output_config();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(output_config.log_level().into()),
        )
        .init();

    // Run the command and handle errors
    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
}

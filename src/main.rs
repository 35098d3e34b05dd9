use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Smallest enclosing ball of a point cloud in arbitrary dimension.
///
/// Reads one point per line (comma-separated coordinates) and writes
/// `squared_radius, center...` as a single line. Set RUST_LOG=debug for the
/// support points and accuracy report.
#[derive(Parser, Debug)]
#[command(name = "myminiball", version, about)]
struct Cli {
    /// Comma-separated data file, one point per row
    #[arg(value_name = "DATA_FILE")]
    input: PathBuf,

    /// File receiving the squared radius and center
    #[arg(value_name = "OUTPUT_FILE")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    log::debug!("data filename: {}", cli.input.display());
    log::debug!("output filename: {}", cli.output.display());

    match myminiball::run(&cli.input, &cli.output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}

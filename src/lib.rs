//! Smallest enclosing ball of a comma-separated point file.
//!
//! [`run`] reads the points, builds the ball with [`miniball_d`] and writes
//! `squared_radius, center...` to the output file.

pub mod dataset;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use miniball_d::{BuiltMiniball, Miniball, MiniballError};
use thiserror::Error;

use dataset::{read_points, write_ball, DatasetError};

/// Errors from a file-to-file run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unable to open data file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data file {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("unable to compute ball: {0}")]
    Build(#[from] MiniballError),

    #[error("unable to write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compute the smallest enclosing ball of the points in `input` and write it to
/// `output`.
pub fn run(input: &Path, output: &Path) -> Result<BuiltMiniball, RunError> {
    let file = File::open(input).map_err(|source| RunError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;
    let data = read_points(BufReader::new(file)).map_err(|source| RunError::Dataset {
        path: input.to_path_buf(),
        source,
    })?;
    log::debug!(
        "data file {}: {} points of dimension {}",
        input.display(),
        data.points.len(),
        data.dim
    );

    let mut mb = Miniball::new(data.dim);
    for p in &data.points {
        mb.check_in(p);
    }

    log::debug!("constructing miniball over {} points", mb.nr_points());
    let start = Instant::now();
    let built = mb.build()?;
    log::debug!("constructed in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    report(&built);

    let write_err = |source| RunError::WriteOutput {
        path: output.to_path_buf(),
        source,
    };
    let file = File::create(output).map_err(write_err)?;
    write_ball(BufWriter::new(file), &built.ball()).map_err(write_err)?;

    Ok(built)
}

/// Log center, radius, support points and the certificate at debug level.
fn report(mb: &BuiltMiniball) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    log::debug!("center:         {:?}", mb.center());
    log::debug!("squared radius: {}", mb.squared_radius());
    log::debug!("{} support points:", mb.nr_support_points());
    for p in mb.support_points() {
        log::debug!("  {:?}", p);
    }

    let cert = mb.accuracy();
    log::debug!("relative accuracy: {:e}", cert.accuracy);
    log::debug!("optimality slack:  {:e}", cert.slack);
    log::debug!(
        "validity: {}",
        if mb.is_valid() { "ok" } else { "possibly invalid" }
    );
}

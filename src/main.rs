//! tiff-inspect - Dump the structure of TIFF and BigTIFF files.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiff_inspect::{
    config::{Config, OutputFormat},
    dump, TiffDocument,
};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let document = match TiffDocument::open(&config.file, config.parser_options()) {
        Ok(document) => document,
        Err(e) => {
            error!(
                "Failed to open the TIFF file {}: {}",
                config.file.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    for e in document.errors() {
        warn!("{}", e);
    }

    if let Err(e) = write_document(&config, &document) {
        error!("Failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn write_document(config: &Config, document: &TiffDocument) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match config.format {
        OutputFormat::Text => dump::write_text(&mut out, document, config.max_values)?,
        OutputFormat::Json => dump::write_json(&mut out, document)?,
    }
    out.flush()
}

/// Initialize the tracing subscriber. Logs go to stderr so the dump on stdout stays clean.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tiff_inspect=debug"
    } else {
        "tiff_inspect=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

//! Configuration for the `tiff-inspect` command-line tool.
//!
//! Options come from command-line arguments, then environment variables with
//! the `TIFF_INSPECT_` prefix, then defaults.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use tiff_inspect::config::Config;
//!
//! let config = Config::parse();
//! let document = TiffDocument::open(&config.file, config.parser_options())?;
//! ```
//!
//! # Environment Variables
//!
//! - `TIFF_INSPECT_PARSE_SUB_IFDS` - Follow SubIFDs into child directories (default: true)
//! - `TIFF_INSPECT_MAX_IFDS` - Maximum number of directories to read (default: 4096)
//! - `TIFF_INSPECT_MAX_DECODED_VALUES` - Maximum number of values decoded per file (default: 4194304)
//! - `TIFF_INSPECT_FORMAT` - Output format, `text` or `json` (default: text)
//! - `TIFF_INSPECT_MAX_VALUES` - Values printed per entry in text output (default: 16)

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::format::tiff::{ParserOptions, DEFAULT_MAX_DECODED_VALUES, DEFAULT_MAX_IFDS};

// =============================================================================
// Default Values
// =============================================================================

/// Default number of values printed per entry.
pub const DEFAULT_MAX_VALUES: usize = 16;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Output format for the dump.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented tree, one line per entry
    #[default]
    Text,
    /// The full tree as JSON
    Json,
}

/// tiff-inspect - Dump the structure of TIFF and BigTIFF files.
///
/// Prints the header, every Image File Directory, its entries with decoded
/// values, Sub-IFDs and the next-IFD chain.
#[derive(Parser, Debug, Clone)]
#[command(name = "tiff-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// TIFF or BigTIFF file to inspect.
    pub file: PathBuf,

    // =========================================================================
    // Parser Configuration
    // =========================================================================
    /// Follow SubIFDs (tag 330) into child directories.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        env = "TIFF_INSPECT_PARSE_SUB_IFDS"
    )]
    pub parse_sub_ifds: bool,

    /// Maximum number of directories to read.
    #[arg(long, default_value_t = DEFAULT_MAX_IFDS, env = "TIFF_INSPECT_MAX_IFDS")]
    pub max_ifds: usize,

    /// Maximum number of values decoded across the whole file.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DECODED_VALUES,
        env = "TIFF_INSPECT_MAX_DECODED_VALUES"
    )]
    pub max_decoded_values: u64,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "TIFF_INSPECT_FORMAT")]
    pub format: OutputFormat,

    /// Values printed per entry in text output; the rest are elided.
    #[arg(long, default_value_t = DEFAULT_MAX_VALUES, env = "TIFF_INSPECT_MAX_VALUES")]
    pub max_values: usize,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_ifds == 0 {
            return Err("max_ifds must be greater than 0".to_string());
        }
        if self.max_values == 0 {
            return Err("max_values must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Parser options derived from this configuration.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::new()
            .with_parse_sub_ifds(self.parse_sub_ifds)
            .with_max_ifds(self.max_ifds)
            .with_max_decoded_values(self.max_decoded_values)
    }
}

// =============================================================================
// Tests
// =============================================================================

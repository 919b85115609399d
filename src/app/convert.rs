//! Type conversion utilities for CLI arguments.
//!
//! Maps clap value enums onto the internal types the library works with.

use crate::{cli::Format, output::OutputFormat};

/// Converts a CLI output format to the internal [`OutputFormat`].
///
/// # Example
///
/// ```
/// use lookup_differ::{app::convert_format, cli::Format, output::OutputFormat};
///
/// assert_eq!(convert_format(Format::Yaml), OutputFormat::Yaml);
/// ```
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

//! Export format selection.
//!
//! [`OutputFormat`] lets a presentation layer keep the chosen export format
//! as a value (from a menu, a settings file, or a target file name) and
//! dispatch through [`render`] or [`write_to_format`].
//!
//! # Example
//!
//! ```rust
//! # fn main() -> chatsift::Result<()> {
//! use chatsift::config::ExportConfig;
//! use chatsift::format::{OutputFormat, render};
//! use chatsift::parse_line;
//!
//! let record = parse_line("[10-11-25 21:29:30.123] Rota: hello").unwrap();
//!
//! let format = OutputFormat::from_path("export.md")?;
//! assert_eq!(format, OutputFormat::Discord);
//!
//! let text = render(&[record], format, &ExportConfig::new())?;
//! assert!(text.ends_with("> *hello*"));
//! # Ok(())
//! # }
//! ```

use std::borrow::Borrow;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::error::{ChatsiftError, Result};
use crate::record::ChatLogRecord;

/// Export format for a filtered record subset.
///
/// - [`Csv`](OutputFormat::Csv) - spreadsheet-friendly table
/// - [`Discord`](OutputFormat::Discord) - quote blocks ready to paste into a
///   Discord channel
///
/// # Example
///
/// ```rust
/// use chatsift::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("markdown").unwrap();
/// assert_eq!(format, OutputFormat::Discord);
/// assert_eq!(format.extension(), "md");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Comma-separated values with a header row (default).
    #[default]
    Csv,

    /// Discord markdown, two lines per record.
    Discord,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use chatsift::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Csv.extension(), "csv");
    /// assert_eq!(OutputFormat::Discord.extension(), "md");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Discord => "md",
        }
    }

    /// Returns all accepted format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "discord", "markdown", "md"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Discord]
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Discord => "text/markdown",
        }
    }

    /// Detects the format from a file path's extension.
    ///
    /// ```rust
    /// use chatsift::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/chat.CSV").unwrap(), OutputFormat::Csv);
    /// assert!(OutputFormat::from_path("chat.json").is_err());
    /// ```
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "md" | "markdown" => Ok(OutputFormat::Discord),
            _ => Err(ChatsiftError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, md"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Discord => write!(f, "Discord"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ChatsiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "discord" | "markdown" | "md" => Ok(OutputFormat::Discord),
            _ => Err(ChatsiftError::invalid_format(
                "output",
                format!(
                    "Unknown format: '{s}'. Expected one of: {}",
                    OutputFormat::all_names().join(", ")
                ),
            )),
        }
    }
}

/// Renders records as a string in the given format.
///
/// # Errors
///
/// Returns an error if:
/// - CSV is requested without the `csv-output` feature
/// - The display offset in `config` is out of range (CSV only)
#[allow(unused_variables)]
pub fn render<R: Borrow<ChatLogRecord>>(
    records: &[R],
    format: OutputFormat,
    config: &ExportConfig,
) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(records, config),
        OutputFormat::Discord => Ok(crate::core::output::to_discord(records)),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Writes records to `writer` in the given format and returns the number of
/// records written.
///
/// ```rust
/// use chatsift::config::ExportConfig;
/// use chatsift::format::{OutputFormat, write_to_format};
/// use chatsift::parse_line;
///
/// let record = parse_line("[10-11-25 21:29:30.123] Rota: hello").unwrap();
/// let mut buf = Vec::new();
/// let count = write_to_format(&[record], &mut buf, OutputFormat::Discord, &ExportConfig::new())?;
/// assert_eq!(count, 1);
/// # Ok::<(), chatsift::ChatsiftError>(())
/// ```
#[allow(unused_variables)]
pub fn write_to_format<W: Write, R: Borrow<ChatLogRecord>>(
    records: &[R],
    writer: W,
    format: OutputFormat,
    config: &ExportConfig,
) -> Result<usize> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(records, writer, config),
        OutputFormat::Discord => crate::core::output::write_discord(records, writer),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

fn missing_feature(format: OutputFormat) -> ChatsiftError {
    ChatsiftError::invalid_format(
        "output",
        format!("Output format {format} requires the 'csv-output' feature to be enabled"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn record() -> ChatLogRecord {
        let ts = Utc.with_ymd_and_hms(2025, 11, 10, 21, 29, 30).unwrap();
        ChatLogRecord::new(ts, "Rota", "hello, world")
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str("discord").unwrap(),
            OutputFormat::Discord
        );
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Discord);
        let err = OutputFormat::from_str("json").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(OutputFormat::Discord.to_string(), "Discord");
    }

    #[test]
    fn test_format_mime_type() {
        assert_eq!(OutputFormat::Csv.mime_type(), "text/csv");
        assert_eq!(OutputFormat::Discord.mime_type(), "text/markdown");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path("export.csv").unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::from_path("/tmp/export.Markdown").unwrap(),
            OutputFormat::Discord
        );
        assert!(OutputFormat::from_path("export.txt").is_err());
        assert!(OutputFormat::from_path("export").is_err());
    }

    #[test]
    fn test_format_all() {
        assert_eq!(OutputFormat::all().len(), 2);
        for name in OutputFormat::all_names() {
            assert!(OutputFormat::from_str(name).is_ok());
        }
    }

    #[test]
    fn test_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }

    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&OutputFormat::Discord).unwrap();
        assert_eq!(json, "\"discord\"");

        let parsed: OutputFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(parsed, OutputFormat::Csv);
    }

    #[test]
    fn test_render_discord() {
        let text = render(&[record()], OutputFormat::Discord, &ExportConfig::new()).unwrap();
        assert_eq!(text, "> -# Rota <t:1762810170:f>\n> *hello, world*");
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_render_matches_write() {
        let config = ExportConfig::new();
        for &format in OutputFormat::all() {
            let text = render(&[record()], format, &config).unwrap();
            let mut buf = Vec::new();
            let count = write_to_format(&[record()], &mut buf, format, &config).unwrap();
            assert_eq!(count, 1);
            assert_eq!(String::from_utf8(buf).unwrap(), text);
        }
    }
}

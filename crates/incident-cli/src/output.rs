//! Output formatting for the notifier.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use incident_alerts::{AlertRecord, AlertStatus, NotificationResult};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Writes a report in the format chosen with `--format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Creates a writer for `format`.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Writes `report` to `writer`.
    ///
    /// JSON output is pretty-printed and newline-terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(self, writer: &mut W, report: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, report)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => report.write_table(writer)?,
        }
        Ok(())
    }
}

/// Human-readable rendering of a report.
pub trait TableDisplay {
    /// Writes the report as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Outcome of a delivered notification.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    /// Channel that delivered the alert.
    pub channel: String,
    /// HTTP status returned by the API.
    pub status_code: Option<u16>,
    /// Status of the alert that was sent.
    pub alert_status: AlertStatus,
    /// Alert title.
    pub title: String,
    /// Deduplication key, empty if none was derived.
    pub deduplication_key: String,
}

impl DeliveryReport {
    /// Builds a report from the sent record and the channel result.
    #[must_use]
    pub fn new(record: &AlertRecord, result: &NotificationResult) -> Self {
        Self {
            channel: result.channel.clone(),
            status_code: result.status_code,
            alert_status: result.alert_status,
            title: record.title().to_string(),
            deduplication_key: record.deduplication_key().to_string(),
        }
    }
}

impl TableDisplay for DeliveryReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "Incident notification sent successfully in status {}",
            self.alert_status
        )?;
        Ok(())
    }
}

/// A payload that was built but not sent.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    /// Channel that handled the dry run.
    pub channel: String,
    /// Always false.
    pub sent: bool,
    /// The body that would have been posted.
    pub payload: Value,
}

impl DryRunReport {
    /// Builds a report for the given record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn new(record: &AlertRecord, result: &NotificationResult) -> Result<Self, CliError> {
        let payload = serde_json::to_value(record)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        Ok(Self {
            channel: result.channel.clone(),
            sent: false,
            payload,
        })
    }
}

impl TableDisplay for DryRunReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        serde_json::to_writer_pretty(&mut *writer, &self.payload)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        writeln!(writer)?;
        Ok(())
    }
}

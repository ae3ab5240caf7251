//! The notify flow: flags to record to delivery.

use std::io::Write;

use incident_alerts::{AlertRecord, IncidentChannel, LogChannel, NotificationChannel};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{DeliveryReport, DryRunReport, OutputFormat};

/// Runs one notification from parsed flags.
///
/// Connection settings are validated first, then the record is built. A
/// malformed `--metadata` therefore never reaches the network.
///
/// # Errors
///
/// Returns an error if configuration, derivation, delivery, or output fails.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let config = cli.channel_config()?;
    let record = AlertRecord::from_input(&cli.alert_input())?;
    debug!(
        title = %record.title(),
        status = %record.status(),
        metadata_keys = record.metadata().len(),
        "built alert record"
    );

    if cli.dry_run {
        let channel = LogChannel::new("dry-run");
        let result = channel.send(&record).await?;
        format.write(out, &DryRunReport::new(&record, &result)?)?;
        return Ok(());
    }

    let channel = IncidentChannel::new(config)?;
    notify(&channel, &record, format, out).await
}

/// Sends `record` through `channel` and reports the outcome.
///
/// # Errors
///
/// Returns an error if delivery or output fails.
pub async fn notify<C, W>(
    channel: &C,
    record: &AlertRecord,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError>
where
    C: NotificationChannel,
    W: Write,
{
    let result = channel.send(record).await?;
    format.write(out, &DeliveryReport::new(record, &result))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use clap::Parser;
    use incident_alerts::{AlertError, AlertInput, MonitoringField, NotificationResult};
    use serde_json::{json, Value};

    use crate::cli::Format;

    /// Records what it was asked to send.
    #[derive(Debug, Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<String>>,
        reject_with: Option<&'static str>,
    }

    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, record: &AlertRecord) -> incident_alerts::Result<NotificationResult> {
            if let Some(status) = self.reject_with {
                return Err(AlertError::UnexpectedStatus {
                    status: status.to_string(),
                });
            }
            self.sent.lock().unwrap().push(record.to_json()?);
            Ok(NotificationResult::new(self.name(), record.status()).with_status_code(202))
        }
    }

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec![
            "notify_incident",
            "--api_url=http://127.0.0.1:9/v2/alert_events",
            "--token=tok",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    fn record() -> AlertRecord {
        let input = AlertInput::new()
            .with_field(MonitoringField::HostName, "web1")
            .with_field(MonitoringField::HostState, "UP");
        AlertRecord::from_input(&input).unwrap()
    }

    #[tokio::test]
    async fn notify_sends_once_and_reports() {
        let channel = RecordingChannel::default();
        let mut out = Vec::new();

        notify(&channel, &record(), OutputFormat::new(Format::Table), &mut out)
            .await
            .unwrap();

        assert_eq!(channel.sent.lock().unwrap().len(), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Incident notification sent successfully in status resolved\n"
        );
    }

    #[tokio::test]
    async fn notify_propagates_rejection() {
        let channel = RecordingChannel {
            reject_with: Some("400 Bad Request"),
            ..RecordingChannel::default()
        };
        let mut out = Vec::new();

        let err = notify(&channel, &record(), OutputFormat::default(), &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to send notification: 400 Bad Request");
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn dry_run_prints_payload_without_sending() {
        let cli = cli(&[
            "--dry_run",
            "--host_name=web1",
            "--service_desc=CPU",
            "--host_state=UP",
            "--service_state=OK",
        ]);
        let mut out = Vec::new();

        run(&cli, &mut out).await.unwrap();

        let payload: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            payload,
            json!({
                "title": "web1: CPU",
                "status": "resolved",
                "deduplication_key": "web1-CPU",
                "metadata": {
                    "host_name": "web1",
                    "service_desc": "CPU",
                    "host_state": "UP",
                    "service_state": "OK",
                },
            })
        );
    }

    #[tokio::test]
    async fn malformed_metadata_fails_before_sending() {
        let cli = cli(&["--metadata={broken"]);
        let mut out = Vec::new();

        let err = run(&cli, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            CliError::Alert(AlertError::InvalidMetadata { .. })
        ));
        assert!(out.is_empty());
    }
}

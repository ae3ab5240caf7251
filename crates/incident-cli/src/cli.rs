//! Command-line argument parsing with clap.
//!
//! Flags keep the `--snake_case` names of the Nagios macros they carry, so a
//! command definition reads `--host_name="$HOSTNAME$" --host_state="$HOSTSTATE$"`.

use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, ValueEnum};
use incident_alerts::{AlertInput, ChannelConfig, MonitoringField};

use crate::error::CliError;

/// Send a Nagios host or service notification to an incident-management API.
#[derive(Parser, Debug, Clone)]
#[command(name = "notify_incident")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The incident API URL to POST alerts to.
    #[arg(long = "api_url", env = "INCIDENT_API_URL")]
    pub api_url: String,

    /// The API token for authorization.
    #[arg(long, env = "INCIDENT_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Title of the incident.
    #[arg(long)]
    pub title: Option<String>,

    /// Description of the incident.
    #[arg(long)]
    pub description: Option<String>,

    /// Source URL for more information.
    #[arg(long = "source_url")]
    pub source_url: Option<String>,

    /// Deduplication key for the incident.
    #[arg(long = "deduplication_key")]
    pub deduplication_key: Option<String>,

    /// Extra metadata as a JSON object. Keys override the named fields.
    #[arg(long, value_name = "JSON")]
    pub metadata: Option<String>,

    /// Monitoring context forwarded as metadata.
    #[command(flatten)]
    pub monitoring: MonitoringArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Print the payload instead of sending it.
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// Request timeout in seconds. Unset means no explicit timeout.
    #[arg(long = "timeout_secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum Format {
    /// Human-readable output.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Nagios macros copied into the alert metadata.
#[derive(Args, Debug, Clone, Default)]
pub struct MonitoringArgs {
    /// The name of the host.
    #[arg(long = "host_name")]
    pub host_name: Option<String>,

    /// The address of the host.
    #[arg(long = "host_address")]
    pub host_address: Option<String>,

    /// The alias of the host.
    #[arg(long = "host_alias")]
    pub host_alias: Option<String>,

    /// The description of the service.
    #[arg(long = "service_desc")]
    pub service_desc: Option<String>,

    /// The type of notification.
    #[arg(long = "notification_type")]
    pub notification_type: Option<String>,

    /// The state of the host.
    #[arg(long = "host_state")]
    pub host_state: Option<String>,

    /// The state of the service.
    #[arg(long = "service_state")]
    pub service_state: Option<String>,

    /// The current attempt number for the service check.
    #[arg(long = "service_attempt")]
    pub service_attempt: Option<String>,

    /// The maximum number of service check attempts.
    #[arg(long = "max_service_attempts")]
    pub max_service_attempts: Option<String>,

    /// The last state of the service.
    #[arg(long = "last_service_state")]
    pub last_service_state: Option<String>,

    /// The output of the service check.
    #[arg(long = "service_output")]
    pub service_output: Option<String>,

    /// The current attempt number for the host check.
    #[arg(long = "host_attempt")]
    pub host_attempt: Option<String>,

    /// The maximum number of host check attempts.
    #[arg(long = "max_host_attempts")]
    pub max_host_attempts: Option<String>,

    /// The last state of the host.
    #[arg(long = "last_host_state")]
    pub last_host_state: Option<String>,

    /// The output of the host check.
    #[arg(long = "host_output")]
    pub host_output: Option<String>,

    /// How long the service has been in its current state.
    #[arg(long = "service_duration")]
    pub service_duration: Option<String>,

    /// How long the host has been in its current state.
    #[arg(long = "host_duration")]
    pub host_duration: Option<String>,

    /// Timestamp of the last service check.
    #[arg(long = "last_service_check")]
    pub last_service_check: Option<String>,

    /// Timestamp of the last host check.
    #[arg(long = "last_host_check")]
    pub last_host_check: Option<String>,

    /// The notification number for the service.
    #[arg(long = "service_notification_number")]
    pub service_notification_number: Option<String>,

    /// The notification number for the host.
    #[arg(long = "host_notification_number")]
    pub host_notification_number: Option<String>,

    /// The contact being notified.
    #[arg(long = "contact_name")]
    pub contact_name: Option<String>,

    /// Email address of the contact being notified.
    #[arg(long = "contact_email")]
    pub contact_email: Option<String>,
}

impl MonitoringArgs {
    /// Pairs every flag with the field it fills.
    fn entries(&self) -> [(MonitoringField, Option<&String>); 23] {
        use MonitoringField as F;
        [
            (F::HostName, self.host_name.as_ref()),
            (F::HostAddress, self.host_address.as_ref()),
            (F::HostAlias, self.host_alias.as_ref()),
            (F::ServiceDesc, self.service_desc.as_ref()),
            (F::NotificationType, self.notification_type.as_ref()),
            (F::HostState, self.host_state.as_ref()),
            (F::ServiceState, self.service_state.as_ref()),
            (F::ServiceAttempt, self.service_attempt.as_ref()),
            (F::MaxServiceAttempts, self.max_service_attempts.as_ref()),
            (F::LastServiceState, self.last_service_state.as_ref()),
            (F::ServiceOutput, self.service_output.as_ref()),
            (F::HostAttempt, self.host_attempt.as_ref()),
            (F::MaxHostAttempts, self.max_host_attempts.as_ref()),
            (F::LastHostState, self.last_host_state.as_ref()),
            (F::HostOutput, self.host_output.as_ref()),
            (F::ServiceDuration, self.service_duration.as_ref()),
            (F::HostDuration, self.host_duration.as_ref()),
            (F::LastServiceCheck, self.last_service_check.as_ref()),
            (F::LastHostCheck, self.last_host_check.as_ref()),
            (F::ServiceNotificationNumber, self.service_notification_number.as_ref()),
            (F::HostNotificationNumber, self.host_notification_number.as_ref()),
            (F::ContactName, self.contact_name.as_ref()),
            (F::ContactEmail, self.contact_email.as_ref()),
        ]
    }
}

impl Cli {
    /// Rejects an empty endpoint or token.
    ///
    /// Nagios passes an empty string when the macro behind `--api_url` or
    /// `--token` is unset. The returned error carries the usage text and exits
    /// with status 2.
    ///
    /// # Errors
    ///
    /// Returns a `MissingRequiredArgument` error naming the first empty flag.
    pub fn validate(&self) -> Result<(), clap::Error> {
        let empty = if self.api_url.is_empty() {
            Some("--api_url")
        } else if self.token.is_empty() {
            Some("--token")
        } else {
            None
        };
        match empty {
            Some(flag) => Err(Self::command().error(
                ErrorKind::MissingRequiredArgument,
                format!("a non-empty value is required for '{flag}'"),
            )),
            None => Ok(()),
        }
    }

    /// Collects the alert-related flags.
    #[must_use]
    pub fn alert_input(&self) -> AlertInput {
        let mut input = AlertInput {
            title: self.title.clone(),
            description: self.description.clone(),
            source_url: self.source_url.clone(),
            deduplication_key: self.deduplication_key.clone(),
            metadata: self.metadata.clone(),
            ..AlertInput::default()
        };
        for (field, value) in self.monitoring.entries() {
            if let Some(value) = value {
                input.set_field(field, value.clone());
            }
        }
        input
    }

    /// Builds the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the URL or token is unusable, or the
    /// timeout is zero.
    pub fn channel_config(&self) -> Result<ChannelConfig, CliError> {
        let mut config = ChannelConfig::new(&self.api_url, self.token.clone())?;
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(CliError::Config(
                    "timeout must be greater than zero".to_string(),
                ));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

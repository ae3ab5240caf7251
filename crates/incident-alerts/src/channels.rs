//! Notification channels for alert delivery.
//!
//! This module provides the [`NotificationChannel`] trait, the
//! [`IncidentChannel`] that posts alerts to the incident-management API, and
//! a [`LogChannel`] that only logs them.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AlertError, Result};
use crate::types::{AlertRecord, AlertStatus};

/// Client tag sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("Nagios Incident.io Plugin/", env!("CARGO_PKG_VERSION"));

/// Result of sending a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationResult {
    /// The channel that processed this notification.
    pub channel: String,
    /// Status of the alert that was delivered.
    pub alert_status: AlertStatus,
    /// Response status code (if a request was made).
    pub status_code: Option<u16>,
    /// Optional message.
    pub message: Option<String>,
}

impl NotificationResult {
    /// Creates a result for the given channel.
    #[must_use]
    pub fn new(channel: impl Into<String>, alert_status: AlertStatus) -> Self {
        Self {
            channel: channel.into(),
            alert_status,
            status_code: None,
            message: None,
        }
    }

    /// Sets the status code.
    #[must_use]
    pub const fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

/// Trait for notification channels.
pub trait NotificationChannel: Send + Sync + fmt::Debug {
    /// Returns the name of this channel.
    fn name(&self) -> &str;

    /// Delivers one alert record.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert could not be delivered. There is no retry.
    fn send(&self, record: &AlertRecord) -> impl Future<Output = Result<NotificationResult>> + Send;
}

/// Connection settings for an [`IncidentChannel`].
#[derive(Clone)]
pub struct ChannelConfig {
    /// The name of this channel.
    pub name: String,
    /// Endpoint receiving the POST.
    pub url: Url,
    /// Bearer token.
    pub token: String,
    /// Client tag.
    pub user_agent: String,
    /// Total request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// Whether `HTTP_PROXY`/`HTTPS_PROXY` from the environment apply.
    pub proxy_from_env: bool,
}

impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("name", &self.name)
            .field("url", &self.url.as_str())
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("proxy_from_env", &self.proxy_from_env)
            .finish()
    }
}

impl ChannelConfig {
    /// Creates a new channel configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidConfig` if the URL or token is empty, or
    /// the URL is not absolute.
    pub fn new(url: &str, token: impl Into<String>) -> Result<Self> {
        if url.is_empty() {
            return Err(AlertError::InvalidConfig {
                reason: "API URL cannot be empty".to_string(),
            });
        }
        let token = token.into();
        if token.is_empty() {
            return Err(AlertError::InvalidConfig {
                reason: "API token cannot be empty".to_string(),
            });
        }
        let url = Url::parse(url).map_err(|e| AlertError::InvalidConfig {
            reason: format!("invalid API URL '{url}': {e}"),
        })?;

        Ok(Self {
            name: "incident".to_string(),
            url,
            token,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            proxy_from_env: true,
        })
    }

    /// Sets the channel name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the client tag.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Connects directly, ignoring proxy environment variables.
    #[must_use]
    pub const fn without_proxy(mut self) -> Self {
        self.proxy_from_env = false;
        self
    }
}

/// Posts alerts to the incident-management API.
///
/// One request per [`send`](NotificationChannel::send); only `202 Accepted`
/// counts as delivered.
#[derive(Debug, Clone)]
pub struct IncidentChannel {
    config: ChannelConfig,
    client: reqwest::Client,
}

impl IncidentChannel {
    /// Creates a new channel with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ChannelConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if !config.proxy_from_env {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.config.url.as_str()
    }
}

impl NotificationChannel for IncidentChannel {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn send(&self, record: &AlertRecord) -> Result<NotificationResult> {
        let payload = record.to_json()?;
        debug!(payload = %payload, "incident payload");

        let response = self
            .client
            .post(self.config.url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        drop(response);

        if status != StatusCode::ACCEPTED {
            warn!(
                channel = %self.name(),
                url = %self.config.url,
                status = %status,
                "incident API rejected notification"
            );
            return Err(AlertError::UnexpectedStatus {
                status: status.to_string(),
            });
        }

        info!(
            channel = %self.name(),
            url = %self.config.url,
            status = %record.status(),
            deduplication_key = %record.deduplication_key(),
            "incident notification sent"
        );

        Ok(NotificationResult::new(self.name(), record.status())
            .with_status_code(status.as_u16())
            .with_message(format!("notification sent in status {}", record.status())))
    }
}

/// A channel that only logs alerts. Used for dry runs.
#[derive(Debug, Clone)]
pub struct LogChannel {
    name: String,
}

impl LogChannel {
    /// Creates a new log channel.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogChannel {
    fn default() -> Self {
        Self::new("log")
    }
}

impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, record: &AlertRecord) -> Result<NotificationResult> {
        let payload = record.to_json()?;
        info!(
            channel = %self.name(),
            title = %record.title(),
            status = %record.status(),
            deduplication_key = %record.deduplication_key(),
            "ALERT"
        );
        debug!(payload = %payload, "alert payload");

        Ok(NotificationResult::new(self.name(), record.status()).with_message("logged, not sent"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertInput, MonitoringField};

    fn test_record() -> AlertRecord {
        let input = AlertInput::new()
            .with_field(MonitoringField::HostName, "web1")
            .with_field(MonitoringField::ServiceDesc, "CPU")
            .with_field(MonitoringField::ServiceState, "CRITICAL");
        AlertRecord::from_input(&input).unwrap()
    }

    mod notification_result_tests {
        use super::*;

        #[test]
        fn result_new() {
            let result = NotificationResult::new("incident", AlertStatus::Firing);

            assert_eq!(result.channel, "incident");
            assert_eq!(result.alert_status, AlertStatus::Firing);
            assert!(result.status_code.is_none());
            assert!(result.message.is_none());
        }

        #[test]
        fn result_with_status_code_and_message() {
            let result = NotificationResult::new("incident", AlertStatus::Resolved)
                .with_status_code(202)
                .with_message("sent");

            assert_eq!(result.status_code, Some(202));
            assert_eq!(result.message, Some("sent".to_string()));
        }
    }

    mod channel_config_tests {
        use super::*;

        #[test]
        fn create_channel_config() {
            let config = ChannelConfig::new("https://api.example.com/v2/alert_events/http/01", "tok").unwrap();

            assert_eq!(config.name, "incident");
            assert_eq!(config.url.as_str(), "https://api.example.com/v2/alert_events/http/01");
            assert_eq!(config.token, "tok");
            assert!(config.user_agent.starts_with("Nagios Incident.io Plugin/"));
            assert!(config.timeout.is_none());
            assert!(config.proxy_from_env);
        }

        #[test]
        fn empty_url_fails() {
            match ChannelConfig::new("", "tok") {
                Err(AlertError::InvalidConfig { reason }) => assert!(reason.contains("URL")),
                other => panic!("expected InvalidConfig, got {other:?}"),
            }
        }

        #[test]
        fn empty_token_fails() {
            match ChannelConfig::new("https://api.example.com", "") {
                Err(AlertError::InvalidConfig { reason }) => assert!(reason.contains("token")),
                other => panic!("expected InvalidConfig, got {other:?}"),
            }
        }

        #[test]
        fn relative_url_fails() {
            assert!(matches!(
                ChannelConfig::new("/v2/alert_events", "tok"),
                Err(AlertError::InvalidConfig { .. })
            ));
        }

        #[test]
        fn builder_methods() {
            let config = ChannelConfig::new("https://api.example.com", "tok")
                .unwrap()
                .with_name("incident-io")
                .with_user_agent("custom/1.0")
                .with_timeout(Duration::from_secs(5))
                .without_proxy();

            assert_eq!(config.name, "incident-io");
            assert!(!config.proxy_from_env);
            assert_eq!(config.user_agent, "custom/1.0");
            assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        }

        #[test]
        fn debug_redacts_token() {
            let config = ChannelConfig::new("https://api.example.com", "s3cret").unwrap();
            let debug = format!("{config:?}");

            assert!(!debug.contains("s3cret"));
            assert!(debug.contains("<redacted>"));
        }
    }

    mod incident_channel_tests {
        use super::*;

        #[test]
        fn channel_name_and_url() {
            let config = ChannelConfig::new("https://api.example.com/alerts", "tok").unwrap();
            let channel = IncidentChannel::new(config).unwrap();

            assert_eq!(channel.name(), "incident");
            assert_eq!(channel.url(), "https://api.example.com/alerts");
        }

        #[tokio::test]
        async fn unreachable_endpoint_is_transport_error() {
            // Port 9 (discard) on loopback is not expected to be listening.
            let config = ChannelConfig::new("http://127.0.0.1:9/alerts", "tok")
                .unwrap()
                .with_timeout(Duration::from_secs(5))
                .without_proxy();
            let channel = IncidentChannel::new(config).unwrap();

            let result = channel.send(&test_record()).await;
            assert!(matches!(result, Err(AlertError::Transport { .. })));
        }
    }

    mod log_channel_tests {
        use super::*;

        #[test]
        fn log_channel_default() {
            assert_eq!(LogChannel::default().name(), "log");
        }

        #[tokio::test]
        async fn log_channel_send() {
            let channel = LogChannel::new("dry-run");
            let result = channel.send(&test_record()).await.unwrap();

            assert_eq!(result.channel, "dry-run");
            assert_eq!(result.alert_status, AlertStatus::Firing);
            assert!(result.status_code.is_none());
        }
    }
}

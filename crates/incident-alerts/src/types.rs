//! Core types for alert derivation.
//!
//! - [`MonitoringField`]: the Nagios macros forwarded as alert metadata
//! - [`AlertInput`]: raw notification data as handed over by the monitoring system
//! - [`AlertStatus`]: whether the incident is firing or resolved
//! - [`AlertRecord`]: the normalized alert that is posted to the API

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title used when neither an override nor a host/service name is available.
pub const DEFAULT_TITLE: &str = "Nagios Notification";

/// A named monitoring field copied into the alert metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringField {
    /// `$HOSTNAME$`
    HostName,
    /// `$HOSTADDRESS$`
    HostAddress,
    /// `$HOSTALIAS$`
    HostAlias,
    /// `$SERVICEDESC$`
    ServiceDesc,
    /// `$NOTIFICATIONTYPE$`
    NotificationType,
    /// `$HOSTSTATE$`
    HostState,
    /// `$SERVICESTATE$`
    ServiceState,
    /// `$SERVICEATTEMPT$`
    ServiceAttempt,
    /// `$MAXSERVICEATTEMPTS$`
    MaxServiceAttempts,
    /// `$LASTSERVICESTATE$`
    LastServiceState,
    /// `$SERVICEOUTPUT$`
    ServiceOutput,
    /// `$HOSTATTEMPT$`
    HostAttempt,
    /// `$MAXHOSTATTEMPTS$`
    MaxHostAttempts,
    /// `$LASTHOSTSTATE$`
    LastHostState,
    /// `$HOSTOUTPUT$`
    HostOutput,
    /// `$SERVICEDURATION$`
    ServiceDuration,
    /// `$HOSTDURATION$`
    HostDuration,
    /// `$LASTSERVICECHECK$`
    LastServiceCheck,
    /// `$LASTHOSTCHECK$`
    LastHostCheck,
    /// `$SERVICENOTIFICATIONNUMBER$`
    ServiceNotificationNumber,
    /// `$HOSTNOTIFICATIONNUMBER$`
    HostNotificationNumber,
    /// `$CONTACTNAME$`
    ContactName,
    /// `$CONTACTEMAIL$`
    ContactEmail,
}

impl MonitoringField {
    /// Every field, in the order they are documented.
    pub const ALL: [Self; 23] = [
        Self::HostName,
        Self::HostAddress,
        Self::HostAlias,
        Self::ServiceDesc,
        Self::NotificationType,
        Self::HostState,
        Self::ServiceState,
        Self::ServiceAttempt,
        Self::MaxServiceAttempts,
        Self::LastServiceState,
        Self::ServiceOutput,
        Self::HostAttempt,
        Self::MaxHostAttempts,
        Self::LastHostState,
        Self::HostOutput,
        Self::ServiceDuration,
        Self::HostDuration,
        Self::LastServiceCheck,
        Self::LastHostCheck,
        Self::ServiceNotificationNumber,
        Self::HostNotificationNumber,
        Self::ContactName,
        Self::ContactEmail,
    ];

    /// Returns the metadata key for this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HostName => "host_name",
            Self::HostAddress => "host_address",
            Self::HostAlias => "host_alias",
            Self::ServiceDesc => "service_desc",
            Self::NotificationType => "notification_type",
            Self::HostState => "host_state",
            Self::ServiceState => "service_state",
            Self::ServiceAttempt => "service_attempt",
            Self::MaxServiceAttempts => "max_service_attempts",
            Self::LastServiceState => "last_service_state",
            Self::ServiceOutput => "service_output",
            Self::HostAttempt => "host_attempt",
            Self::MaxHostAttempts => "max_host_attempts",
            Self::LastHostState => "last_host_state",
            Self::HostOutput => "host_output",
            Self::ServiceDuration => "service_duration",
            Self::HostDuration => "host_duration",
            Self::LastServiceCheck => "last_service_check",
            Self::LastHostCheck => "last_host_check",
            Self::ServiceNotificationNumber => "service_notification_number",
            Self::HostNotificationNumber => "host_notification_number",
            Self::ContactName => "contact_name",
            Self::ContactEmail => "contact_email",
        }
    }
}

impl fmt::Display for MonitoringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw notification data.
///
/// Every value is optional. An empty string is treated the same as an absent
/// value by all derivation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertInput {
    /// Explicit alert title.
    pub title: Option<String>,
    /// Explicit alert description.
    pub description: Option<String>,
    /// Link to more information about the alert.
    pub source_url: Option<String>,
    /// Explicit deduplication key.
    pub deduplication_key: Option<String>,
    /// Free-form JSON object merged over the named fields.
    pub metadata: Option<String>,
    /// Named monitoring fields.
    pub fields: BTreeMap<MonitoringField, String>,
}

impl AlertInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title override.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the source URL.
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Sets the deduplication key override.
    #[must_use]
    pub fn with_deduplication_key(mut self, key: impl Into<String>) -> Self {
        self.deduplication_key = Some(key.into());
        self
    }

    /// Sets the free-form metadata JSON.
    #[must_use]
    pub fn with_metadata(mut self, json: impl Into<String>) -> Self {
        self.metadata = Some(json.into());
        self
    }

    /// Sets a named monitoring field.
    #[must_use]
    pub fn with_field(mut self, field: MonitoringField, value: impl Into<String>) -> Self {
        self.set_field(field, value);
        self
    }

    /// Sets a named monitoring field in place.
    pub fn set_field(&mut self, field: MonitoringField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Returns a monitoring field if it is set and non-empty.
    #[must_use]
    pub fn field(&self, field: MonitoringField) -> Option<&str> {
        non_empty(self.fields.get(&field).map(String::as_str))
    }

    /// Host name, if present.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.field(MonitoringField::HostName)
    }

    /// Service description, if present.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.field(MonitoringField::ServiceDesc)
    }
}

/// Collapses empty strings to `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lifecycle state reported to the incident API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The problem is active.
    #[default]
    Firing,
    /// The problem has recovered.
    Resolved,
}

impl AlertStatus {
    /// Returns the status as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
        }
    }

    /// Returns true if the alert is resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized alert, ready to be posted.
///
/// Built once through [`AlertRecord::from_input`] and never modified.
/// Empty optional strings are left out of the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub(crate) title: String,
    pub(crate) status: AlertStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) deduplication_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) source_url: String,
    pub(crate) metadata: Map<String, Value>,
}

impl AlertRecord {
    /// The alert title. Never empty.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The derived status.
    #[must_use]
    pub const fn status(&self) -> AlertStatus {
        self.status
    }

    /// The deduplication key, possibly empty.
    #[must_use]
    pub fn deduplication_key(&self) -> &str {
        &self.deduplication_key
    }

    /// The description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The source URL, possibly empty.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The merged metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

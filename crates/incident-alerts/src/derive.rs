//! Derivation of an [`AlertRecord`] from raw notification data.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AlertError, Result};
use crate::types::{AlertInput, AlertRecord, AlertStatus, MonitoringField, DEFAULT_TITLE, non_empty};

/// Nagios host state meaning the host is healthy.
const HOST_UP: &str = "UP";

/// Nagios service state meaning the service is healthy.
const SERVICE_OK: &str = "OK";

impl AlertRecord {
    /// Builds a record from notification data.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidMetadata` if the free-form metadata is not
    /// a JSON object.
    pub fn from_input(input: &AlertInput) -> Result<Self> {
        let host_state = input.field(MonitoringField::HostState);
        let service_state = input.field(MonitoringField::ServiceState);
        debug!(
            host_state = host_state.unwrap_or_default(),
            service_state = service_state.unwrap_or_default(),
            "deriving alert status"
        );

        Ok(Self {
            title: derive_title(input),
            status: derive_status(host_state, service_state),
            deduplication_key: derive_deduplication_key(input),
            description: input.description.clone().unwrap_or_default(),
            source_url: input.source_url.clone().unwrap_or_default(),
            metadata: build_metadata(input)?,
        })
    }

    /// Serializes the record into the request body.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::SerializationError` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(AlertError::from)
    }
}

/// Title override, else `"{host}: {service}"`, else whichever is present.
#[must_use]
pub fn derive_title(input: &AlertInput) -> String {
    if let Some(title) = non_empty(input.title.as_deref()) {
        return title.to_string();
    }
    match (input.host(), input.service()) {
        (Some(host), Some(service)) => format!("{host}: {service}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => DEFAULT_TITLE.to_string(),
    }
}

/// Status from whichever state fields are present.
///
/// With no state at all the alert is treated as firing.
#[must_use]
pub fn derive_status(host_state: Option<&str>, service_state: Option<&str>) -> AlertStatus {
    let resolved = match (non_empty(host_state), non_empty(service_state)) {
        (Some(host), Some(service)) => host == HOST_UP && service == SERVICE_OK,
        (Some(host), None) => host == HOST_UP,
        (None, Some(service)) => service == SERVICE_OK,
        (None, None) => false,
    };
    if resolved {
        AlertStatus::Resolved
    } else {
        AlertStatus::Firing
    }
}

/// Key override, else `"{host}-{service}"`, else whichever is present, else empty.
#[must_use]
pub fn derive_deduplication_key(input: &AlertInput) -> String {
    if let Some(key) = non_empty(input.deduplication_key.as_deref()) {
        return key.to_string();
    }
    match (input.host(), input.service()) {
        (Some(host), Some(service)) => format!("{host}-{service}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => String::new(),
    }
}

/// Named fields first, then the free-form object on top.
///
/// # Errors
///
/// Returns `AlertError::InvalidMetadata` if the free-form metadata does not
/// parse as a JSON object.
pub fn build_metadata(input: &AlertInput) -> Result<Map<String, Value>> {
    let mut metadata: Map<String, Value> = MonitoringField::ALL
        .iter()
        .filter_map(|field| {
            input
                .field(*field)
                .map(|value| (field.as_str().to_string(), Value::String(value.to_string())))
        })
        .collect();

    if let Some(raw) = non_empty(input.metadata.as_deref()) {
        let extra = parse_metadata(raw)?;
        for (key, value) in extra {
            if metadata.contains_key(&key) {
                debug!(key = %key, "free-form metadata overrides named field");
            }
            metadata.insert(key, value);
        }
    }

    Ok(metadata)
}

fn parse_metadata(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AlertError::InvalidMetadata {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(AlertError::InvalidMetadata {
            reason: format!("failed to parse JSON: {e}"),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

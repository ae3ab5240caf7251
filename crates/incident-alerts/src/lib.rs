//! Turns Nagios notification data into incident-management alerts.
//!
//! `incident-alerts` derives a single [`AlertRecord`] from the host and
//! service macros Nagios hands to a notification command, and delivers it
//! with one authenticated POST.
//!
//! # Features
//!
//! - **Field derivation**: title, status, and deduplication key from host/service data
//! - **Metadata merge**: named monitoring fields plus a free-form JSON object
//! - **Delivery**: bearer-token POST that only accepts `202 Accepted`
//!
//! # Example
//!
//! ```rust
//! use incident_alerts::{AlertInput, AlertRecord, AlertStatus, MonitoringField};
//!
//! let input = AlertInput::new()
//!     .with_field(MonitoringField::HostName, "web1")
//!     .with_field(MonitoringField::ServiceDesc, "CPU")
//!     .with_field(MonitoringField::HostState, "UP")
//!     .with_field(MonitoringField::ServiceState, "OK");
//!
//! let record = AlertRecord::from_input(&input).unwrap();
//! assert_eq!(record.title(), "web1: CPU");
//! assert_eq!(record.status(), AlertStatus::Resolved);
//! assert_eq!(record.deduplication_key(), "web1-CPU");
//! ```
//!
//! # Delivery
//!
//! ```rust,no_run
//! use incident_alerts::{AlertInput, AlertRecord, ChannelConfig, IncidentChannel, NotificationChannel};
//!
//! # async fn example() -> incident_alerts::Result<()> {
//! let config = ChannelConfig::new("https://api.incident.io/v2/alert_events/http/ID", "token")?;
//! let channel = IncidentChannel::new(config)?;
//! let record = AlertRecord::from_input(&AlertInput::new())?;
//! channel.send(&record).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channels;
pub mod derive;
pub mod error;
pub mod types;

// Re-export main types at crate root
pub use channels::{
    ChannelConfig, IncidentChannel, LogChannel, NotificationChannel, NotificationResult,
    DEFAULT_USER_AGENT,
};
pub use derive::{build_metadata, derive_deduplication_key, derive_status, derive_title};
pub use error::{AlertError, Result};
pub use types::{AlertInput, AlertRecord, AlertStatus, MonitoringField, DEFAULT_TITLE};

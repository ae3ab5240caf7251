//! # incident-cli
//!
//! Nagios notification command for incident-management APIs.
//!
//! Nagios calls `notify_incident` once per host or service notification with
//! its macros as flags. The command builds one alert with
//! [`incident_alerts::AlertRecord::from_input`], posts it, and exits `0` on
//! `202 Accepted` or `2` on any failure.
//!
//! ```text
//! ┌────────┐  flags   ┌─────────────────┐  POST (Bearer)  ┌──────────────┐
//! │ Nagios │─────────►│ notify_incident │────────────────►│ incident API │
//! └────────┘          └─────────────────┘   202 Accepted  └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod output;
pub mod run;

pub use cli::{Cli, Format, MonitoringArgs};
pub use error::{CliError, EXIT_FAILURE};
pub use output::OutputFormat;
pub use run::{notify, run};

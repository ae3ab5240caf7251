//! `notify_incident` binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use incident_cli::{run, Cli, CliError, EXIT_FAILURE};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Missing or empty required flags exit here with usage and status 2
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let mut stdout = io::stdout().lock();
    match runtime.block_on(run(&cli, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &CliError) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_cli::Format;

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::parse_from([
            "notify_incident",
            "--api_url=https://api.example.com/alerts",
            "--token=tok",
        ]);
        assert_eq!(cli.api_url, "https://api.example.com/alerts");
        assert_eq!(cli.format, Format::Table);
    }

    #[test]
    fn config_errors_exit_with_failure_status() {
        let err = CliError::Config("API URL cannot be empty".into());
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
